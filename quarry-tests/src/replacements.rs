use crate::{expect_ambiguous_replacement, expect_unbound_replacement};
use quarry_core::{
    BindParams, Expr, QueryInterface, RawQueryOptions, Replacements, SelectOptions, TableRef,
    Value,
};

pub fn replacements(query: QueryInterface) {
    let raw = |sql: &str, replacements: Replacements| {
        query.raw_query(
            sql,
            &RawQueryOptions {
                replacements: Some(replacements),
                ..Default::default()
            },
        )
    };

    // Named
    let statement = raw(
        "SELECT * FROM t WHERE a = :a AND b IN (:b) AND c IN (:c)",
        Replacements::named([
            ("a", Value::Int64(5)),
            ("b", Value::List(vec![Value::Int64(1), Value::Int64(2)])),
            ("c", Value::List(Vec::new())),
        ]),
    )
    .expect("Failed to substitute the named replacements");
    assert_eq!(
        statement.sql,
        "SELECT * FROM t WHERE a = 5 AND b IN (1, 2) AND c IN (NULL)"
    );
    assert!(statement.bind.is_empty());

    // Strings are escaped
    let name = Value::Varchar("O'Brien".into());
    let statement = raw(
        "SELECT * FROM t WHERE name = :name",
        Replacements::named([("name", name.clone())]),
    )
    .expect("Failed to substitute the string replacement");
    assert_eq!(
        statement.sql,
        format!("SELECT * FROM t WHERE name = {}", query.escape(&name).unwrap())
    );

    // Positional
    let statement = raw(
        "SELECT * FROM t WHERE a = ? AND b = ?",
        Replacements::positional([Value::Int64(1), Value::Boolean(true)]),
    )
    .expect("Failed to substitute the positional replacements");
    assert_eq!(
        statement.sql,
        format!(
            "SELECT * FROM t WHERE a = 1 AND b = {}",
            query.escape(&Value::Boolean(true)).unwrap()
        )
    );

    // Placeholders inside literals and comments are text
    let statement = raw(
        "SELECT ':a' AS x, :a AS y -- :a\n",
        Replacements::named([("a", Value::Int64(1))]),
    )
    .expect("Failed to substitute the replacement");
    assert_eq!(statement.sql, "SELECT ':a' AS x, 1 AS y -- :a\n");

    // Expressions, local values win over the statement ones
    let statement = query
        .select_query(
            &TableRef::new("t"),
            &SelectOptions {
                attributes: vec![Expr::raw_with("COUNT(*) + :offset", [("offset", 1)])],
                condition: Some(Expr::raw("price > :min")),
                replacements: Some(Replacements::named([("min", 3)])),
                ..Default::default()
            },
            None,
        )
        .expect("Failed to substitute the replacements in expressions");
    assert_eq!(
        statement.sql,
        format!(
            "SELECT COUNT(*) + 1 FROM {} WHERE price > 3",
            query.quote_identifier("t").unwrap()
        )
    );

    crate::silent_logs! {
        // Missing value
        expect_unbound_replacement(raw(
            "SELECT * FROM t WHERE a = :a AND b = :missing",
            Replacements::named([("a", 1)]),
        ));
        // Unused value
        expect_unbound_replacement(raw(
            "SELECT * FROM t WHERE a = :a",
            Replacements::named([("a", 1), ("extra", 2)]),
        ));
        // Unused value attached to an expression
        expect_unbound_replacement(query.select_query(
            &TableRef::new("users"),
            &SelectOptions {
                condition: Some(Expr::raw_with("id = :id", [("id", 1), ("unused", 2)])),
                ..Default::default()
            },
            None,
        ));
        // Too few and too many positional values
        expect_unbound_replacement(raw(
            "SELECT * FROM t WHERE a = ? AND b = ?",
            Replacements::positional([1]),
        ));
        expect_unbound_replacement(raw(
            "SELECT * FROM t WHERE a = ?",
            Replacements::positional([1, 2]),
        ));
        // Unused bind parameter
        expect_unbound_replacement(query.raw_query(
            "SELECT * FROM t WHERE a = $a",
            &RawQueryOptions {
                bind: Some(BindParams::named([("a", 1), ("b", 2)])),
                ..Default::default()
            },
        ));
        // Named replacements mixed with positional bind parameters
        expect_ambiguous_replacement(query.raw_query(
            "SELECT * FROM t WHERE a = :a AND b = $1",
            &RawQueryOptions {
                replacements: Some(Replacements::named([("a", 1)])),
                bind: Some(BindParams::positional([2])),
            },
        ));
    }
}
