use crate::assert_binds_complete;
use quarry_core::{
    BindParams, BindStyle, BindValues, Expr, InsertOptions, QueryInterface, RawQueryOptions,
    SelectOptions, TableRef, UpdateOptions, Value, row,
};

pub fn binds(query: QueryInterface) {
    let descriptor = query.descriptor();
    let table = TableRef::new("products");

    // Select
    let statement = query
        .select_query(
            &table,
            &SelectOptions {
                condition: Some(Expr::and([
                    Expr::col("price").gt(Expr::bind(10)),
                    Expr::col("name").like(Expr::bind("%chair%")),
                    Expr::col("category").in_list([Expr::bind("a"), Expr::bind("b")]),
                ])),
                ..Default::default()
            },
            None,
        )
        .expect("Failed to compile the select");
    assert_eq!(statement.bind.len(), 4);
    assert_binds_complete(descriptor, &statement);

    // Update with literals sent as binds
    let statement = query
        .update_query(
            &table,
            &row([("name", Expr::lit("stool")), ("price", Expr::lit(3.5))]),
            Some(&Expr::col("id").eq(Expr::bind(7))),
            &UpdateOptions {
                bind_values: true,
                ..Default::default()
            },
            None,
        )
        .expect("Failed to compile the update");
    assert_eq!(statement.bind.len(), 3);
    assert_binds_complete(descriptor, &statement);
    assert!(
        !statement.sql.contains("stool"),
        "Literal leaked in {}",
        statement.sql
    );

    // Caller parameters named like the generated ones
    let statement = query
        .update_query(
            &table,
            &row([("name", Expr::lit("stool"))]),
            Some(&Expr::raw("id = $quarry_1")),
            &UpdateOptions {
                bind_values: true,
                bind: Some(BindParams::named([("quarry_1", Value::Int64(5))])),
                ..Default::default()
            },
            None,
        )
        .expect("Failed to compile the update");
    assert_eq!(statement.bind.len(), 2, "{}", statement.sql);
    assert_binds_complete(descriptor, &statement);
    let stool = Value::Varchar("stool".into());
    match &statement.bind {
        BindValues::Named(values) => {
            assert_eq!(values["quarry_1"], Value::Int64(5));
            assert!(values.values().any(|v| *v == stool), "{values:?}");
        }
        BindValues::Positional(values) => {
            assert_eq!(values, &[stool, Value::Int64(5)]);
        }
        BindValues::None => panic!("No binds in {}", statement.sql),
    }

    // Nulls stay literal
    let statement = query
        .update_query(
            &table,
            &row([("name", Expr::lit(Value::Null))]),
            None,
            &UpdateOptions {
                bind_values: true,
                ..Default::default()
            },
            None,
        )
        .expect("Failed to compile the update");
    assert_eq!(statement.bind, BindValues::None);
    assert!(statement.sql.ends_with(" = NULL"), "{}", statement.sql);

    // Bulk insert
    let statement = query
        .bulk_insert_query(
            &table,
            &[
                row([("name", Expr::lit("desk")), ("price", Expr::lit(120))]),
                row([("name", Expr::lit("lamp")), ("price", Expr::lit(35))]),
            ],
            &InsertOptions {
                bind_values: true,
                ..Default::default()
            },
            None,
        )
        .expect("Failed to compile the insert");
    assert_eq!(statement.bind.len(), 4);
    assert_binds_complete(descriptor, &statement);

    // Caller supplied parameters, referenced more than once
    let statement = query
        .raw_query(
            "SELECT * FROM products WHERE id = $id AND (name = $name OR alias = $name)",
            &RawQueryOptions {
                bind: Some(BindParams::named([
                    ("id", Value::Int64(1)),
                    ("name", Value::Varchar("desk".into())),
                ])),
                ..Default::default()
            },
        )
        .expect("Failed to compile the raw query");
    if descriptor.bind != BindStyle::Numbered('$') {
        assert!(!statement.sql.contains('$'), "{}", statement.sql);
    }
    assert_binds_complete(descriptor, &statement);

    let statement = query
        .raw_query(
            "SELECT * FROM products WHERE id = $1 OR parent = $1 OR price > $2",
            &RawQueryOptions {
                bind: Some(BindParams::positional([Value::Int64(1), Value::Int64(50)])),
                ..Default::default()
            },
        )
        .expect("Failed to compile the raw query");
    assert_binds_complete(descriptor, &statement);

    // Nothing to bind
    let statement = query
        .select_query(&table, &SelectOptions::default(), None)
        .expect("Failed to compile the select");
    assert_eq!(statement.bind, BindValues::None);
}
