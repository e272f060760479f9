use quarry_core::{Expr, QueryInterface, SelectOptions, TableRef, Value};

pub fn groups(query: QueryInterface) {
    let table = TableRef::new("items");
    let from = format!(
        "SELECT * FROM {}",
        query.quote_table(&table).expect("Failed to quote the table")
    );
    let column = query.quote_identifier("price").unwrap();
    let select = |condition: Expr| {
        query
            .select_query(
                &table,
                &SelectOptions {
                    condition: Some(condition),
                    ..Default::default()
                },
                None,
            )
            .expect("Failed to compile the select")
            .sql
    };

    // Empty groups are the identity of their operator
    assert_eq!(
        select(Expr::and(Vec::<Expr>::new())),
        format!("{from} WHERE 1=1")
    );
    assert_eq!(
        select(Expr::or(Vec::<Expr>::new())),
        format!("{from} WHERE 1=0")
    );
    assert_eq!(
        select(Expr::matching(Vec::<(&'static str, Value)>::new())),
        format!("{from} WHERE 1=1")
    );

    // Empty lists
    assert_eq!(
        select(Expr::col("price").in_list(Vec::<Expr>::new())),
        format!("{from} WHERE 1=0")
    );
    assert_eq!(
        select(Expr::col("price").not_in(Vec::<Expr>::new())),
        format!("{from} WHERE 1=1")
    );
    assert_eq!(
        select(Expr::matching([("price", Value::List(Vec::new()))])),
        format!("{from} WHERE 1=0")
    );

    // A single child is written bare
    assert_eq!(
        select(Expr::and([Expr::col("price").gt(10)])),
        format!("{from} WHERE {column} > 10")
    );
    assert_eq!(
        select(Expr::or([Expr::and([Expr::col("price").is_null()])])),
        format!("{from} WHERE {column} IS NULL")
    );

    // Nested groups keep their precedence
    assert_eq!(
        select(Expr::and([
            Expr::col("price").gt(10),
            Expr::or([Expr::col("price").lt(2), Expr::col("price").eq(5)]),
        ])),
        format!("{from} WHERE {column} > 10 AND ({column} < 2 OR {column} = 5)")
    );
}
