use quarry_core::{
    BindParams, BulkDeleteOptions, Expr, InsertOptions, Join, JoinType, ModelMeta, Ordered,
    Query, QueryInterface, RawQueryOptions, Replacements, RowCount, SelectOptions, TableRef,
    UpsertOptions, row,
};

pub fn determinism(query: QueryInterface) {
    let model = ModelMeta::new("orders")
        .primary_key("id", "order_id")
        .attribute("customer", "customer_id")
        .attribute("total", "total_amount");
    let queries = [
        Query::Select {
            table: TableRef::new("orders").with_alias("o"),
            options: SelectOptions {
                attributes: vec![
                    Expr::col("id"),
                    Expr::qualified("c", "name").alias("customer_name"),
                ],
                joins: vec![Join::new(
                    JoinType::Left,
                    TableRef::new("customers").with_alias("c"),
                    Some(Expr::qualified("c", "id").eq(Expr::col("customer"))),
                )],
                condition: Some(Expr::and([
                    Expr::col("total").gt(Expr::bind(100)),
                    Expr::raw("o.created_at > :since"),
                    Expr::col("status").in_list(["paid", "shipped"]),
                ])),
                order: vec![Ordered::desc(Expr::col("total"))],
                limit: Some(RowCount::Count(10)),
                offset: Some(RowCount::Count(20)),
                replacements: Some(Replacements::named([("since", "2024-01-01")])),
                ..Default::default()
            },
        },
        Query::Insert {
            table: TableRef::new("orders"),
            rows: vec![
                row([("customer", Expr::lit(1)), ("total", Expr::lit(10.5))]),
                row([("total", Expr::lit(3))]),
            ],
            options: InsertOptions {
                bind_values: true,
                ..Default::default()
            },
        },
        Query::Upsert {
            table: TableRef::new("orders"),
            values: row([("id", Expr::lit(7)), ("total", Expr::lit(99))]),
            options: UpsertOptions::default(),
        },
        Query::BulkDelete {
            table: TableRef::new("orders"),
            condition: Some(Expr::col("customer").eq(Expr::bind(3))),
            options: BulkDeleteOptions::default(),
        },
        Query::Raw {
            sql: "SELECT * FROM orders WHERE customer_id = $customer AND total_amount > $total".into(),
            options: RawQueryOptions {
                bind: Some(BindParams::named([("total", 5), ("customer", 1)])),
                ..Default::default()
            },
        },
    ];
    for value in &queries {
        let first;
        let second;
        crate::silent_logs! {
            first = query.compile(value, Some(&model)).map_err(|e| format!("{e:#}"));
            second = query.compile(value, Some(&model)).map_err(|e| format!("{e:#}"));
        }
        assert_eq!(
            first,
            second,
            "{} compiles differently on the same input",
            value.kind()
        );
        if let Ok(statement) = first {
            crate::assert_binds_complete(query.descriptor(), &statement);
        }
    }
}
