#[cfg(test)]
mod tests {
    use quarry::{
        Dialect, Expr, Ordered, QueryInterface, RowCount, SelectOptions, TableRef, query_interface,
    };
    use quarry_tests::init_logs;

    /// Suffixes written after the ORDER BY for: limit only, offset only, both.
    fn expected(dialect: Dialect) -> [&'static str; 3] {
        match dialect {
            Dialect::MySql | Dialect::MariaDb => [
                " LIMIT 10",
                " LIMIT 18446744073709551615 OFFSET 20",
                " LIMIT 10 OFFSET 20",
            ],
            Dialect::Postgres | Dialect::CockroachDb => {
                [" LIMIT 10", " OFFSET 20", " LIMIT 10 OFFSET 20"]
            }
            Dialect::Snowflake => [" LIMIT 10", " LIMIT NULL OFFSET 20", " LIMIT 10 OFFSET 20"],
            Dialect::Sqlite => [" LIMIT 10", " LIMIT -1 OFFSET 20", " LIMIT 10 OFFSET 20"],
            Dialect::MsSql => [
                " OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY",
                " OFFSET 20 ROWS",
                " OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
            ],
            Dialect::Oracle | Dialect::Db2 | Dialect::IbmI => [
                " FETCH NEXT 10 ROWS ONLY",
                " OFFSET 20 ROWS",
                " OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
            ],
            Dialect::Hana => [
                " LIMIT 10",
                " LIMIT 9223372036854775807 OFFSET 20",
                " LIMIT 10 OFFSET 20",
            ],
        }
    }

    fn page(query: QueryInterface, limit: Option<u64>, offset: Option<u64>) -> String {
        query
            .select_query(
                &TableRef::new("users"),
                &SelectOptions {
                    order: vec![Ordered::asc(Expr::col("id"))],
                    limit: limit.map(RowCount::Count),
                    offset: offset.map(RowCount::Count),
                    ..Default::default()
                },
                None,
            )
            .unwrap_or_else(|e| panic!("{}: {e:#}", query.dialect()))
            .sql
    }

    #[test]
    fn pagination_table() {
        init_logs();
        for dialect in Dialect::ALL {
            let query = query_interface(dialect);
            let prefix = format!(
                "SELECT * FROM {} ORDER BY {} ASC",
                query.quote_table(&TableRef::new("users")).unwrap(),
                query.quote_identifier("id").unwrap(),
            );
            let [limit, offset, both] = expected(dialect);
            assert_eq!(page(query, Some(10), None), format!("{prefix}{limit}"), "{dialect}");
            assert_eq!(page(query, None, Some(20)), format!("{prefix}{offset}"), "{dialect}");
            assert_eq!(page(query, Some(10), Some(20)), format!("{prefix}{both}"), "{dialect}");
        }
    }

    #[test]
    fn zero_offset_is_dropped() {
        for dialect in Dialect::ALL {
            let query = query_interface(dialect);
            assert_eq!(
                page(query, Some(10), Some(0)),
                page(query, Some(10), None),
                "{dialect}"
            );
        }
    }
}
