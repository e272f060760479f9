#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        AddColumnOptions, BindValues, BulkDeleteOptions, ColumnDef, Constraint, ConstraintKind,
        CreateSchemaOptions, CreateTableOptions, DataType, DropTableOptions, Expr, InsertOptions,
        IsolationLevel, ListSchemasOptions, ListTablesOptions, Lock, LockWait, QueryInterface,
        RemoveColumnOptions, RemoveIndexOptions, ReturnValues, RowCount, SelectOptions,
        StartTransactionOptions, TableRef, UpsertOptions, Value, row,
    };
    use quarry_hana::HanaSqlWriter;
    use quarry_tests::{
        execute_tests, expect_feature_not_supported, expect_invalid_option, init_logs, one_line,
        silent_logs,
    };
    use time::macros::datetime;

    const WRITER: HanaSqlWriter = HanaSqlWriter::new();
    const QUERY: QueryInterface = QueryInterface::new(&WRITER);

    #[test]
    fn hana() {
        init_logs();
        execute_tests(QUERY);
    }

    #[test]
    fn literals() {
        assert_eq!(
            QUERY.escape(&Value::Varchar("it's".into())).unwrap(),
            "'it''s'"
        );
        assert_eq!(
            QUERY.escape(&Value::Varchar("C:\\temp".into())).unwrap(),
            r"'C:\temp'"
        );
        assert_eq!(QUERY.escape(&Value::Boolean(false)).unwrap(), "FALSE");
        assert_eq!(
            QUERY.escape(&Value::Blob(vec![0xCA, 0xFE].into())).unwrap(),
            "X'CAFE'"
        );
        assert_eq!(
            QUERY
                .escape(&Value::TimestampWithTimezone(datetime!(2024-03-05 14:30:00 +02:00)))
                .unwrap(),
            "'2024-03-05 12:30:00'"
        );
    }

    #[test]
    fn create_table() {
        let sql = QUERY
            .create_table_query(
                &TableRef::new("orders"),
                &[
                    ColumnDef::new("id", DataType::BigInt)
                        .primary_key()
                        .auto_increment(),
                    ColumnDef::new("reference", DataType::Varchar(None)).not_null(),
                    ColumnDef::new("status", DataType::enumeration(["open", "closed"])),
                    ColumnDef::new("note", DataType::Text).comment("Free text"),
                ],
                &CreateTableOptions {
                    comment: Some("Orders".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .sql;
        assert_eq!(
            sql,
            one_line(indoc! {r#"
                CREATE TABLE "orders" ("id" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL PRIMARY KEY,
                "reference" NVARCHAR(255) NOT NULL,
                "status" NVARCHAR(255),
                "note" NCLOB COMMENT 'Free text')
                COMMENT 'Orders'
            "#})
        );
    }

    #[test]
    fn data_types() {
        let table = TableRef::new("events");
        let column = |data_type: DataType| {
            QUERY
                .add_column_query(
                    &table,
                    &ColumnDef::new("value", data_type),
                    &AddColumnOptions::default(),
                )
                .unwrap()
                .sql
        };
        assert_eq!(
            column(DataType::string(40)),
            r#"ALTER TABLE "events" ADD ("value" NVARCHAR(40))"#
        );
        assert_eq!(
            column(DataType::Json),
            r#"ALTER TABLE "events" ADD ("value" NCLOB)"#
        );
        assert_eq!(
            column(DataType::Uuid),
            r#"ALTER TABLE "events" ADD ("value" NVARCHAR(36))"#
        );
        assert_eq!(
            column(DataType::DateTime(Some(3))),
            r#"ALTER TABLE "events" ADD ("value" TIMESTAMP)"#
        );
        assert_eq!(
            column(DataType::Float),
            r#"ALTER TABLE "events" ADD ("value" REAL)"#
        );
        assert_eq!(
            column(DataType::enumeration(["x".repeat(300)])),
            r#"ALTER TABLE "events" ADD ("value" NVARCHAR(300))"#
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.add_column_query(
                &table,
                &ColumnDef::new("value", DataType::array(DataType::Integer)),
                &AddColumnOptions::default(),
            ));
            expect_invalid_option(QUERY.add_column_query(
                &table,
                &ColumnDef::new("value", DataType::Integer),
                &AddColumnOptions {
                    if_not_exists: true,
                },
            ));
        }
    }

    #[test]
    fn alter_table() {
        let orders = TableRef::new("orders");
        assert_eq!(
            QUERY
                .change_column_query(&orders, &ColumnDef::new("status", DataType::string(20)))
                .unwrap()
                .sql,
            r#"ALTER TABLE "orders" ALTER ("status" NVARCHAR(20))"#
        );
        assert_eq!(
            QUERY
                .remove_column_query(&orders, "status", &RemoveColumnOptions::default())
                .unwrap()
                .sql,
            r#"ALTER TABLE "orders" DROP ("status")"#
        );
        assert_eq!(
            QUERY
                .rename_column_query(&orders, "status", "state")
                .unwrap()
                .sql,
            r#"RENAME COLUMN "orders"."status" TO "state""#
        );
        assert_eq!(
            QUERY
                .rename_table_query(&orders, &TableRef::new("purchases"))
                .unwrap()
                .sql,
            r#"RENAME TABLE "orders" TO "purchases""#
        );
        assert_eq!(
            QUERY
                .drop_table_query(
                    &orders,
                    &DropTableOptions {
                        if_exists: true,
                        cascade: true,
                    },
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                DO BEGIN IF EXISTS (SELECT * FROM SYS.TABLES WHERE TABLE_NAME = 'orders'
                AND SCHEMA_NAME = CURRENT_SCHEMA) THEN DROP TABLE "orders" CASCADE; END IF; END;
            "#})
        );
        assert_eq!(
            QUERY
                .drop_table_query(&TableRef::new("orders").with_schema("SALES"), &DropTableOptions::default())
                .unwrap()
                .sql,
            r#"DROP TABLE "SALES"."orders""#
        );
        assert_eq!(
            QUERY
                .remove_index_query(
                    &TableRef::new("orders").with_schema("SALES"),
                    "orders_status",
                    &RemoveIndexOptions::default(),
                )
                .unwrap()
                .sql,
            r#"DROP INDEX "SALES"."orders_status""#
        );
        assert_eq!(
            QUERY
                .add_constraint_query(
                    &orders,
                    &Constraint {
                        name: None,
                        kind: ConstraintKind::Check(Expr::col("total").ge(0)),
                        fields: vec!["total".into()],
                        deferrable: None,
                    },
                )
                .unwrap()
                .sql,
            r#"ALTER TABLE "orders" ADD CONSTRAINT "orders_total_ck" CHECK ("total" >= 0)"#
        );
        silent_logs! {
            expect_invalid_option(QUERY.remove_index_query(
                &orders,
                "orders_status",
                &RemoveIndexOptions {
                    if_exists: true,
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn pagination_and_locks() {
        let users = TableRef::new("users");
        let select = |options: SelectOptions| QUERY.select_query(&users, &options, None);
        assert_eq!(
            select(SelectOptions {
                offset: Some(RowCount::Count(20)),
                ..Default::default()
            })
            .unwrap()
            .sql,
            r#"SELECT * FROM "users" LIMIT 9223372036854775807 OFFSET 20"#
        );
        assert_eq!(
            select(SelectOptions {
                limit: Some(RowCount::Count(10)),
                lock: Some(Lock {
                    wait: Some(LockWait::NoWait),
                    ..Lock::update()
                }),
                ..Default::default()
            })
            .unwrap()
            .sql,
            r#"SELECT * FROM "users" LIMIT 10 FOR UPDATE NOWAIT"#
        );
        silent_logs! {
            expect_feature_not_supported(select(SelectOptions {
                lock: Some(Lock {
                    wait: Some(LockWait::SkipLocked),
                    ..Lock::update()
                }),
                ..Default::default()
            }));
            expect_feature_not_supported(select(SelectOptions {
                attributes: vec![Expr::col("profile").json(["tags"])],
                ..Default::default()
            }));
        }
    }

    #[test]
    fn modifications() {
        let products = TableRef::new("products");
        assert_eq!(
            QUERY
                .bulk_insert_query(
                    &products,
                    &[
                        row([("name", Expr::lit("desk")), ("price", Expr::lit(120))]),
                        row([("name", Expr::lit("lamp"))]),
                    ],
                    &InsertOptions::default(),
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                INSERT INTO "products" ("name", "price")
                SELECT 'desk', 120 FROM DUMMY UNION ALL SELECT 'lamp', NULL FROM DUMMY
            "#})
        );
        let statement = QUERY
            .bulk_insert_query(
                &products,
                &[row([("name", "desk")]), row([("name", "lamp")])],
                &InsertOptions {
                    bind_values: true,
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            r#"INSERT INTO "products" ("name") SELECT ? FROM DUMMY UNION ALL SELECT ? FROM DUMMY"#
        );
        assert_eq!(
            statement.bind,
            BindValues::Positional(vec![
                Value::Varchar("desk".into()),
                Value::Varchar("lamp".into()),
            ])
        );
        assert_eq!(
            QUERY
                .insert_query(&products, row([("name", "desk")]), &InsertOptions::default(), None)
                .unwrap()
                .sql,
            r#"INSERT INTO "products" ("name") VALUES ('desk')"#
        );
        assert_eq!(
            QUERY
                .upsert_query(
                    &TableRef::new("users"),
                    &row([("id", Expr::lit(1)), ("email", Expr::lit("ada@example.com"))]),
                    &UpsertOptions {
                        conflict_fields: vec!["id".into()],
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            r#"UPSERT "users" ("id", "email") VALUES (1, 'ada@example.com') WITH PRIMARY KEY"#
        );
        assert_eq!(
            QUERY
                .bulk_delete_query(
                    &TableRef::new("logs"),
                    Some(&Expr::col("level").eq("debug")),
                    &BulkDeleteOptions {
                        limit: Some(100),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            r#"DELETE FROM "logs" WHERE "level" = 'debug' LIMIT 100"#
        );
        silent_logs! {
            expect_invalid_option(QUERY.bulk_insert_query(
                &products,
                &[],
                &InsertOptions::default(),
                None,
            ));
            expect_feature_not_supported(QUERY.bulk_insert_query(
                &products,
                &[row([("name", "desk")]), row([("name", "lamp")])],
                &InsertOptions {
                    returning: ReturnValues::All,
                    ..Default::default()
                },
                None,
            ));
            expect_feature_not_supported(QUERY.bulk_insert_query(
                &products,
                &[row([("name", "desk")]), row([("name", "lamp")])],
                &InsertOptions {
                    ignore_duplicates: true,
                    ..Default::default()
                },
                None,
            ));
        }
    }

    #[test]
    fn expressions() {
        let statement = QUERY
            .select_query(
                &TableRef::new("people"),
                &SelectOptions {
                    attributes: vec![
                        Expr::col("profile").json_text(["address", "city"]),
                        Expr::func("NOW", Vec::<Expr>::new()),
                        Expr::func("RANDOM", Vec::<Expr>::new()),
                    ],
                    condition: Some(Expr::col("id").eq(Expr::bind(7))),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            one_line(indoc! {r#"
                SELECT JSON_VALUE("profile", '$.address.city'), CURRENT_TIMESTAMP, RAND()
                FROM "people" WHERE "id" = ?
            "#})
        );
        assert_eq!(statement.bind, BindValues::Positional(vec![Value::Int64(7)]));
    }

    #[test]
    fn transactions() {
        assert_eq!(
            QUERY.create_savepoint_query("before_import").unwrap().sql,
            r#"SAVEPOINT "before_import""#
        );
        assert_eq!(
            QUERY
                .set_isolation_level_query(IsolationLevel::RepeatableRead)
                .unwrap()
                .sql,
            "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ"
        );
        silent_logs! {
            expect_feature_not_supported(
                QUERY.start_transaction_query(&StartTransactionOptions::default()),
            );
            expect_feature_not_supported(QUERY.commit_transaction_query());
        }
    }

    #[test]
    fn schemas_and_introspection() {
        assert_eq!(
            QUERY
                .create_schema_query(
                    "audit",
                    &CreateSchemaOptions {
                        authorization: Some("auditor".into()),
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            r#"CREATE SCHEMA "audit" OWNED BY "auditor""#
        );
        assert_eq!(
            QUERY
                .list_schemas_query(&ListSchemasOptions {
                    skip: vec!["STAGING".into()],
                })
                .unwrap()
                .sql,
            one_line(indoc! {r"
                SELECT SCHEMA_NAME AS schema_name FROM SYS.SCHEMAS
                WHERE SCHEMA_NAME NOT LIKE '\_SYS%' ESCAPE '\'
                AND SCHEMA_NAME NOT IN ('SYS', 'PUBLIC', 'SYSTEM', 'UIS', 'HANA_XS_BASE',
                'SAP_PA_APL', 'SAP_REST_API', 'SAPHANADB', 'STAGING')
                ORDER BY SCHEMA_NAME
            "})
        );
        assert_eq!(
            QUERY
                .list_tables_query(&ListTablesOptions {
                    schema: Some("SALES".into()),
                })
                .unwrap()
                .sql,
            one_line(indoc! {r"
                SELECT TABLE_NAME AS table_name, SCHEMA_NAME AS table_schema FROM SYS.TABLES
                WHERE IS_SYSTEM_TABLE = 'FALSE' AND SCHEMA_NAME NOT LIKE '\_SYS%' ESCAPE '\'
                AND SCHEMA_NAME = 'SALES' ORDER BY SCHEMA_NAME, TABLE_NAME
            "})
        );
        assert_eq!(
            QUERY
                .describe_table_query(&TableRef::new("orders"))
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT COLUMN_NAME AS column_name, DATA_TYPE_NAME AS data_type,
                IS_NULLABLE AS is_nullable, DEFAULT_VALUE AS column_default
                FROM SYS.TABLE_COLUMNS WHERE TABLE_NAME = 'orders'
                AND SCHEMA_NAME = CURRENT_SCHEMA ORDER BY POSITION
            "})
        );
        assert_eq!(
            QUERY
                .table_exists_query(&TableRef::new("orders").with_schema("SALES"))
                .unwrap()
                .sql,
            "SELECT TABLE_NAME AS table_name FROM SYS.TABLES WHERE TABLE_NAME = 'orders' AND SCHEMA_NAME = 'SALES'"
        );
        assert_eq!(
            QUERY.version_query().unwrap().sql,
            "SELECT VERSION AS version FROM SYS.M_DATABASE"
        );
        silent_logs! {
            expect_invalid_option(QUERY.create_schema_query(
                "audit",
                &CreateSchemaOptions {
                    if_not_exists: true,
                    ..Default::default()
                },
            ));
            expect_feature_not_supported(QUERY.list_databases_query());
        }
    }
}
