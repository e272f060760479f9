#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        Action, AddColumnOptions, BindParams, BindValues, BulkDeleteOptions, ColumnDef, Constraint,
        ConstraintKind, CreateDatabaseOptions, CreateSchemaOptions, CreateTableOptions, DataType,
        DropDatabaseOptions, Expr, IndexOptions, InsertOptions, IsolationLevel,
        ListSchemasOptions, ListTablesOptions, ModelMeta, Ordered, QueryInterface, RawQueryOptions,
        RemoveIndexOptions, ReturnValues, RowCount, SelectOptions, TableHint, TableRef,
        UpdateOptions, UpsertOptions, Value, row,
    };
    use quarry_mssql::MsSqlSqlWriter;
    use quarry_tests::{
        execute_tests, expect_ambiguous_replacement, expect_feature_not_supported,
        expect_invalid_option, init_logs, one_line, silent_logs,
    };
    use time::macros::{date, datetime};

    const WRITER: MsSqlSqlWriter = MsSqlSqlWriter::new();
    const QUERY: QueryInterface = QueryInterface::new(&WRITER);

    #[test]
    fn mssql() {
        init_logs();
        execute_tests(QUERY);
    }

    #[test]
    fn literals() {
        assert_eq!(
            QUERY.escape(&Value::Varchar("it's ünïcode".into())).unwrap(),
            "N'it''s ünïcode'"
        );
        assert_eq!(QUERY.escape(&Value::Boolean(true)).unwrap(), "1");
        assert_eq!(
            QUERY.escape(&Value::Blob(vec![0xDE, 0xAD].into())).unwrap(),
            "0xDEAD"
        );
        assert_eq!(QUERY.escape(&Value::Blob(Vec::new().into())).unwrap(), "0x");
        assert_eq!(
            QUERY.escape(&Value::Date(date!(2024 - 02 - 29))).unwrap(),
            "'2024-02-29'"
        );
        assert_eq!(
            QUERY
                .escape(&Value::TimestampWithTimezone(datetime!(2024-03-05 14:30:00 -05:00)))
                .unwrap(),
            "'2024-03-05 14:30:00-05:00'"
        );
        assert_eq!(QUERY.quote_identifier("odd]name").unwrap(), "[odd]]name]");
        assert_eq!(
            QUERY
                .quote_table(&TableRef::new("orders").with_schema("dbo"))
                .unwrap(),
            "[orders]"
        );
        assert_eq!(
            QUERY
                .quote_table(&TableRef::new("orders").with_schema("sales"))
                .unwrap(),
            "[sales].[orders]"
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
                    ColumnDef::new("paid", DataType::Boolean)
                        .not_null()
                        .default_value(false),
                    ColumnDef::new("customer_id", DataType::BigInt)
                        .references("customers", "id")
                        .on_delete(Action::Cascade),
                    ColumnDef::new("note", DataType::Text).comment("Free text"),
                ],
                &CreateTableOptions {
                    if_not_exists: true,
                    comment: Some("Orders".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .sql;
        assert_eq!(
            sql,
            one_line(indoc! {"
                IF OBJECT_ID(N'[orders]', N'U') IS NULL
                CREATE TABLE [orders] ([id] BIGINT IDENTITY(1,1) NOT NULL PRIMARY KEY,
                [reference] NVARCHAR(255) NOT NULL,
                [paid] BIT DEFAULT 0 NOT NULL,
                [customer_id] BIGINT,
                [note] NVARCHAR(MAX),
                FOREIGN KEY ([customer_id]) REFERENCES [customers] ([id]) ON DELETE CASCADE);
                EXEC sp_addextendedproperty @name = N'MS_Description', @value = N'Orders',
                @level0type = N'Schema', @level0name = N'dbo',
                @level1type = N'Table', @level1name = N'orders';
                EXEC sp_addextendedproperty @name = N'MS_Description', @value = N'Free text',
                @level0type = N'Schema', @level0name = N'dbo',
                @level1type = N'Table', @level1name = N'orders',
                @level2type = N'Column', @level2name = N'note'
            "})
        );
    }

    #[test]
    fn data_types() {
        let table = TableRef::new("readings");
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
            column(DataType::Double),
            "ALTER TABLE [readings] ADD [value] FLOAT"
        );
        assert_eq!(
            column(DataType::Blob),
            "ALTER TABLE [readings] ADD [value] VARBINARY(MAX)"
        );
        assert_eq!(
            column(DataType::Json),
            "ALTER TABLE [readings] ADD [value] NVARCHAR(MAX)"
        );
        assert_eq!(
            column(DataType::Uuid),
            "ALTER TABLE [readings] ADD [value] UNIQUEIDENTIFIER"
        );
        assert_eq!(
            column(DataType::char(3)),
            "ALTER TABLE [readings] ADD [value] NCHAR(3)"
        );
        assert_eq!(
            column(DataType::DateTimeTz(Some(9))),
            "ALTER TABLE [readings] ADD [value] DATETIMEOFFSET(7)"
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.add_column_query(
                &table,
                &ColumnDef::new("value", DataType::array(DataType::Integer)),
                &AddColumnOptions::default(),
            ));
            expect_feature_not_supported(QUERY.add_column_query(
                &table,
                &ColumnDef::new("value", DataType::enumeration(["low", "high"])),
                &AddColumnOptions::default(),
            ));
        }
    }

    #[test]
    fn alter_table() {
        let orders = TableRef::new("orders");
        assert_eq!(
            QUERY
                .change_column_query(
                    &orders,
                    &ColumnDef::new("status", DataType::string(20))
                        .not_null()
                        .default_value("new"),
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                ALTER TABLE [orders] ALTER COLUMN [status] NVARCHAR(20) NOT NULL;
                ALTER TABLE [orders] ADD DEFAULT N'new' FOR [status]
            "})
        );
        assert_eq!(
            QUERY
                .rename_column_query(&orders, "status", "state")
                .unwrap()
                .sql,
            "EXEC sp_rename N'[orders].[status]', N'state', N'COLUMN'"
        );
        assert_eq!(
            QUERY
                .rename_table_query(&orders, &TableRef::new("purchases"))
                .unwrap()
                .sql,
            "EXEC sp_rename N'[orders]', N'purchases'"
        );
        assert_eq!(
            QUERY
                .rename_table_query(&orders, &TableRef::new("orders").with_schema("archive"))
                .unwrap()
                .sql,
            "ALTER SCHEMA [archive] TRANSFER [dbo].[orders]"
        );
        silent_logs! {
            expect_invalid_option(QUERY.rename_table_query(
                &orders,
                &TableRef::new("purchases").with_schema("archive"),
            ));
        }
    }

    #[test]
    fn indexes_and_constraints() {
        let events = TableRef::new("events");
        assert_eq!(
            QUERY
                .add_index_query(
                    &events,
                    &IndexOptions {
                        fields: vec!["account_id".into()],
                        index_type: Some("NONCLUSTERED".into()),
                        include: vec!["kind".into()],
                        condition: Some(Expr::col("deleted_at").is_null()),
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                CREATE NONCLUSTERED INDEX [events_account_id] ON [events] ([account_id])
                INCLUDE ([kind]) WHERE [deleted_at] IS NULL
            "})
        );
        assert_eq!(
            QUERY
                .remove_index_query(
                    &events,
                    "events_account_id",
                    &RemoveIndexOptions {
                        if_exists: true,
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            "DROP INDEX IF EXISTS [events_account_id] ON [events]"
        );
        assert_eq!(
            QUERY
                .add_constraint_query(
                    &events,
                    &Constraint {
                        name: None,
                        kind: ConstraintKind::Default(Expr::lit(0)),
                        fields: vec!["attempts".into()],
                        deferrable: None,
                    },
                )
                .unwrap()
                .sql,
            "ALTER TABLE [events] ADD CONSTRAINT [events_attempts_df] DEFAULT 0 FOR [attempts]"
        );
        silent_logs! {
            expect_invalid_option(QUERY.add_index_query(
                &events,
                &IndexOptions {
                    fields: vec!["account_id".into()],
                    concurrently: true,
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn pagination() {
        let users = TableRef::new("users");
        let model = ModelMeta::new("users").primary_key("id", "user_id");
        let page = SelectOptions {
            limit: Some(RowCount::Count(10)),
            ..Default::default()
        };
        assert_eq!(
            QUERY.select_query(&users, &page, Some(&model)).unwrap().sql,
            "SELECT * FROM [users] ORDER BY [user_id] ASC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(
            QUERY
                .select_query(
                    &users,
                    &SelectOptions {
                        order: vec![Ordered::desc(Expr::col("created_at"))],
                        offset: Some(RowCount::Count(20)),
                        table_hints: vec![TableHint("NOLOCK".into())],
                        ..page.clone()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT * FROM [users] WITH (NOLOCK) ORDER BY [created_at] DESC
                OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY
            "})
        );
        silent_logs! {
            expect_invalid_option(QUERY.select_query(&users, &page, None));
            expect_feature_not_supported(QUERY.select_query(
                &users,
                &SelectOptions {
                    order: vec![Ordered::asc(Expr::col("id"))],
                    limit: Some(RowCount::Count(0)),
                    ..Default::default()
                },
                None,
            ));
        }
    }

    #[test]
    fn modifications() {
        let jobs = TableRef::new("jobs");
        assert_eq!(
            QUERY
                .bulk_delete_query(
                    &jobs,
                    Some(&Expr::col("done").eq(true)),
                    &BulkDeleteOptions {
                        limit: Some(100),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "DELETE TOP(100) FROM [jobs] WHERE [done] = 1; SELECT @@ROWCOUNT AS AFFECTEDROWS"
        );
        assert_eq!(
            QUERY
                .update_query(
                    &jobs,
                    &row([("state", "running")]),
                    Some(&Expr::col("state").eq("queued")),
                    &UpdateOptions {
                        limit: Some(5),
                        returning: ReturnValues::Columns(vec!["id".into()]),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                UPDATE TOP(5) [jobs] SET [state] = N'running' OUTPUT INSERTED.[id]
                WHERE [state] = N'queued'
            "})
        );
        assert_eq!(
            QUERY
                .insert_query(
                    &jobs,
                    row([("name", "import")]),
                    &InsertOptions {
                        returning: ReturnValues::All,
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "INSERT INTO [jobs] ([name]) OUTPUT INSERTED.* VALUES (N'import')"
        );
        assert_eq!(
            QUERY
                .insert_query(&jobs, Vec::new(), &InsertOptions::default(), None)
                .unwrap()
                .sql,
            "INSERT INTO [jobs] DEFAULT VALUES"
        );
        assert_eq!(
            QUERY
                .upsert_query(
                    &TableRef::new("users"),
                    &row([("id", Expr::lit(1)), ("email", Expr::lit("ada@example.com"))]),
                    &UpsertOptions {
                        conflict_fields: vec!["id".into()],
                        returning: ReturnValues::All,
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                MERGE INTO [users] AS [target] USING (VALUES (1, N'ada@example.com')) AS [source] ([id], [email])
                ON ([target].[id] = [source].[id])
                WHEN MATCHED THEN UPDATE SET [email] = [source].[email]
                WHEN NOT MATCHED THEN INSERT ([id], [email]) VALUES ([source].[id], [source].[email])
                OUTPUT INSERTED.*;
            "})
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.insert_query(
                &jobs,
                row([("name", "import")]),
                &InsertOptions {
                    ignore_duplicates: true,
                    ..Default::default()
                },
                None,
            ));
        }
    }

    #[test]
    fn named_binds_do_not_collide() {
        let users = TableRef::new("users");
        let statement = QUERY
            .update_query(
                &users,
                &row([("name", Expr::lit("Ada"))]),
                Some(&Expr::raw("[id] = $quarry_1")),
                &UpdateOptions {
                    bind_values: true,
                    bind: Some(BindParams::named([("quarry_1", Value::Int64(5))])),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE [users] SET [name] = @quarry_2 WHERE [id] = @quarry_1"
        );
        assert_eq!(
            statement.bind,
            BindValues::Named(
                [
                    ("quarry_1".to_string(), Value::Int64(5)),
                    ("quarry_2".to_string(), Value::Varchar("Ada".into())),
                ]
                .into()
            )
        );
        silent_logs! {
            expect_ambiguous_replacement(QUERY.raw_query(
                "SELECT * FROM [users] WHERE [id] = $1 OR [id] = $p1",
                &RawQueryOptions {
                    bind: Some(BindParams::named([("1", 1), ("p1", 2)])),
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn bulk_insert_is_split() {
        let rows = (0..1001)
            .map(|i| row([("n", Expr::lit(i))]))
            .collect::<Vec<_>>();
        let sql = QUERY
            .bulk_insert_query(&TableRef::new("numbers"), &rows, &InsertOptions::default(), None)
            .unwrap()
            .sql;
        assert_eq!(sql.matches("INSERT INTO [numbers]").count(), 2);
        assert!(sql.ends_with("; INSERT INTO [numbers] ([n]) VALUES (1000)"));
    }

    #[test]
    fn expressions() {
        let statement = QUERY
            .select_query(
                &TableRef::new("people"),
                &SelectOptions {
                    attributes: vec![
                        Expr::col("first").concat(Expr::col("last")).alias("full_name"),
                        Expr::col("profile").json_text(["address", "city"]),
                    ],
                    condition: Some(Expr::col("id").eq(Expr::bind(7))),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            one_line(indoc! {"
                SELECT CONCAT([first], [last]) AS [full_name],
                JSON_VALUE([profile], N'$.address.city')
                FROM [people] WHERE [id] = @quarry_1
            "})
        );
        let BindValues::Named(values) = statement.bind else {
            panic!("Expected named bind values");
        };
        assert_eq!(values["quarry_1"], Value::Int64(7));
        silent_logs! {
            expect_feature_not_supported(QUERY.select_query(
                &TableRef::new("people"),
                &SelectOptions {
                    attributes: vec![Expr::col("profile").json(["address"])],
                    ..Default::default()
                },
                None,
            ));
        }
    }

    #[test]
    fn transactions() {
        assert_eq!(
            QUERY.create_savepoint_query("before_import").unwrap().sql,
            "SAVE TRANSACTION [before_import]"
        );
        assert_eq!(
            QUERY.rollback_savepoint_query("before_import").unwrap().sql,
            "ROLLBACK TRANSACTION [before_import]"
        );
        assert_eq!(
            QUERY
                .set_isolation_level_query(IsolationLevel::Serializable)
                .unwrap()
                .sql,
            "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.start_transaction_query(&Default::default()));
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
            "CREATE SCHEMA [audit] AUTHORIZATION [auditor]"
        );
        assert_eq!(
            QUERY
                .list_schemas_query(&ListSchemasOptions {
                    skip: vec!["staging".into()],
                })
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT name AS schema_name FROM sys.schemas WHERE name NOT IN
                (N'dbo', N'guest', N'INFORMATION_SCHEMA', N'db_accessadmin', N'db_backupoperator',
                N'db_datareader', N'db_datawriter', N'db_ddladmin', N'db_denydatareader',
                N'db_denydatawriter', N'db_owner', N'db_securityadmin', N'sys', N'staging')
                ORDER BY name
            "})
        );
        assert_eq!(
            QUERY
                .list_tables_query(&ListTablesOptions {
                    schema: Some("sales".into()),
                })
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT t.name AS table_name, s.name AS table_schema FROM sys.tables t
                INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
                WHERE t.type = 'U' AND s.name = N'sales'
                EXCEPT SELECT OBJECT_NAME(t.history_table_id) AS table_name, s.name AS table_schema
                FROM sys.tables t INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
                WHERE t.type = 'U' AND s.name = N'sales'
                ORDER BY table_schema, table_name
            "})
        );
        assert_eq!(
            QUERY
                .table_exists_query(&TableRef::new("orders"))
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT table_name FROM information_schema.tables
                WHERE table_type = 'BASE TABLE' AND table_name = N'orders' AND table_schema = N'dbo'
            "})
        );
        assert_eq!(
            QUERY.version_query().unwrap().sql,
            "SELECT CAST(SERVERPROPERTY('ProductVersion') AS NVARCHAR(128)) AS version"
        );
    }

    #[test]
    fn databases() {
        assert_eq!(
            QUERY
                .create_database_query(
                    "shop",
                    &CreateDatabaseOptions {
                        if_not_exists: true,
                        collate: Some("Latin1_General_100_CI_AS_SC_UTF8".into()),
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                IF NOT EXISTS (SELECT * FROM sys.databases WHERE name = N'shop')
                CREATE DATABASE [shop] COLLATE Latin1_General_100_CI_AS_SC_UTF8
            "})
        );
        assert_eq!(
            QUERY
                .drop_database_query("shop", &DropDatabaseOptions { if_exists: true })
                .unwrap()
                .sql,
            "DROP DATABASE IF EXISTS [shop]"
        );
        assert_eq!(
            QUERY.list_databases_query().unwrap().sql,
            "SELECT name FROM sys.databases WHERE name NOT IN (N'master', N'model', N'msdb', N'tempdb') ORDER BY name"
        );
        silent_logs! {
            expect_invalid_option(QUERY.create_database_query(
                "shop",
                &CreateDatabaseOptions {
                    charset: Some("utf8".into()),
                    ..Default::default()
                },
            ));
        }
    }
}
