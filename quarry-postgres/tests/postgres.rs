#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        Action, AddColumnOptions, BindParams, BindValues, BulkDeleteOptions, ColumnDef,
        Constraint, ConstraintChecking, ConstraintKind, CreateDatabaseOptions,
        CreateSchemaOptions, CreateTableOptions, DataType, Deferrable, DropSchemaOptions, Expr,
        IndexOptions, InsertOptions, IsolationLevel, ListSchemasOptions, ListTablesOptions, Lock,
        LockWait, ModelMeta, Nulls, OnConflict, Ordered, QueryInterface, RawQueryOptions,
        RemoveConstraintOptions, RemoveIndexOptions, ReturnValues, RowCount, SelectOptions,
        StartTransactionOptions, TableRef, TruncateTableOptions, UpdateOptions, UpsertOptions,
        Value, row,
    };
    use quarry_postgres::PostgresSqlWriter;
    use quarry_tests::{
        execute_tests, expect_feature_not_supported, expect_invalid_option,
        expect_unsupported_value, init_logs, one_line, silent_logs,
    };
    use serde_json::json;
    use time::macros::datetime;

    const WRITER: PostgresSqlWriter = PostgresSqlWriter::new();
    const QUERY: QueryInterface = QueryInterface::new(&WRITER);
    const COCKROACH_WRITER: PostgresSqlWriter = PostgresSqlWriter::cockroach();
    const COCKROACH: QueryInterface = QueryInterface::new(&COCKROACH_WRITER);

    #[test]
    fn postgres() {
        init_logs();
        execute_tests(QUERY);
    }

    #[test]
    fn cockroachdb() {
        init_logs();
        execute_tests(COCKROACH);
    }

    #[test]
    fn literals() {
        assert_eq!(
            QUERY
                .escape(&Value::Varchar(r"it's a \ test".into()))
                .unwrap(),
            r"'it''s a \ test'"
        );
        assert_eq!(
            QUERY.escape(&Value::Blob(vec![0x0A, 0xFF].into())).unwrap(),
            r"'\x0aff'"
        );
        assert_eq!(QUERY.escape(&Value::Boolean(false)).unwrap(), "FALSE");
        assert_eq!(
            QUERY
                .escape(&Value::TimestampWithTimezone(datetime!(2024-03-05 14:30:00 +02:00)))
                .unwrap(),
            "'2024-03-05 14:30:00+02:00'"
        );
        assert_eq!(
            QUERY
                .escape(&Value::Json(json!({"name": "O'Hara"})))
                .unwrap(),
            r#"'{"name":"O''Hara"}'"#
        );
        assert_eq!(
            QUERY
                .escape(&Value::List(vec![Value::Int64(1), Value::Int64(2)]))
                .unwrap(),
            "ARRAY[1, 2]"
        );
        assert_eq!(QUERY.escape(&Value::List(Vec::new())).unwrap(), "'{}'");
        assert_eq!(
            QUERY.quote_identifier("odd\"name").unwrap(),
            r#""odd""name""#
        );
        assert_eq!(
            QUERY
                .quote_table(&TableRef::new("orders").with_schema("public"))
                .unwrap(),
            r#""orders""#
        );
        assert_eq!(
            QUERY
                .quote_table(&TableRef::new("orders").with_schema("shop"))
                .unwrap(),
            r#""shop"."orders""#
        );
        silent_logs! {
            expect_unsupported_value(QUERY.escape(&Value::Varchar("nul\0byte".into())));
        }
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
                    ColumnDef::new("tags", DataType::array(DataType::Text)),
                    ColumnDef::new("placed_at", DataType::timestamp_tz()).not_null(),
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
            one_line(indoc! {r#"
                CREATE TABLE IF NOT EXISTS "orders" ("id" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL PRIMARY KEY,
                "tags" TEXT[],
                "placed_at" TIMESTAMPTZ NOT NULL,
                "customer_id" BIGINT REFERENCES "customers" ("id") ON DELETE CASCADE,
                "note" TEXT);
                COMMENT ON TABLE "orders" IS 'Orders';
                COMMENT ON COLUMN "orders"."note" IS 'Free text'
            "#})
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.create_table_query(
                &TableRef::new("orders"),
                &[ColumnDef::new("status", DataType::enumeration(["new", "paid"]))],
                &CreateTableOptions::default(),
            ));
            expect_invalid_option(QUERY.create_table_query(
                &TableRef::new("orders"),
                &[ColumnDef::new("id", DataType::Integer)],
                &CreateTableOptions {
                    engine: Some("InnoDB".into()),
                    ..Default::default()
                },
            ));
        }
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
            r#"ALTER TABLE "readings" ADD COLUMN "value" DOUBLE PRECISION"#
        );
        assert_eq!(
            column(DataType::Blob),
            r#"ALTER TABLE "readings" ADD COLUMN "value" BYTEA"#
        );
        assert_eq!(
            column(DataType::Json),
            r#"ALTER TABLE "readings" ADD COLUMN "value" JSONB"#
        );
        assert_eq!(
            column(DataType::decimal(10, 2)),
            r#"ALTER TABLE "readings" ADD COLUMN "value" NUMERIC(10,2)"#
        );
        assert_eq!(
            column(DataType::DateTime(Some(9))),
            r#"ALTER TABLE "readings" ADD COLUMN "value" TIMESTAMP(6)"#
        );
        assert_eq!(
            column(DataType::array(DataType::TinyInt)),
            r#"ALTER TABLE "readings" ADD COLUMN "value" SMALLINT[]"#
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.add_column_query(
                &table,
                &ColumnDef::new("value", DataType::array(DataType::array(DataType::Integer))),
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
            one_line(indoc! {r#"
                ALTER TABLE "orders" ALTER COLUMN "status" TYPE VARCHAR(20),
                ALTER COLUMN "status" SET NOT NULL,
                ALTER COLUMN "status" SET DEFAULT 'new'
            "#})
        );
        assert_eq!(
            QUERY
                .add_column_query(
                    &orders,
                    &ColumnDef::new("shop_id", DataType::BigInt).references("shops", "id"),
                    &AddColumnOptions { if_not_exists: true },
                )
                .unwrap()
                .sql,
            r#"ALTER TABLE "orders" ADD COLUMN IF NOT EXISTS "shop_id" BIGINT REFERENCES "shops" ("id")"#
        );
        assert_eq!(
            QUERY
                .rename_table_query(&orders, &TableRef::new("purchases"))
                .unwrap()
                .sql,
            r#"ALTER TABLE "orders" RENAME TO "purchases""#
        );
        assert_eq!(
            QUERY
                .truncate_table_query(
                    &orders,
                    &TruncateTableOptions {
                        cascade: true,
                        restart_identity: true,
                    },
                )
                .unwrap()
                .sql,
            r#"TRUNCATE "orders" RESTART IDENTITY CASCADE"#
        );
        silent_logs! {
            expect_invalid_option(COCKROACH.truncate_table_query(
                &orders,
                &TruncateTableOptions {
                    restart_identity: true,
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn indexes() {
        let events = TableRef::new("events").with_schema("audit");
        assert_eq!(
            QUERY
                .add_index_query(
                    &events,
                    &IndexOptions {
                        fields: vec!["account_id".into(), "created_at".into()],
                        concurrently: true,
                        if_not_exists: true,
                        using: Some("BTREE".into()),
                        include: vec!["kind".into()],
                        condition: Some(Expr::col("deleted_at").is_null()),
                        ..Default::default()
                    }
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                CREATE INDEX CONCURRENTLY IF NOT EXISTS "events_account_id_created_at"
                ON "audit"."events" USING BTREE ("account_id", "created_at")
                INCLUDE ("kind") WHERE "deleted_at" IS NULL
            "#})
        );
        assert_eq!(
            QUERY
                .remove_index_query(
                    &events,
                    "events_account_id_created_at",
                    &RemoveIndexOptions {
                        if_exists: true,
                        concurrently: true,
                        cascade: false,
                    },
                )
                .unwrap()
                .sql,
            r#"DROP INDEX CONCURRENTLY IF EXISTS "audit"."events_account_id_created_at""#
        );
        silent_logs! {
            expect_invalid_option(QUERY.add_index_query(
                &events,
                &IndexOptions {
                    fields: vec!["body".into()],
                    index_type: Some("FULLTEXT".into()),
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn constraints() {
        let items = TableRef::new("order_items");
        assert_eq!(
            QUERY
                .add_constraint_query(
                    &items,
                    &Constraint {
                        name: None,
                        kind: ConstraintKind::ForeignKey {
                            references: TableRef::new("orders"),
                            fields: vec!["id".into()],
                            on_delete: Some(Action::Cascade),
                            on_update: None,
                        },
                        fields: vec!["order_id".into()],
                        deferrable: Some(Deferrable::InitiallyDeferred),
                    },
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                ALTER TABLE "order_items" ADD CONSTRAINT "order_items_order_id_fk"
                FOREIGN KEY ("order_id") REFERENCES "orders" ("id") ON DELETE CASCADE
                DEFERRABLE INITIALLY DEFERRED
            "#})
        );
        assert_eq!(
            QUERY
                .set_constraint_checking_query(&ConstraintChecking::Immediate(vec![
                    "order_items_order_id_fk".into()
                ]))
                .unwrap()
                .sql,
            r#"SET CONSTRAINTS "order_items_order_id_fk" IMMEDIATE"#
        );
        assert_eq!(
            QUERY
                .set_constraint_checking_query(&ConstraintChecking::Deferred(Vec::new()))
                .unwrap()
                .sql,
            "SET CONSTRAINTS ALL DEFERRED"
        );
        assert_eq!(
            QUERY
                .remove_constraint_query(
                    &items,
                    "order_items_order_id_fk",
                    &RemoveConstraintOptions {
                        if_exists: true,
                        cascade: true,
                    },
                )
                .unwrap()
                .sql,
            r#"ALTER TABLE "order_items" DROP CONSTRAINT IF EXISTS "order_items_order_id_fk" CASCADE"#
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.add_constraint_query(
                &items,
                &Constraint {
                    name: None,
                    kind: ConstraintKind::Default(Expr::lit(1)),
                    fields: vec!["quantity".into()],
                    deferrable: None,
                },
            ));
            expect_feature_not_supported(
                COCKROACH.set_constraint_checking_query(&ConstraintChecking::Deferred(Vec::new())),
            );
            expect_feature_not_supported(COCKROACH.add_constraint_query(
                &items,
                &Constraint {
                    name: None,
                    kind: ConstraintKind::Unique,
                    fields: vec!["sku".into()],
                    deferrable: Some(Deferrable::InitiallyImmediate),
                },
            ));
        }
    }

    #[test]
    fn conflicts() {
        let users = TableRef::new("users");
        assert_eq!(
            QUERY
                .upsert_query(
                    &users,
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
            one_line(indoc! {r#"
                INSERT INTO "users" ("id", "email") VALUES (1, 'ada@example.com')
                ON CONFLICT ("id") DO UPDATE SET "email" = EXCLUDED."email" RETURNING *
            "#})
        );
        let model = ModelMeta::new("users").primary_key("id", "user_id");
        assert_eq!(
            QUERY
                .insert_query(
                    &users,
                    row([("id", Expr::lit(1)), ("email", Expr::lit("ada@example.com"))]),
                    &InsertOptions {
                        on_conflict: Some(OnConflict {
                            update_fields: vec!["email".into()],
                            update_where: Some(Expr::col("locked").eq(false)),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                    Some(&model),
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                INSERT INTO "users" ("user_id", "email") VALUES (1, 'ada@example.com')
                ON CONFLICT ("user_id") DO UPDATE SET "email" = EXCLUDED."email" WHERE "locked" = FALSE
            "#})
        );
        assert_eq!(
            QUERY
                .insert_query(
                    &users,
                    row([("email", "ada@example.com")]),
                    &InsertOptions {
                        ignore_duplicates: true,
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            r#"INSERT INTO "users" ("email") VALUES ('ada@example.com') ON CONFLICT DO NOTHING"#
        );
        assert_eq!(
            QUERY
                .insert_query(&users, Vec::new(), &InsertOptions::default(), None)
                .unwrap()
                .sql,
            r#"INSERT INTO "users" DEFAULT VALUES"#
        );
        silent_logs! {
            expect_invalid_option(QUERY.upsert_query(
                &users,
                &row([("email", "ada@example.com")]),
                &UpsertOptions::default(),
                None,
            ));
        }
    }

    #[test]
    fn modification_limits() {
        let users = TableRef::new("Users");
        let condition = Expr::col("name").eq("Ada");
        let options = BulkDeleteOptions {
            limit: Some(1),
            ..Default::default()
        };
        let model = ModelMeta::new("Users").primary_key("id", "id");
        assert_eq!(
            QUERY
                .bulk_delete_query(&users, Some(&condition), &options, Some(&model))
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                DELETE FROM "Users" WHERE "id" IN
                (SELECT "id" FROM "Users" WHERE "name" = 'Ada' LIMIT 1)
            "#})
        );
        assert_eq!(
            QUERY
                .update_query(
                    &users,
                    &row([("name", "Grace")]),
                    Some(&condition),
                    &UpdateOptions {
                        limit: Some(3),
                        returning: ReturnValues::Columns(vec!["id".into()]),
                        ..Default::default()
                    },
                    Some(&model),
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                UPDATE "Users" SET "name" = 'Grace' WHERE "id" IN
                (SELECT "id" FROM "Users" WHERE "name" = 'Ada' LIMIT 3) RETURNING "id"
            "#})
        );
        silent_logs! {
            expect_invalid_option(QUERY.bulk_delete_query(&users, Some(&condition), &options, None));
        }
    }

    #[test]
    fn bound_values() {
        let statement = QUERY
            .select_query(
                &TableRef::new("users"),
                &SelectOptions {
                    condition: Some(Expr::and([
                        Expr::col("email").eq(Expr::bind("ada@example.com")),
                        Expr::col("active").eq(Expr::bind(true)),
                    ])),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            r#"SELECT * FROM "users" WHERE "email" = $1 AND "active" = $2"#
        );
        assert_eq!(
            statement.bind,
            BindValues::Positional(vec![
                Value::Varchar("ada@example.com".into()),
                Value::Boolean(true)
            ])
        );
        let statement = QUERY
            .raw_query(
                "SELECT * FROM accounts WHERE owner = $owner OR manager = $owner AND note <> E'\\'$owner'",
                &RawQueryOptions {
                    bind: Some(BindParams::named([("owner", 7)])),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM accounts WHERE owner = $1 OR manager = $1 AND note <> E'\\'$owner'"
        );
        assert_eq!(statement.bind, BindValues::Positional(vec![Value::Int64(7)]));
    }

    #[test]
    fn select() {
        let events = TableRef::new("events");
        assert_eq!(
            QUERY
                .select_query(
                    &events,
                    &SelectOptions {
                        attributes: vec![
                            Expr::col("payload").json(["user"]),
                            Expr::col("payload").json_text(["user", "name"]),
                        ],
                        order: vec![Ordered::desc(Expr::col("created_at")).nulls(Nulls::Last)],
                        limit: Some(RowCount::Count(10)),
                        offset: Some(RowCount::Count(20)),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                SELECT "payload" -> 'user', "payload" #>> '{user,name}' FROM "events"
                ORDER BY "created_at" DESC NULLS LAST LIMIT 10 OFFSET 20
            "#})
        );
        assert_eq!(
            QUERY
                .select_query(
                    &events,
                    &SelectOptions {
                        offset: Some(RowCount::Count(5)),
                        lock: Some(Lock {
                            wait: Some(LockWait::NoWait),
                            ..Lock::share()
                        }),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            r#"SELECT * FROM "events" OFFSET 5 FOR SHARE NOWAIT"#
        );
        assert_eq!(
            QUERY
                .update_query(
                    &TableRef::new("posts"),
                    &row([(
                        "tags",
                        Expr::lit(Value::List(vec!["rust".into(), "sql".into()])),
                    )]),
                    Some(&Expr::col("id").in_list([1, 2])),
                    &UpdateOptions::default(),
                    None,
                )
                .unwrap()
                .sql,
            r#"UPDATE "posts" SET "tags" = ARRAY['rust', 'sql'] WHERE "id" IN (1, 2)"#
        );
    }

    #[test]
    fn transactions() {
        assert_eq!(
            QUERY
                .start_transaction_query(&StartTransactionOptions {
                    read_only: true,
                    ..Default::default()
                })
                .unwrap()
                .sql,
            "START TRANSACTION READ ONLY"
        );
        assert_eq!(
            QUERY.create_savepoint_query("before_import").unwrap().sql,
            r#"SAVEPOINT "before_import""#
        );
        assert_eq!(
            QUERY.rollback_savepoint_query("before_import").unwrap().sql,
            r#"ROLLBACK TO SAVEPOINT "before_import""#
        );
        assert_eq!(
            QUERY
                .set_isolation_level_query(IsolationLevel::Serializable)
                .unwrap()
                .sql,
            "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.foreign_key_checks_query(false));
        }
    }

    #[test]
    fn schemas() {
        assert_eq!(
            QUERY
                .create_schema_query(
                    "audit",
                    &CreateSchemaOptions {
                        if_not_exists: true,
                        authorization: Some("auditor".into()),
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            r#"CREATE SCHEMA IF NOT EXISTS "audit" AUTHORIZATION "auditor""#
        );
        assert_eq!(
            QUERY
                .drop_schema_query(
                    "audit",
                    &DropSchemaOptions {
                        if_exists: true,
                        cascade: true,
                    },
                )
                .unwrap()
                .sql,
            r#"DROP SCHEMA IF EXISTS "audit" CASCADE"#
        );
        assert_eq!(
            QUERY
                .list_schemas_query(&ListSchemasOptions {
                    skip: vec!["archive".into()],
                })
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT schema_name FROM information_schema.schemata
                WHERE schema_name !~ '^pg_'
                AND schema_name NOT IN ('public', 'information_schema', 'pg_catalog', 'pg_toast', 'archive')
                ORDER BY schema_name
            "})
        );
        assert_eq!(
            COCKROACH
                .list_schemas_query(&ListSchemasOptions::default())
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT schema_name FROM information_schema.schemata
                WHERE schema_name !~ '^pg_'
                AND schema_name NOT IN ('public', 'crdb_internal', 'information_schema', 'pg_catalog', 'pg_extension')
                ORDER BY schema_name
            "})
        );
    }

    #[test]
    fn introspection() {
        assert_eq!(
            QUERY
                .list_tables_query(&ListTablesOptions::default())
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT table_name, table_schema FROM information_schema.tables
                WHERE table_type = 'BASE TABLE' AND table_name != 'spatial_ref_sys'
                AND table_schema !~ '^pg_'
                AND table_schema NOT IN ('information_schema', 'pg_catalog', 'pg_toast')
                ORDER BY table_schema, table_name
            "})
        );
        assert_eq!(
            QUERY
                .list_tables_query(&ListTablesOptions {
                    schema: Some("shop".into()),
                })
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT table_name, table_schema FROM information_schema.tables
                WHERE table_type = 'BASE TABLE' AND table_name != 'spatial_ref_sys'
                AND table_schema = 'shop'
                ORDER BY table_schema, table_name
            "})
        );
        assert_eq!(
            QUERY.describe_table_query(&TableRef::new("orders")).unwrap().sql,
            one_line(indoc! {"
                SELECT column_name, data_type, is_nullable, column_default
                FROM information_schema.columns
                WHERE table_name = 'orders' AND table_schema = 'public'
                ORDER BY ordinal_position
            "})
        );
        assert_eq!(
            QUERY
                .table_exists_query(&TableRef::new("orders").with_schema("shop"))
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT table_name FROM information_schema.tables
                WHERE table_type = 'BASE TABLE' AND table_name = 'orders' AND table_schema = 'shop'
            "})
        );
        assert_eq!(QUERY.version_query().unwrap().sql, "SHOW SERVER_VERSION");
        assert_eq!(
            COCKROACH.version_query().unwrap().sql,
            "SELECT version() AS version"
        );
    }

    #[test]
    fn databases() {
        assert_eq!(
            QUERY
                .create_database_query(
                    "shop",
                    &CreateDatabaseOptions {
                        charset: Some("UTF8".into()),
                        collate: Some("en_US.UTF-8".into()),
                        ctype: Some("en_US.UTF-8".into()),
                        template: Some("template0".into()),
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            one_line(indoc! {r#"
                CREATE DATABASE "shop" ENCODING = 'UTF8' LC_COLLATE = 'en_US.UTF-8'
                LC_CTYPE = 'en_US.UTF-8' TEMPLATE = 'template0'
            "#})
        );
        assert_eq!(
            COCKROACH
                .create_database_query(
                    "shop",
                    &CreateDatabaseOptions {
                        if_not_exists: true,
                        ..Default::default()
                    },
                )
                .unwrap()
                .sql,
            r#"CREATE DATABASE IF NOT EXISTS "shop""#
        );
        assert_eq!(
            QUERY.list_databases_query().unwrap().sql,
            "SELECT datname AS name FROM pg_database WHERE datistemplate = false ORDER BY datname"
        );
        assert_eq!(
            COCKROACH.list_databases_query().unwrap().sql,
            one_line(indoc! {"
                SELECT datname AS name FROM pg_database WHERE datistemplate = false
                AND datname NOT IN ('system') ORDER BY datname
            "})
        );
        silent_logs! {
            expect_invalid_option(QUERY.create_database_query(
                "shop",
                &CreateDatabaseOptions {
                    if_not_exists: true,
                    ..Default::default()
                },
            ));
            expect_invalid_option(COCKROACH.create_database_query(
                "shop",
                &CreateDatabaseOptions {
                    template: Some("template0".into()),
                    ..Default::default()
                },
            ));
        }
    }
}
