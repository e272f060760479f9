#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        Action, AddColumnOptions, BindValues, ColumnDef, CreateTableOptions, DataType, Expr,
        IndexField, IndexOptions, InsertOptions, IsolationLevel, ListSchemasOptions, Lock,
        LockWait, OnConflict, Ordered, QueryInterface, RemoveIndexOptions, ReturnValues, RowCount,
        SelectOptions, StartTransactionOptions, TableRef, UpdateOptions, UpsertOptions, Value,
        row,
    };
    use quarry_mysql::MySqlSqlWriter;
    use quarry_tests::{
        execute_tests, expect_feature_not_supported, expect_invalid_option, init_logs, one_line,
        silent_logs,
    };
    use time::macros::datetime;

    const WRITER: MySqlSqlWriter = MySqlSqlWriter::new();
    const QUERY: QueryInterface = QueryInterface::new(&WRITER);
    const MARIADB_WRITER: MySqlSqlWriter = MySqlSqlWriter::mariadb();
    const MARIADB: QueryInterface = QueryInterface::new(&MARIADB_WRITER);

    #[test]
    fn mysql() {
        init_logs();
        execute_tests(QUERY);
    }

    #[test]
    fn mariadb() {
        init_logs();
        execute_tests(MARIADB);
    }

    #[test]
    fn literals() {
        assert_eq!(
            QUERY
                .escape(&Value::Varchar("it's a \\ test\n".into()))
                .unwrap(),
            r"'it\'s a \\ test\n'"
        );
        assert_eq!(
            QUERY.escape(&Value::Blob(vec![0x0A, 0xFF].into())).unwrap(),
            "X'0AFF'"
        );
        assert_eq!(QUERY.escape(&Value::Boolean(true)).unwrap(), "TRUE");
        assert_eq!(
            QUERY
                .escape(&Value::TimestampWithTimezone(datetime!(2024-03-05 14:30:00 +02:00)))
                .unwrap(),
            "'2024-03-05 12:30:00'"
        );
        assert_eq!(
            QUERY.quote_identifier("odd`name").unwrap(),
            "`odd``name`"
        );
        assert_eq!(
            QUERY
                .quote_table(&TableRef::new("orders").with_schema("shop"))
                .unwrap(),
            "`shop`.`orders`"
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
                    ColumnDef::new("status", DataType::enumeration(["new", "paid"]))
                        .not_null()
                        .default_value("new"),
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
                    engine: Some("InnoDB".into()),
                    charset: Some("utf8mb4".into()),
                    comment: Some("Orders".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .sql;
        assert_eq!(
            sql,
            one_line(indoc! {"
                CREATE TABLE IF NOT EXISTS `orders` (`id` BIGINT AUTO_INCREMENT NOT NULL PRIMARY KEY,
                `status` ENUM('new', 'paid') DEFAULT 'new' NOT NULL,
                `paid` TINYINT(1) DEFAULT FALSE NOT NULL,
                `customer_id` BIGINT,
                `note` TEXT COMMENT 'Free text',
                FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`) ON DELETE CASCADE)
                ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT 'Orders'
            "})
        );
        silent_logs! {
            expect_feature_not_supported(QUERY.create_table_query(
                &TableRef::new("orders"),
                &[ColumnDef::new("tags", DataType::array(DataType::Text))],
                &CreateTableOptions::default(),
            ));
            expect_invalid_option(QUERY.create_table_query(
                &TableRef::new("orders"),
                &[ColumnDef::new("id", DataType::Integer)],
                &CreateTableOptions {
                    engine: Some("InnoDB; DROP TABLE users".into()),
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn alter_table() {
        let orders = TableRef::new("orders");
        assert_eq!(
            QUERY
                .add_column_query(
                    &orders,
                    &ColumnDef::new("total", DataType::decimal(10, 2))
                        .not_null()
                        .default_value(Expr::lit(0)),
                    &AddColumnOptions::default(),
                )
                .unwrap()
                .sql,
            "ALTER TABLE `orders` ADD `total` DECIMAL(10,2) DEFAULT 0 NOT NULL"
        );
        assert_eq!(
            QUERY
                .add_column_query(
                    &orders,
                    &ColumnDef::new("shop_id", DataType::BigInt).references("shops", "id"),
                    &AddColumnOptions::default(),
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                ALTER TABLE `orders` ADD `shop_id` BIGINT,
                ADD FOREIGN KEY (`shop_id`) REFERENCES `shops` (`id`)
            "})
        );
        assert_eq!(
            QUERY
                .change_column_query(
                    &orders,
                    &ColumnDef::new("status", DataType::string(20)).not_null()
                )
                .unwrap()
                .sql,
            "ALTER TABLE `orders` MODIFY `status` VARCHAR(20) NOT NULL"
        );
        assert_eq!(
            QUERY
                .rename_table_query(&orders, &TableRef::new("purchases"))
                .unwrap()
                .sql,
            "RENAME TABLE `orders` TO `purchases`"
        );
        assert_eq!(
            QUERY.rename_column_query(&orders, "status", "state").unwrap().sql,
            "ALTER TABLE `orders` RENAME COLUMN `status` TO `state`"
        );
        silent_logs! {
            expect_invalid_option(QUERY.add_column_query(
                &orders,
                &ColumnDef::new("total", DataType::Double),
                &AddColumnOptions { if_not_exists: true },
            ));
        }
        assert_eq!(
            MARIADB
                .add_column_query(
                    &orders,
                    &ColumnDef::new("total", DataType::Double),
                    &AddColumnOptions { if_not_exists: true },
                )
                .unwrap()
                .sql,
            "ALTER TABLE `orders` ADD IF NOT EXISTS `total` DOUBLE"
        );
    }

    #[test]
    fn indexes() {
        let articles = TableRef::new("articles");
        assert_eq!(
            QUERY
                .add_index_query(
                    &articles,
                    &IndexOptions {
                        fields: vec!["body".into()],
                        index_type: Some("FULLTEXT".into()),
                        ..Default::default()
                    }
                )
                .unwrap()
                .sql,
            "CREATE FULLTEXT INDEX `articles_body` ON `articles` (`body`)"
        );
        assert_eq!(
            QUERY
                .add_index_query(
                    &articles,
                    &IndexOptions {
                        name: Some("articles_title_prefix".into()),
                        fields: vec![IndexField {
                            name: "title".into(),
                            order: None,
                            collate: None,
                            length: Some(32),
                        }],
                        unique: true,
                        ..Default::default()
                    }
                )
                .unwrap()
                .sql,
            "CREATE UNIQUE INDEX `articles_title_prefix` ON `articles` (`title`(32))"
        );
        assert_eq!(
            QUERY
                .remove_index_query(&articles, "articles_body", &RemoveIndexOptions::default())
                .unwrap()
                .sql,
            "DROP INDEX `articles_body` ON `articles`"
        );
        silent_logs! {
            expect_invalid_option(QUERY.add_index_query(
                &articles,
                &IndexOptions {
                    fields: vec!["body".into()],
                    condition: Some(Expr::col("published").eq(true)),
                    ..Default::default()
                },
            ));
        }
    }

    #[test]
    fn duplicates() {
        let tags = TableRef::new("tags");
        assert_eq!(
            QUERY
                .upsert_query(
                    &tags,
                    &row([("id", Expr::lit(1)), ("name", Expr::lit("rust"))]),
                    &UpsertOptions {
                        conflict_fields: vec!["id".into()],
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "INSERT INTO `tags` (`id`, `name`) VALUES (1, 'rust') ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"
        );
        assert_eq!(
            QUERY
                .insert_query(
                    &tags,
                    row([("name", "rust")]),
                    &InsertOptions {
                        on_conflict: Some(OnConflict::default()),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "INSERT INTO `tags` (`name`) VALUES ('rust') ON DUPLICATE KEY UPDATE `name` = `name`"
        );
        assert_eq!(
            QUERY
                .insert_query(
                    &tags,
                    row([("name", "rust")]),
                    &InsertOptions {
                        ignore_duplicates: true,
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "INSERT IGNORE INTO `tags` (`name`) VALUES ('rust')"
        );
        assert_eq!(
            QUERY
                .insert_query(&tags, Vec::new(), &InsertOptions::default(), None)
                .unwrap()
                .sql,
            "INSERT INTO `tags` VALUES ()"
        );
        assert_eq!(
            QUERY
                .bulk_insert_query(
                    &tags,
                    &[
                        row([("name", Expr::lit("rust")), ("hits", Expr::lit(3))]),
                        row([("name", "sql")]),
                    ],
                    &InsertOptions::default(),
                    None,
                )
                .unwrap()
                .sql,
            "INSERT INTO `tags` (`name`, `hits`) VALUES ('rust', 3), ('sql', DEFAULT)"
        );
        silent_logs! {
            expect_invalid_option(QUERY.insert_query(
                &tags,
                row([("name", "rust")]),
                &InsertOptions {
                    on_conflict: Some(OnConflict {
                        update_fields: vec!["name".into()],
                        conflict_where: Some(Expr::col("deleted").eq(false)),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                None,
            ));
        }
    }

    #[test]
    fn bound_values() {
        let statement = QUERY
            .insert_query(
                &TableRef::new("tags"),
                row([("name", Expr::lit("rust")), ("hits", Expr::lit(3))]),
                &InsertOptions {
                    bind_values: true,
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(statement.sql, "INSERT INTO `tags` (`name`, `hits`) VALUES (?, ?)");
        assert_eq!(
            statement.bind,
            BindValues::Positional(vec![Value::Varchar("rust".into()), Value::Int64(3)])
        );
    }

    #[test]
    fn modification_limits() {
        let jobs = TableRef::new("jobs");
        assert_eq!(
            QUERY
                .update_query(
                    &jobs,
                    &row([("state", "running")]),
                    Some(&Expr::col("state").eq("queued")),
                    &UpdateOptions {
                        limit: Some(5),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "UPDATE `jobs` SET `state` = 'running' WHERE `state` = 'queued' LIMIT 5"
        );
        silent_logs! {
            expect_feature_not_supported(MARIADB.update_query(
                &jobs,
                &row([("state", "running")]),
                None,
                &UpdateOptions {
                    returning: ReturnValues::All,
                    ..Default::default()
                },
                None,
            ));
        }
        assert_eq!(
            MARIADB
                .insert_query(
                    &jobs,
                    row([("state", "queued")]),
                    &InsertOptions {
                        returning: ReturnValues::Columns(vec!["id".into()]),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "INSERT INTO `jobs` (`state`) VALUES ('queued') RETURNING `id`"
        );
    }

    #[test]
    fn select() {
        let jobs = TableRef::new("jobs");
        assert_eq!(
            QUERY
                .select_query(
                    &jobs,
                    &SelectOptions {
                        condition: Some(Expr::col("state").eq("queued")),
                        order: vec![Ordered::asc(Expr::col("id"))],
                        limit: Some(RowCount::Count(10)),
                        lock: Some(Lock {
                            wait: Some(LockWait::SkipLocked),
                            ..Lock::update()
                        }),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "SELECT * FROM `jobs` WHERE `state` = 'queued' ORDER BY `id` ASC LIMIT 10 FOR UPDATE SKIP LOCKED"
        );
        assert_eq!(
            QUERY
                .select_query(
                    &jobs,
                    &SelectOptions {
                        offset: Some(RowCount::Count(20)),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            "SELECT * FROM `jobs` LIMIT 18446744073709551615 OFFSET 20"
        );
        assert_eq!(
            QUERY
                .select_query(
                    &TableRef::new("people"),
                    &SelectOptions {
                        attributes: vec![Expr::col("price").cast(DataType::Integer)],
                        condition: Some(
                            Expr::col("first")
                                .concat(" ")
                                .concat(Expr::col("last"))
                                .eq("Ada Lovelace")
                        ),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT CAST(`price` AS SIGNED) FROM `people`
                WHERE CONCAT(CONCAT(`first`, ' '), `last`) = 'Ada Lovelace'
            "})
        );
        assert_eq!(
            QUERY
                .select_query(
                    &TableRef::new("events"),
                    &SelectOptions {
                        attributes: vec![
                            Expr::col("payload").json(["user", "name"]),
                            Expr::col("payload").json_text(["user", "name"]),
                        ],
                        ..Default::default()
                    },
                    None,
                )
                .unwrap()
                .sql,
            one_line(indoc! {"
                SELECT json_extract(`payload`, '$.user.name'),
                json_unquote(json_extract(`payload`, '$.user.name'))
                FROM `events`
            "})
        );
    }

    #[test]
    fn data_types() {
        let table = TableRef::new("sessions");
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
        assert_eq!(column(DataType::Uuid), "ALTER TABLE `sessions` ADD `value` CHAR(36)");
        assert_eq!(
            column(DataType::DateTime(Some(6))),
            "ALTER TABLE `sessions` ADD `value` DATETIME(6)"
        );
        assert_eq!(column(DataType::Blob), "ALTER TABLE `sessions` ADD `value` LONGBLOB");
        assert_eq!(
            MARIADB
                .add_column_query(
                    &table,
                    &ColumnDef::new("value", DataType::Uuid),
                    &AddColumnOptions::default(),
                )
                .unwrap()
                .sql,
            "ALTER TABLE `sessions` ADD `value` UUID"
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
            QUERY
                .set_isolation_level_query(IsolationLevel::RepeatableRead)
                .unwrap()
                .sql,
            "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ"
        );
        assert_eq!(
            QUERY.foreign_key_checks_query(false).unwrap().sql,
            "SET FOREIGN_KEY_CHECKS = 0"
        );
    }

    #[test]
    fn introspection() {
        assert_eq!(
            QUERY.table_exists_query(&TableRef::new("orders")).unwrap().sql,
            one_line(indoc! {"
                SELECT table_name FROM information_schema.tables
                WHERE table_type = 'BASE TABLE' AND table_name = 'orders' AND table_schema = DATABASE()
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
        assert_eq!(
            QUERY.list_databases_query().unwrap().sql,
            one_line(indoc! {"
                SELECT schema_name AS name FROM information_schema.schemata
                WHERE schema_name NOT IN ('MYSQL', 'INFORMATION_SCHEMA', 'PERFORMANCE_SCHEMA', 'SYS',
                'mysql', 'information_schema', 'performance_schema', 'sys')
                ORDER BY schema_name
            "})
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
                WHERE schema_name NOT IN ('MYSQL', 'INFORMATION_SCHEMA', 'PERFORMANCE_SCHEMA', 'SYS',
                'mysql', 'information_schema', 'performance_schema', 'sys', 'archive')
                ORDER BY schema_name
            "})
        );
        assert_eq!(QUERY.version_query().unwrap().sql, "SELECT VERSION() AS version");
    }
}
