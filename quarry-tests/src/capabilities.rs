use crate::expect_feature_not_supported;
use quarry_core::{
    BulkDeleteOptions, ColumnDef, CommentStyle, CreateSchemaOptions, CreateTableOptions, DataType,
    Expr, IgnoreDuplicates, IndexHint, IndexHintType, InsertOptions, JsonStyle, Lock, Nulls,
    Ordered, QueryInterface, ReturnValues, RowCount, SavepointStyle, SelectOptions, TableHint,
    TableRef, TransactionStart, UpdateOptions, UpsertOptions, UpsertStyle, row,
};

/// Statements are rejected exactly when the dialect flags say the feature is missing.
pub fn capabilities(query: QueryInterface) {
    let supports = &query.descriptor().supports;
    let table = TableRef::new("events");
    let quoted = query.quote_table(&table).unwrap();
    let select = |options: SelectOptions| query.select_query(&table, &options, None);
    let ordered = || vec![Ordered::asc(Expr::col("id"))];

    crate::silent_logs! {
        // Savepoints
        let savepoint = query.quote_identifier("before_import").unwrap();
        match supports.transactions.savepoints {
            SavepointStyle::Unsupported => {
                expect_feature_not_supported(query.create_savepoint_query("before_import"));
                expect_feature_not_supported(query.rollback_savepoint_query("before_import"));
            }
            SavepointStyle::Standard { suffix } => {
                let expected = match suffix {
                    Some(suffix) => format!("SAVEPOINT {savepoint} {suffix}"),
                    None => format!("SAVEPOINT {savepoint}"),
                };
                assert_eq!(query.create_savepoint_query("before_import").unwrap().sql, expected);
                assert_eq!(
                    query.rollback_savepoint_query("before_import").unwrap().sql,
                    format!("ROLLBACK TO SAVEPOINT {savepoint}")
                );
            }
            SavepointStyle::SaveTransaction => {
                assert_eq!(
                    query.create_savepoint_query("before_import").unwrap().sql,
                    format!("SAVE TRANSACTION {savepoint}")
                );
                assert_eq!(
                    query.rollback_savepoint_query("before_import").unwrap().sql,
                    format!("ROLLBACK TRANSACTION {savepoint}")
                );
            }
        }

        // Transactions driven by the connection
        let transactions = supports.transactions;
        if transactions.connection_methods || transactions.start == TransactionStart::Driver {
            expect_feature_not_supported(query.commit_transaction_query());
            expect_feature_not_supported(query.rollback_transaction_query());
        } else {
            assert_eq!(query.commit_transaction_query().unwrap().sql, "COMMIT");
            assert_eq!(query.rollback_transaction_query().unwrap().sql, "ROLLBACK");
        }

        // Returning
        let returning = ReturnValues::All;
        let insert = query.insert_query(
            &table,
            row([("name", "import")]),
            &InsertOptions {
                returning: returning.clone(),
                ..Default::default()
            },
            None,
        );
        if supports.returning.insert {
            insert.expect("Failed to compile the insert returning rows");
        } else {
            expect_feature_not_supported(insert);
        }
        let update = query.update_query(
            &table,
            &row([("name", "import")]),
            None,
            &UpdateOptions {
                returning: returning.clone(),
                ..Default::default()
            },
            None,
        );
        if supports.returning.update {
            update.expect("Failed to compile the update returning rows");
        } else {
            expect_feature_not_supported(update);
        }
        let delete = query.bulk_delete_query(
            &table,
            None,
            &BulkDeleteOptions {
                returning,
                ..Default::default()
            },
            None,
        );
        if supports.returning.delete {
            delete.expect("Failed to compile the delete returning rows");
        } else {
            expect_feature_not_supported(delete);
        }

        // Zero limit
        let zero = select(SelectOptions {
            order: ordered(),
            limit: Some(RowCount::Count(0)),
            ..Default::default()
        });
        if supports.zero_limit {
            zero.expect("Failed to compile LIMIT 0");
        } else {
            expect_feature_not_supported(zero);
        }

        // Hints
        let hinted = select(SelectOptions {
            table_hints: vec![TableHint("NOLOCK".into())],
            ..Default::default()
        });
        if supports.table_hints {
            assert_eq!(hinted.unwrap().sql, format!("SELECT * FROM {quoted} WITH (NOLOCK)"));
        } else {
            expect_feature_not_supported(hinted);
        }
        let hinted = select(SelectOptions {
            index_hints: vec![IndexHint {
                hint: IndexHintType::Force,
                indexes: vec!["events_date".into()],
            }],
            ..Default::default()
        });
        if supports.index_hints {
            assert_eq!(
                hinted.unwrap().sql,
                format!(
                    "SELECT * FROM {quoted} FORCE INDEX ({})",
                    query.quote_identifier("events_date").unwrap()
                )
            );
        } else {
            expect_feature_not_supported(hinted);
        }

        // Locks
        let locked = select(SelectOptions {
            lock: Some(Lock::update()),
            ..Default::default()
        });
        if supports.lock.for_update {
            assert_eq!(locked.unwrap().sql, format!("SELECT * FROM {quoted} FOR UPDATE"));
        } else {
            expect_feature_not_supported(locked);
        }
        let locked = select(SelectOptions {
            lock: Some(Lock::share()),
            ..Default::default()
        });
        match supports.lock.for_share {
            Some(keyword) => {
                assert_eq!(locked.unwrap().sql, format!("SELECT * FROM {quoted} {keyword}"))
            }
            None => expect_feature_not_supported(locked),
        }

        // Nulls ordering
        let nulls = select(SelectOptions {
            order: vec![Ordered::desc(Expr::col("id")).nulls(Nulls::Last)],
            ..Default::default()
        });
        if supports.nulls_ordering {
            nulls.expect("Failed to compile NULLS LAST");
        } else {
            expect_feature_not_supported(nulls);
        }

        // Json navigation
        let json = select(SelectOptions {
            attributes: vec![Expr::col("payload").json_text(["user", "name"])],
            ..Default::default()
        });
        if supports.json == JsonStyle::Unsupported {
            expect_feature_not_supported(json);
        } else {
            json.expect("Failed to compile the json path");
        }

        // Row limits on modifications
        let delete = query.bulk_delete_query(
            &table,
            None,
            &BulkDeleteOptions {
                limit: Some(10),
                ..Default::default()
            },
            None,
        );
        if supports.delete_limit.is_none() {
            expect_feature_not_supported(delete);
        }

        // Duplicates and upserts
        let insert = query.insert_query(
            &table,
            row([("id", 1)]),
            &InsertOptions {
                ignore_duplicates: true,
                ..Default::default()
            },
            None,
        );
        if supports.ignore_duplicates == IgnoreDuplicates::Unsupported {
            expect_feature_not_supported(insert);
        } else {
            insert.expect("Failed to compile the insert ignoring duplicates");
        }
        let upsert = query.upsert_query(
            &table,
            &row([("id", Expr::lit(1)), ("name", Expr::lit("x"))]),
            &UpsertOptions {
                conflict_fields: vec!["id".into()],
                ..Default::default()
            },
            None,
        );
        if supports.upsert == UpsertStyle::Unsupported {
            expect_feature_not_supported(upsert);
        } else {
            upsert.expect("Failed to compile the upsert");
        }

        // Schemas
        let schema = query.create_schema_query("audit", &CreateSchemaOptions::default());
        if supports.schemas.schemas {
            let sql = schema.expect("Failed to compile the schema creation").sql;
            assert!(sql.starts_with("CREATE "), "Unexpected schema creation: {sql}");
            assert!(sql.contains(&query.quote_identifier("audit").unwrap()));
        } else {
            expect_feature_not_supported(schema);
        }

        // Comments
        let create = query.create_table_query(
            &table,
            &[ColumnDef::new("id", DataType::Integer).comment("Event identifier")],
            &CreateTableOptions::default(),
        );
        if supports.comments == CommentStyle::Unsupported {
            expect_feature_not_supported(create);
        } else {
            create.expect("Failed to compile the commented table");
        }

        // Foreign key checks
        match supports.foreign_key_checks {
            Some((disable, enable)) => {
                assert_eq!(query.foreign_key_checks_query(false).unwrap().sql, disable);
                assert_eq!(query.foreign_key_checks_query(true).unwrap().sql, enable);
            }
            None => expect_feature_not_supported(query.foreign_key_checks_query(false)),
        }
    }
}
