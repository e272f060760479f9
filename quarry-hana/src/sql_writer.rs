use quarry_core::{
    AddColumnOptions, AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle,
    ColumnDef, CommentStyle, ConditionalDdl, ConstraintSupport, CreateSchemaOptions, DataType,
    Descriptor, Dialect, DropTableOptions, FunctionAlias, InsertOptions, IsolationStyle,
    JsonStyle, LimitStyle, ListSchemasOptions, ListTablesOptions, LockSupport, ParserTable,
    RemoveColumnOptions, RemoveIndexOptions, RenameStyle, Result, Row, RowLimit, SavepointStyle,
    SchemaSupport, SqlError, StringEscape, Supports, TableRef, TableSupport, TimestampTzStyle,
    TransactionStart, TransactionSupport, UpsertStyle, ValueParser, ensure_supported,
    try_separated_by,
    writer::{Context, Fragment, Modification, SqlWriter},
};
use std::fmt::Write;

/// Length of the `NVARCHAR` replacing strings without one, and the minimum for enums.
const DEFAULT_LENGTH: u32 = 255;

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::LimitOffset {
        unbounded_limit: Some("9223372036854775807"),
    },
    zero_limit: true,
    delete_limit: Some(RowLimit::Limit),
    upsert: UpsertStyle::UpsertWithPrimaryKey,
    lock: LockSupport {
        for_update: true,
        no_wait: true,
        ..LockSupport::NONE
    },
    nulls_ordering: true,
    json: JsonStyle::JsonValue,
    comments: CommentStyle::Inline,
    schemas: SchemaSupport {
        schemas: true,
        authorization: true,
        drop_cascade: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        drop_cascade: true,
        add_column: "ADD",
        change_column: ChangeColumnStyle::AlterParenthesized,
        rename_column: RenameStyle::Rename,
        rename_table: RenameStyle::Rename,
        ..TableSupport::NONE
    },
    if_exists: ConditionalDdl {
        drop_table: true,
        ..ConditionalDdl::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        ..ConstraintSupport::NONE
    },
    transactions: TransactionSupport {
        start: TransactionStart::Driver,
        read_only: false,
        transaction_type: false,
        connection_methods: true,
        savepoints: SavepointStyle::Standard { suffix: None },
        isolation_levels: IsolationStyle::SetTransaction,
    },
    ..Supports::NONE
};

pub const HANA: Descriptor = Descriptor {
    dialect: Dialect::Hana,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Standard,
    string_prefix: "",
    boolean: BooleanStyle::Keyword,
    blob: BlobStyle::HexString,
    timestamp_tz: TimestampTzStyle::Utc,
    bind: BindStyle::Question,
    auto_increment: Some(AutoIncrement {
        keyword: "GENERATED BY DEFAULT AS IDENTITY",
        after_primary_key: false,
    }),
    default_schema: "",
    technical_schema_names: &[
        "SYS",
        "PUBLIC",
        "SYSTEM",
        "UIS",
        "HANA_XS_BASE",
        "SAP_PA_APL",
        "SAP_REST_API",
        "SAPHANADB",
    ],
    technical_database_names: &[],
    function_aliases: &[
        FunctionAlias {
            name: "NOW",
            target: "CURRENT_TIMESTAMP",
            bare: true,
        },
        FunctionAlias {
            name: "RANDOM",
            target: "RAND",
            bare: false,
        },
    ],
    parsers: PARSERS,
    supports: SUPPORTS,
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("TINYINT", ValueParser::BigInteger),
    ("SMALLINT", ValueParser::BigInteger),
    ("INTEGER", ValueParser::BigInteger),
    ("BIGINT", ValueParser::BigInteger),
    ("DECIMAL", ValueParser::Decimal),
    ("SMALLDECIMAL", ValueParser::Decimal),
    ("REAL", ValueParser::Float),
    ("DOUBLE", ValueParser::Float),
    ("VARCHAR", ValueParser::Text),
    ("NVARCHAR", ValueParser::Text),
    ("NCHAR", ValueParser::Text),
    ("CLOB", ValueParser::Text),
    ("NCLOB", ValueParser::Text),
    ("VARBINARY", ValueParser::Blob),
    ("BLOB", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("SECONDDATE", ValueParser::Timestamp),
    ("TIMESTAMP", ValueParser::Timestamp),
]);

#[derive(Default)]
pub struct HanaSqlWriter {}

impl HanaSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }

    fn write_schema_value(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        if table.schema.is_empty() {
            out.push_str("CURRENT_SCHEMA");
            Ok(())
        } else {
            self.write_value_string(context, out, &table.schema)
        }
    }

    /// `SELECT a, b FROM DUMMY UNION ALL SELECT …`, the only multi-row form accepted by INSERT.
    fn write_insert_union(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        rows: &[Row],
        options: &InsertOptions,
    ) -> Result<()> {
        ensure_supported!(
            !options.ignore_duplicates,
            "ignoring duplicates on INSERT",
            self.dialect()
        );
        ensure_supported!(
            options.on_conflict.is_none(),
            "ON CONFLICT on INSERT",
            self.dialect()
        );
        self.check_returning(&options.returning, Modification::Insert)?;
        let mut columns = Vec::<&str>::new();
        for (name, _) in rows.iter().flatten() {
            if !columns.contains(&&**name) {
                columns.push(&**name);
            }
        }
        if columns.is_empty() {
            return Err(SqlError::invalid_option(
                "insert",
                self.dialect(),
                "rows without values cannot be inserted in bulk",
            )
            .into());
        }
        out.push_str("INSERT INTO ");
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertInto);
            self.write_table_name(&mut context, out, table)?;
            out.push_str(" (");
            try_separated_by(
                out,
                &columns,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            )?;
            out.push_str(") ");
        }
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        try_separated_by(
            out,
            rows,
            |out, row| {
                out.push_str("SELECT ");
                try_separated_by(
                    out,
                    &columns,
                    |out, column| match row.iter().find(|(k, _)| *k == **column) {
                        Some((_, v)) => self.write_expression(&mut context, out, v),
                        None => {
                            out.push_str("NULL");
                            Ok(())
                        }
                    },
                    ", ",
                )?;
                out.push_str(" FROM DUMMY");
                Ok(())
            },
            " UNION ALL ",
        )
    }
}

impl SqlWriter for HanaSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        &HANA
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Float => out.push_str("REAL"),
            DataType::Char(length) => {
                let _ = write!(out, "NCHAR({length})");
            }
            DataType::Varchar(length) => {
                let _ = write!(out, "NVARCHAR({})", length.unwrap_or(DEFAULT_LENGTH));
            }
            DataType::Text | DataType::Json => out.push_str("NCLOB"),
            DataType::Uuid => out.push_str("NVARCHAR(36)"),
            DataType::DateTime(..) => out.push_str("TIMESTAMP"),
            DataType::DateTimeTz(..) => {
                log::warn!(
                    "{} has no time zone aware timestamp, values are stored in UTC",
                    self.dialect()
                );
                out.push_str("TIMESTAMP");
            }
            DataType::Enum(values) => {
                let longest = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
                let _ = write!(out, "NVARCHAR({})", longest.max(DEFAULT_LENGTH as usize));
            }
            DataType::Array(..) => {
                return Err(SqlError::feature_not_supported("array columns", self.dialect()).into());
            }
            _ => {
                let _ = write!(out, "{value}");
            }
        }
        Ok(())
    }

    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        rows: &[Row],
        options: &InsertOptions,
    ) -> Result<()> {
        match rows {
            [] => Err(SqlError::invalid_option(
                "insert",
                self.dialect(),
                "at least one row is required",
            )
            .into()),
            [row] => {
                self.check_returning(&options.returning, Modification::Insert)?;
                let columns = row.iter().map(|(k, _)| &**k).collect::<Vec<_>>();
                self.write_insert_statement(context, out, table, &columns, rows, options)
            }
            _ => self.write_insert_union(context, out, table, rows, options),
        }
    }

    fn write_drop_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &DropTableOptions,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        if options.if_exists {
            // No IF EXISTS clause, the check runs in an anonymous block
            out.push_str("DO BEGIN IF EXISTS (SELECT * FROM SYS.TABLES WHERE TABLE_NAME = ");
            self.write_value_string(&mut context, out, &table.name)?;
            out.push_str(" AND SCHEMA_NAME = ");
            self.write_schema_value(&mut context, out, table)?;
            out.push_str(") THEN ");
        }
        out.push_str("DROP TABLE ");
        self.write_table_name(&mut context, out, table)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        if options.if_exists {
            out.push_str("; END IF; END;");
        }
        Ok(())
    }

    fn write_add_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &ColumnDef,
        options: &AddColumnOptions,
    ) -> Result<()> {
        self.reject_unsupported_options(
            "add column",
            &[("if_not_exists", options.if_not_exists, false)],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" ADD (");
        self.write_column_def(&mut context, out, column, true)?;
        out.push(')');
        Ok(())
    }

    fn write_remove_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<()> {
        self.reject_unsupported_options(
            "remove column",
            &[
                ("if_exists", options.if_exists, false),
                ("cascade", options.cascade, false),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" DROP (");
        self.write_identifier_quoted(&mut context, out, column)?;
        out.push(')');
        Ok(())
    }

    fn write_remove_index(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        name: &str,
        options: &RemoveIndexOptions,
    ) -> Result<()> {
        self.reject_unsupported_options(
            "remove index",
            &[
                ("if_exists", options.if_exists, false),
                ("concurrently", options.concurrently, false),
                ("cascade", options.cascade, false),
            ],
        )?;
        out.push_str("DROP INDEX ");
        if !table.schema.is_empty() {
            self.write_identifier_quoted(context, out, &table.schema)?;
            out.push('.');
        }
        self.write_identifier_quoted(context, out, name)
    }

    fn write_create_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateSchemaOptions,
    ) -> Result<()> {
        self.reject_unsupported_options(
            "create schema",
            &[
                ("if_not_exists", options.if_not_exists, false),
                ("charset", options.charset.is_some(), false),
                ("collate", options.collate.is_some(), false),
                ("comment", options.comment.is_some(), false),
                ("replace", options.replace, false),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlCreateSchema);
        out.push_str("CREATE SCHEMA ");
        self.write_identifier_quoted(&mut context, out, name)?;
        if let Some(owner) = &options.authorization {
            out.push_str(" OWNED BY ");
            self.write_identifier_quoted(&mut context, out, owner)?;
        }
        Ok(())
    }

    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        let excluded = self
            .descriptor()
            .technical_schema_names()
            .iter()
            .copied()
            .chain(options.skip.iter().map(|v| &**v))
            .collect::<Vec<&str>>();
        out.push_str(
            "SELECT SCHEMA_NAME AS schema_name FROM SYS.SCHEMAS WHERE SCHEMA_NAME NOT LIKE '\\_SYS%' ESCAPE '\\'",
        );
        self.write_not_in_strings(context, out, " AND ", "SCHEMA_NAME", &excluded)?;
        out.push_str(" ORDER BY SCHEMA_NAME");
        Ok(())
    }

    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        out.push_str(
            "SELECT TABLE_NAME AS table_name, SCHEMA_NAME AS table_schema FROM SYS.TABLES WHERE IS_SYSTEM_TABLE = 'FALSE' AND SCHEMA_NAME NOT LIKE '\\_SYS%' ESCAPE '\\'",
        );
        match &options.schema {
            Some(schema) => {
                out.push_str(" AND SCHEMA_NAME = ");
                self.write_value_string(context, out, schema)?;
            }
            None => {
                self.write_not_in_strings(
                    context,
                    out,
                    " AND ",
                    "SCHEMA_NAME",
                    self.descriptor().technical_schema_names(),
                )?;
            }
        }
        out.push_str(" ORDER BY SCHEMA_NAME, TABLE_NAME");
        Ok(())
    }

    fn write_describe_table(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(
            "SELECT COLUMN_NAME AS column_name, DATA_TYPE_NAME AS data_type, IS_NULLABLE AS is_nullable, DEFAULT_VALUE AS column_default FROM SYS.TABLE_COLUMNS WHERE TABLE_NAME = ",
        );
        self.write_value_string(context, out, &table.name)?;
        out.push_str(" AND SCHEMA_NAME = ");
        self.write_schema_value(context, out, table)?;
        out.push_str(" ORDER BY POSITION");
        Ok(())
    }

    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str("SELECT TABLE_NAME AS table_name FROM SYS.TABLES WHERE TABLE_NAME = ");
        self.write_value_string(context, out, &table.name)?;
        out.push_str(" AND SCHEMA_NAME = ");
        self.write_schema_value(context, out, table)
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT VERSION AS version FROM SYS.M_DATABASE");
        Ok(())
    }
}
