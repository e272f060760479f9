use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ConditionalCreateTable, ConditionalDdl,
    DataType, DefaultValuesStyle, Descriptor, Dialect, FunctionAlias, IgnoreDuplicates,
    IndexSupport, IsolationStyle, JsonStyle, LimitStyle, ListTablesOptions, ParserTable, Result,
    Returning, ReturningStyle, RowLimit, SavepointStyle, SqlError, StringEscape, Supports,
    TableRef, TableSupport, TimestampTzStyle, TransactionStart, TransactionSupport,
    TruncateStyle, TruncateTableOptions, UpsertStyle, ValueParser,
    writer::{Context, SqlWriter},
};

pub const SQLITE: Descriptor = Descriptor {
    dialect: Dialect::Sqlite,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Standard,
    string_prefix: "",
    boolean: BooleanStyle::Numeric,
    blob: BlobStyle::HexString,
    timestamp_tz: TimestampTzStyle::Offset,
    bind: BindStyle::Numbered('?'),
    auto_increment: Some(AutoIncrement {
        keyword: "AUTOINCREMENT",
        after_primary_key: true,
    }),
    default_schema: "",
    technical_schema_names: &[],
    technical_database_names: &[],
    function_aliases: &[FunctionAlias {
        name: "NOW",
        target: "CURRENT_TIMESTAMP",
        bare: true,
    }],
    parsers: PARSERS,
    supports: Supports {
        limit: LimitStyle::LimitOffset {
            unbounded_limit: Some("-1"),
        },
        zero_limit: true,
        delete_limit: Some(RowLimit::Subquery),
        update_limit: Some(RowLimit::Subquery),
        returning: Returning::all(ReturningStyle::Returning),
        upsert: UpsertStyle::OnConflict,
        ignore_duplicates: IgnoreDuplicates::InsertOrIgnore,
        conflict_target: true,
        default_values: DefaultValuesStyle::DefaultValues,
        nulls_ordering: true,
        json: JsonStyle::ArrowExtract,
        tables: TableSupport {
            truncate: TruncateStyle::DeleteFrom,
            truncate_restart_identity: true,
            ..TableSupport::NONE
        },
        if_exists: ConditionalDdl {
            create_table: ConditionalCreateTable::IfNotExists,
            drop_table: true,
            create_index: true,
            drop_index: true,
            ..ConditionalDdl::NONE
        },
        indexes: IndexSupport {
            partial: true,
            ..IndexSupport::NONE
        },
        transactions: TransactionSupport {
            start: TransactionStart::Begin,
            read_only: false,
            transaction_type: true,
            connection_methods: false,
            savepoints: SavepointStyle::Standard { suffix: None },
            isolation_levels: IsolationStyle::ReadUncommittedPragma,
        },
        foreign_key_checks: Some(("PRAGMA foreign_keys = OFF", "PRAGMA foreign_keys = ON")),
        ..Supports::NONE
    },
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("INTEGER", ValueParser::Integer),
    ("INT", ValueParser::Integer),
    ("BIGINT", ValueParser::Integer),
    ("REAL", ValueParser::Float),
    ("DOUBLE", ValueParser::Float),
    ("NUMERIC", ValueParser::Decimal),
    ("DECIMAL", ValueParser::Decimal),
    ("TEXT", ValueParser::Text),
    ("BLOB", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("DATETIME", ValueParser::Timestamp),
    ("TIMESTAMP", ValueParser::Timestamp),
    ("JSON", ValueParser::Json),
]);

pub struct SqliteSqlWriter {}

impl SqliteSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for SqliteSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        &SQLITE
    }

    fn row_identifier(&self) -> Option<&'static str> {
        Some("rowid")
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean
            | DataType::TinyInt
            | DataType::SmallInt
            | DataType::Integer
            | DataType::BigInt => out.push_str("INTEGER"),
            DataType::Float | DataType::Double => out.push_str("REAL"),
            DataType::Decimal(..) => out.push_str("NUMERIC"),
            DataType::Char(..) | DataType::Varchar(..) | DataType::Text => out.push_str("TEXT"),
            DataType::Blob => out.push_str("BLOB"),
            DataType::Date => out.push_str("DATE"),
            DataType::Time => out.push_str("TIME"),
            DataType::DateTime(..) | DataType::DateTimeTz(..) => out.push_str("DATETIME"),
            DataType::Uuid => out.push_str("TEXT"),
            DataType::Json => out.push_str("JSON"),
            DataType::Enum(..) => {
                log::warn!("SQLite does not enforce enum values, the column is declared as TEXT");
                out.push_str("TEXT");
            }
            DataType::Array(..) => {
                return Err(SqlError::feature_not_supported("array columns", self.dialect()).into());
            }
            DataType::Custom(v) => out.push_str(v),
        }
        Ok(())
    }

    fn write_truncate_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &TruncateTableOptions,
    ) -> Result<()> {
        self.reject_unsupported_options("truncate table", &[("cascade", options.cascade, false)])?;
        out.push_str("DELETE FROM ");
        self.write_table_name(context, out, table)?;
        if options.restart_identity {
            out.push_str("; DELETE FROM ");
            self.write_identifier_quoted(context, out, "sqlite_sequence")?;
            out.push_str(" WHERE ");
            self.write_identifier_quoted(context, out, "name")?;
            out.push_str(" = ");
            self.write_value_string(context, out, &table.full_name())?;
        }
        Ok(())
    }

    fn write_list_tables(
        &self,
        _context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        self.reject_unsupported_options("list tables", &[("schema", options.schema.is_some(), false)])?;
        out.push_str(
            "SELECT name AS table_name, NULL AS table_schema FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        );
        Ok(())
    }

    fn write_describe_table(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str("PRAGMA TABLE_INFO(");
        self.write_table_name(context, out, table)?;
        out.push(')');
        Ok(())
    }

    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ");
        self.write_value_string(context, out, &table.full_name())
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT sqlite_version() AS version");
        Ok(())
    }
}
