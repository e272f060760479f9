use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConditionalCreateTable, ConditionalDdl, ConstraintSupport, DataType, Descriptor, Dialect,
    FunctionAlias, IndexOptions, IsolationStyle, JsonStyle, LimitStyle, MergeSource, ParserTable,
    RemoveIndexOptions, Result, RowLimit, SavepointStyle, SchemaSupport, SqlError, StringEscape,
    Supports, TableRef, TableSupport, TimestampTzStyle, TransactionStart, TransactionSupport,
    UpsertStyle, ValueParser,
    writer::{Context, SqlWriter},
};
use std::fmt::Write;

/// Fractional digits kept by `TIMESTAMP_NTZ` and `TIMESTAMP_TZ`.
const MAX_PRECISION: u8 = 9;

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::LimitOffset {
        unbounded_limit: Some("NULL"),
    },
    zero_limit: true,
    delete_limit: Some(RowLimit::Subquery),
    update_limit: Some(RowLimit::Subquery),
    upsert: UpsertStyle::Merge(MergeSource::Select),
    bulk_default: true,
    nulls_ordering: true,
    json: JsonStyle::GetPath,
    comments: CommentStyle::Inline,
    schemas: SchemaSupport {
        schemas: true,
        multi_databases: true,
        comment: true,
        replace: true,
        drop_cascade: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        drop_cascade: true,
        change_column: ChangeColumnStyle::SetDataType,
        ..TableSupport::NONE
    },
    if_exists: ConditionalDdl {
        create_table: ConditionalCreateTable::IfNotExists,
        drop_table: true,
        add_column: true,
        drop_column: true,
        create_schema: true,
        drop_schema: true,
        create_database: true,
        drop_database: true,
        ..ConditionalDdl::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        deferrable: true,
        remove_cascade: true,
        ..ConstraintSupport::NONE
    },
    transactions: TransactionSupport {
        start: TransactionStart::StartTransaction,
        read_only: false,
        transaction_type: false,
        connection_methods: false,
        savepoints: SavepointStyle::Unsupported,
        isolation_levels: IsolationStyle::Unsupported,
    },
    ..Supports::NONE
};

pub const SNOWFLAKE: Descriptor = Descriptor {
    dialect: Dialect::Snowflake,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Backslash,
    string_prefix: "",
    boolean: BooleanStyle::Keyword,
    blob: BlobStyle::HexString,
    timestamp_tz: TimestampTzStyle::Offset,
    bind: BindStyle::Question,
    auto_increment: Some(AutoIncrement {
        keyword: "AUTOINCREMENT",
        after_primary_key: false,
    }),
    default_schema: "PUBLIC",
    technical_schema_names: &["INFORMATION_SCHEMA"],
    technical_database_names: &["SNOWFLAKE", "SNOWFLAKE_SAMPLE_DATA"],
    function_aliases: &[FunctionAlias {
        name: "NOW",
        target: "CURRENT_TIMESTAMP",
        bare: true,
    }],
    parsers: PARSERS,
    supports: SUPPORTS,
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("NUMBER", ValueParser::Decimal),
    ("DECIMAL", ValueParser::Decimal),
    ("NUMERIC", ValueParser::Decimal),
    ("INT", ValueParser::BigInteger),
    ("INTEGER", ValueParser::BigInteger),
    ("BIGINT", ValueParser::BigInteger),
    ("SMALLINT", ValueParser::BigInteger),
    ("TINYINT", ValueParser::BigInteger),
    ("FLOAT", ValueParser::Float),
    ("DOUBLE", ValueParser::Float),
    ("REAL", ValueParser::Float),
    ("VARCHAR", ValueParser::Text),
    ("CHAR", ValueParser::Text),
    ("STRING", ValueParser::Text),
    ("TEXT", ValueParser::Text),
    ("BINARY", ValueParser::Blob),
    ("VARBINARY", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("TIMESTAMP_NTZ", ValueParser::Timestamp),
    ("TIMESTAMP_LTZ", ValueParser::TimestampWithTimezone),
    ("TIMESTAMP_TZ", ValueParser::TimestampWithTimezone),
    ("VARIANT", ValueParser::Json),
    ("OBJECT", ValueParser::Json),
    ("ARRAY", ValueParser::Json),
]);

#[derive(Default)]
pub struct SnowflakeSqlWriter {}

impl SnowflakeSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }

    fn write_precision(&self, out: &mut String, precision: Option<u8>) {
        if let Some(p) = precision {
            let _ = write!(out, "({})", p.min(MAX_PRECISION));
        }
    }
}

impl SqlWriter for SnowflakeSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        &SNOWFLAKE
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Varchar(None) => out.push_str("VARCHAR"),
            DataType::Blob => out.push_str("BINARY"),
            DataType::Uuid => out.push_str("VARCHAR(36)"),
            DataType::Json => out.push_str("VARIANT"),
            DataType::Array(..) => out.push_str("ARRAY"),
            DataType::Enum(..) => {
                log::warn!(
                    "{} has no enum type, the allowed values are not enforced",
                    self.dialect()
                );
                out.push_str("VARCHAR");
            }
            DataType::DateTime(precision) => {
                out.push_str("TIMESTAMP_NTZ");
                self.write_precision(out, *precision);
            }
            DataType::DateTimeTz(precision) => {
                out.push_str("TIMESTAMP_TZ");
                self.write_precision(out, *precision);
            }
            _ => {
                let _ = write!(out, "{value}");
            }
        }
        Ok(())
    }

    fn write_create_index(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _table: &TableRef,
        _options: &IndexOptions,
    ) -> Result<()> {
        // Standard tables have no secondary indexes
        Err(SqlError::feature_not_supported("indexes", self.dialect()).into())
    }

    fn write_remove_index(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _table: &TableRef,
        _name: &str,
        _options: &RemoveIndexOptions,
    ) -> Result<()> {
        Err(SqlError::feature_not_supported("indexes", self.dialect()).into())
    }

    fn write_list_databases(&self, context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT database_name FROM information_schema.databases");
        self.write_not_in_strings(
            context,
            out,
            " WHERE ",
            "database_name",
            self.descriptor().technical_database_names(),
        )?;
        out.push_str(" ORDER BY database_name");
        Ok(())
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT CURRENT_VERSION() AS version");
        Ok(())
    }
}
