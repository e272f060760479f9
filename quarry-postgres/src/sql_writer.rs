use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConditionalCreateTable, ConditionalDdl, ConstraintSupport, CreateDatabaseOptions, DataType,
    DefaultValuesStyle, Descriptor, Dialect, DropIndexStyle, IgnoreDuplicates, IndexSupport,
    IsolationStyle, JsonStyle, LimitStyle, ListSchemasOptions, ListTablesOptions, LockSupport,
    ParserTable, RenameStyle, Result, Returning, ReturningStyle, RowLimit, SavepointStyle,
    SchemaSupport, SqlError, StringEscape, Supports, TableSupport, TimestampTzStyle,
    TransactionStart, TransactionSupport, TruncateStyle, UpsertStyle, Value, ValueParser,
    ensure_supported, try_separated_by,
    writer::{Context, SqlWriter},
};
use std::fmt::Write;

/// Fractional digits kept by `TIMESTAMP` and `TIME`.
const MAX_PRECISION: u8 = 6;

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::LimitOffset {
        unbounded_limit: None,
    },
    zero_limit: true,
    delete_limit: Some(RowLimit::Subquery),
    update_limit: Some(RowLimit::Subquery),
    returning: Returning::all(ReturningStyle::Returning),
    upsert: UpsertStyle::OnConflict,
    ignore_duplicates: IgnoreDuplicates::OnConflictDoNothing,
    conflict_target: true,
    default_values: DefaultValuesStyle::DefaultValues,
    bulk_default: true,
    lock: LockSupport {
        for_update: true,
        for_share: Some("FOR SHARE"),
        skip_locked: true,
        no_wait: true,
    },
    nulls_ordering: true,
    json: JsonStyle::Operators,
    comments: CommentStyle::CommentOn,
    schemas: SchemaSupport {
        schemas: true,
        multi_databases: true,
        authorization: true,
        drop_cascade: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        drop_cascade: true,
        truncate: TruncateStyle::Truncate {
            keyword: "TRUNCATE",
            suffix: None,
        },
        truncate_cascade: true,
        truncate_restart_identity: true,
        add_column: "ADD COLUMN",
        remove_column_cascade: true,
        change_column: ChangeColumnStyle::AlterType,
        rename_column: RenameStyle::AlterTable,
        rename_table: RenameStyle::AlterTable,
        table_options: false,
        inline_references: true,
    },
    if_exists: ConditionalDdl {
        create_table: ConditionalCreateTable::IfNotExists,
        drop_table: true,
        add_column: true,
        drop_column: true,
        create_index: true,
        drop_index: true,
        create_schema: true,
        drop_schema: true,
        drop_constraint: true,
        create_database: false,
        drop_database: true,
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        default: false,
        foreign_key_on_update: true,
        deferrable: true,
        set_checking: true,
        remove_cascade: true,
    },
    indexes: IndexSupport {
        concurrently: true,
        using: true,
        partial: true,
        include: true,
        index_type: false,
        drop_style: DropIndexStyle::Standalone,
    },
    transactions: TransactionSupport {
        start: TransactionStart::StartTransaction,
        read_only: true,
        transaction_type: false,
        connection_methods: false,
        savepoints: SavepointStyle::Standard { suffix: None },
        isolation_levels: IsolationStyle::SetTransaction,
    },
    escape_string_constants: true,
    dollar_quoted_strings: true,
    ..Supports::NONE
};

pub const POSTGRES: Descriptor = Descriptor {
    dialect: Dialect::Postgres,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Standard,
    string_prefix: "",
    boolean: BooleanStyle::Keyword,
    blob: BlobStyle::ByteaHex,
    timestamp_tz: TimestampTzStyle::Offset,
    bind: BindStyle::Numbered('$'),
    auto_increment: Some(AutoIncrement {
        keyword: "GENERATED BY DEFAULT AS IDENTITY",
        after_primary_key: false,
    }),
    default_schema: "public",
    technical_schema_names: &["information_schema", "pg_catalog", "pg_toast"],
    technical_database_names: &[],
    function_aliases: &[],
    parsers: PARSERS,
    supports: SUPPORTS,
};

/// CockroachDB speaks the Postgres wire grammar with a narrower DDL surface.
pub const COCKROACHDB: Descriptor = Descriptor {
    dialect: Dialect::CockroachDb,
    technical_schema_names: &[
        "crdb_internal",
        "information_schema",
        "pg_catalog",
        "pg_extension",
    ],
    technical_database_names: &["system"],
    supports: Supports {
        tables: TableSupport {
            truncate_restart_identity: false,
            ..SUPPORTS.tables
        },
        if_exists: ConditionalDdl {
            create_database: true,
            ..SUPPORTS.if_exists
        },
        constraints: ConstraintSupport {
            deferrable: false,
            set_checking: false,
            remove_cascade: false,
            ..SUPPORTS.constraints
        },
        ..SUPPORTS
    },
    ..POSTGRES
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("BOOL", ValueParser::Boolean),
    ("SMALLINT", ValueParser::Integer),
    ("INTEGER", ValueParser::Integer),
    ("INT", ValueParser::Integer),
    ("INT2", ValueParser::Integer),
    ("INT4", ValueParser::Integer),
    ("BIGINT", ValueParser::BigInteger),
    ("INT8", ValueParser::BigInteger),
    ("REAL", ValueParser::Float),
    ("FLOAT4", ValueParser::Float),
    ("DOUBLE PRECISION", ValueParser::Float),
    ("FLOAT8", ValueParser::Float),
    ("NUMERIC", ValueParser::Decimal),
    ("DECIMAL", ValueParser::Decimal),
    ("CHAR", ValueParser::Text),
    ("CHARACTER", ValueParser::Text),
    ("VARCHAR", ValueParser::Text),
    ("CHARACTER VARYING", ValueParser::Text),
    ("TEXT", ValueParser::Text),
    ("STRING", ValueParser::Text),
    ("BYTEA", ValueParser::Blob),
    ("BYTES", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("TIMESTAMP", ValueParser::Timestamp),
    ("TIMESTAMP WITHOUT TIME ZONE", ValueParser::Timestamp),
    ("TIMESTAMPTZ", ValueParser::TimestampWithTimezone),
    ("TIMESTAMP WITH TIME ZONE", ValueParser::TimestampWithTimezone),
    ("UUID", ValueParser::Uuid),
    ("JSON", ValueParser::Json),
    ("JSONB", ValueParser::Json),
]);

/// Writer shared by PostgreSQL and CockroachDB, the descriptor selects the flavor.
pub struct PostgresSqlWriter {
    descriptor: &'static Descriptor,
}

impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self {
            descriptor: &POSTGRES,
        }
    }

    pub const fn cockroach() -> Self {
        Self {
            descriptor: &COCKROACHDB,
        }
    }

    fn write_precision(&self, out: &mut String, precision: Option<u8>) {
        if let Some(p) = precision {
            if p > MAX_PRECISION {
                log::warn!(
                    "{} keeps at most {MAX_PRECISION} fractional digits, precision {p} is reduced",
                    self.dialect()
                );
            }
            let _ = write!(out, "({})", p.min(MAX_PRECISION));
        }
    }
}

impl Default for PostgresSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    fn write_value_list(&self, context: &mut Context, out: &mut String, value: &[Value]) -> Result<()> {
        if value.is_empty() {
            out.push_str("'{}'");
            return Ok(());
        }
        out.push_str("ARRAY[");
        try_separated_by(out, value, |out, v| self.write_value(context, out, v), ", ")?;
        out.push(']');
        Ok(())
    }

    fn write_data_type(&self, context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::TinyInt => out.push_str("SMALLINT"),
            DataType::Float => out.push_str("REAL"),
            DataType::Double => out.push_str("DOUBLE PRECISION"),
            DataType::Decimal(None) => out.push_str("NUMERIC"),
            DataType::Decimal(Some((p, s))) => {
                let _ = write!(out, "NUMERIC({p},{s})");
            }
            DataType::Varchar(None) => out.push_str("VARCHAR(255)"),
            DataType::Blob => out.push_str("BYTEA"),
            DataType::DateTime(precision) => {
                out.push_str("TIMESTAMP");
                self.write_precision(out, *precision);
            }
            DataType::DateTimeTz(precision) => {
                out.push_str("TIMESTAMPTZ");
                self.write_precision(out, *precision);
            }
            DataType::Json => out.push_str("JSONB"),
            DataType::Array(inner) => {
                if matches!(**inner, DataType::Array(..)) {
                    return Err(SqlError::feature_not_supported(
                        "nested array columns",
                        self.dialect(),
                    )
                    .into());
                }
                self.write_data_type(context, out, inner)?;
                out.push_str("[]");
            }
            DataType::Enum(..) => {
                return Err(SqlError::feature_not_supported(
                    "inline enum columns, declare the type with CREATE TYPE",
                    self.dialect(),
                )
                .into());
            }
            _ => {
                let _ = write!(out, "{value}");
            }
        }
        Ok(())
    }

    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        let excluded = ["public"]
            .into_iter()
            .chain(self.descriptor().technical_schema_names().iter().copied())
            .chain(options.skip.iter().map(|v| &**v))
            .collect::<Vec<&str>>();
        out.push_str("SELECT schema_name FROM information_schema.schemata WHERE schema_name !~ '^pg_'");
        self.write_not_in_strings(context, out, " AND ", "schema_name", &excluded)?;
        out.push_str(" ORDER BY schema_name");
        Ok(())
    }

    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        out.push_str(
            "SELECT table_name, table_schema FROM information_schema.tables WHERE table_type = 'BASE TABLE' AND table_name != 'spatial_ref_sys'",
        );
        match &options.schema {
            Some(schema) => {
                out.push_str(" AND table_schema = ");
                self.write_value_string(context, out, schema)?;
            }
            None => {
                out.push_str(" AND table_schema !~ '^pg_'");
                self.write_not_in_strings(
                    context,
                    out,
                    " AND ",
                    "table_schema",
                    self.descriptor().technical_schema_names(),
                )?;
            }
        }
        out.push_str(" ORDER BY table_schema, table_name");
        Ok(())
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        match self.dialect() {
            Dialect::CockroachDb => out.push_str("SELECT version() AS version"),
            _ => out.push_str("SHOW SERVER_VERSION"),
        }
        Ok(())
    }

    fn write_create_database(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateDatabaseOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.multi_databases, "databases", self.dialect());
        let postgres = self.dialect() == Dialect::Postgres;
        self.reject_unsupported_options(
            "create database",
            &[
                ("if_not_exists", options.if_not_exists, supports.if_exists.create_database),
                ("ctype", options.ctype.is_some(), postgres),
                ("template", options.template.is_some(), postgres),
            ],
        )?;
        out.push_str("CREATE DATABASE ");
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(context, out, name)?;
        let settings = [
            (" ENCODING = ", &options.charset),
            (" LC_COLLATE = ", &options.collate),
            (" LC_CTYPE = ", &options.ctype),
            (" TEMPLATE = ", &options.template),
        ];
        for (keyword, value) in settings {
            if let Some(value) = value {
                out.push_str(keyword);
                self.write_value_string(context, out, value)?;
            }
        }
        Ok(())
    }

    fn write_list_databases(&self, context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT datname AS name FROM pg_database WHERE datistemplate = false");
        self.write_not_in_strings(
            context,
            out,
            " AND ",
            "datname",
            self.descriptor().technical_database_names(),
        )?;
        out.push_str(" ORDER BY datname");
        Ok(())
    }
}
