use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConditionalCreateTable, ConditionalDdl, ConstraintSupport, CreateDatabaseOptions, DataType,
    DefaultValuesStyle, Descriptor, Dialect, DropIndexStyle, Expr, FunctionAlias, IndexSupport,
    IsolationStyle, JsonStyle, LimitStyle, ListSchemasOptions, ListTablesOptions, MergeSource,
    ParserTable, RenameStyle, Result, Returning, ReturningStyle, RowLimit, SavepointStyle,
    SchemaSupport, SqlError, StringEscape, Supports, TableRef, TableSupport, TimestampTzStyle,
    TransactionStart, TransactionSupport, UpsertStyle, ValueParser, ensure_supported,
    writer::{Context, Fragment, SqlWriter},
};
use std::fmt::Write;

/// Fractional digits kept by `DATETIME2`, `DATETIMEOFFSET` and `TIME`.
const MAX_PRECISION: u8 = 7;

const TECHNICAL_SCHEMAS: &[&str] = &[
    "INFORMATION_SCHEMA",
    "db_accessadmin",
    "db_backupoperator",
    "db_datareader",
    "db_datawriter",
    "db_ddladmin",
    "db_denydatareader",
    "db_denydatawriter",
    "db_owner",
    "db_securityadmin",
    "sys",
];

/// Schemas every database has, hidden from the schema listing.
const BUILTIN_SCHEMAS: &[&str] = &["dbo", "guest"];

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::OffsetFetch {
        offset_required: true,
        order_required: true,
    },
    zero_limit: false,
    delete_limit: Some(RowLimit::Top),
    update_limit: Some(RowLimit::Top),
    returning: Returning::all(ReturningStyle::Output),
    upsert: UpsertStyle::Merge(MergeSource::Values { terminated: true }),
    default_values: DefaultValuesStyle::DefaultValues,
    bulk_default: true,
    max_insert_rows: Some(1000),
    table_hints: true,
    json: JsonStyle::JsonValue,
    comments: CommentStyle::ExtendedProperty,
    schemas: SchemaSupport {
        schemas: true,
        multi_databases: true,
        authorization: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        add_column: "ADD",
        change_column: ChangeColumnStyle::AlterColumn,
        rename_column: RenameStyle::SpRename,
        rename_table: RenameStyle::SpRename,
        inline_references: false,
        ..TableSupport::NONE
    },
    if_exists: ConditionalDdl {
        create_table: ConditionalCreateTable::ObjectIdGuard,
        drop_table: true,
        drop_column: true,
        drop_index: true,
        drop_schema: true,
        drop_constraint: true,
        create_database: true,
        drop_database: true,
        ..ConditionalDdl::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        default: true,
        foreign_key_on_update: true,
        ..ConstraintSupport::NONE
    },
    indexes: IndexSupport {
        partial: true,
        include: true,
        index_type: true,
        drop_style: DropIndexStyle::OnTable,
        ..IndexSupport::NONE
    },
    transactions: TransactionSupport {
        start: TransactionStart::Driver,
        read_only: false,
        transaction_type: false,
        connection_methods: true,
        savepoints: SavepointStyle::SaveTransaction,
        isolation_levels: IsolationStyle::SetTransaction,
    },
    affected_rows_suffix: Some("SELECT @@ROWCOUNT AS AFFECTEDROWS"),
    ..Supports::NONE
};

pub const MSSQL: Descriptor = Descriptor {
    dialect: Dialect::MsSql,
    identifier_quote_left: '[',
    identifier_quote_right: ']',
    string_escape: StringEscape::Standard,
    string_prefix: "N",
    boolean: BooleanStyle::Numeric,
    blob: BlobStyle::HexPrefix,
    timestamp_tz: TimestampTzStyle::Offset,
    bind: BindStyle::Named('@'),
    auto_increment: Some(AutoIncrement {
        keyword: "IDENTITY(1,1)",
        after_primary_key: false,
    }),
    default_schema: "dbo",
    technical_schema_names: TECHNICAL_SCHEMAS,
    technical_database_names: &["master", "model", "msdb", "tempdb"],
    function_aliases: &[
        FunctionAlias {
            name: "NOW",
            target: "GETDATE",
            bare: false,
        },
        FunctionAlias {
            name: "LENGTH",
            target: "LEN",
            bare: false,
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
    ("BIT", ValueParser::Boolean),
    ("TINYINT", ValueParser::Integer),
    ("SMALLINT", ValueParser::Integer),
    ("INT", ValueParser::Integer),
    ("BIGINT", ValueParser::BigInteger),
    ("REAL", ValueParser::Float),
    ("FLOAT", ValueParser::Float),
    ("DECIMAL", ValueParser::Decimal),
    ("NUMERIC", ValueParser::Decimal),
    ("MONEY", ValueParser::Decimal),
    ("CHAR", ValueParser::Text),
    ("NCHAR", ValueParser::Text),
    ("VARCHAR", ValueParser::Text),
    ("NVARCHAR", ValueParser::Text),
    ("TEXT", ValueParser::Text),
    ("NTEXT", ValueParser::Text),
    ("BINARY", ValueParser::Blob),
    ("VARBINARY", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("DATETIME", ValueParser::Timestamp),
    ("DATETIME2", ValueParser::Timestamp),
    ("SMALLDATETIME", ValueParser::Timestamp),
    ("DATETIMEOFFSET", ValueParser::TimestampWithTimezone),
    ("UNIQUEIDENTIFIER", ValueParser::Uuid),
]);

#[derive(Default)]
pub struct MsSqlSqlWriter {}

impl MsSqlSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }

    fn write_precision(&self, out: &mut String, precision: Option<u8>) {
        if let Some(p) = precision {
            if p > MAX_PRECISION {
                log::warn!("SQL Server keeps at most {MAX_PRECISION} fractional digits, precision {p} is reduced");
            }
            let _ = write!(out, "({})", p.min(MAX_PRECISION));
        }
    }

    /// `AND s.name = N'x'` or the exclusion of the technical schemas.
    fn write_schema_filter(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        match &options.schema {
            Some(schema) => {
                out.push_str(" AND s.name = ");
                self.write_value_string(context, out, schema)
            }
            None => self.write_not_in_strings(context, out, " AND ", "s.name", TECHNICAL_SCHEMAS),
        }
    }
}

impl SqlWriter for MsSqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        &MSSQL
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean => out.push_str("BIT"),
            DataType::Integer => out.push_str("INT"),
            DataType::Float => out.push_str("REAL"),
            DataType::Double => out.push_str("FLOAT"),
            DataType::Char(n) => {
                let _ = write!(out, "NCHAR({n})");
            }
            DataType::Varchar(Some(n)) => {
                let _ = write!(out, "NVARCHAR({n})");
            }
            DataType::Varchar(None) => out.push_str("NVARCHAR(255)"),
            DataType::Text | DataType::Json => out.push_str("NVARCHAR(MAX)"),
            DataType::Blob => out.push_str("VARBINARY(MAX)"),
            DataType::Time => out.push_str("TIME"),
            DataType::DateTime(precision) => {
                out.push_str("DATETIME2");
                self.write_precision(out, *precision);
            }
            DataType::DateTimeTz(precision) => {
                out.push_str("DATETIMEOFFSET");
                self.write_precision(out, *precision);
            }
            DataType::Uuid => out.push_str("UNIQUEIDENTIFIER"),
            DataType::Array(..) => {
                return Err(SqlError::feature_not_supported("array columns", self.dialect()).into());
            }
            DataType::Enum(..) => {
                return Err(SqlError::feature_not_supported("enum columns", self.dialect()).into());
            }
            _ => {
                let _ = write!(out, "{value}");
            }
        }
        Ok(())
    }

    fn write_expression_concat(&self, context: &mut Context, out: &mut String, lhs: &Expr, rhs: &Expr) -> Result<()> {
        // `+` yields NULL as soon as one side is NULL
        out.push_str("CONCAT(");
        self.write_expression(context, out, lhs)?;
        out.push_str(", ");
        self.write_expression(context, out, rhs)?;
        out.push(')');
        Ok(())
    }

    fn write_rename_table(
        &self,
        context: &mut Context,
        out: &mut String,
        from: &TableRef,
        to: &TableRef,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        let schema = self.effective_schema(from);
        if !to.schema.is_empty() && to.schema != schema {
            if to.name != from.name {
                return Err(SqlError::invalid_option(
                    "rename table",
                    self.dialect(),
                    "a table is either renamed or moved to another schema, not both",
                )
                .into());
            }
            out.push_str("ALTER SCHEMA ");
            self.write_identifier_quoted(&mut context, out, &to.schema)?;
            out.push_str(" TRANSFER ");
            self.write_identifier_quoted(&mut context, out, schema)?;
            out.push('.');
            return self.write_identifier_quoted(&mut context, out, &from.name);
        }
        let mut name = String::new();
        self.write_table_name(&mut context, &mut name, from)?;
        out.push_str("EXEC sp_rename ");
        self.write_value_string(&mut context, out, &name)?;
        out.push_str(", ");
        self.write_value_string(&mut context, out, &to.name)
    }

    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        let excluded = BUILTIN_SCHEMAS
            .iter()
            .chain(TECHNICAL_SCHEMAS)
            .copied()
            .chain(options.skip.iter().map(|v| &**v))
            .collect::<Vec<&str>>();
        out.push_str("SELECT name AS schema_name FROM sys.schemas");
        self.write_not_in_strings(context, out, " WHERE ", "name", &excluded)?;
        out.push_str(" ORDER BY name");
        Ok(())
    }

    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        // System versioned tables list their history table too
        out.push_str(
            "SELECT t.name AS table_name, s.name AS table_schema FROM sys.tables t INNER JOIN sys.schemas s ON t.schema_id = s.schema_id WHERE t.type = 'U'",
        );
        self.write_schema_filter(context, out, options)?;
        out.push_str(
            " EXCEPT SELECT OBJECT_NAME(t.history_table_id) AS table_name, s.name AS table_schema FROM sys.tables t INNER JOIN sys.schemas s ON t.schema_id = s.schema_id WHERE t.type = 'U'",
        );
        self.write_schema_filter(context, out, options)?;
        out.push_str(" ORDER BY table_schema, table_name");
        Ok(())
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT CAST(SERVERPROPERTY('ProductVersion') AS NVARCHAR(128)) AS version");
        Ok(())
    }

    fn write_create_database(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateDatabaseOptions,
    ) -> Result<()> {
        ensure_supported!(
            self.descriptor().supports.schemas.multi_databases,
            "databases",
            self.dialect()
        );
        self.reject_unsupported_options(
            "create database",
            &[
                ("charset", options.charset.is_some(), false),
                ("ctype", options.ctype.is_some(), false),
                ("template", options.template.is_some(), false),
            ],
        )?;
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS (SELECT * FROM sys.databases WHERE name = ");
            self.write_value_string(context, out, name)?;
            out.push_str(") ");
        }
        out.push_str("CREATE DATABASE ");
        self.write_identifier_quoted(context, out, name)?;
        if let Some(collate) = &options.collate {
            out.push_str(" COLLATE ");
            self.write_keyword_option(out, "collate", collate)?;
        }
        Ok(())
    }

    fn write_list_databases(&self, context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT name FROM sys.databases");
        self.write_not_in_strings(
            context,
            out,
            " WHERE ",
            "name",
            self.descriptor().technical_database_names(),
        )?;
        out.push_str(" ORDER BY name");
        Ok(())
    }
}
