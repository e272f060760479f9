use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConstraintSupport, DataType, Descriptor, Dialect, DropIndexStyle, DropSchemaOptions,
    FunctionAlias, IndexSupport, IsolationLevel, IsolationStyle, LimitStyle, ListSchemasOptions,
    ListTablesOptions, LockSupport, MergeSource, ParserTable, RenameStyle, Result, Returning,
    ReturningStyle, RowLimit, SavepointStyle, SchemaSupport, SqlError, StringEscape, Supports,
    TableRef, TableSupport, TimestampTzStyle, TransactionStart, TransactionSupport,
    TruncateStyle, UpsertStyle, ValueParser, ensure_supported,
    writer::{Context, Fragment, SqlWriter},
};
use std::fmt::Write;

/// Fractional digits kept by `TIMESTAMP`.
const MAX_PRECISION: u8 = 12;

const DB2_TECHNICAL_SCHEMAS: &[&str] = &[
    "ERRORSCHEMA",
    "NULLID",
    "SQLJ",
    "SYSCAT",
    "SYSFUN",
    "SYSIBM",
    "SYSIBMADM",
    "SYSIBMINTERNAL",
    "SYSIBMTS",
    "SYSPROC",
    "SYSPUBLIC",
    "SYSSTAT",
    "SYSTOOLS",
];

const IBMI_TECHNICAL_SCHEMAS: &[&str] = &[
    "QSYS",
    "QSYS2",
    "QTEMP",
    "SYSCAT",
    "SYSIBM",
    "SYSIBMADM",
    "SYSPROC",
    "SYSTOOLS",
];

const TRANSACTIONS: TransactionSupport = TransactionSupport {
    start: TransactionStart::Driver,
    read_only: false,
    transaction_type: false,
    connection_methods: true,
    savepoints: SavepointStyle::Standard {
        suffix: Some("ON ROLLBACK RETAIN CURSORS"),
    },
    isolation_levels: IsolationStyle::SetTransaction,
};

const DB2_SUPPORTS: Supports = Supports {
    limit: LimitStyle::OffsetFetch {
        offset_required: false,
        order_required: false,
    },
    delete_limit: Some(RowLimit::Subquery),
    update_limit: Some(RowLimit::Subquery),
    returning: Returning::all(ReturningStyle::FinalTable),
    upsert: UpsertStyle::Merge(MergeSource::Values { terminated: false }),
    bulk_default: true,
    lock: LockSupport {
        for_update: true,
        ..LockSupport::NONE
    },
    nulls_ordering: true,
    comments: CommentStyle::CommentOn,
    schemas: SchemaSupport {
        schemas: true,
        authorization: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        truncate: TruncateStyle::Truncate {
            keyword: "TRUNCATE TABLE",
            suffix: Some("IMMEDIATE"),
        },
        change_column: ChangeColumnStyle::SetDataType,
        rename_table: RenameStyle::Rename,
        ..TableSupport::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        ..ConstraintSupport::NONE
    },
    indexes: IndexSupport {
        drop_style: DropIndexStyle::Standalone,
        ..IndexSupport::NONE
    },
    transactions: TRANSACTIONS,
    ..Supports::NONE
};

const IBMI_SUPPORTS: Supports = Supports {
    returning: Returning {
        style: ReturningStyle::FinalTable,
        insert: true,
        update: false,
        delete: false,
    },
    nulls_ordering: false,
    schemas: SchemaSupport {
        schemas: true,
        drop_cascade: true,
        ..SchemaSupport::NONE
    },
    ..DB2_SUPPORTS
};

const FUNCTION_ALIASES: &[FunctionAlias] = &[
    FunctionAlias {
        name: "NOW",
        target: "CURRENT TIMESTAMP",
        bare: true,
    },
    FunctionAlias {
        name: "RANDOM",
        target: "RAND",
        bare: false,
    },
];

pub const DB2: Descriptor = Descriptor {
    dialect: Dialect::Db2,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Standard,
    string_prefix: "",
    boolean: BooleanStyle::Keyword,
    blob: BlobStyle::BlobFunction,
    timestamp_tz: TimestampTzStyle::Utc,
    bind: BindStyle::Question,
    auto_increment: Some(AutoIncrement {
        keyword: "GENERATED BY DEFAULT AS IDENTITY",
        after_primary_key: false,
    }),
    default_schema: "",
    technical_schema_names: DB2_TECHNICAL_SCHEMAS,
    technical_database_names: &[],
    function_aliases: FUNCTION_ALIASES,
    parsers: PARSERS,
    supports: DB2_SUPPORTS,
};

pub const IBMI: Descriptor = Descriptor {
    dialect: Dialect::IbmI,
    boolean: BooleanStyle::Numeric,
    technical_schema_names: IBMI_TECHNICAL_SCHEMAS,
    supports: IBMI_SUPPORTS,
    ..DB2
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("SMALLINT", ValueParser::Integer),
    ("INTEGER", ValueParser::Integer),
    ("INT", ValueParser::Integer),
    ("BIGINT", ValueParser::BigInteger),
    ("REAL", ValueParser::Float),
    ("DOUBLE", ValueParser::Float),
    ("DECFLOAT", ValueParser::Decimal),
    ("DECIMAL", ValueParser::Decimal),
    ("NUMERIC", ValueParser::Decimal),
    ("CHARACTER", ValueParser::Text),
    ("CHAR", ValueParser::Text),
    ("VARCHAR", ValueParser::Text),
    ("CLOB", ValueParser::Text),
    ("GRAPHIC", ValueParser::Text),
    ("VARGRAPHIC", ValueParser::Text),
    ("BLOB", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("TIMESTAMP", ValueParser::Timestamp),
]);

/// Writer shared by Db2 LUW and Db2 for IBM i, the descriptor selects the flavor.
pub struct Db2SqlWriter {
    descriptor: &'static Descriptor,
}

impl Db2SqlWriter {
    pub const fn new() -> Self {
        Self { descriptor: &DB2 }
    }

    pub const fn ibmi() -> Self {
        Self { descriptor: &IBMI }
    }

    fn is_ibmi(&self) -> bool {
        self.dialect() == Dialect::IbmI
    }

    fn write_precision(&self, out: &mut String, precision: Option<u8>) {
        if let Some(p) = precision {
            let _ = write!(out, "({})", p.min(MAX_PRECISION));
        }
    }

    /// `'x'` or the `CURRENT SCHEMA` register when the table is unqualified.
    fn write_schema_value(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        if table.schema.is_empty() {
            out.push_str("CURRENT SCHEMA");
            Ok(())
        } else {
            self.write_value_string(context, out, &table.schema)
        }
    }
}

impl Default for Db2SqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for Db2SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean if self.is_ibmi() => out.push_str("SMALLINT"),
            DataType::Boolean => out.push_str("BOOLEAN"),
            DataType::TinyInt => out.push_str("SMALLINT"),
            DataType::Float => out.push_str("REAL"),
            DataType::Double => out.push_str("DOUBLE"),
            DataType::Varchar(None) => out.push_str("VARCHAR(255)"),
            DataType::Text | DataType::Json => out.push_str("CLOB"),
            DataType::Blob => out.push_str("BLOB"),
            DataType::Uuid => out.push_str("CHAR(36)"),
            DataType::DateTime(precision) => {
                out.push_str("TIMESTAMP");
                self.write_precision(out, *precision);
            }
            DataType::DateTimeTz(precision) => {
                log::warn!(
                    "{} has no time zone aware timestamp, values are stored in UTC",
                    self.dialect()
                );
                out.push_str("TIMESTAMP");
                self.write_precision(out, *precision);
            }
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

    fn write_rename_table(
        &self,
        context: &mut Context,
        out: &mut String,
        from: &TableRef,
        to: &TableRef,
    ) -> Result<()> {
        if !to.schema.is_empty() && to.schema != from.schema {
            return Err(SqlError::invalid_option(
                "rename table",
                self.dialect(),
                "a table cannot be moved to another schema",
            )
            .into());
        }
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("RENAME TABLE ");
        self.write_table_name(&mut context, out, from)?;
        out.push_str(" TO ");
        self.write_identifier_quoted(&mut context, out, &to.name)
    }

    fn write_drop_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &DropSchemaOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.schemas, "schemas", self.dialect());
        self.reject_unsupported_options(
            "drop schema",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_schema),
                ("cascade", options.cascade, supports.schemas.drop_cascade),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlDropSchema);
        out.push_str("DROP SCHEMA ");
        self.write_identifier_quoted(&mut context, out, name)?;
        out.push_str(if options.cascade {
            " CASCADE"
        } else {
            " RESTRICT"
        });
        Ok(())
    }

    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        let skip = options.skip.iter().map(|v| &**v);
        if self.is_ibmi() {
            out.push_str(
                "SELECT DISTINCT SCHEMA_NAME AS schema_name FROM QSYS2.SYSSCHEMAAUTH WHERE GRANTEE = CURRENT USER AND SCHEMA_NAME NOT LIKE 'Q%' AND SCHEMA_NAME NOT LIKE 'SYS%'",
            );
            let excluded = skip.collect::<Vec<&str>>();
            self.write_not_in_strings(context, out, " AND ", "SCHEMA_NAME", &excluded)?;
        } else {
            out.push_str("SELECT SCHEMANAME AS schema_name FROM SYSCAT.SCHEMATA WHERE SCHEMANAME NOT LIKE 'SYS%'");
            let excluded = DB2_TECHNICAL_SCHEMAS
                .iter()
                .copied()
                .chain(skip)
                .collect::<Vec<&str>>();
            self.write_not_in_strings(context, out, " AND ", "SCHEMANAME", &excluded)?;
        }
        out.push_str(" ORDER BY schema_name");
        Ok(())
    }

    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        let schema_column = if self.is_ibmi() {
            out.push_str(
                "SELECT TABLE_NAME AS table_name, TABLE_SCHEMA AS table_schema FROM QSYS2.SYSTABLES WHERE TABLE_TYPE = 'T'",
            );
            "TABLE_SCHEMA"
        } else {
            out.push_str(
                "SELECT TABNAME AS table_name, TRIM(TABSCHEMA) AS table_schema FROM SYSCAT.TABLES WHERE TYPE = 'T'",
            );
            "TABSCHEMA"
        };
        match &options.schema {
            Some(schema) => {
                let _ = write!(out, " AND {schema_column} = ");
                self.write_value_string(context, out, schema)?;
            }
            None if self.is_ibmi() => {
                out.push_str(" AND TABLE_SCHEMA NOT LIKE 'Q%' AND TABLE_SCHEMA NOT LIKE 'SYS%'");
            }
            None => {
                out.push_str(" AND TABSCHEMA NOT LIKE 'SYS%'");
                self.write_not_in_strings(context, out, " AND ", "TABSCHEMA", DB2_TECHNICAL_SCHEMAS)?;
            }
        }
        out.push_str(" ORDER BY table_schema, table_name");
        Ok(())
    }

    fn write_describe_table(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        let order = if self.is_ibmi() {
            out.push_str(
                "SELECT COLUMN_NAME AS column_name, DATA_TYPE AS data_type, IS_NULLABLE AS is_nullable, COLUMN_DEFAULT AS column_default FROM QSYS2.SYSCOLUMNS WHERE TABLE_NAME = ",
            );
            self.write_value_string(context, out, &table.name)?;
            out.push_str(" AND TABLE_SCHEMA = ");
            "ORDINAL_POSITION"
        } else {
            out.push_str(
                "SELECT COLNAME AS column_name, TYPENAME AS data_type, NULLS AS is_nullable, DEFAULT AS column_default FROM SYSCAT.COLUMNS WHERE TABNAME = ",
            );
            self.write_value_string(context, out, &table.name)?;
            out.push_str(" AND TABSCHEMA = ");
            "COLNO"
        };
        self.write_schema_value(context, out, table)?;
        out.push_str(" ORDER BY ");
        out.push_str(order);
        Ok(())
    }

    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        if self.is_ibmi() {
            out.push_str("SELECT TABLE_NAME AS table_name FROM QSYS2.SYSTABLES WHERE TABLE_NAME = ");
            self.write_value_string(context, out, &table.name)?;
            out.push_str(" AND TABLE_SCHEMA = ");
        } else {
            out.push_str("SELECT TABNAME AS table_name FROM SYSCAT.TABLES WHERE TABNAME = ");
            self.write_value_string(context, out, &table.name)?;
            out.push_str(" AND TABSCHEMA = ");
        }
        self.write_schema_value(context, out, table)
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str(if self.is_ibmi() {
            "SELECT CONCAT(OS_VERSION, CONCAT('.', OS_RELEASE)) AS version FROM SYSIBMADM.ENV_SYS_INFO"
        } else {
            "SELECT service_level AS version FROM TABLE (sysproc.env_get_inst_info()) AS A"
        });
        Ok(())
    }

    fn write_set_isolation_level(
        &self,
        _context: &mut Context,
        out: &mut String,
        level: IsolationLevel,
    ) -> Result<()> {
        if self.is_ibmi() {
            out.push_str("SET TRANSACTION ISOLATION LEVEL ");
            out.push_str(match level {
                IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
                IsolationLevel::ReadCommitted => "READ COMMITTED",
                IsolationLevel::RepeatableRead => "REPEATABLE READ",
                IsolationLevel::Serializable => "SERIALIZABLE",
            });
        } else {
            // Uncommitted read, cursor stability, read stability, repeatable read
            out.push_str("SET CURRENT ISOLATION = ");
            out.push_str(match level {
                IsolationLevel::ReadUncommitted => "UR",
                IsolationLevel::ReadCommitted => "CS",
                IsolationLevel::RepeatableRead => "RS",
                IsolationLevel::Serializable => "RR",
            });
        }
        Ok(())
    }
}
