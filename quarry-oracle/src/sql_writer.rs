use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConstraintSupport, CreateSchemaOptions, DataType, Descriptor, Dialect, DropIndexStyle,
    DropSchemaOptions, DropTableOptions, FunctionAlias, IndexSupport, IsolationLevel,
    IsolationStyle, JsonPath, JsonStyle, LimitStyle, ListSchemasOptions, ListTablesOptions,
    LockSupport, MergeSource, ParserTable, Result, RowLimit, SavepointStyle, SchemaSupport,
    SqlError, StringEscape, Supports, TableRef, TableSupport, TimestampTzStyle, TransactionStart,
    TransactionSupport, UpsertStyle, ValueParser, ensure_supported,
    writer::{Context, Fragment, SqlWriter},
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Fractional digits kept by `TIMESTAMP`.
const MAX_PRECISION: u8 = 9;

const TECHNICAL_SCHEMAS: &[&str] = &[
    "ANONYMOUS",
    "APPQOSSYS",
    "AUDSYS",
    "CTXSYS",
    "DBSFWUSER",
    "DBSNMP",
    "DIP",
    "GSMADMIN_INTERNAL",
    "GSMCATUSER",
    "GSMUSER",
    "LBACSYS",
    "MDSYS",
    "OJVMSYS",
    "OLAPSYS",
    "ORDDATA",
    "ORDSYS",
    "OUTLN",
    "REMOTE_SCHEDULER_AGENT",
    "SYS",
    "SYSTEM",
    "WMSYS",
    "XDB",
];

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::OffsetFetch {
        offset_required: false,
        order_required: false,
    },
    zero_limit: true,
    delete_limit: Some(RowLimit::Subquery),
    update_limit: Some(RowLimit::Subquery),
    upsert: UpsertStyle::Merge(MergeSource::SelectFromDual),
    bulk_default: true,
    max_insert_rows: Some(1),
    lock: LockSupport {
        for_update: true,
        for_share: None,
        skip_locked: true,
        no_wait: true,
    },
    nulls_ordering: true,
    json: JsonStyle::JsonValue,
    comments: CommentStyle::CommentOn,
    schemas: SchemaSupport {
        schemas: true,
        drop_cascade: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        drop_cascade: true,
        add_column: "ADD",
        change_column: ChangeColumnStyle::ModifyParenthesized,
        ..TableSupport::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        deferrable: true,
        set_checking: true,
        remove_cascade: true,
        ..ConstraintSupport::NONE
    },
    indexes: IndexSupport {
        index_type: true,
        drop_style: DropIndexStyle::Standalone,
        ..IndexSupport::NONE
    },
    transactions: TransactionSupport {
        start: TransactionStart::SetTransaction,
        read_only: true,
        transaction_type: false,
        connection_methods: false,
        savepoints: SavepointStyle::Standard { suffix: None },
        isolation_levels: IsolationStyle::SetTransaction,
    },
    ..Supports::NONE
};

pub const ORACLE: Descriptor = Descriptor {
    dialect: Dialect::Oracle,
    identifier_quote_left: '"',
    identifier_quote_right: '"',
    string_escape: StringEscape::Standard,
    string_prefix: "",
    boolean: BooleanStyle::Numeric,
    blob: BlobStyle::HexToRaw,
    timestamp_tz: TimestampTzStyle::Offset,
    bind: BindStyle::Numbered(':'),
    auto_increment: Some(AutoIncrement {
        keyword: "GENERATED BY DEFAULT ON NULL AS IDENTITY",
        after_primary_key: false,
    }),
    default_schema: "",
    technical_schema_names: TECHNICAL_SCHEMAS,
    technical_database_names: &[],
    function_aliases: &[
        FunctionAlias {
            name: "NOW",
            target: "SYSTIMESTAMP",
            bare: true,
        },
        FunctionAlias {
            name: "RANDOM",
            target: "DBMS_RANDOM.VALUE",
            bare: true,
        },
    ],
    parsers: PARSERS,
    supports: SUPPORTS,
};

const PARSERS: ParserTable = ParserTable(&[
    ("NUMBER", ValueParser::Decimal),
    ("INTEGER", ValueParser::BigInteger),
    ("BINARY_FLOAT", ValueParser::Float),
    ("BINARY_DOUBLE", ValueParser::Float),
    ("FLOAT", ValueParser::Float),
    ("CHAR", ValueParser::Text),
    ("NCHAR", ValueParser::Text),
    ("VARCHAR2", ValueParser::Text),
    ("NVARCHAR2", ValueParser::Text),
    ("CLOB", ValueParser::Text),
    ("NCLOB", ValueParser::Text),
    ("BLOB", ValueParser::Blob),
    ("RAW", ValueParser::Blob),
    ("DATE", ValueParser::Timestamp),
    ("TIMESTAMP", ValueParser::Timestamp),
    ("TIMESTAMP WITH TIME ZONE", ValueParser::TimestampWithTimezone),
    ("JSON", ValueParser::Json),
]);

#[derive(Default)]
pub struct OracleSqlWriter {}

impl OracleSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }

    fn write_precision(&self, out: &mut String, precision: Option<u8>) {
        if let Some(p) = precision {
            let _ = write!(out, "({})", p.min(MAX_PRECISION));
        }
    }

    /// Date and time text followed by its `TO_TIMESTAMP` format mask.
    fn write_timestamp_text(&self, out: &mut String, date: &Date, time: &Time) {
        self.write_date_text(out, date);
        out.push(' ');
        self.write_time_text(out, time);
    }

    fn timestamp_format(time: &Time) -> &'static str {
        if time.nanosecond() == 0 {
            "YYYY-MM-DD HH24:MI:SS"
        } else {
            "YYYY-MM-DD HH24:MI:SS.FF"
        }
    }

    /// `owner = USER` or `owner = 'X'`.
    fn write_owner_filter(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(" AND owner = ");
        if table.schema.is_empty() {
            out.push_str("USER");
            Ok(())
        } else {
            self.write_value_string(context, out, &table.schema)
        }
    }
}

impl SqlWriter for OracleSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        &ORACLE
    }

    fn row_identifier(&self) -> Option<&'static str> {
        Some("ROWID")
    }

    fn write_table_alias(&self, context: &mut Context, out: &mut String, alias: &str) -> Result<()> {
        // AS is rejected in front of a table alias
        out.push(' ');
        self.write_identifier_quoted(context, out, alias)
    }

    fn write_value_date(&self, _context: &mut Context, out: &mut String, value: &Date) -> Result<()> {
        out.push_str("TO_DATE('");
        self.write_date_text(out, value);
        out.push_str("', 'YYYY-MM-DD')");
        Ok(())
    }

    fn write_value_timestamp(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) -> Result<()> {
        out.push_str("TO_TIMESTAMP('");
        self.write_timestamp_text(out, &value.date(), &value.time());
        let _ = write!(out, "', '{}')", Self::timestamp_format(&value.time()));
        Ok(())
    }

    fn write_value_timestamptz(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) -> Result<()> {
        out.push_str("TO_TIMESTAMP_TZ('");
        self.write_timestamp_text(out, &value.date(), &value.time());
        out.push(' ');
        self.write_offset_text(out, &value.offset());
        let _ = write!(out, "', '{} TZH:TZM')", Self::timestamp_format(&value.time()));
        Ok(())
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean => out.push_str("NUMBER(1)"),
            DataType::TinyInt => out.push_str("NUMBER(3)"),
            DataType::SmallInt => out.push_str("NUMBER(5)"),
            DataType::Integer => out.push_str("INTEGER"),
            DataType::BigInt => out.push_str("NUMBER(19)"),
            DataType::Float => out.push_str("BINARY_FLOAT"),
            DataType::Double => out.push_str("BINARY_DOUBLE"),
            DataType::Decimal(None) => out.push_str("NUMBER"),
            DataType::Decimal(Some((p, s))) => {
                let _ = write!(out, "NUMBER({p},{s})");
            }
            DataType::Varchar(Some(n)) => {
                let _ = write!(out, "NVARCHAR2({n})");
            }
            DataType::Varchar(None) => out.push_str("NVARCHAR2(255)"),
            DataType::Text => out.push_str("CLOB"),
            DataType::Blob => out.push_str("BLOB"),
            DataType::Uuid => out.push_str("VARCHAR2(36)"),
            DataType::Enum(..) => out.push_str("VARCHAR2(512)"),
            DataType::DateTime(precision) => {
                out.push_str("TIMESTAMP");
                self.write_precision(out, *precision);
            }
            DataType::DateTimeTz(precision) => {
                out.push_str("TIMESTAMP");
                self.write_precision(out, *precision);
                out.push_str(" WITH TIME ZONE");
            }
            DataType::Json => out.push_str("JSON"),
            DataType::Time => {
                return Err(SqlError::feature_not_supported("time columns", self.dialect()).into());
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

    fn write_expression_json_path(&self, context: &mut Context, out: &mut String, value: &JsonPath) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::JsonPath);
        out.push_str(if value.unquote {
            "JSON_VALUE("
        } else {
            "JSON_QUERY("
        });
        self.write_expression(&mut context, out, &value.base)?;
        out.push_str(", ");
        self.write_value_string(&mut context, out, &value.dollar_notation())?;
        out.push(')');
        Ok(())
    }

    fn write_drop_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &DropTableOptions,
    ) -> Result<()> {
        self.reject_unsupported_options(
            "drop table",
            &[(
                "if_exists",
                options.if_exists,
                self.descriptor().supports.if_exists.drop_table,
            )],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        self.write_table_name(&mut context, out, table)?;
        if options.cascade {
            out.push_str(" CASCADE CONSTRAINTS");
        }
        Ok(())
    }

    fn write_create_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateSchemaOptions,
    ) -> Result<()> {
        ensure_supported!(
            self.descriptor().supports.schemas.schemas,
            "schemas",
            self.dialect()
        );
        // A schema is the user owning it
        self.reject_unsupported_options(
            "create schema",
            &[
                ("if_not_exists", options.if_not_exists, false),
                ("authorization", options.authorization.is_some(), false),
                ("charset", options.charset.is_some(), false),
                ("collate", options.collate.is_some(), false),
                ("comment", options.comment.is_some(), false),
                ("replace", options.replace, false),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlCreateSchema);
        out.push_str("CREATE USER ");
        self.write_identifier_quoted(&mut context, out, name)?;
        out.push_str(" NO AUTHENTICATION");
        Ok(())
    }

    fn write_drop_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &DropSchemaOptions,
    ) -> Result<()> {
        ensure_supported!(
            self.descriptor().supports.schemas.schemas,
            "schemas",
            self.dialect()
        );
        self.reject_unsupported_options("drop schema", &[("if_exists", options.if_exists, false)])?;
        let mut context = context.switch_fragment(Fragment::SqlDropSchema);
        out.push_str("DROP USER ");
        self.write_identifier_quoted(&mut context, out, name)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        let excluded = TECHNICAL_SCHEMAS
            .iter()
            .copied()
            .chain(options.skip.iter().map(|v| &**v))
            .collect::<Vec<&str>>();
        out.push_str("SELECT username AS schema_name FROM all_users WHERE oracle_maintained = 'N'");
        self.write_not_in_strings(context, out, " AND ", "username", &excluded)?;
        out.push_str(" ORDER BY username");
        Ok(())
    }

    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        out.push_str("SELECT table_name, owner AS table_schema FROM all_tables WHERE ");
        match &options.schema {
            Some(schema) => {
                out.push_str("owner = ");
                self.write_value_string(context, out, schema)?;
            }
            None => {
                out.push_str("owner IN (SELECT username FROM all_users WHERE oracle_maintained = 'N')");
            }
        }
        out.push_str(" ORDER BY table_schema, table_name");
        Ok(())
    }

    fn write_describe_table(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(
            "SELECT column_name, data_type, nullable AS is_nullable, data_default AS column_default FROM all_tab_columns WHERE table_name = ",
        );
        self.write_value_string(context, out, &table.name)?;
        self.write_owner_filter(context, out, table)?;
        out.push_str(" ORDER BY column_id");
        Ok(())
    }

    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str("SELECT table_name FROM all_tables WHERE table_name = ");
        self.write_value_string(context, out, &table.name)?;
        self.write_owner_filter(context, out, table)
    }

    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT version_full AS version FROM product_component_version");
        Ok(())
    }

    fn write_set_isolation_level(
        &self,
        _context: &mut Context,
        out: &mut String,
        level: IsolationLevel,
    ) -> Result<()> {
        let name = match level {
            IsolationLevel::ReadCommitted | IsolationLevel::Serializable => None,
            IsolationLevel::ReadUncommitted => Some("READ COMMITTED"),
            IsolationLevel::RepeatableRead => Some("SERIALIZABLE"),
        };
        if let Some(name) = name {
            log::debug!("Isolation level {level:?} is raised to {name}");
        }
        out.push_str("SET TRANSACTION ISOLATION LEVEL ");
        out.push_str(match level {
            IsolationLevel::ReadUncommitted | IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead | IsolationLevel::Serializable => "SERIALIZABLE",
        });
        Ok(())
    }
}
