use quarry_core::{
    AutoIncrement, BindStyle, BlobStyle, BooleanStyle, ChangeColumnStyle, CommentStyle,
    ConditionalCreateTable, ConditionalDdl, ConstraintSupport, DataType, DefaultValuesStyle,
    Descriptor, Dialect, DropIndexStyle, Expr, FunctionAlias, IgnoreDuplicates, IndexSupport,
    IsolationStyle, JsonStyle, LimitStyle, LockSupport, ParserTable, RenameStyle, Result,
    Returning, ReturningStyle, RowLimit, SavepointStyle, SchemaSupport, SqlError, StringEscape,
    Supports, TableRef, TableSupport, TimestampTzStyle, TransactionStart, TransactionSupport,
    UpsertStyle, ValueParser, try_separated_by,
    writer::{Context, SqlWriter},
};
use std::fmt::Write;

const TECHNICAL_SCHEMAS: &[&str] = &[
    "MYSQL",
    "INFORMATION_SCHEMA",
    "PERFORMANCE_SCHEMA",
    "SYS",
    "mysql",
    "information_schema",
    "performance_schema",
    "sys",
];

const SUPPORTS: Supports = Supports {
    limit: LimitStyle::LimitOffset {
        unbounded_limit: Some("18446744073709551615"),
    },
    zero_limit: true,
    delete_limit: Some(RowLimit::Limit),
    update_limit: Some(RowLimit::Limit),
    upsert: UpsertStyle::OnDuplicateKey,
    ignore_duplicates: IgnoreDuplicates::InsertIgnore,
    default_values: DefaultValuesStyle::EmptyValues,
    bulk_default: true,
    lock: LockSupport {
        for_update: true,
        for_share: Some("LOCK IN SHARE MODE"),
        skip_locked: true,
        no_wait: true,
    },
    index_hints: true,
    json: JsonStyle::Extract,
    comments: CommentStyle::Inline,
    schemas: SchemaSupport {
        schemas: true,
        multi_databases: true,
        charset: true,
        collate: true,
        ..SchemaSupport::NONE
    },
    tables: TableSupport {
        add_column: "ADD",
        change_column: ChangeColumnStyle::Modify,
        rename_table: RenameStyle::Rename,
        table_options: true,
        inline_references: false,
        ..TableSupport::NONE
    },
    if_exists: ConditionalDdl {
        create_table: ConditionalCreateTable::IfNotExists,
        drop_table: true,
        create_schema: true,
        drop_schema: true,
        create_database: true,
        drop_database: true,
        ..ConditionalDdl::NONE
    },
    constraints: ConstraintSupport {
        add: true,
        remove: true,
        check: true,
        foreign_key_on_update: true,
        ..ConstraintSupport::NONE
    },
    indexes: IndexSupport {
        index_type: true,
        drop_style: DropIndexStyle::OnTable,
        ..IndexSupport::NONE
    },
    transactions: TransactionSupport {
        start: TransactionStart::StartTransaction,
        read_only: true,
        transaction_type: false,
        connection_methods: false,
        savepoints: SavepointStyle::Standard { suffix: None },
        isolation_levels: IsolationStyle::SetTransaction,
    },
    foreign_key_checks: Some(("SET FOREIGN_KEY_CHECKS = 0", "SET FOREIGN_KEY_CHECKS = 1")),
    ..Supports::NONE
};

pub const MYSQL: Descriptor = Descriptor {
    dialect: Dialect::MySql,
    identifier_quote_left: '`',
    identifier_quote_right: '`',
    string_escape: StringEscape::Backslash,
    string_prefix: "",
    boolean: BooleanStyle::Keyword,
    blob: BlobStyle::HexString,
    timestamp_tz: TimestampTzStyle::Utc,
    bind: BindStyle::Question,
    auto_increment: Some(AutoIncrement {
        keyword: "AUTO_INCREMENT",
        after_primary_key: false,
    }),
    default_schema: "",
    technical_schema_names: TECHNICAL_SCHEMAS,
    technical_database_names: TECHNICAL_SCHEMAS,
    function_aliases: &[FunctionAlias {
        name: "RANDOM",
        target: "RAND",
        bare: false,
    }],
    parsers: PARSERS,
    supports: SUPPORTS,
};

/// MariaDB speaks the MySQL grammar, plus RETURNING and more conditional DDL.
pub const MARIADB: Descriptor = Descriptor {
    dialect: Dialect::MariaDb,
    supports: Supports {
        returning: Returning {
            style: ReturningStyle::Returning,
            insert: true,
            update: false,
            delete: true,
        },
        if_exists: ConditionalDdl {
            add_column: true,
            drop_column: true,
            create_index: true,
            drop_index: true,
            drop_constraint: true,
            ..SUPPORTS.if_exists
        },
        schemas: SchemaSupport {
            comment: true,
            replace: true,
            ..SUPPORTS.schemas
        },
        ..SUPPORTS
    },
    ..MYSQL
};

const PARSERS: ParserTable = ParserTable(&[
    ("BOOLEAN", ValueParser::Boolean),
    ("BOOL", ValueParser::Boolean),
    ("TINYINT", ValueParser::Integer),
    ("SMALLINT", ValueParser::Integer),
    ("MEDIUMINT", ValueParser::Integer),
    ("INT", ValueParser::Integer),
    ("INTEGER", ValueParser::Integer),
    ("BIGINT", ValueParser::BigInteger),
    ("FLOAT", ValueParser::Float),
    ("DOUBLE", ValueParser::Float),
    ("DECIMAL", ValueParser::Decimal),
    ("NUMERIC", ValueParser::Decimal),
    ("CHAR", ValueParser::Text),
    ("VARCHAR", ValueParser::Text),
    ("TEXT", ValueParser::Text),
    ("LONGTEXT", ValueParser::Text),
    ("ENUM", ValueParser::Text),
    ("BLOB", ValueParser::Blob),
    ("LONGBLOB", ValueParser::Blob),
    ("VARBINARY", ValueParser::Blob),
    ("DATE", ValueParser::Date),
    ("TIME", ValueParser::Time),
    ("DATETIME", ValueParser::Timestamp),
    ("TIMESTAMP", ValueParser::Timestamp),
    ("UUID", ValueParser::Uuid),
    ("JSON", ValueParser::Json),
]);

/// Writer shared by MySQL and MariaDB, the descriptor selects the flavor.
pub struct MySqlSqlWriter {
    descriptor: &'static Descriptor,
}

impl MySqlSqlWriter {
    pub const fn new() -> Self {
        Self {
            descriptor: &MYSQL,
        }
    }

    pub const fn mariadb() -> Self {
        Self {
            descriptor: &MARIADB,
        }
    }
}

impl Default for MySqlSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    fn write_data_type(&self, context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean => out.push_str("TINYINT(1)"),
            DataType::Varchar(None) => out.push_str("VARCHAR(255)"),
            DataType::Blob => out.push_str("LONGBLOB"),
            DataType::DateTime(None) => out.push_str("DATETIME"),
            DataType::DateTime(Some(p)) => {
                let _ = write!(out, "DATETIME({p})");
            }
            DataType::DateTimeTz(precision) => {
                log::warn!("DATETIME keeps no offset, timestamps with time zone are stored in UTC");
                out.push_str("DATETIME");
                if let Some(p) = precision {
                    let _ = write!(out, "({p})");
                }
            }
            DataType::Uuid if self.dialect() == Dialect::MariaDb => out.push_str("UUID"),
            DataType::Uuid => out.push_str("CHAR(36)"),
            DataType::Enum(values) => {
                out.push_str("ENUM(");
                try_separated_by(
                    out,
                    values,
                    |out, v| self.write_value_string(context, out, v),
                    ", ",
                )?;
                out.push(')');
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

    fn write_cast_type(&self, context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Boolean
            | DataType::TinyInt
            | DataType::SmallInt
            | DataType::Integer
            | DataType::BigInt => out.push_str("SIGNED"),
            DataType::Char(..)
            | DataType::Varchar(..)
            | DataType::Text
            | DataType::Uuid
            | DataType::Enum(..) => out.push_str("CHAR"),
            DataType::Blob => out.push_str("BINARY"),
            _ => self.write_data_type(context, out, value)?,
        }
        Ok(())
    }

    fn write_expression_concat(&self, context: &mut Context, out: &mut String, lhs: &Expr, rhs: &Expr) -> Result<()> {
        // `||` is the logical OR unless PIPES_AS_CONCAT is set
        out.push_str("CONCAT(");
        self.write_expression(context, out, lhs)?;
        out.push_str(", ");
        self.write_expression(context, out, rhs)?;
        out.push(')');
        Ok(())
    }

    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(
            "SELECT table_name FROM information_schema.tables WHERE table_type = 'BASE TABLE' AND table_name = ",
        );
        self.write_value_string(context, out, &table.name)?;
        out.push_str(" AND table_schema = ");
        if table.schema.is_empty() {
            out.push_str("DATABASE()");
        } else {
            self.write_value_string(context, out, &table.schema)?;
        }
        Ok(())
    }

    fn write_list_databases(&self, context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT schema_name AS name FROM information_schema.schemata");
        self.write_not_in_strings(
            context,
            out,
            " WHERE ",
            "schema_name",
            self.descriptor().technical_database_names(),
        )?;
        out.push_str(" ORDER BY schema_name");
        Ok(())
    }
}
