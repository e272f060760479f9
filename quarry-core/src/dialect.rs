use crate::{Error, ParserTable, Result, Value};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Closed set of supported database families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialect {
    MySql,
    MariaDb,
    Postgres,
    CockroachDb,
    Sqlite,
    MsSql,
    Oracle,
    Db2,
    IbmI,
    Snowflake,
    Hana,
}

impl Dialect {
    pub const ALL: [Dialect; 11] = [
        Dialect::MySql,
        Dialect::MariaDb,
        Dialect::Postgres,
        Dialect::CockroachDb,
        Dialect::Sqlite,
        Dialect::MsSql,
        Dialect::Oracle,
        Dialect::Db2,
        Dialect::IbmI,
        Dialect::Snowflake,
        Dialect::Hana,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::MariaDb => "mariadb",
            Dialect::Postgres => "postgres",
            Dialect::CockroachDb => "cockroachdb",
            Dialect::Sqlite => "sqlite",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::Db2 => "db2",
            Dialect::IbmI => "ibmi",
            Dialect::Snowflake => "snowflake",
            Dialect::Hana => "hana",
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Dialect::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::msg(format!("Unknown dialect `{}`", s)))
    }
}

/// How `LIMIT` / `OFFSET` are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// No pagination clause at all.
    Unsupported,
    /// `LIMIT n OFFSET o`. When only an offset is given, `unbounded_limit` is
    /// written as the limit, `None` omits the LIMIT keyword entirely.
    LimitOffset { unbounded_limit: Option<&'static str> },
    /// `OFFSET o ROWS FETCH NEXT n ROWS ONLY`. With `offset_required` a limit
    /// alone is written as `OFFSET 0 ROWS FETCH …`, with `order_required` the
    /// clause needs an ORDER BY in the same statement.
    OffsetFetch {
        offset_required: bool,
        order_required: bool,
    },
}

/// Placeholder syntax for driver bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// Anonymous `?`, values bound in order of appearance.
    Question,
    /// `$1`, `?1`, `:1`: numbered by first appearance, reused when repeated.
    Numbered(char),
    /// `@name`, `:name`: named parameters.
    Named(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanStyle {
    /// `TRUE` / `FALSE`.
    Keyword,
    /// `1` / `0`.
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEscape {
    /// Single quotes doubled, everything else verbatim.
    Standard,
    /// Backslash escapes for quotes, backslashes and control characters.
    Backslash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobStyle {
    /// `X'0AFF'`
    HexString,
    /// `'\x0aff'`
    ByteaHex,
    /// `0x0AFF`
    HexPrefix,
    /// `HEXTORAW('0AFF')`
    HexToRaw,
    /// `BLOB(X'0AFF')`
    BlobFunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampTzStyle {
    /// Written with its offset.
    Offset,
    /// Converted to UTC and written without offset.
    Utc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningStyle {
    Unsupported,
    /// `RETURNING …` at the end of the statement.
    Returning,
    /// `OUTPUT INSERTED.…` / `OUTPUT DELETED.…` inside the statement.
    Output,
    /// `SELECT … FROM FINAL TABLE (…)` / `OLD TABLE` wrapper.
    FinalTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Returning {
    pub style: ReturningStyle,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
}

impl Returning {
    pub const NONE: Returning = Returning {
        style: ReturningStyle::Unsupported,
        insert: false,
        update: false,
        delete: false,
    };
    pub const fn all(style: ReturningStyle) -> Self {
        Returning {
            style,
            insert: true,
            update: true,
            delete: true,
        }
    }
}

/// How `UPDATE` / `DELETE` honour a row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    /// `… LIMIT n` at the end of the statement.
    Limit,
    /// `DELETE TOP(n) FROM …` / `UPDATE TOP(n) …`.
    Top,
    /// `… WHERE pk IN (SELECT pk FROM t WHERE … LIMIT n)`.
    Subquery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStyle {
    Unsupported,
    /// `ON CONFLICT (…) DO UPDATE SET c = EXCLUDED.c`
    OnConflict,
    /// `ON DUPLICATE KEY UPDATE c = VALUES(c)`
    OnDuplicateKey,
    /// `MERGE INTO … USING (…) AS source ON …`
    Merge(MergeSource),
    /// `UPSERT t (…) VALUES (…) WITH PRIMARY KEY`
    UpsertWithPrimaryKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSource {
    /// `USING (VALUES (…)) AS source (a, b)`; `terminated` appends `;`.
    Values { terminated: bool },
    /// `USING (SELECT v AS a) AS source`
    Select,
    /// `USING (SELECT v AS a FROM DUAL) source`
    SelectFromDual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreDuplicates {
    Unsupported,
    /// `INSERT IGNORE INTO`
    InsertIgnore,
    /// `INSERT OR IGNORE INTO`
    InsertOrIgnore,
    /// `… ON CONFLICT DO NOTHING`
    OnConflictDoNothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValuesStyle {
    Unsupported,
    /// `INSERT INTO t DEFAULT VALUES`
    DefaultValues,
    /// `INSERT INTO t VALUES ()`
    EmptyValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSupport {
    pub for_update: bool,
    /// Spelling of the shared lock, `None` when unsupported.
    pub for_share: Option<&'static str>,
    pub skip_locked: bool,
    pub no_wait: bool,
}

impl LockSupport {
    pub const NONE: LockSupport = LockSupport {
        for_update: false,
        for_share: None,
        skip_locked: false,
        no_wait: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStart {
    /// `START TRANSACTION`
    StartTransaction,
    /// `BEGIN TRANSACTION`, optionally typed (`BEGIN IMMEDIATE TRANSACTION`).
    Begin,
    /// `SET TRANSACTION READ WRITE`, the access mode opens the transaction.
    SetTransaction,
    /// Started by the driver, no statement exists.
    Driver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSupport {
    pub start: TransactionStart,
    pub read_only: bool,
    /// Accepts `DEFERRED` / `IMMEDIATE` / `EXCLUSIVE`.
    pub transaction_type: bool,
    /// `COMMIT` / `ROLLBACK` are issued through the driver instead of SQL text.
    pub connection_methods: bool,
    pub savepoints: SavepointStyle,
    pub isolation_levels: IsolationStyle,
}

impl TransactionSupport {
    pub const NONE: TransactionSupport = TransactionSupport {
        start: TransactionStart::Driver,
        read_only: false,
        transaction_type: false,
        connection_methods: true,
        savepoints: SavepointStyle::Unsupported,
        isolation_levels: IsolationStyle::Unsupported,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavepointStyle {
    Unsupported,
    /// `SAVEPOINT x` / `ROLLBACK TO SAVEPOINT x`, with an optional suffix for the creation.
    Standard { suffix: Option<&'static str> },
    /// `SAVE TRANSACTION x` / `ROLLBACK TRANSACTION x`
    SaveTransaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationStyle {
    Unsupported,
    /// `SET TRANSACTION ISOLATION LEVEL …`
    SetTransaction,
    /// `PRAGMA read_uncommitted = …`, only toggles uncommitted reads.
    ReadUncommittedPragma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    Unsupported,
    /// `->`, `->>`, `#>`, `#>>`
    Operators,
    /// `json_extract(x, '$.path')`, unquoted through `json_unquote(…)`.
    Extract,
    /// `x -> '$.path'` quoted, `json_extract(x, '$.path')` unquoted.
    ArrowExtract,
    /// `JSON_VALUE(x, '$.path')`, unquoted only.
    JsonValue,
    /// `GET_PATH(x, 'path')`, unquoted through `::STRING`.
    GetPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Unsupported,
    /// `COMMENT 'x'` inside the definition.
    Inline,
    /// Separate `COMMENT ON COLUMN t.c IS 'x'` statements.
    CommentOn,
    /// `EXEC sp_addextendedproperty …`
    ExtendedProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeColumnStyle {
    Unsupported,
    /// `ALTER COLUMN c TYPE t, ALTER COLUMN c SET NOT NULL, …`
    AlterType,
    /// `ALTER COLUMN c SET DATA TYPE t, …`
    SetDataType,
    /// `MODIFY c <definition>`
    Modify,
    /// `MODIFY (c <definition>)`
    ModifyParenthesized,
    /// `ALTER COLUMN c <type> [NOT] NULL`
    AlterColumn,
    /// `ALTER (c <definition>)`
    AlterParenthesized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStyle {
    /// `ALTER TABLE t RENAME TO u` / `ALTER TABLE t RENAME COLUMN a TO b`
    AlterTable,
    /// `RENAME TABLE t TO u` / `RENAME COLUMN t.a TO b`
    Rename,
    /// `EXEC sp_rename …`
    SpRename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateStyle {
    /// `TRUNCATE t` / `TRUNCATE TABLE t`, with an optional trailing keyword.
    Truncate {
        keyword: &'static str,
        suffix: Option<&'static str>,
    },
    /// `DELETE FROM t`
    DeleteFrom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndexStyle {
    /// `DROP INDEX schema.name`
    Standalone,
    /// `DROP INDEX name ON t`
    OnTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalCreateTable {
    Unsupported,
    /// `CREATE TABLE IF NOT EXISTS`
    IfNotExists,
    /// `IF OBJECT_ID(N'…', N'U') IS NULL CREATE TABLE …`
    ObjectIdGuard,
}

/// Conditional DDL (`IF [NOT] EXISTS`) accepted by each statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalDdl {
    pub create_table: ConditionalCreateTable,
    pub drop_table: bool,
    pub add_column: bool,
    pub drop_column: bool,
    pub create_index: bool,
    pub drop_index: bool,
    pub create_schema: bool,
    pub drop_schema: bool,
    pub drop_constraint: bool,
    pub create_database: bool,
    pub drop_database: bool,
}

impl ConditionalDdl {
    pub const NONE: ConditionalDdl = ConditionalDdl {
        create_table: ConditionalCreateTable::Unsupported,
        drop_table: false,
        add_column: false,
        drop_column: false,
        create_index: false,
        drop_index: false,
        create_schema: false,
        drop_schema: false,
        drop_constraint: false,
        create_database: false,
        drop_database: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSupport {
    pub add: bool,
    pub remove: bool,
    pub check: bool,
    pub default: bool,
    pub foreign_key_on_update: bool,
    pub deferrable: bool,
    /// `SET CONSTRAINTS … DEFERRED|IMMEDIATE`
    pub set_checking: bool,
    pub remove_cascade: bool,
}

impl ConstraintSupport {
    pub const NONE: ConstraintSupport = ConstraintSupport {
        add: false,
        remove: false,
        check: false,
        default: false,
        foreign_key_on_update: false,
        deferrable: false,
        set_checking: false,
        remove_cascade: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSupport {
    pub concurrently: bool,
    pub using: bool,
    pub partial: bool,
    pub include: bool,
    pub index_type: bool,
    pub drop_style: DropIndexStyle,
}

impl IndexSupport {
    pub const NONE: IndexSupport = IndexSupport {
        concurrently: false,
        using: false,
        partial: false,
        include: false,
        index_type: false,
        drop_style: DropIndexStyle::Standalone,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSupport {
    pub schemas: bool,
    pub multi_databases: bool,
    pub authorization: bool,
    pub charset: bool,
    pub collate: bool,
    pub comment: bool,
    pub replace: bool,
    pub drop_cascade: bool,
}

impl SchemaSupport {
    pub const NONE: SchemaSupport = SchemaSupport {
        schemas: false,
        multi_databases: false,
        authorization: false,
        charset: false,
        collate: false,
        comment: false,
        replace: false,
        drop_cascade: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSupport {
    pub drop_cascade: bool,
    pub truncate: TruncateStyle,
    pub truncate_cascade: bool,
    pub truncate_restart_identity: bool,
    /// Keyword introducing a new column (`ADD COLUMN` / `ADD`).
    pub add_column: &'static str,
    pub remove_column_cascade: bool,
    pub change_column: ChangeColumnStyle,
    pub rename_column: RenameStyle,
    pub rename_table: RenameStyle,
    /// `ENGINE=`, `CHARSET=`, `COLLATE` table options.
    pub table_options: bool,
    /// `REFERENCES` honoured inside a column definition, otherwise written as a table level `FOREIGN KEY`.
    pub inline_references: bool,
}

impl TableSupport {
    pub const NONE: TableSupport = TableSupport {
        drop_cascade: false,
        truncate: TruncateStyle::Truncate {
            keyword: "TRUNCATE TABLE",
            suffix: None,
        },
        truncate_cascade: false,
        truncate_restart_identity: false,
        add_column: "ADD COLUMN",
        remove_column_cascade: false,
        change_column: ChangeColumnStyle::Unsupported,
        rename_column: RenameStyle::AlterTable,
        rename_table: RenameStyle::AlterTable,
        table_options: false,
        inline_references: true,
    };
}

/// Auto increment column spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrement {
    pub keyword: &'static str,
    /// The keyword must follow `PRIMARY KEY` (`INTEGER PRIMARY KEY AUTOINCREMENT`).
    pub after_primary_key: bool,
}

/// Capability flags, all default to unsupported.
///
/// Clause builders read these flags instead of comparing dialect names. A
/// dialect that does not set a flag gets an explicit [`crate::SqlError`]
/// rather than silently wrong SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supports {
    pub limit: LimitStyle,
    /// `LIMIT 0` / `FETCH NEXT 0 ROWS` accepted.
    pub zero_limit: bool,
    pub delete_limit: Option<RowLimit>,
    pub update_limit: Option<RowLimit>,
    pub returning: Returning,
    pub upsert: UpsertStyle,
    pub ignore_duplicates: IgnoreDuplicates,
    /// `ON CONFLICT … WHERE` and explicit conflict targets.
    pub conflict_target: bool,
    pub default_values: DefaultValuesStyle,
    /// `DEFAULT` keyword accepted inside multi-row VALUES.
    pub bulk_default: bool,
    /// Rows per INSERT statement before splitting.
    pub max_insert_rows: Option<usize>,
    pub lock: LockSupport,
    pub index_hints: bool,
    pub table_hints: bool,
    pub nulls_ordering: bool,
    pub json: JsonStyle,
    pub comments: CommentStyle,
    pub schemas: SchemaSupport,
    pub tables: TableSupport,
    pub if_exists: ConditionalDdl,
    pub constraints: ConstraintSupport,
    pub indexes: IndexSupport,
    pub transactions: TransactionSupport,
    /// Statement appended to a DELETE to report the affected rows.
    pub affected_rows_suffix: Option<&'static str>,
    /// Postgres `E'…'` strings, honoured by the replacement scanner.
    pub escape_string_constants: bool,
    /// Postgres `$tag$…$tag$` strings, honoured by the replacement scanner.
    pub dollar_quoted_strings: bool,
    /// Statements disabling and enabling foreign key checks.
    pub foreign_key_checks: Option<(&'static str, &'static str)>,
}

impl Supports {
    pub const NONE: Supports = Supports {
        limit: LimitStyle::Unsupported,
        zero_limit: false,
        delete_limit: None,
        update_limit: None,
        returning: Returning::NONE,
        upsert: UpsertStyle::Unsupported,
        ignore_duplicates: IgnoreDuplicates::Unsupported,
        conflict_target: false,
        default_values: DefaultValuesStyle::Unsupported,
        bulk_default: false,
        max_insert_rows: None,
        lock: LockSupport::NONE,
        index_hints: false,
        table_hints: false,
        nulls_ordering: false,
        json: JsonStyle::Unsupported,
        comments: CommentStyle::Unsupported,
        schemas: SchemaSupport::NONE,
        tables: TableSupport::NONE,
        if_exists: ConditionalDdl::NONE,
        constraints: ConstraintSupport::NONE,
        indexes: IndexSupport::NONE,
        transactions: TransactionSupport::NONE,
        affected_rows_suffix: None,
        escape_string_constants: false,
        dollar_quoted_strings: false,
        foreign_key_checks: None,
    };
}

/// Function renamed when written for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionAlias {
    pub name: &'static str,
    pub target: &'static str,
    /// Written without the argument list (`CURRENT_TIMESTAMP`).
    pub bare: bool,
}

/// Immutable description of one database family.
///
/// One `const` instance exists per dialect, shared read only by every
/// compilation. Compiling the same query against the same descriptor always
/// yields the same SQL.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub dialect: Dialect,
    pub identifier_quote_left: char,
    pub identifier_quote_right: char,
    pub string_escape: StringEscape,
    /// Prefix of string literals (`N` for national strings).
    pub string_prefix: &'static str,
    pub boolean: BooleanStyle,
    pub blob: BlobStyle,
    pub timestamp_tz: TimestampTzStyle,
    pub bind: BindStyle,
    pub auto_increment: Option<AutoIncrement>,
    /// Schema treated as "no schema" when qualifying tables.
    pub default_schema: &'static str,
    pub technical_schema_names: &'static [&'static str],
    pub technical_database_names: &'static [&'static str],
    pub function_aliases: &'static [FunctionAlias],
    pub parsers: ParserTable,
    pub supports: Supports,
}

impl Descriptor {
    pub const DEFAULT: Descriptor = Descriptor {
        dialect: Dialect::Postgres,
        identifier_quote_left: '"',
        identifier_quote_right: '"',
        string_escape: StringEscape::Standard,
        string_prefix: "",
        boolean: BooleanStyle::Keyword,
        blob: BlobStyle::HexString,
        timestamp_tz: TimestampTzStyle::Offset,
        bind: BindStyle::Question,
        auto_increment: None,
        default_schema: "",
        technical_schema_names: &[],
        technical_database_names: &[],
        function_aliases: &[],
        parsers: ParserTable(&[]),
        supports: Supports::NONE,
    };

    pub fn technical_schema_names(&self) -> &'static [&'static str] {
        self.technical_schema_names
    }

    pub fn technical_database_names(&self) -> &'static [&'static str] {
        self.technical_database_names
    }

    pub fn is_technical_schema(&self, name: &str) -> bool {
        self.technical_schema_names.iter().any(|v| *v == name)
    }

    /// Removes the technical schemas, keeping the order of `names`.
    pub fn filter_technical_schemas<I, S>(&self, names: I) -> Vec<S>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|v| !self.is_technical_schema(v.as_ref()))
            .collect()
    }

    /// Removes the technical databases, keeping the order of `names`.
    pub fn filter_technical_databases<I, S>(&self, names: I) -> Vec<S>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|v| {
                !self
                    .technical_database_names
                    .iter()
                    .any(|t| *t == v.as_ref())
            })
            .collect()
    }

    pub fn can_backslash_escape(&self) -> bool {
        self.string_escape == StringEscape::Backslash
    }

    pub fn function_alias(&self, name: &str) -> Option<&'static FunctionAlias> {
        self.function_aliases
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Decodes the textual driver output of a column declared as `database_type`.
    pub fn parse_value(&self, database_type: &str, text: Option<&str>) -> Result<Value> {
        self.parsers.parse(database_type, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
        assert_eq!("MSSQL".parse::<Dialect>().unwrap(), Dialect::MsSql);
        assert!("access".parse::<Dialect>().is_err());
    }

    #[test]
    fn technical_names_are_filtered_in_order() {
        let descriptor = Descriptor {
            technical_schema_names: &["sys", "information_schema"],
            technical_database_names: &["master"],
            ..Descriptor::DEFAULT
        };
        assert_eq!(
            descriptor.filter_technical_schemas(["sales", "sys", "audit", "information_schema"]),
            ["sales", "audit"]
        );
        assert_eq!(
            descriptor.filter_technical_databases(vec!["master".to_string(), "shop".to_string()]),
            ["shop"]
        );
    }
}
