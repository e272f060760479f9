use crate::{
    Action, BindParams, ColumnDef, Expr, Join, Order, Ordered, Replacements, TableRef,
};
use std::borrow::Cow;

/// Attribute name to value pairs of one INSERT / UPDATE row.
pub type Row = Vec<(Cow<'static, str>, Expr)>;

pub fn row<I, K, V>(values: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Cow<'static, str>>,
    V: Into<Expr>,
{
    values
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// LIMIT / OFFSET amount, a constant or an arbitrary expression.
#[derive(Debug, Clone, PartialEq)]
pub enum RowCount {
    Count(u64),
    Expr(Expr),
}

impl RowCount {
    pub fn is_zero(&self) -> bool {
        *self == RowCount::Count(0)
    }
}

impl From<u64> for RowCount {
    fn from(value: u64) -> Self {
        RowCount::Count(value)
    }
}

impl From<Expr> for RowCount {
    fn from(value: Expr) -> Self {
        RowCount::Expr(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    Update,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockWait {
    SkipLocked,
    NoWait,
}

/// Row locking clause (`FOR UPDATE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub strength: LockStrength,
    /// Tables the lock applies to, empty for all.
    pub of: Vec<Cow<'static, str>>,
    pub wait: Option<LockWait>,
}

impl Lock {
    pub fn update() -> Self {
        Self {
            strength: LockStrength::Update,
            of: Vec::new(),
            wait: None,
        }
    }

    pub fn share() -> Self {
        Self {
            strength: LockStrength::Share,
            of: Vec::new(),
            wait: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintType {
    Use,
    Force,
    Ignore,
}

/// `USE INDEX (…)` / `FORCE INDEX (…)` / `IGNORE INDEX (…)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHint {
    pub hint: IndexHintType,
    pub indexes: Vec<Cow<'static, str>>,
}

/// `WITH (NOLOCK)` style table hint, written unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHint(pub Cow<'static, str>);

/// Columns returned by a data modification.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum ReturnValues {
    #[default]
    None,
    All,
    Columns(Vec<Cow<'static, str>>),
}

impl ReturnValues {
    pub fn is_none(&self) -> bool {
        *self == ReturnValues::None
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct SelectOptions {
    pub distinct: bool,
    /// Selected expressions, empty for `*`.
    pub attributes: Vec<Expr>,
    pub joins: Vec<Join>,
    pub condition: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order: Vec<Ordered>,
    pub limit: Option<RowCount>,
    pub offset: Option<RowCount>,
    pub lock: Option<Lock>,
    pub index_hints: Vec<IndexHint>,
    pub table_hints: Vec<TableHint>,
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

/// `ON CONFLICT` handling of an INSERT.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct OnConflict {
    /// Conflict target, the primary key of the model when empty.
    pub conflict_fields: Vec<Cow<'static, str>>,
    /// Attributes overwritten on conflict, nothing is updated when empty.
    pub update_fields: Vec<Cow<'static, str>>,
    /// Partial index predicate of the conflict target.
    pub conflict_where: Option<Expr>,
    /// Filter on the rows being updated.
    pub update_where: Option<Expr>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct InsertOptions {
    pub ignore_duplicates: bool,
    pub on_conflict: Option<OnConflict>,
    pub returning: ReturnValues,
    /// Send literal values as bind parameters.
    pub bind_values: bool,
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    pub limit: Option<u64>,
    pub returning: ReturnValues,
    pub bind_values: bool,
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct UpsertOptions {
    /// Conflict target, the primary key of the model when empty.
    pub conflict_fields: Vec<Cow<'static, str>>,
    /// Attributes updated on conflict, every inserted non key attribute when empty.
    pub update_fields: Vec<Cow<'static, str>>,
    pub returning: ReturnValues,
    pub bind_values: bool,
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct BulkDeleteOptions {
    pub limit: Option<u64>,
    pub returning: ReturnValues,
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct RawQueryOptions {
    pub replacements: Option<Replacements>,
    pub bind: Option<BindParams>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub name: Option<Cow<'static, str>>,
    pub fields: Vec<Cow<'static, str>>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CreateTableOptions {
    pub if_not_exists: bool,
    pub unique_keys: Vec<UniqueKey>,
    pub comment: Option<Cow<'static, str>>,
    pub engine: Option<Cow<'static, str>>,
    pub charset: Option<Cow<'static, str>>,
    pub collate: Option<Cow<'static, str>>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTableOptions {
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateTableOptions {
    pub cascade: bool,
    pub restart_identity: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddColumnOptions {
    pub if_not_exists: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveColumnOptions {
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexField {
    pub name: Cow<'static, str>,
    pub order: Option<Order>,
    pub collate: Option<Cow<'static, str>>,
    /// Prefix length (`name(10)`).
    pub length: Option<u32>,
}

impl From<&'static str> for IndexField {
    fn from(value: &'static str) -> Self {
        IndexField {
            name: value.into(),
            order: None,
            collate: None,
            length: None,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct IndexOptions {
    /// Derived from the table and the fields when absent.
    pub name: Option<Cow<'static, str>>,
    pub fields: Vec<IndexField>,
    pub unique: bool,
    pub concurrently: bool,
    /// Index method (`USING GIN`).
    pub using: Option<Cow<'static, str>>,
    /// Index kind keyword (`FULLTEXT`, `SPATIAL`).
    pub index_type: Option<Cow<'static, str>>,
    /// Partial index predicate.
    pub condition: Option<Expr>,
    pub include: Vec<Cow<'static, str>>,
    pub if_not_exists: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveIndexOptions {
    pub if_exists: bool,
    pub concurrently: bool,
    pub cascade: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferrable {
    InitiallyDeferred,
    InitiallyImmediate,
    NotDeferrable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    Check(Expr),
    Unique,
    PrimaryKey,
    Default(Expr),
    ForeignKey {
        references: TableRef,
        fields: Vec<Cow<'static, str>>,
        on_delete: Option<Action>,
        on_update: Option<Action>,
    },
}

/// Table constraint added through ALTER TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Derived from the table, the fields and the kind when absent.
    pub name: Option<Cow<'static, str>>,
    pub kind: ConstraintKind,
    pub fields: Vec<Cow<'static, str>>,
    pub deferrable: Option<Deferrable>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveConstraintOptions {
    pub if_exists: bool,
    pub cascade: bool,
}

/// `SET CONSTRAINTS` target, all deferrable constraints when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintChecking {
    Deferred(Vec<Cow<'static, str>>),
    Immediate(Vec<Cow<'static, str>>),
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CreateSchemaOptions {
    pub if_not_exists: bool,
    pub authorization: Option<Cow<'static, str>>,
    pub charset: Option<Cow<'static, str>>,
    pub collate: Option<Cow<'static, str>>,
    pub comment: Option<Cow<'static, str>>,
    pub replace: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSchemaOptions {
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ListSchemasOptions {
    /// Additional schemas excluded from the listing.
    pub skip: Vec<Cow<'static, str>>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ListTablesOptions {
    /// Restricts the listing to one schema.
    pub schema: Option<Cow<'static, str>>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CreateDatabaseOptions {
    pub if_not_exists: bool,
    pub charset: Option<Cow<'static, str>>,
    pub collate: Option<Cow<'static, str>>,
    pub ctype: Option<Cow<'static, str>>,
    pub template: Option<Cow<'static, str>>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropDatabaseOptions {
    pub if_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deferred,
    Immediate,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTransactionOptions {
    pub read_only: bool,
    pub transaction_type: Option<TransactionType>,
}

/// One statement to compile, the table plus the options of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select {
        table: TableRef,
        options: SelectOptions,
    },
    Insert {
        table: TableRef,
        rows: Vec<Row>,
        options: InsertOptions,
    },
    Update {
        table: TableRef,
        values: Row,
        condition: Option<Expr>,
        options: UpdateOptions,
    },
    Increment {
        table: TableRef,
        increments: Row,
        extra: Row,
        condition: Option<Expr>,
        options: UpdateOptions,
    },
    Upsert {
        table: TableRef,
        values: Row,
        options: UpsertOptions,
    },
    BulkDelete {
        table: TableRef,
        condition: Option<Expr>,
        options: BulkDeleteOptions,
    },
    CreateTable {
        table: TableRef,
        columns: Vec<ColumnDef>,
        options: CreateTableOptions,
    },
    DropTable {
        table: TableRef,
        options: DropTableOptions,
    },
    TruncateTable {
        table: TableRef,
        options: TruncateTableOptions,
    },
    RenameTable {
        from: TableRef,
        to: TableRef,
    },
    AddColumn {
        table: TableRef,
        column: ColumnDef,
        options: AddColumnOptions,
    },
    ChangeColumn {
        table: TableRef,
        column: ColumnDef,
    },
    RemoveColumn {
        table: TableRef,
        column: Cow<'static, str>,
        options: RemoveColumnOptions,
    },
    RenameColumn {
        table: TableRef,
        from: Cow<'static, str>,
        to: Cow<'static, str>,
    },
    CreateIndex {
        table: TableRef,
        options: IndexOptions,
    },
    RemoveIndex {
        table: TableRef,
        name: Cow<'static, str>,
        options: RemoveIndexOptions,
    },
    AddConstraint {
        table: TableRef,
        constraint: Constraint,
    },
    RemoveConstraint {
        table: TableRef,
        name: Cow<'static, str>,
        options: RemoveConstraintOptions,
    },
    Raw {
        sql: Cow<'static, str>,
        options: RawQueryOptions,
    },
}

impl Query {
    /// Statement kind, used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Select { .. } => "select",
            Query::Insert { .. } => "insert",
            Query::Update { .. } => "update",
            Query::Increment { .. } => "increment",
            Query::Upsert { .. } => "upsert",
            Query::BulkDelete { .. } => "bulk delete",
            Query::CreateTable { .. } => "create table",
            Query::DropTable { .. } => "drop table",
            Query::TruncateTable { .. } => "truncate table",
            Query::RenameTable { .. } => "rename table",
            Query::AddColumn { .. } => "add column",
            Query::ChangeColumn { .. } => "change column",
            Query::RemoveColumn { .. } => "remove column",
            Query::RenameColumn { .. } => "rename column",
            Query::CreateIndex { .. } => "create index",
            Query::RemoveIndex { .. } => "remove index",
            Query::AddConstraint { .. } => "add constraint",
            Query::RemoveConstraint { .. } => "remove constraint",
            Query::Raw { .. } => "raw query",
        }
    }
}
