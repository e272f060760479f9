use crate::{DataType, Expr, TableRef};
use std::borrow::Cow;

/// Reference to a column, optionally qualified by a table name or alias.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Attribute or column name.
    pub name: Cow<'static, str>,
    /// Table name or alias (may be empty).
    pub table: Cow<'static, str>,
}

impl ColumnRef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            table: Cow::Borrowed(""),
        }
    }

    pub fn qualified(
        table: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
        }
    }
}

/// Referential action for foreign key updates / deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// Foreign key target of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct References {
    pub table: TableRef,
    pub column: Cow<'static, str>,
    pub on_delete: Option<Action>,
    pub on_update: Option<Action>,
}

/// Column definition used by CREATE TABLE, ADD COLUMN and CHANGE COLUMN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: Cow<'static, str>,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<Expr>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub references: Option<References>,
    pub comment: Cow<'static, str>,
}

impl ColumnDef {
    pub fn new(name: impl Into<Cow<'static, str>>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            auto_increment: false,
            unique: false,
            references: None,
            comment: Cow::Borrowed(""),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Expr>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn references(
        mut self,
        table: impl Into<TableRef>,
        column: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.references = Some(References {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        });
        self
    }

    /// Applies to the foreign key set by [`ColumnDef::references`].
    pub fn on_delete(mut self, action: Action) -> Self {
        if let Some(references) = &mut self.references {
            references.on_delete = Some(action);
        }
        self
    }

    /// Applies to the foreign key set by [`ColumnDef::references`].
    pub fn on_update(mut self, action: Action) -> Self {
        if let Some(references) = &mut self.references {
            references.on_update = Some(action);
        }
        self
    }

    pub fn comment(mut self, comment: impl Into<Cow<'static, str>>) -> Self {
        self.comment = comment.into();
        self
    }
}
