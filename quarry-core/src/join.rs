use crate::{Expr, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join: JoinType,
    pub table: TableRef,
    pub on: Option<Expr>,
}

impl Join {
    pub fn new(join: JoinType, table: impl Into<TableRef>, on: Option<Expr>) -> Self {
        Self {
            join,
            table: table.into(),
            on,
        }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Default,
    Inner,
    Outer,
    Left,
    Right,
    Cross,
    Natural,
}
