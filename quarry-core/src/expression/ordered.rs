use crate::{Expr, OpPrecedence, writer::SqlWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    First,
    Last,
}

/// ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered {
    pub order: Order,
    pub nulls: Option<Nulls>,
    pub expression: Expr,
}

impl Ordered {
    pub fn asc(expression: impl Into<Expr>) -> Self {
        Self {
            order: Order::ASC,
            nulls: None,
            expression: expression.into(),
        }
    }

    pub fn desc(expression: impl Into<Expr>) -> Self {
        Self {
            order: Order::DESC,
            nulls: None,
            expression: expression.into(),
        }
    }

    pub fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

impl OpPrecedence for Ordered {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        self.expression.precedence(writer)
    }
}
