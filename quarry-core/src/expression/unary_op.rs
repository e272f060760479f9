use crate::{Expr, OpPrecedence, writer::SqlWriter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOpType {
    Negative,
    Not,
}

impl OpPrecedence for UnaryOpType {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_unary_op_precedence(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub op: UnaryOpType,
    pub arg: Expr,
}

impl OpPrecedence for UnaryOp {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_unary_op_precedence(&self.op)
    }
}
