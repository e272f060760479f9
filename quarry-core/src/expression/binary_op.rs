use crate::{Expr, OpPrecedence, writer::SqlWriter};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Multiplication,
    Division,
    Remainder,
    Addition,
    Subtraction,
    Concat,
    BitwiseAnd,
    BitwiseOr,
    Is,
    IsNot,
    Like,
    NotLike,
    In,
    NotIn,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOpType {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOpType::Equal
                | BinaryOpType::NotEqual
                | BinaryOpType::Less
                | BinaryOpType::Greater
                | BinaryOpType::LessEqual
                | BinaryOpType::GreaterEqual
        )
    }
}

impl OpPrecedence for BinaryOpType {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinaryOpType,
    pub lhs: Expr,
    pub rhs: Expr,
}

impl OpPrecedence for BinaryOp {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(&self.op)
    }
}

impl Display for BinaryOpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOpType::Multiplication => "Multiplication",
            BinaryOpType::Division => "Division",
            BinaryOpType::Remainder => "Remainder",
            BinaryOpType::Addition => "Addition",
            BinaryOpType::Subtraction => "Subtraction",
            BinaryOpType::Concat => "Concat",
            BinaryOpType::BitwiseAnd => "BitwiseAnd",
            BinaryOpType::BitwiseOr => "BitwiseOr",
            BinaryOpType::Is => "Is",
            BinaryOpType::IsNot => "IsNot",
            BinaryOpType::Like => "Like",
            BinaryOpType::NotLike => "NotLike",
            BinaryOpType::In => "In",
            BinaryOpType::NotIn => "NotIn",
            BinaryOpType::Equal => "Equal",
            BinaryOpType::NotEqual => "NotEqual",
            BinaryOpType::Less => "Less",
            BinaryOpType::Greater => "Greater",
            BinaryOpType::LessEqual => "LessEqual",
            BinaryOpType::GreaterEqual => "GreaterEqual",
            BinaryOpType::And => "And",
            BinaryOpType::Or => "Or",
        })
    }
}
