use crate::writer::SqlWriter;

/// Provides numeric precedence for expressions allowing sql writers to insert parentheses.
pub trait OpPrecedence {
    /// Lower numbers bind weaker, writers parenthesize when child precedence <= operator precedence.
    fn precedence(&self, writer: &dyn SqlWriter) -> i32;
}

impl<T: OpPrecedence> OpPrecedence for &T {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        (*self).precedence(writer)
    }
}

impl<T: OpPrecedence> OpPrecedence for Box<T> {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        self.as_ref().precedence(writer)
    }
}
