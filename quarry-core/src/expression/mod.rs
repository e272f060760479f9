mod binary_op;
mod expr;
mod function;
mod json_path;
mod op_precedence;
mod ordered;
mod unary_op;

pub use binary_op::*;
pub use expr::*;
pub use function::*;
pub use json_path::*;
pub use op_precedence::*;
pub use ordered::*;
pub use unary_op::*;
