mod as_value;
mod bind;
mod column;
mod data_type;
mod dialect;
mod error;
mod expression;
mod join;
mod model;
mod parse;
mod query;
mod query_interface;
mod replacements;
mod table_ref;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use bind::*;
pub use column::*;
pub use data_type::*;
pub use dialect::*;
pub use error::*;
pub use expression::*;
pub use join::*;
pub use model::*;
pub use parse::*;
pub use query::*;
pub use query_interface::*;
pub use replacements::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
