use rust_decimal::Decimal;
use std::fmt::{self, Display, Formatter};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed literal carried by expressions, replacements and bind parameters.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int64(i64),
    Int128(i128),
    UInt64(u64),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    TimestampWithTimezone(OffsetDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(..))
    }

    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(..) => "boolean",
            Value::Int64(..) | Value::Int128(..) | Value::UInt64(..) => "integer",
            Value::Float64(..) => "float",
            Value::Decimal(..) => "decimal",
            Value::Varchar(..) => "string",
            Value::Blob(..) => "blob",
            Value::Date(..) => "date",
            Value::Time(..) => "time",
            Value::Timestamp(..) => "timestamp",
            Value::TimestampWithTimezone(..) => "timestamp with time zone",
            Value::Uuid(..) => "uuid",
            Value::Json(..) => "json",
            Value::List(..) => "list",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Int128(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Varchar(v) => write!(f, "{v:?}"),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::TimestampWithTimezone(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Json(v) => write!(f, "{v}"),
            Value::List(v) => {
                f.write_str("[")?;
                for (i, v) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}
