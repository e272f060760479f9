use crate::{Error, Parse, Result, Value, consume_while, truncate_long};
use anyhow::Context;
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use fast_float::parse_partial;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::{any, borrow::Cow, str::FromStr};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It is used in two directions: building literals and bind parameters from
/// caller data (`as_value`), and decoding textual driver output back into a
/// typed value (`parse` / `extract`, see [`crate::ParserTable`]).
///
/// # Parsing contract
/// - `parse` delegates to `extract` then verifies the slice is exhausted.
/// - `extract` MUST update the input slice only on success.
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int64(42));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse a full string into `Self`, failing when input remains unconsumed.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = input.as_ref();
        let result = Self::extract(&mut value)?;
        if !value.is_empty() {
            return Err(Error::msg(format!(
                "Value `{}` parsed correctly as {} but it did not consume all the input (remaining: `{}`)",
                truncate_long!(input.as_ref()),
                any::type_name::<Self>(),
                truncate_long!(value),
            )));
        }
        Ok(result)
    }
    /// Parse a prefix of the slice, advancing it on success.
    fn extract(value: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse '{value}' as {}",
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.into())
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} value {} into {}",
        value.kind(),
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_signed {
    ($($source:ty),+ $(,)?) => {
        $(impl AsValue for $source {
            fn as_value(self) -> Value {
                Value::Int64(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int64(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::Int128(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::UInt64(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::Varchar(ref v) => Self::parse(v),
                    v => Err(mismatch::<Self>(&v)),
                }
                .with_context(|| format!("While decoding a {}", any::type_name::<Self>()))
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let (parsed, len) = <$source>::from_radix_10_signed_checked(input.as_bytes());
                match parsed {
                    Some(v) if len > 0 => {
                        *input = &input[len..];
                        Ok(v)
                    }
                    _ => Err(Error::msg(format!(
                        "Cannot parse '{}' as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    ))),
                }
            }
        })+
    };
}
impl_as_value_signed!(i8, i16, i32, i64);

macro_rules! impl_as_value_unsigned {
    ($($source:ty => $destination:path),+ $(,)?) => {
        $(impl AsValue for $source {
            fn as_value(self) -> Value {
                $destination(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int64(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::Int128(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::UInt64(v) => <$source>::try_from(v).map_err(Error::new),
                    Value::Varchar(ref v) => Self::parse(v),
                    v => Err(mismatch::<Self>(&v)),
                }
                .with_context(|| format!("While decoding a {}", any::type_name::<Self>()))
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let digits = input.strip_prefix('+').unwrap_or(input);
                let skipped = input.len() - digits.len();
                let (parsed, len) = <$source>::from_radix_10_checked(digits.as_bytes());
                match parsed {
                    Some(v) if len > 0 => {
                        *input = &input[skipped + len..];
                        Ok(v)
                    }
                    _ => Err(Error::msg(format!(
                        "Cannot parse '{}' as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    ))),
                }
            }
        })+
    };
}
impl_as_value_unsigned!(
    u8 => Value::Int64,
    u16 => Value::Int64,
    u32 => Value::Int64,
    u64 => Value::UInt64,
);

impl AsValue for i128 {
    fn as_value(self) -> Value {
        Value::Int128(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int64(v) => Ok(v as _),
            Value::UInt64(v) => Ok(v as _),
            Value::Int128(v) => Ok(v),
            Value::Decimal(v) if v.fract().is_zero() => v
                .to_i128()
                .ok_or_else(|| Error::msg(format!("Decimal {v} is out of range for i128"))),
            Value::Varchar(ref v) => Self::parse(v),
            v => Err(mismatch::<Self>(&v)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let (parsed, len) = i128::from_radix_10_signed_checked(input.as_bytes());
        match parsed {
            Some(v) if len > 0 => {
                *input = &input[len..];
                Ok(v)
            }
            _ => Err(Error::msg(format!(
                "Cannot parse '{}' as i128",
                truncate_long!(input)
            ))),
        }
    }
}

macro_rules! impl_as_value_float {
    ($($source:ty),+ $(,)?) => {
        $(impl AsValue for $source {
            fn as_value(self) -> Value {
                Value::Float64(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Float64(v) => Ok(v as _),
                    Value::Int64(v) => Ok(v as _),
                    Value::UInt64(v) => Ok(v as _),
                    Value::Decimal(v) => v.to_f64().map(|v| v as _).ok_or_else(|| {
                        Error::msg(format!("Decimal {v} does not fit in {}", any::type_name::<Self>()))
                    }),
                    Value::Varchar(ref v) => Self::parse(v),
                    v => Err(mismatch::<Self>(&v)),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let (value, len) = parse_partial::<Self, _>(*input).map_err(|_| {
                    Error::msg(format!(
                        "Cannot parse '{}' as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    ))
                })?;
                *input = &input[len..];
                Ok(value)
            }
        })+
    };
}
impl_as_value_float!(f32, f64);

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int64(v) if v == 0 || v == 1 => Ok(v == 1),
            Value::Varchar(ref v) => Self::parse(v),
            v => Err(mismatch::<Self>(&v)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        for (token, value) in [
            ("true", true),
            ("false", false),
            ("t", true),
            ("f", false),
            ("1", true),
            ("0", false),
        ] {
            if input.len() >= token.len() && input[..token.len()].eq_ignore_ascii_case(token) {
                *input = &input[token.len()..];
                return Ok(value);
            }
        }
        Err(Error::msg(format!(
            "Cannot parse '{}' as bool",
            truncate_long!(input)
        )))
    }
}

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int64(v) => Ok(Decimal::from(v)),
            Value::UInt64(v) => Ok(Decimal::from(v)),
            Value::Int128(v) => Decimal::from_i128(v)
                .ok_or_else(|| Error::msg(format!("Integer {v} does not fit in a Decimal"))),
            Value::Float64(v) => Decimal::from_f64(v)
                .ok_or_else(|| Error::msg(format!("Float {v} does not fit in a Decimal"))),
            Value::Varchar(ref v) => Self::parse(v),
            v => Err(mismatch::<Self>(&v)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut rest = *input;
        let text = consume_while(&mut rest, |c| {
            c.is_ascii_digit() || matches!(*c, '.' | '-' | '+' | 'e' | 'E')
        });
        let value = if text.contains(['e', 'E']) {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str(text)
        }
        .with_context(|| format!("Cannot parse '{}' as Decimal", truncate_long!(input)))?;
        *input = rest;
        Ok(value)
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Json(serde_json::Value::String(v)) => Ok(v),
            v => Err(mismatch::<Self>(&v)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let result = input.to_string();
        *input = "";
        Ok(result)
    }
}

impl<'a> AsValue for Cow<'a, str> {
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Box<[u8]> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            Value::Varchar(ref v) => Self::parse(v),
            v => Err(mismatch::<Self>(&v)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let digits = input
            .strip_prefix("\\x")
            .or_else(|| input.strip_prefix("0x"))
            .unwrap_or(input);
        let decoded = hex::decode(digits)
            .with_context(|| format!("Could not decode blob pattern: `{}`", truncate_long!(input)))?;
        *input = "";
        Ok(decoded.into_boxed_slice())
    }
}

impl AsValue for &[u8] {
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(mismatch::<Self>(&value))
    }
}

macro_rules! impl_as_value_parsed {
    ($($source:ty => $destination:path),+ $(,)?) => {
        $(impl AsValue for $source {
            fn as_value(self) -> Value {
                $destination(self)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(v) => Ok(v),
                    Value::Varchar(ref v) => <Self as AsValue>::parse(v),
                    v => Err(mismatch::<Self>(&v)),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let value = <Self as Parse>::parse(input.trim())?;
                *input = "";
                Ok(value)
            }
        })+
    };
}
impl_as_value_parsed!(
    Date => Value::Date,
    Time => Value::Time,
    PrimitiveDateTime => Value::Timestamp,
    OffsetDateTime => Value::TimestampWithTimezone,
    Uuid => Value::Uuid,
    serde_json::Value => Value::Json,
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(self) -> Value {
        Value::List(self.into_iter().map(AsValue::as_value).collect())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(v) => v.into_iter().map(T::try_from_value).collect(),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}
