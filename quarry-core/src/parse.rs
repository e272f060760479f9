use crate::{AsValue, Result, Value, truncate_long};
use anyhow::Context;
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, macros::format_description};
use uuid::Uuid;

pub trait Parse {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized;
}

impl Parse for Date {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        time::Date::parse(value.as_ref(), format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("Cannot parse '{}' as time::Date", value.as_ref()))
    }
}

impl Parse for Time {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let value = value.as_ref();
        time::Time::parse(
            value,
            format_description!("[hour]:[minute]:[second].[subsecond]"),
        )
        .or(time::Time::parse(
            value,
            format_description!("[hour]:[minute]:[second]"),
        ))
        .or(time::Time::parse(
            value,
            format_description!("[hour]:[minute]"),
        ))
        .with_context(|| format!("Cannot parse '{}' as time::Time", value))
    }
}

impl Parse for PrimitiveDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let value = value.as_ref();
        time::PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
        .or(time::PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        ))
        .or(time::PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        ))
        .or(time::PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ))
        .or(Date::parse(value, format_description!("[year]-[month]-[day]")).map(|v| v.midnight()))
        .with_context(|| format!("Cannot parse '{}' as time::PrimitiveDateTime", value))
    }
}

impl Parse for OffsetDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let value = value.as_ref();
        time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]")
        )
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]")
        ))
        .or(time::OffsetDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]")
        ))
        .with_context(|| format!("Cannot parse '{}' as time::OffsetDateTime", value))
    }
}

impl Parse for Uuid {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Uuid::parse_str(value.as_ref())
            .with_context(|| format!("Cannot parse '{}' as uuid::Uuid", value.as_ref()))
    }
}

impl Parse for serde_json::Value {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        serde_json::from_str(value.as_ref()).with_context(|| {
            format!(
                "Cannot parse '{}' as serde_json::Value",
                truncate_long!(value.as_ref())
            )
        })
    }
}

/// Decoder applied to the text a driver returns for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueParser {
    Boolean,
    Integer,
    BigInteger,
    Float,
    Decimal,
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Uuid,
    Json,
}

impl ValueParser {
    pub fn parse(&self, text: &str) -> Result<Value> {
        Ok(match self {
            ValueParser::Boolean => bool::parse(text)?.into(),
            ValueParser::Integer => i64::parse(text)?.into(),
            ValueParser::BigInteger => i128::parse(text)?.into(),
            ValueParser::Float => f64::parse(text)?.into(),
            ValueParser::Decimal => Decimal::parse(text)?.into(),
            ValueParser::Text => Value::Varchar(text.to_string()),
            ValueParser::Blob => <Box<[u8]> as AsValue>::parse(text)?.into(),
            ValueParser::Date => <Date as AsValue>::parse(text)?.into(),
            ValueParser::Time => <Time as AsValue>::parse(text)?.into(),
            ValueParser::Timestamp => <PrimitiveDateTime as AsValue>::parse(text)?.into(),
            ValueParser::TimestampWithTimezone => {
                <OffsetDateTime as AsValue>::parse(text)?.into()
            }
            ValueParser::Uuid => <Uuid as AsValue>::parse(text)?.into(),
            ValueParser::Json => <serde_json::Value as AsValue>::parse(text)?.into(),
        })
    }
}

/// Maps database type names (case insensitive, without length or precision) to parsers.
///
/// Built once per dialect as a `const` slice, unknown types decode as text.
#[derive(Debug, Clone, Copy)]
pub struct ParserTable(pub &'static [(&'static str, ValueParser)]);

impl ParserTable {
    pub fn parser(&self, database_type: &str) -> Option<ValueParser> {
        let name = database_type
            .split_once('(')
            .map(|(v, _)| v)
            .unwrap_or(database_type)
            .trim();
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    pub fn parse(&self, database_type: &str, text: Option<&str>) -> Result<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        match self.parser(database_type) {
            Some(parser) => parser.parse(text).map_err(|e| {
                let error = e.context(format!(
                    "While decoding a `{}` column value",
                    database_type
                ));
                log::error!("{:#}", error);
                error
            }),
            None => Ok(Value::Varchar(text.to_string())),
        }
    }
}

impl Default for ParserTable {
    fn default() -> Self {
        ParserTable(&[])
    }
}
