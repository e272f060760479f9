use std::fmt::{self, Display, Formatter};

/// Declared type of a column or the target of a cast.
///
/// Plain immutable values, build them through the factory functions
/// (`DataType::string(255)`, `DataType::decimal(10, 2)`) or the variants directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal(Option<(u8, u8)>),
    Char(u32),
    Varchar(Option<u32>),
    Text,
    Blob,
    Date,
    Time,
    /// Timestamp without time zone, optional fractional precision.
    DateTime(Option<u8>),
    DateTimeTz(Option<u8>),
    Uuid,
    Json,
    Array(Box<DataType>),
    Enum(Vec<String>),
    /// Written verbatim.
    Custom(String),
}

impl DataType {
    pub fn string(length: u32) -> Self {
        DataType::Varchar(Some(length))
    }

    pub fn decimal(precision: u8, scale: u8) -> Self {
        DataType::Decimal(Some((precision, scale)))
    }

    pub fn char(length: u32) -> Self {
        DataType::Char(length)
    }

    pub fn timestamp() -> Self {
        DataType::DateTime(None)
    }

    pub fn timestamp_tz() -> Self {
        DataType::DateTimeTz(None)
    }

    pub fn array(inner: DataType) -> Self {
        DataType::Array(Box::new(inner))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataType::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn custom(sql: impl Into<String>) -> Self {
        DataType::Custom(sql.into())
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt
        )
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => f.write_str("BOOLEAN"),
            DataType::TinyInt => f.write_str("TINYINT"),
            DataType::SmallInt => f.write_str("SMALLINT"),
            DataType::Integer => f.write_str("INTEGER"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::Float => f.write_str("FLOAT"),
            DataType::Double => f.write_str("DOUBLE"),
            DataType::Decimal(None) => f.write_str("DECIMAL"),
            DataType::Decimal(Some((p, s))) => write!(f, "DECIMAL({p},{s})"),
            DataType::Char(n) => write!(f, "CHAR({n})"),
            DataType::Varchar(None) => f.write_str("VARCHAR"),
            DataType::Varchar(Some(n)) => write!(f, "VARCHAR({n})"),
            DataType::Text => f.write_str("TEXT"),
            DataType::Blob => f.write_str("BLOB"),
            DataType::Date => f.write_str("DATE"),
            DataType::Time => f.write_str("TIME"),
            DataType::DateTime(None) => f.write_str("TIMESTAMP"),
            DataType::DateTime(Some(p)) => write!(f, "TIMESTAMP({p})"),
            DataType::DateTimeTz(None) => f.write_str("TIMESTAMP WITH TIME ZONE"),
            DataType::DateTimeTz(Some(p)) => write!(f, "TIMESTAMP({p}) WITH TIME ZONE"),
            DataType::Uuid => f.write_str("UUID"),
            DataType::Json => f.write_str("JSON"),
            DataType::Array(inner) => write!(f, "{inner}[]"),
            DataType::Enum(values) => write!(f, "ENUM({})", values.join(", ")),
            DataType::Custom(v) => f.write_str(v),
        }
    }
}
