use crate::{
    BinaryOp, BinaryOpType, ColumnRef, DataType, Function, JsonPath, JsonStyle, OpPrecedence,
    PathSegment, UnaryOp, UnaryOpType, Value, writer::SqlWriter,
};
use std::{borrow::Cow, collections::BTreeMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// SQL text embedded verbatim except for its `:name` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSql {
    pub sql: Cow<'static, str>,
    /// Values for `:name` placeholders, looked up before the statement replacements.
    pub replacements: BTreeMap<String, Value>,
}

/// Expression tree, rendered recursively by [`SqlWriter::write_expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Dotted identifier path, each part quoted separately.
    Identifier(Vec<Cow<'static, str>>),
    Literal(Value),
    Column(ColumnRef),
    Function(Function),
    Unary(Box<UnaryOp>),
    Binary(Box<BinaryOp>),
    /// `AND` / `OR` over any number of children, empty groups are constant predicates.
    Group(LogicalOp, Vec<Expr>),
    Cast(Box<Expr>, DataType),
    JsonPath(Box<JsonPath>),
    Raw(RawSql),
    /// Value sent to the driver through a placeholder.
    Bind(Value),
    List(Vec<Expr>),
    Alias(Box<Expr>, Cow<'static, str>),
    Asterisk,
    Default,
}

impl Expr {
    pub fn col(name: impl Into<Cow<'static, str>>) -> Expr {
        Expr::Column(ColumnRef::new(name))
    }

    pub fn qualified(
        table: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Expr {
        Expr::Column(ColumnRef::qualified(table, name))
    }

    /// Splits `path` on dots.
    pub fn ident(path: &str) -> Expr {
        Expr::Identifier(path.split('.').map(|v| Cow::Owned(v.to_string())).collect())
    }

    pub fn lit(value: impl Into<Value>) -> Expr {
        Expr::Literal(value.into())
    }

    pub fn bind(value: impl Into<Value>) -> Expr {
        Expr::Bind(value.into())
    }

    pub fn raw(sql: impl Into<Cow<'static, str>>) -> Expr {
        Expr::Raw(RawSql {
            sql: sql.into(),
            replacements: Default::default(),
        })
    }

    pub fn raw_with<I, K, V>(sql: impl Into<Cow<'static, str>>, replacements: I) -> Expr
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Expr::Raw(RawSql {
            sql: sql.into(),
            replacements: replacements
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    pub fn func<I, E>(name: impl Into<Cow<'static, str>>, args: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Function(Function {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    pub fn and<I, E>(children: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Group(LogicalOp::And, children.into_iter().map(Into::into).collect())
    }

    pub fn or<I, E>(children: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Group(LogicalOp::Or, children.into_iter().map(Into::into).collect())
    }

    pub fn list<I, E>(values: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::List(values.into_iter().map(Into::into).collect())
    }

    /// Conjunction of equality tests, `NULL` values become `IS NULL` and lists become `IN`.
    pub fn matching<I, K, V>(pairs: I) -> Expr
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        Expr::and(pairs.into_iter().map(|(k, v)| match v.into() {
            Value::List(values) => Expr::col(k).in_list(values.into_iter().map(Expr::Literal)),
            v => Expr::col(k).eq(Expr::Literal(v)),
        }))
    }

    pub fn binary(self, op: BinaryOpType, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary(Box::new(BinaryOp {
            op,
            lhs: self,
            rhs: rhs.into(),
        }))
    }

    /// `=`, becomes `IS NULL` when `rhs` is a null literal.
    pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
        let rhs = rhs.into();
        if rhs.is_null_literal() {
            self.binary(BinaryOpType::Is, rhs)
        } else {
            self.binary(BinaryOpType::Equal, rhs)
        }
    }

    /// `<>`, becomes `IS NOT NULL` when `rhs` is a null literal.
    pub fn ne(self, rhs: impl Into<Expr>) -> Expr {
        let rhs = rhs.into();
        if rhs.is_null_literal() {
            self.binary(BinaryOpType::IsNot, rhs)
        } else {
            self.binary(BinaryOpType::NotEqual, rhs)
        }
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Less, rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::LessEqual, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Greater, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::GreaterEqual, rhs)
    }

    pub fn like(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Like, rhs)
    }

    pub fn not_like(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::NotLike, rhs)
    }

    pub fn is_null(self) -> Expr {
        self.binary(BinaryOpType::Is, Expr::Literal(Value::Null))
    }

    pub fn is_not_null(self) -> Expr {
        self.binary(BinaryOpType::IsNot, Expr::Literal(Value::Null))
    }

    pub fn in_list<I, E>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.binary(BinaryOpType::In, Expr::list(values))
    }

    pub fn not_in<I, E>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.binary(BinaryOpType::NotIn, Expr::list(values))
    }

    pub fn add(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Addition, rhs)
    }

    pub fn sub(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Subtraction, rhs)
    }

    pub fn mul(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Multiplication, rhs)
    }

    pub fn div(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Division, rhs)
    }

    pub fn concat(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOpType::Concat, rhs)
    }

    pub fn not(self) -> Expr {
        Expr::Unary(Box::new(UnaryOp {
            op: UnaryOpType::Not,
            arg: self,
        }))
    }

    pub fn neg(self) -> Expr {
        Expr::Unary(Box::new(UnaryOp {
            op: UnaryOpType::Negative,
            arg: self,
        }))
    }

    pub fn cast(self, data_type: DataType) -> Expr {
        Expr::Cast(Box::new(self), data_type)
    }

    pub fn alias(self, alias: impl Into<Cow<'static, str>>) -> Expr {
        Expr::Alias(Box::new(self), alias.into())
    }

    /// JSON value at `path`.
    pub fn json<I, S>(self, path: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Expr::JsonPath(Box::new(JsonPath {
            base: self,
            path: path.into_iter().map(Into::into).collect(),
            unquote: false,
        }))
    }

    /// Text at `path`.
    pub fn json_text<I, S>(self, path: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Expr::JsonPath(Box::new(JsonPath {
            base: self,
            path: path.into_iter().map(Into::into).collect(),
            unquote: true,
        }))
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal(Value::Null))
    }
}

impl OpPrecedence for Expr {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self {
            Expr::Unary(v) => v.precedence(writer),
            Expr::Binary(v) => v.precedence(writer),
            Expr::Group(op, children) => match children.as_slice() {
                [] => writer.expression_binary_op_precedence(&BinaryOpType::Equal),
                [child] => child.precedence(writer),
                _ => writer.expression_binary_op_precedence(match op {
                    LogicalOp::And => &BinaryOpType::And,
                    LogicalOp::Or => &BinaryOpType::Or,
                }),
            },
            Expr::Literal(
                Value::Int64(..) | Value::Int128(..) | Value::Float64(..) | Value::Decimal(..),
            ) if self.is_negative_number() => {
                writer.expression_unary_op_precedence(&UnaryOpType::Negative)
            }
            Expr::JsonPath(..) if writer.descriptor().supports.json == JsonStyle::Operators => {
                1000
            }
            Expr::Alias(..) => 1200,
            // Unknown content, parenthesized whenever it is an operand
            Expr::Raw(..) => 0,
            _ => 1_000_000_000,
        }
    }
}

impl Expr {
    fn is_negative_number(&self) -> bool {
        match self {
            Expr::Literal(Value::Int64(v)) => *v < 0,
            Expr::Literal(Value::Int128(v)) => *v < 0,
            Expr::Literal(Value::Float64(v)) => v.is_sign_negative(),
            Expr::Literal(Value::Decimal(v)) => v.is_sign_negative(),
            _ => false,
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<ColumnRef> for Expr {
    fn from(value: ColumnRef) -> Self {
        Expr::Column(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(Value::Varchar(value.into()))
    }
}

macro_rules! impl_expr_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Expr {
                fn from(value: $source) -> Self {
                    Expr::Literal(value.into())
                }
            }
        )+
    };
}

impl_expr_from!(
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    rust_decimal::Decimal,
    time::Date,
    time::Time,
    time::PrimitiveDateTime,
    time::OffsetDateTime,
    uuid::Uuid,
    serde_json::Value,
    Box<[u8]>,
);

impl<T: crate::AsValue> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        Expr::Literal(value.into())
    }
}
