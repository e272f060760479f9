use crate::{
    Action, AddColumnOptions, BinaryOp, BinaryOpType, BlobStyle, BooleanStyle,
    BulkDeleteOptions, ChangeColumnStyle, ColumnDef, ColumnRef, CommentStyle,
    ConditionalCreateTable, Constraint, ConstraintChecking, ConstraintKind, CreateDatabaseOptions,
    CreateSchemaOptions, CreateTableOptions, DataType, DefaultValuesStyle, Deferrable, Descriptor,
    Dialect, DropDatabaseOptions, DropIndexStyle, DropSchemaOptions, DropTableOptions, Expr,
    Function, IgnoreDuplicates, IndexHint, IndexHintType, IndexOptions, InsertOptions,
    IsolationLevel, IsolationStyle, Join, JoinType, JsonPath, JsonStyle, LimitStyle,
    ListSchemasOptions, ListTablesOptions, Lock, LockStrength, LockWait, LogicalOp, MergeSource,
    ModelMeta, Nulls, OnConflict, OpPrecedence, Order, Ordered, RawSql, RawToken, References,
    RemoveColumnOptions, RemoveConstraintOptions, RemoveIndexOptions, RenameStyle, Replacements,
    Result, ReturnValues, ReturningStyle, Row, RowCount, RowLimit, SavepointStyle, ScanFor,
    SelectOptions, SqlError, StartTransactionOptions, StringEscape, TableHint, TableRef,
    TimestampTzStyle, TransactionStart, TransactionType, TruncateStyle, TruncateTableOptions,
    UnaryOp, UnaryOpType, UpdateOptions, UpsertOptions, UpsertStyle, Value, ensure_supported,
    function_arity, possibly_parenthesized, push_name_part, scan_raw, truncate_long,
    try_separated_by,
    writer::{Context, Fragment},
};
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    fmt::Write,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Statement a RETURNING clause belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    Insert,
    Update,
    Delete,
}

impl Modification {
    fn returning_feature(&self) -> &'static str {
        match self {
            Modification::Insert => "RETURNING on INSERT",
            Modification::Update => "RETURNING on UPDATE",
            Modification::Delete => "RETURNING on DELETE",
        }
    }

    /// Pseudo table of the `OUTPUT` clause.
    fn output_table(&self) -> &'static str {
        match self {
            Modification::Insert | Modification::Update => "INSERTED",
            Modification::Delete => "DELETED",
        }
    }
}

/// Dialect printer converting semantic constructs into concrete SQL strings.
///
/// Every method has a default rendering driven by the [`Descriptor`] flags of
/// the dialect. Dialect writers override only the pieces the flags cannot
/// describe. Statements are written on a single line without the trailing
/// semicolon, statements that need several commands join them with `; `.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn descriptor(&self) -> &'static Descriptor;

    fn dialect(&self) -> Dialect {
        self.descriptor().dialect
    }

    /// Whether the current fragment context allows alias declaration.
    fn alias_declaration(&self, context: &Context) -> bool {
        matches!(context.fragment, Fragment::SqlSelectFrom | Fragment::SqlJoin)
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + search.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote an identifier doubling the closing quote character.
    fn write_identifier_quoted(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
    ) -> Result<()> {
        if value.is_empty() {
            return Err(SqlError::invalid_identifier(value, "identifiers cannot be empty").into());
        }
        if value.contains('\0') {
            return Err(SqlError::invalid_identifier(
                value.replace('\0', "\\0"),
                "identifiers cannot contain NUL characters",
            )
            .into());
        }
        let descriptor = self.descriptor();
        let right = descriptor.identifier_quote_right;
        let doubled = String::from_iter([right, right]);
        out.push(descriptor.identifier_quote_left);
        self.write_escaped(out, value, right, &doubled);
        out.push(right);
        Ok(())
    }

    /// Quote every dot separated part of `path`, a `*` part stays unquoted.
    fn write_identifiers(&self, context: &mut Context, out: &mut String, path: &str) -> Result<()> {
        try_separated_by(
            out,
            path.split('.'),
            |out, v| {
                if v == "*" {
                    out.push('*');
                    Ok(())
                } else {
                    self.write_identifier_quoted(context, out, v)
                }
            },
            ".",
        )
    }

    /// Render the table name, qualified by its schema unless it is the default one.
    fn write_table_name(&self, context: &mut Context, out: &mut String, value: &TableRef) -> Result<()> {
        let descriptor = self.descriptor();
        if value.schema.is_empty() || value.schema == descriptor.default_schema {
            return self.write_identifier_quoted(context, out, &value.name);
        }
        if descriptor.supports.schemas.schemas {
            self.write_identifier_quoted(context, out, &value.schema)?;
            out.push('.');
            self.write_identifier_quoted(context, out, &value.name)
        } else {
            self.write_identifier_quoted(context, out, &value.full_name())
        }
    }

    /// Render the alias declaration of a table.
    fn write_table_alias(&self, context: &mut Context, out: &mut String, alias: &str) -> Result<()> {
        out.push_str(" AS ");
        self.write_identifier_quoted(context, out, alias)
    }

    /// Render a table reference with optional alias.
    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) -> Result<()> {
        self.write_table_name(context, out, value)?;
        if !value.alias.is_empty() && self.alias_declaration(context) {
            self.write_table_alias(context, out, &value.alias)?;
        }
        Ok(())
    }

    /// Render a column reference, mapping the attribute through the model.
    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) -> Result<()> {
        if !value.table.is_empty() {
            self.write_identifier_quoted(context, out, &value.table)?;
            out.push('.');
        } else if context.qualify_columns {
            if let Some(qualifier) = context.qualifier.clone() {
                self.write_identifier_quoted(context, out, &qualifier)?;
                out.push('.');
            }
        }
        if value.name == "*" {
            out.push('*');
            return Ok(());
        }
        let name = context.field_name(&value.name);
        self.write_identifier_quoted(context, out, name)
    }

    /// Render the physical column of `attribute`, never qualified.
    fn write_column_name(&self, context: &mut Context, out: &mut String, attribute: &str) -> Result<()> {
        let name = context.field_name(attribute);
        self.write_identifier_quoted(context, out, name)
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_value_none(context, out),
            Value::Boolean(v) => self.write_value_bool(context, out, *v),
            Value::Int64(v) => write_integer!(out, *v),
            Value::Int128(v) => write_integer!(out, *v),
            Value::UInt64(v) => write_integer!(out, *v),
            Value::Float64(v) => self.write_value_float(context, out, *v)?,
            Value::Decimal(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Varchar(v) => self.write_value_string(context, out, v)?,
            Value::Blob(v) => self.write_value_blob(context, out, v)?,
            Value::Date(v) => self.write_value_date(context, out, v)?,
            Value::Time(v) => self.write_value_time(context, out, v)?,
            Value::Timestamp(v) => self.write_value_timestamp(context, out, v)?,
            Value::TimestampWithTimezone(v) => self.write_value_timestamptz(context, out, v)?,
            Value::Uuid(v) => self.write_value_string(context, out, &v.to_string())?,
            Value::Json(v) => self.write_value_json(context, out, v)?,
            Value::List(v) => self.write_value_list(context, out, v)?,
        };
        Ok(())
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(match self.descriptor().boolean {
            BooleanStyle::Keyword => ["FALSE", "TRUE"][value as usize],
            BooleanStyle::Numeric => ["0", "1"][value as usize],
        });
    }

    /// Render a finite float, SQL has no literal for NaN and infinities.
    fn write_value_float(&self, _context: &mut Context, out: &mut String, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(SqlError::unsupported_value(
                value.to_string(),
                "SQL has no literal for NaN and infinite numbers",
            )
            .into());
        }
        write_float!(out, value);
        Ok(())
    }

    /// Render and escape a string literal.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) -> Result<()> {
        let descriptor = self.descriptor();
        match descriptor.string_escape {
            StringEscape::Standard => {
                if value.contains('\0') {
                    return Err(SqlError::unsupported_value(
                        format!("{:?}", truncate_long!(value).to_string()),
                        "NUL characters cannot appear in a string literal",
                    )
                    .into());
                }
                out.push_str(descriptor.string_prefix);
                out.push('\'');
                self.write_escaped(out, value, '\'', "''");
                out.push('\'');
            }
            StringEscape::Backslash => {
                out.push_str(descriptor.string_prefix);
                out.push('\'');
                let mut position = 0;
                for (i, c) in value.char_indices() {
                    let replace = match c {
                        '\0' => "\\0",
                        '\n' => "\\n",
                        '\r' => "\\r",
                        '\u{8}' => "\\b",
                        '\t' => "\\t",
                        '\u{1A}' => "\\Z",
                        '\'' => "\\'",
                        '\\' => "\\\\",
                        _ => continue,
                    };
                    out.push_str(&value[position..i]);
                    out.push_str(replace);
                    position = i + 1;
                }
                out.push_str(&value[position..]);
                out.push('\'');
            }
        }
        Ok(())
    }

    /// Render a blob literal.
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) -> Result<()> {
        let encoded = hex::encode_upper(value);
        match self.descriptor().blob {
            BlobStyle::HexString => {
                let _ = write!(out, "X'{encoded}'");
            }
            BlobStyle::ByteaHex => {
                let _ = write!(out, "'\\x{}'", hex::encode(value));
            }
            BlobStyle::HexPrefix => {
                if value.is_empty() {
                    out.push_str("0x");
                } else {
                    let _ = write!(out, "0x{encoded}");
                }
            }
            BlobStyle::HexToRaw => {
                let _ = write!(out, "HEXTORAW('{encoded}')");
            }
            BlobStyle::BlobFunction => {
                let _ = write!(out, "BLOB(X'{encoded}')");
            }
        }
        Ok(())
    }

    /// Render the `YYYY-MM-DD` text of a date, without quotes.
    fn write_date_text(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render the `HH:MM:SS[.fraction]` text of a time, without quotes.
    fn write_time_text(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
    }

    /// Render the `+HH:MM` text of an offset.
    fn write_offset_text(&self, out: &mut String, value: &UtcOffset) {
        let (hours, minutes, _) = value.as_hms();
        let _ = write!(
            out,
            "{}{:02}:{:02}",
            if value.is_negative() { '-' } else { '+' },
            hours.unsigned_abs(),
            minutes.unsigned_abs()
        );
    }

    /// Render a DATE literal.
    fn write_value_date(&self, _context: &mut Context, out: &mut String, value: &Date) -> Result<()> {
        out.push('\'');
        self.write_date_text(out, value);
        out.push('\'');
        Ok(())
    }

    /// Render a TIME literal.
    fn write_value_time(&self, _context: &mut Context, out: &mut String, value: &Time) -> Result<()> {
        out.push('\'');
        self.write_time_text(out, value);
        out.push('\'');
        Ok(())
    }

    /// Render a TIMESTAMP literal.
    fn write_value_timestamp(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) -> Result<()> {
        out.push('\'');
        self.write_date_text(out, &value.date());
        out.push(' ');
        self.write_time_text(out, &value.time());
        out.push('\'');
        Ok(())
    }

    /// Render a TIMESTAMP WITH TIME ZONE literal, with its offset or converted to UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) -> Result<()> {
        match self.descriptor().timestamp_tz {
            TimestampTzStyle::Offset => {
                out.push('\'');
                self.write_date_text(out, &value.date());
                out.push(' ');
                self.write_time_text(out, &value.time());
                self.write_offset_text(out, &value.offset());
                out.push('\'');
                Ok(())
            }
            TimestampTzStyle::Utc => {
                let value = value.to_offset(UtcOffset::UTC);
                self.write_value_timestamp(
                    context,
                    out,
                    &PrimitiveDateTime::new(value.date(), value.time()),
                )
            }
        }
    }

    /// Render a JSON document as an escaped string.
    fn write_value_json(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &serde_json::Value,
    ) -> Result<()> {
        self.write_value_string(context, out, &value.to_string())
    }

    /// Render list literal as a parenthesized tuple.
    fn write_value_list(&self, context: &mut Context, out: &mut String, value: &[Value]) -> Result<()> {
        out.push('(');
        if value.is_empty() {
            out.push_str("NULL");
        } else {
            try_separated_by(out, value, |out, v| self.write_value(context, out, v), ", ")?;
        }
        out.push(')');
        Ok(())
    }

    /// Render a value substituted for a replacement, lists become comma separated values.
    fn write_replacement(&self, context: &mut Context, out: &mut String, value: &Value) -> Result<()> {
        match value {
            Value::List(values) if values.is_empty() => {
                self.write_value_none(context, out);
                Ok(())
            }
            Value::List(values) => {
                try_separated_by(out, values, |out, v| self.write_value(context, out, v), ", ")
            }
            _ => self.write_value(context, out, value),
        }
    }

    /// Precedence table for unary operators.
    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    /// Precedence table for binary operators.
    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::In => 400,
            BinaryOpType::NotIn => 400,
            BinaryOpType::BitwiseOr => 500,
            BinaryOpType::BitwiseAnd => 600,
            BinaryOpType::Subtraction => 800,
            BinaryOpType::Addition => 800,
            BinaryOpType::Concat => 800,
            BinaryOpType::Multiplication => 900,
            BinaryOpType::Division => 900,
            BinaryOpType::Remainder => 900,
        }
    }

    /// Infix token of a binary operator.
    fn expression_binary_op_token(&self, value: &BinaryOpType) -> &'static str {
        match value {
            BinaryOpType::Multiplication => " * ",
            BinaryOpType::Division => " / ",
            BinaryOpType::Remainder => " % ",
            BinaryOpType::Addition => " + ",
            BinaryOpType::Subtraction => " - ",
            BinaryOpType::Concat => " || ",
            BinaryOpType::BitwiseAnd => " & ",
            BinaryOpType::BitwiseOr => " | ",
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::In => " IN ",
            BinaryOpType::NotIn => " NOT IN ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " <> ",
            BinaryOpType::Less => " < ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        }
    }

    /// Render any expression node.
    fn write_expression(&self, context: &mut Context, out: &mut String, value: &Expr) -> Result<()> {
        match value {
            Expr::Identifier(parts) => try_separated_by(
                out,
                parts,
                |out, v| {
                    if v == "*" {
                        out.push('*');
                        Ok(())
                    } else {
                        self.write_identifier_quoted(context, out, v)
                    }
                },
                ".",
            ),
            Expr::Literal(v) => self.write_expression_literal(context, out, v),
            Expr::Column(v) => self.write_column_ref(context, out, v),
            Expr::Function(v) => self.write_expression_function(context, out, v),
            Expr::Unary(v) => self.write_expression_unary_op(context, out, v),
            Expr::Binary(v) => self.write_expression_binary_op(context, out, v),
            Expr::Group(op, children) => self.write_expression_group(context, out, *op, children),
            Expr::Cast(v, data_type) => self.write_expression_cast(context, out, v, data_type),
            Expr::JsonPath(v) => self.write_expression_json_path(context, out, v),
            Expr::Raw(v) => self.write_expression_raw(context, out, v),
            Expr::Bind(v) => {
                context.binds.push(out, v.clone());
                Ok(())
            }
            Expr::List(values) => {
                out.push('(');
                if values.is_empty() {
                    self.write_value_none(context, out);
                } else {
                    try_separated_by(
                        out,
                        values,
                        |out, v| self.write_expression(context, out, v),
                        ", ",
                    )?;
                }
                out.push(')');
                Ok(())
            }
            Expr::Alias(v, alias) => {
                if context.fragment == Fragment::SqlSelectOrderBy {
                    return self.write_expression(context, out, v);
                }
                self.write_expression(context, out, v)?;
                out.push_str(" AS ");
                self.write_identifier_quoted(context, out, alias)
            }
            Expr::Asterisk => {
                out.push('*');
                Ok(())
            }
            Expr::Default => {
                out.push_str("DEFAULT");
                Ok(())
            }
        }
    }

    /// Render a literal, sent through a placeholder when the statement binds values.
    fn write_expression_literal(&self, context: &mut Context, out: &mut String, value: &Value) -> Result<()> {
        if context.bind_values
            && !value.is_null()
            && matches!(
                context.fragment,
                Fragment::SqlInsertIntoValues | Fragment::SqlUpdateSet | Fragment::SqlUpsert
            )
        {
            context.binds.push(out, value.clone());
            return Ok(());
        }
        self.write_value(context, out, value)
    }

    /// Render a function call, checking the arity of the well known functions.
    fn write_expression_function(&self, context: &mut Context, out: &mut String, value: &Function) -> Result<()> {
        let name = value.name.as_ref();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(SqlError::invalid_identifier(
                name,
                "function names are made of letters, digits, underscores and dots",
            )
            .into());
        }
        if let Some(arity) = function_arity(name) {
            if !arity.accepts(value.args.len()) {
                let expected = match arity.max {
                    Some(max) if max == arity.min => max.to_string(),
                    Some(max) => format!("{} to {}", arity.min, max),
                    None => format!("at least {}", arity.min),
                };
                return Err(SqlError::invalid_option(
                    "function call",
                    self.dialect(),
                    format!(
                        "{} expects {} arguments, {} given",
                        arity.name,
                        expected,
                        value.args.len()
                    ),
                )
                .into());
            }
        }
        match self.descriptor().function_alias(name) {
            Some(alias) if alias.bare => {
                out.push_str(alias.target);
                return Ok(());
            }
            Some(alias) => out.push_str(alias.target),
            None => out.push_str(name),
        }
        out.push('(');
        try_separated_by(
            out,
            &value.args,
            |out, v| self.write_expression(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render unary operator expression.
    fn write_expression_unary_op(&self, context: &mut Context, out: &mut String, value: &UnaryOp) -> Result<()> {
        match value.op {
            UnaryOpType::Negative => out.push('-'),
            UnaryOpType::Not => out.push_str("NOT "),
        };
        possibly_parenthesized!(
            out,
            value.arg.precedence(self.as_dyn()) <= self.expression_unary_op_precedence(&value.op),
            self.write_expression(context, out, &value.arg)?
        );
        Ok(())
    }

    /// Render binary operator expression handling precedence / parenthesis.
    fn write_expression_binary_op(&self, context: &mut Context, out: &mut String, value: &BinaryOp) -> Result<()> {
        if matches!(value.op, BinaryOpType::In | BinaryOpType::NotIn) {
            let empty = match &value.rhs {
                Expr::List(v) => v.is_empty(),
                Expr::Literal(Value::List(v)) => v.is_empty(),
                _ => false,
            };
            if empty {
                // Nothing is in an empty list
                out.push_str(if value.op == BinaryOpType::In {
                    "1=0"
                } else {
                    "1=1"
                });
                return Ok(());
            }
        }
        if value.op == BinaryOpType::Concat {
            return self.write_expression_concat(context, out, &value.lhs, &value.rhs);
        }
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, &value.lhs)?
        );
        out.push_str(self.expression_binary_op_token(&value.op));
        match (&value.op, &value.rhs) {
            (BinaryOpType::In | BinaryOpType::NotIn, Expr::Literal(Value::List(values))) => {
                out.push('(');
                try_separated_by(out, values, |out, v| self.write_value(context, out, v), ", ")?;
                out.push(')');
            }
            _ => {
                possibly_parenthesized!(
                    out,
                    value.rhs.precedence(self.as_dyn()) <= precedence,
                    self.write_expression(context, out, &value.rhs)?
                );
            }
        }
        Ok(())
    }

    /// Render string concatenation.
    fn write_expression_concat(&self, context: &mut Context, out: &mut String, lhs: &Expr, rhs: &Expr) -> Result<()> {
        let precedence = self.expression_binary_op_precedence(&BinaryOpType::Concat);
        possibly_parenthesized!(
            out,
            lhs.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, lhs)?
        );
        out.push_str(self.expression_binary_op_token(&BinaryOpType::Concat));
        possibly_parenthesized!(
            out,
            rhs.precedence(self.as_dyn()) <= precedence,
            self.write_expression(context, out, rhs)?
        );
        Ok(())
    }

    /// Render `AND` / `OR` groups, empty groups are the identity of their operator.
    fn write_expression_group(
        &self,
        context: &mut Context,
        out: &mut String,
        op: LogicalOp,
        children: &[Expr],
    ) -> Result<()> {
        let (binary, infix) = match op {
            LogicalOp::And => (BinaryOpType::And, " AND "),
            LogicalOp::Or => (BinaryOpType::Or, " OR "),
        };
        match children {
            [] => {
                out.push_str(match op {
                    LogicalOp::And => "1=1",
                    LogicalOp::Or => "1=0",
                });
                Ok(())
            }
            [child] => self.write_expression(context, out, child),
            _ => {
                let precedence = self.expression_binary_op_precedence(&binary);
                try_separated_by(
                    out,
                    children,
                    |out, v| {
                        possibly_parenthesized!(
                            out,
                            v.precedence(self.as_dyn()) < precedence,
                            self.write_expression(context, out, v)?
                        );
                        Ok(())
                    },
                    infix,
                )
            }
        }
    }

    /// Render `CAST(x AS type)`.
    fn write_expression_cast(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expr,
        data_type: &DataType,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::Casting);
        out.push_str("CAST(");
        self.write_expression(&mut context, out, value)?;
        out.push_str(" AS ");
        self.write_cast_type(&mut context, out, data_type)?;
        out.push(')');
        Ok(())
    }

    /// Render the target type of a cast.
    fn write_cast_type(&self, context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        self.write_data_type(context, out, value)
    }

    /// Render the SQL type of a column.
    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) -> Result<()> {
        match value {
            DataType::Array(..) => {
                return Err(
                    SqlError::feature_not_supported("array columns", self.dialect()).into(),
                );
            }
            DataType::Enum(..) => {
                return Err(
                    SqlError::feature_not_supported("enum columns", self.dialect()).into(),
                );
            }
            DataType::Varchar(None) => out.push_str("VARCHAR(255)"),
            _ => {
                let _ = write!(out, "{value}");
            }
        }
        Ok(())
    }

    /// Render JSON navigation.
    fn write_expression_json_path(&self, context: &mut Context, out: &mut String, value: &JsonPath) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::JsonPath);
        match self.descriptor().supports.json {
            JsonStyle::Unsupported => {
                return Err(SqlError::feature_not_supported(
                    "JSON path navigation",
                    self.dialect(),
                )
                .into());
            }
            JsonStyle::Operators => {
                possibly_parenthesized!(
                    out,
                    value.base.precedence(self.as_dyn()) < 1000,
                    self.write_expression(&mut context, out, &value.base)?
                );
                match value.path.as_slice() {
                    [segment] => {
                        out.push_str(if value.unquote { " ->> " } else { " -> " });
                        match segment {
                            crate::PathSegment::Key(key) => {
                                self.write_value_string(&mut context, out, key)?
                            }
                            crate::PathSegment::Index(i) => write_integer!(out, *i),
                        }
                    }
                    _ => {
                        out.push_str(if value.unquote { " #>> " } else { " #> " });
                        self.write_value_string(&mut context, out, &value.brace_notation())?;
                    }
                }
            }
            JsonStyle::Extract => {
                if value.unquote {
                    out.push_str("json_unquote(");
                }
                out.push_str("json_extract(");
                self.write_expression(&mut context, out, &value.base)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, &value.dollar_notation())?;
                out.push(')');
                if value.unquote {
                    out.push(')');
                }
            }
            JsonStyle::ArrowExtract => {
                if value.unquote {
                    out.push_str("json_extract(");
                    self.write_expression(&mut context, out, &value.base)?;
                    out.push_str(", ");
                    self.write_value_string(&mut context, out, &value.dollar_notation())?;
                    out.push(')');
                } else {
                    possibly_parenthesized!(
                        out,
                        value.base.precedence(self.as_dyn()) < 1000,
                        self.write_expression(&mut context, out, &value.base)?
                    );
                    out.push_str(" -> ");
                    self.write_value_string(&mut context, out, &value.dollar_notation())?;
                }
            }
            JsonStyle::JsonValue => {
                ensure_supported!(value.unquote, "JSON values other than text", self.dialect());
                out.push_str("JSON_VALUE(");
                self.write_expression(&mut context, out, &value.base)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, &value.dollar_notation())?;
                out.push(')');
            }
            JsonStyle::GetPath => {
                out.push_str("GET_PATH(");
                self.write_expression(&mut context, out, &value.base)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, &value.dotted_notation())?;
                out.push(')');
                if value.unquote {
                    out.push_str("::STRING");
                }
            }
        }
        Ok(())
    }

    /// Render raw SQL substituting its `:name` replacements and `$name` bind parameters.
    fn write_expression_raw(&self, context: &mut Context, out: &mut String, value: &RawSql) -> Result<()> {
        let scan_for = ScanFor {
            named: true,
            positional: false,
            binds: context.bind_params.is_some(),
        };
        let tokens = scan_raw(&value.sql, self.descriptor(), scan_for)?;
        let mut context = context.switch_fragment(Fragment::Raw);
        self.write_raw_tokens(&mut context, out, &tokens, &value.replacements)
    }

    /// Write scanned raw SQL, `local` replacements take precedence over the statement ones.
    fn write_raw_tokens(
        &self,
        context: &mut Context,
        out: &mut String,
        tokens: &[RawToken],
        local: &BTreeMap<String, Value>,
    ) -> Result<()> {
        let mut used_local = BTreeSet::new();
        for token in tokens {
            match token {
                RawToken::Text(v) => out.push_str(v),
                RawToken::Named(name) => {
                    if let Some(value) = local.get(*name) {
                        used_local.insert(*name);
                        self.write_replacement(context, out, value)?;
                        continue;
                    }
                    let value = match context.replacements {
                        Some(Replacements::Named(values)) => values.get(*name),
                        _ => None,
                    };
                    let Some(value) = value else {
                        return Err(SqlError::unbound_replacement(
                            format!(":{name}"),
                            "no replacement value is supplied",
                        )
                        .into());
                    };
                    context.used_replacements.insert(name.to_string());
                    self.write_replacement(context, out, value)?;
                }
                RawToken::Positional => {
                    let Some(Replacements::Positional(values)) = context.replacements else {
                        return Err(SqlError::unbound_replacement(
                            "?",
                            "no positional replacements are supplied",
                        )
                        .into());
                    };
                    let Some(value) = values.get(context.positional_consumed) else {
                        return Err(SqlError::unbound_replacement(
                            "?",
                            format!(
                                "{} positional replacements supplied, more are referenced",
                                values.len()
                            ),
                        )
                        .into());
                    };
                    context.positional_consumed += 1;
                    self.write_replacement(context, out, value)?;
                }
                RawToken::Bind(key) => {
                    let Some(value) = context.bind_params.and_then(|v| v.get(key)) else {
                        return Err(SqlError::unbound_replacement(
                            format!("${key}"),
                            "no bind parameter is supplied",
                        )
                        .into());
                    };
                    context.used_bind_params.insert(key.to_string());
                    context.binds.push_param(out, key, value)?;
                }
            }
        }
        if let Some(unused) = local.keys().find(|k| !used_local.contains(k.as_str())) {
            return Err(SqlError::unbound_replacement(
                format!(":{unused}"),
                "the replacement is never referenced",
            )
            .into());
        }
        Ok(())
    }

    /// Render ordered expression inside ORDER BY.
    fn write_expression_ordered(&self, context: &mut Context, out: &mut String, value: &Ordered) -> Result<()> {
        self.write_expression(context, out, &value.expression)?;
        out.push_str(match value.order {
            Order::ASC => " ASC",
            Order::DESC => " DESC",
        });
        if let Some(nulls) = value.nulls {
            ensure_supported!(
                self.descriptor().supports.nulls_ordering,
                "NULLS FIRST / NULLS LAST",
                self.dialect()
            );
            out.push_str(match nulls {
                Nulls::First => " NULLS FIRST",
                Nulls::Last => " NULLS LAST",
            });
        }
        Ok(())
    }

    /// Render the join keyword.
    fn write_join_type(&self, _context: &mut Context, out: &mut String, join_type: &JoinType) {
        out.push_str(match join_type {
            JoinType::Default => "JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Outer => "FULL OUTER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::Natural => "NATURAL JOIN",
        });
    }

    /// Render a join clause.
    fn write_join(&self, context: &mut Context, out: &mut String, join: &Join) -> Result<()> {
        self.write_join_type(context, out, &join.join);
        out.push(' ');
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        self.write_table_ref(&mut context, out, &join.table)?;
        if let Some(on) = &join.on {
            out.push_str(" ON ");
            self.write_expression(&mut context, out, on)?;
        }
        Ok(())
    }

    /// Render a LIMIT / OFFSET amount.
    fn write_row_count(&self, context: &mut Context, out: &mut String, value: &RowCount) -> Result<()> {
        match value {
            RowCount::Count(v) => {
                write_integer!(out, *v);
                Ok(())
            }
            RowCount::Expr(v) => self.write_expression(context, out, v),
        }
    }

    /// Render the pagination clause, a zero offset is the same as no offset.
    fn write_limit_offset(
        &self,
        context: &mut Context,
        out: &mut String,
        limit: Option<&RowCount>,
        offset: Option<&RowCount>,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        let offset = offset.filter(|v| !v.is_zero());
        if limit.is_some_and(RowCount::is_zero) {
            ensure_supported!(supports.zero_limit, "LIMIT 0", self.dialect());
        }
        let mut context = context.switch_fragment(Fragment::Limit);
        match supports.limit {
            LimitStyle::Unsupported => {
                ensure_supported!(
                    limit.is_none() && offset.is_none(),
                    "LIMIT / OFFSET",
                    self.dialect()
                );
            }
            LimitStyle::LimitOffset { unbounded_limit } => {
                if let Some(limit) = limit {
                    out.push_str(" LIMIT ");
                    self.write_row_count(&mut context, out, limit)?;
                } else if let (Some(..), Some(unbounded)) = (offset, unbounded_limit) {
                    out.push_str(" LIMIT ");
                    out.push_str(unbounded);
                }
                if let Some(offset) = offset {
                    out.push_str(" OFFSET ");
                    self.write_row_count(&mut context, out, offset)?;
                }
            }
            LimitStyle::OffsetFetch {
                offset_required, ..
            } => {
                if let Some(offset) = offset {
                    out.push_str(" OFFSET ");
                    self.write_row_count(&mut context, out, offset)?;
                    out.push_str(" ROWS");
                } else if limit.is_some() && offset_required {
                    out.push_str(" OFFSET 0 ROWS");
                }
                if let Some(limit) = limit {
                    out.push_str(" FETCH NEXT ");
                    self.write_row_count(&mut context, out, limit)?;
                    out.push_str(" ROWS ONLY");
                }
            }
        }
        Ok(())
    }

    /// Render the row locking clause.
    fn write_lock(&self, context: &mut Context, out: &mut String, lock: &Lock) -> Result<()> {
        let support = self.descriptor().supports.lock;
        match lock.strength {
            LockStrength::Update => {
                ensure_supported!(support.for_update, "FOR UPDATE", self.dialect());
                out.push_str(" FOR UPDATE");
            }
            LockStrength::Share => {
                let Some(keyword) = support.for_share else {
                    return Err(
                        SqlError::feature_not_supported("FOR SHARE", self.dialect()).into(),
                    );
                };
                out.push(' ');
                out.push_str(keyword);
            }
        }
        if !lock.of.is_empty() {
            out.push_str(" OF ");
            try_separated_by(
                out,
                &lock.of,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            )?;
        }
        match lock.wait {
            Some(LockWait::SkipLocked) => {
                ensure_supported!(support.skip_locked, "SKIP LOCKED", self.dialect());
                out.push_str(" SKIP LOCKED");
            }
            Some(LockWait::NoWait) => {
                ensure_supported!(support.no_wait, "NOWAIT", self.dialect());
                out.push_str(" NOWAIT");
            }
            None => {}
        }
        Ok(())
    }

    /// Render `WITH (…)` table hints.
    fn write_table_hints(&self, _context: &mut Context, out: &mut String, hints: &[TableHint]) -> Result<()> {
        if hints.is_empty() {
            return Ok(());
        }
        ensure_supported!(
            self.descriptor().supports.table_hints,
            "table hints",
            self.dialect()
        );
        out.push_str(" WITH (");
        try_separated_by(
            out,
            hints,
            |out, v| {
                self.write_keyword_option(out, "table hint", &v.0)?;
                Ok(())
            },
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render `USE INDEX (…)` style index hints.
    fn write_index_hints(&self, context: &mut Context, out: &mut String, hints: &[IndexHint]) -> Result<()> {
        if hints.is_empty() {
            return Ok(());
        }
        ensure_supported!(
            self.descriptor().supports.index_hints,
            "index hints",
            self.dialect()
        );
        for hint in hints {
            out.push_str(match hint.hint {
                IndexHintType::Use => " USE INDEX (",
                IndexHintType::Force => " FORCE INDEX (",
                IndexHintType::Ignore => " IGNORE INDEX (",
            });
            try_separated_by(
                out,
                &hint.indexes,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            )?;
            out.push(')');
        }
        Ok(())
    }

    /// Write a keyword like option (engine, charset, hint) unquoted, only word characters are accepted.
    fn write_keyword_option(&self, out: &mut String, option: &'static str, value: &str) -> Result<()> {
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        {
            return Err(SqlError::invalid_option(
                option,
                self.dialect(),
                format!("`{}` is not a valid {option}", truncate_long!(value)),
            )
            .into());
        }
        out.push_str(value);
        Ok(())
    }

    /// Fails listing the options that were requested but have no meaning for the dialect.
    fn reject_unsupported_options(
        &self,
        operation: &'static str,
        options: &[(&'static str, bool, bool)],
    ) -> Result<()> {
        let rejected = options
            .iter()
            .filter(|(_, requested, supported)| *requested && !supported)
            .map(|(name, ..)| *name)
            .collect::<Vec<_>>();
        if rejected.is_empty() {
            return Ok(());
        }
        Err(SqlError::invalid_option(
            operation,
            self.dialect(),
            format!("unsupported options: {}", rejected.join(", ")),
        )
        .into())
    }

    /// Render a SELECT statement.
    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &SelectOptions,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        context.qualify_columns = !options.joins.is_empty() || !table.alias.is_empty();
        context.qualifier = Some(table.owned_qualifier());
        out.push_str("SELECT ");
        if options.distinct {
            out.push_str("DISTINCT ");
        }
        if options.attributes.is_empty() {
            out.push('*');
        } else {
            try_separated_by(
                out,
                &options.attributes,
                |out, v| self.write_expression(&mut context, out, v),
                ", ",
            )?;
        }
        out.push_str(" FROM ");
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
            self.write_table_ref(&mut context, out, table)?;
        }
        self.write_table_hints(&mut context, out, &options.table_hints)?;
        self.write_index_hints(&mut context, out, &options.index_hints)?;
        for join in &options.joins {
            out.push(' ');
            self.write_join(&mut context, out, join)?;
        }
        if let Some(condition) = &options.condition {
            out.push_str(" WHERE ");
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            self.write_expression(&mut context, out, condition)?;
        }
        if !options.group_by.is_empty() {
            out.push_str(" GROUP BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectGroupBy);
            try_separated_by(
                out,
                &options.group_by,
                |out, v| self.write_expression(&mut context, out, v),
                ", ",
            )?;
        }
        if let Some(having) = &options.having {
            out.push_str(" HAVING ");
            let mut context = context.switch_fragment(Fragment::SqlSelectHaving);
            self.write_expression(&mut context, out, having)?;
        }
        let paginated = options.limit.is_some() || options.offset.as_ref().is_some_and(|v| !v.is_zero());
        let order = match self.descriptor().supports.limit {
            LimitStyle::OffsetFetch {
                order_required: true,
                ..
            } if paginated && options.order.is_empty() => {
                let order = context
                    .model
                    .map(|model| {
                        model
                            .primary_keys()
                            .map(|v| Ordered::asc(Expr::col(v.name.clone())))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                if order.is_empty() {
                    return Err(SqlError::invalid_option(
                        "select",
                        self.dialect(),
                        "OFFSET / FETCH needs an ORDER BY, supply one or a model with a primary key",
                    )
                    .into());
                }
                Cow::Owned(order)
            }
            _ => Cow::Borrowed(options.order.as_slice()),
        };
        if !order.is_empty() {
            out.push_str(" ORDER BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            try_separated_by(
                out,
                order.iter(),
                |out, v| self.write_expression_ordered(&mut context, out, v),
                ", ",
            )?;
        }
        self.write_limit_offset(
            &mut context,
            out,
            options.limit.as_ref(),
            options.offset.as_ref(),
        )?;
        if let Some(lock) = &options.lock {
            self.write_lock(&mut context, out, lock)?;
        }
        Ok(())
    }

    /// Fails when the dialect cannot return rows from the modification.
    fn check_returning(&self, returning: &ReturnValues, modification: Modification) -> Result<()> {
        if returning.is_none() {
            return Ok(());
        }
        let support = self.descriptor().supports.returning;
        let supported = support.style != ReturningStyle::Unsupported
            && match modification {
                Modification::Insert => support.insert,
                Modification::Update => support.update,
                Modification::Delete => support.delete,
            };
        ensure_supported!(supported, modification.returning_feature(), self.dialect());
        Ok(())
    }

    /// Render the returned columns, each one preceded by `prefix`.
    fn write_returning_columns(
        &self,
        context: &mut Context,
        out: &mut String,
        returning: &ReturnValues,
        prefix: &str,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlReturning);
        match returning {
            ReturnValues::None => {}
            ReturnValues::Columns(columns) if !columns.is_empty() => {
                try_separated_by(
                    out,
                    columns,
                    |out, v| {
                        out.push_str(prefix);
                        self.write_column_name(&mut context, out, v)
                    },
                    ", ",
                )?;
            }
            _ => {
                out.push_str(prefix);
                out.push('*');
            }
        }
        Ok(())
    }

    /// `OUTPUT INSERTED.*` placed before the values or the condition.
    fn write_returning_output(
        &self,
        context: &mut Context,
        out: &mut String,
        returning: &ReturnValues,
        modification: Modification,
    ) -> Result<()> {
        if returning.is_none() || self.descriptor().supports.returning.style != ReturningStyle::Output {
            return Ok(());
        }
        out.push_str(" OUTPUT ");
        let prefix = format!("{}.", modification.output_table());
        self.write_returning_columns(context, out, returning, &prefix)
    }

    /// `RETURNING …` closing the statement, or the parenthesis of a `FINAL TABLE` wrapper.
    fn write_returning_suffix(&self, context: &mut Context, out: &mut String, returning: &ReturnValues) -> Result<()> {
        if returning.is_none() {
            return Ok(());
        }
        match self.descriptor().supports.returning.style {
            ReturningStyle::Returning => {
                out.push_str(" RETURNING ");
                self.write_returning_columns(context, out, returning, "")
            }
            ReturningStyle::FinalTable => {
                out.push(')');
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `SELECT … FROM FINAL TABLE (` wrapping the modification.
    fn write_returning_prefix(
        &self,
        context: &mut Context,
        out: &mut String,
        returning: &ReturnValues,
        modification: Modification,
    ) -> Result<()> {
        if returning.is_none() || self.descriptor().supports.returning.style != ReturningStyle::FinalTable {
            return Ok(());
        }
        out.push_str("SELECT ");
        self.write_returning_columns(context, out, returning, "")?;
        out.push_str(match modification {
            Modification::Delete => " FROM OLD TABLE (",
            _ => " FROM FINAL TABLE (",
        });
        Ok(())
    }

    /// Render `key IN (SELECT key FROM table WHERE … LIMIT n)` restricting a modification to `limit` rows.
    fn write_primary_key_subquery(
        &self,
        context: &mut Context,
        out: &mut String,
        operation: &'static str,
        table: &TableRef,
        condition: Option<&Expr>,
        limit: u64,
    ) -> Result<()> {
        let mut keys = context
            .model
            .map(|model| {
                model
                    .primary_keys()
                    .map(|v| Expr::col(v.name.clone()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if keys.is_empty() {
            let Some(identifier) = self.row_identifier() else {
                return Err(SqlError::invalid_option(
                    operation,
                    self.dialect(),
                    "a row limit needs a model with a primary key",
                )
                .into());
            };
            keys.push(Expr::raw(identifier));
        }
        let target = match keys.as_slice() {
            [key] => key.clone(),
            _ => Expr::List(keys.clone()),
        };
        self.write_expression(context, out, &target)?;
        out.push_str(" IN (");
        let options = SelectOptions {
            attributes: keys,
            condition: condition.cloned(),
            limit: Some(RowCount::Count(limit)),
            ..Default::default()
        };
        self.write_select(context, out, &table.unaliased(), &options)?;
        out.push(')');
        Ok(())
    }

    /// Implicit row identifier pseudo column, written unquoted, used when the model has no primary key.
    fn row_identifier(&self) -> Option<&'static str> {
        None
    }

    /// Render an INSERT, rows beyond the dialect maximum are split into several statements.
    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        rows: &[Row],
        options: &InsertOptions,
    ) -> Result<()> {
        if rows.is_empty() {
            return Err(SqlError::invalid_option(
                "insert",
                self.dialect(),
                "at least one row is required",
            )
            .into());
        }
        if options.ignore_duplicates && options.on_conflict.is_some() {
            return Err(SqlError::invalid_option(
                "insert",
                self.dialect(),
                "ignore_duplicates cannot be combined with on_conflict",
            )
            .into());
        }
        self.check_returning(&options.returning, Modification::Insert)?;
        let columns = row_columns(rows);
        if columns.is_empty() && rows.len() > 1 {
            return Err(SqlError::invalid_option(
                "insert",
                self.dialect(),
                "rows without values cannot be inserted in bulk",
            )
            .into());
        }
        let chunk = self
            .descriptor()
            .supports
            .max_insert_rows
            .unwrap_or(rows.len())
            .max(1);
        for (i, rows) in rows.chunks(chunk).enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            self.write_insert_statement(context, out, table, &columns, rows, options)?;
        }
        Ok(())
    }

    /// Render one INSERT statement over `columns`, missing cells are filled.
    fn write_insert_statement(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        columns: &[&str],
        rows: &[Row],
        options: &InsertOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.write_returning_prefix(context, out, &options.returning, Modification::Insert)?;
        if options.ignore_duplicates {
            out.push_str(match supports.ignore_duplicates {
                IgnoreDuplicates::InsertIgnore => "INSERT IGNORE INTO ",
                IgnoreDuplicates::InsertOrIgnore => "INSERT OR IGNORE INTO ",
                IgnoreDuplicates::OnConflictDoNothing => "INSERT INTO ",
                IgnoreDuplicates::Unsupported => {
                    return Err(SqlError::feature_not_supported(
                        "ignoring duplicates on INSERT",
                        self.dialect(),
                    )
                    .into());
                }
            });
        } else {
            out.push_str("INSERT INTO ");
        }
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertInto);
            self.write_table_name(&mut context, out, table)?;
        }
        if columns.is_empty() {
            match supports.default_values {
                DefaultValuesStyle::DefaultValues => {
                    self.write_returning_output(context, out, &options.returning, Modification::Insert)?;
                    out.push_str(" DEFAULT VALUES");
                }
                DefaultValuesStyle::EmptyValues => {
                    self.write_returning_output(context, out, &options.returning, Modification::Insert)?;
                    out.push_str(" VALUES ()");
                }
                DefaultValuesStyle::Unsupported => {
                    return Err(SqlError::feature_not_supported(
                        "INSERT of default values only",
                        self.dialect(),
                    )
                    .into());
                }
            }
        } else {
            out.push_str(" (");
            try_separated_by(
                out,
                columns,
                |out, v| self.write_column_name(context, out, v),
                ", ",
            )?;
            out.push(')');
            self.write_returning_output(context, out, &options.returning, Modification::Insert)?;
            out.push_str(" VALUES ");
            let missing = if supports.bulk_default { "DEFAULT" } else { "NULL" };
            let mut values = context.switch_fragment(Fragment::SqlInsertIntoValues);
            try_separated_by(
                out,
                rows,
                |out, row| {
                    out.push('(');
                    try_separated_by(
                        out,
                        columns,
                        |out, column| match row.iter().find(|(k, _)| *k == **column) {
                            Some((_, v)) => self.write_expression(&mut values, out, v),
                            None => {
                                out.push_str(missing);
                                Ok(())
                            }
                        },
                        ", ",
                    )?;
                    out.push(')');
                    Ok(())
                },
                ", ",
            )?;
        }
        if options.ignore_duplicates && supports.ignore_duplicates == IgnoreDuplicates::OnConflictDoNothing {
            out.push_str(" ON CONFLICT DO NOTHING");
        }
        if let Some(on_conflict) = &options.on_conflict {
            self.write_on_conflict(context, out, columns, on_conflict)?;
        }
        self.write_returning_suffix(context, out, &options.returning)
    }

    /// Render the conflict handling clause of an INSERT.
    fn write_on_conflict(
        &self,
        context: &mut Context,
        out: &mut String,
        columns: &[&str],
        on_conflict: &OnConflict,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoOnConflict);
        match self.descriptor().supports.upsert {
            UpsertStyle::OnConflict => {
                let target = conflict_target(context.model, &on_conflict.conflict_fields);
                out.push_str(" ON CONFLICT");
                if !target.is_empty() {
                    out.push_str(" (");
                    try_separated_by(
                        out,
                        &target,
                        |out, v| self.write_column_name(&mut context, out, v),
                        ", ",
                    )?;
                    out.push(')');
                    if let Some(condition) = &on_conflict.conflict_where {
                        out.push_str(" WHERE ");
                        self.write_expression(&mut context, out, condition)?;
                    }
                } else if on_conflict.conflict_where.is_some() {
                    return Err(SqlError::invalid_option(
                        "insert",
                        self.dialect(),
                        "conflict_where needs a conflict target",
                    )
                    .into());
                }
                if on_conflict.update_fields.is_empty() {
                    out.push_str(" DO NOTHING");
                    return Ok(());
                }
                if target.is_empty() {
                    return Err(SqlError::invalid_option(
                        "insert",
                        self.dialect(),
                        "ON CONFLICT DO UPDATE needs conflict fields or a model with a primary key",
                    )
                    .into());
                }
                out.push_str(" DO UPDATE SET ");
                try_separated_by(
                    out,
                    &on_conflict.update_fields,
                    |out, v| {
                        self.write_column_name(&mut context, out, v)?;
                        out.push_str(" = EXCLUDED.");
                        self.write_column_name(&mut context, out, v)
                    },
                    ", ",
                )?;
                if let Some(condition) = &on_conflict.update_where {
                    out.push_str(" WHERE ");
                    self.write_expression(&mut context, out, condition)?;
                }
            }
            UpsertStyle::OnDuplicateKey => {
                if on_conflict.conflict_where.is_some() || on_conflict.update_where.is_some() {
                    return Err(SqlError::invalid_option(
                        "insert",
                        self.dialect(),
                        "conflict_where and update_where have no equivalent in ON DUPLICATE KEY UPDATE",
                    )
                    .into());
                }
                out.push_str(" ON DUPLICATE KEY UPDATE ");
                if on_conflict.update_fields.is_empty() {
                    // No-op assignment keeps the existing row
                    let Some(column) = columns.first() else {
                        return Err(SqlError::invalid_option(
                            "insert",
                            self.dialect(),
                            "ON DUPLICATE KEY UPDATE needs at least one column",
                        )
                        .into());
                    };
                    self.write_column_name(&mut context, out, column)?;
                    out.push_str(" = ");
                    self.write_column_name(&mut context, out, column)?;
                } else {
                    try_separated_by(
                        out,
                        &on_conflict.update_fields,
                        |out, v| {
                            self.write_column_name(&mut context, out, v)?;
                            out.push_str(" = VALUES(");
                            self.write_column_name(&mut context, out, v)?;
                            out.push(')');
                            Ok(())
                        },
                        ", ",
                    )?;
                }
            }
            _ => {
                return Err(
                    SqlError::feature_not_supported("ON CONFLICT on INSERT", self.dialect())
                        .into(),
                );
            }
        }
        Ok(())
    }

    /// Render an UPDATE.
    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        values: &Row,
        condition: Option<&Expr>,
        options: &UpdateOptions,
    ) -> Result<()> {
        if values.is_empty() {
            return Err(SqlError::invalid_option(
                "update",
                self.dialect(),
                "at least one value is required",
            )
            .into());
        }
        self.check_returning(&options.returning, Modification::Update)?;
        let row_limit = match options.limit {
            Some(limit) => {
                let Some(style) = self.descriptor().supports.update_limit else {
                    return Err(
                        SqlError::feature_not_supported("UPDATE with LIMIT", self.dialect())
                            .into(),
                    );
                };
                Some((style, limit))
            }
            None => None,
        };
        self.write_returning_prefix(context, out, &options.returning, Modification::Update)?;
        out.push_str("UPDATE ");
        if let Some((RowLimit::Top, limit)) = row_limit {
            out.push_str("TOP(");
            write_integer!(out, limit);
            out.push_str(") ");
        }
        self.write_table_name(context, out, table)?;
        out.push_str(" SET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            try_separated_by(
                out,
                values,
                |out, (k, v)| {
                    self.write_column_name(&mut context, out, k)?;
                    out.push_str(" = ");
                    self.write_expression(&mut context, out, v)
                },
                ", ",
            )?;
        }
        self.write_returning_output(context, out, &options.returning, Modification::Update)?;
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
            match row_limit {
                Some((RowLimit::Subquery, limit)) => {
                    out.push_str(" WHERE ");
                    self.write_primary_key_subquery(
                        &mut context,
                        out,
                        "update",
                        table,
                        condition,
                        limit,
                    )?;
                }
                _ => {
                    if let Some(condition) = condition {
                        out.push_str(" WHERE ");
                        self.write_expression(&mut context, out, condition)?;
                    }
                }
            }
        }
        if let Some((RowLimit::Limit, limit)) = row_limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
        self.write_returning_suffix(context, out, &options.returning)
    }

    /// Render `SET col = col + by` for every increment, `extra` values are assigned as is.
    fn write_increment(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        increments: &Row,
        extra: &Row,
        condition: Option<&Expr>,
        options: &UpdateOptions,
    ) -> Result<()> {
        if increments.is_empty() {
            return Err(SqlError::invalid_option(
                "increment",
                self.dialect(),
                "at least one field to increment is required",
            )
            .into());
        }
        let values = increments
            .iter()
            .map(|(k, v)| (k.clone(), Expr::col(k.clone()).add(v.clone())))
            .chain(extra.iter().cloned())
            .collect::<Row>();
        self.write_update(context, out, table, &values, condition, options)
    }

    /// Render an insert-or-update of one row.
    fn write_upsert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        values: &Row,
        options: &UpsertOptions,
    ) -> Result<()> {
        if values.is_empty() {
            return Err(SqlError::invalid_option(
                "upsert",
                self.dialect(),
                "at least one value is required",
            )
            .into());
        }
        let keys = conflict_target(context.model, &options.conflict_fields);
        let updates = if options.update_fields.is_empty() {
            values
                .iter()
                .map(|(k, _)| k.clone())
                .filter(|k| !keys.contains(k))
                .collect::<Vec<_>>()
        } else {
            options.update_fields.clone()
        };
        let style = self.descriptor().supports.upsert;
        if matches!(style, UpsertStyle::OnConflict | UpsertStyle::Merge(..)) {
            if keys.is_empty() {
                return Err(SqlError::invalid_option(
                    "upsert",
                    self.dialect(),
                    "no conflict target, supply conflict_fields or a model with a primary key",
                )
                .into());
            }
            if let Some(key) = keys.iter().find(|k| !values.iter().any(|(v, _)| v == *k)) {
                return Err(SqlError::invalid_option(
                    "upsert",
                    self.dialect(),
                    format!("conflict field `{key}` has no value"),
                )
                .into());
            }
        }
        match style {
            UpsertStyle::Unsupported => {
                Err(SqlError::feature_not_supported("upsert", self.dialect()).into())
            }
            UpsertStyle::OnConflict | UpsertStyle::OnDuplicateKey => {
                let insert = InsertOptions {
                    on_conflict: Some(OnConflict {
                        conflict_fields: keys,
                        update_fields: updates,
                        ..Default::default()
                    }),
                    returning: options.returning.clone(),
                    ..Default::default()
                };
                self.write_insert(context, out, table, std::slice::from_ref(values), &insert)
            }
            UpsertStyle::Merge(source) => self.write_merge(
                context,
                out,
                table,
                values,
                &keys,
                &updates,
                &options.returning,
                source,
            ),
            UpsertStyle::UpsertWithPrimaryKey => {
                ensure_supported!(
                    options.returning.is_none(),
                    "RETURNING on UPSERT",
                    self.dialect()
                );
                let mut context = context.switch_fragment(Fragment::SqlUpsert);
                out.push_str("UPSERT ");
                self.write_table_name(&mut context, out, table)?;
                out.push_str(" (");
                try_separated_by(
                    out,
                    values,
                    |out, (k, _)| self.write_column_name(&mut context, out, k),
                    ", ",
                )?;
                out.push_str(") VALUES (");
                try_separated_by(
                    out,
                    values,
                    |out, (_, v)| self.write_expression(&mut context, out, v),
                    ", ",
                )?;
                out.push_str(") WITH PRIMARY KEY");
                Ok(())
            }
        }
    }

    /// Render `"qualifier"."column"` for the physical column of `attribute`.
    fn write_qualified_column(
        &self,
        context: &mut Context,
        out: &mut String,
        qualifier: &str,
        attribute: &str,
    ) -> Result<()> {
        self.write_identifier_quoted(context, out, qualifier)?;
        out.push('.');
        self.write_column_name(context, out, attribute)
    }

    /// Render a `MERGE INTO` upsert matching the source row on `keys`.
    #[allow(clippy::too_many_arguments)]
    fn write_merge(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        values: &Row,
        keys: &[Cow<'static, str>],
        updates: &[Cow<'static, str>],
        returning: &ReturnValues,
        source: MergeSource,
    ) -> Result<()> {
        if !returning.is_none() {
            let support = self.descriptor().supports.returning;
            ensure_supported!(
                support.style == ReturningStyle::Output && support.insert && support.update,
                "RETURNING on MERGE",
                self.dialect()
            );
        }
        let mut context = context.switch_fragment(Fragment::SqlUpsert);
        out.push_str("MERGE INTO ");
        self.write_table_name(&mut context, out, table)?;
        self.write_table_alias(&mut context, out, "target")?;
        out.push_str(" USING (");
        match source {
            MergeSource::Values { .. } => {
                out.push_str("VALUES (");
                try_separated_by(
                    out,
                    values,
                    |out, (_, v)| self.write_expression(&mut context, out, v),
                    ", ",
                )?;
                out.push_str("))");
                self.write_table_alias(&mut context, out, "source")?;
                out.push_str(" (");
                try_separated_by(
                    out,
                    values,
                    |out, (k, _)| self.write_column_name(&mut context, out, k),
                    ", ",
                )?;
                out.push(')');
            }
            MergeSource::Select | MergeSource::SelectFromDual => {
                out.push_str("SELECT ");
                try_separated_by(
                    out,
                    values,
                    |out, (k, v)| {
                        self.write_expression(&mut context, out, v)?;
                        out.push_str(" AS ");
                        self.write_column_name(&mut context, out, k)
                    },
                    ", ",
                )?;
                if source == MergeSource::SelectFromDual {
                    out.push_str(" FROM DUAL");
                }
                out.push(')');
                self.write_table_alias(&mut context, out, "source")?;
            }
        }
        out.push_str(" ON (");
        try_separated_by(
            out,
            keys,
            |out, k| {
                self.write_qualified_column(&mut context, out, "target", k)?;
                out.push_str(" = ");
                self.write_qualified_column(&mut context, out, "source", k)
            },
            " AND ",
        )?;
        out.push(')');
        if !updates.is_empty() {
            out.push_str(" WHEN MATCHED THEN UPDATE SET ");
            try_separated_by(
                out,
                updates,
                |out, k| {
                    self.write_column_name(&mut context, out, k)?;
                    out.push_str(" = ");
                    self.write_qualified_column(&mut context, out, "source", k)
                },
                ", ",
            )?;
        }
        out.push_str(" WHEN NOT MATCHED THEN INSERT (");
        try_separated_by(
            out,
            values,
            |out, (k, _)| self.write_column_name(&mut context, out, k),
            ", ",
        )?;
        out.push_str(") VALUES (");
        try_separated_by(
            out,
            values,
            |out, (k, _)| self.write_qualified_column(&mut context, out, "source", k),
            ", ",
        )?;
        out.push(')');
        self.write_returning_output(&mut context, out, returning, Modification::Insert)?;
        if let MergeSource::Values { terminated: true } = source {
            out.push(';');
        }
        Ok(())
    }

    /// Render a bulk DELETE.
    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        condition: Option<&Expr>,
        options: &BulkDeleteOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.check_returning(&options.returning, Modification::Delete)?;
        let row_limit = match options.limit {
            Some(limit) => {
                let Some(style) = supports.delete_limit else {
                    return Err(
                        SqlError::feature_not_supported("DELETE with LIMIT", self.dialect())
                            .into(),
                    );
                };
                Some((style, limit))
            }
            None => None,
        };
        self.write_returning_prefix(context, out, &options.returning, Modification::Delete)?;
        out.push_str("DELETE ");
        if let Some((RowLimit::Top, limit)) = row_limit {
            out.push_str("TOP(");
            write_integer!(out, limit);
            out.push_str(") ");
        }
        out.push_str("FROM ");
        {
            let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
            self.write_table_name(&mut context, out, table)?;
        }
        self.write_returning_output(context, out, &options.returning, Modification::Delete)?;
        {
            let mut context = context.switch_fragment(Fragment::SqlDeleteFromWhere);
            match row_limit {
                Some((RowLimit::Subquery, limit)) => {
                    out.push_str(" WHERE ");
                    self.write_primary_key_subquery(
                        &mut context,
                        out,
                        "bulk delete",
                        table,
                        condition,
                        limit,
                    )?;
                }
                _ => {
                    if let Some(condition) = condition {
                        out.push_str(" WHERE ");
                        self.write_expression(&mut context, out, condition)?;
                    }
                }
            }
        }
        if let Some((RowLimit::Limit, limit)) = row_limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
        self.write_returning_suffix(context, out, &options.returning)?;
        if let Some(suffix) = supports.affected_rows_suffix {
            out.push_str("; ");
            out.push_str(suffix);
        }
        Ok(())
    }

    /// Render a referential action keyword.
    fn write_referential_action(&self, out: &mut String, action: Action) {
        out.push_str(match action {
            Action::NoAction => "NO ACTION",
            Action::Restrict => "RESTRICT",
            Action::Cascade => "CASCADE",
            Action::SetNull => "SET NULL",
            Action::SetDefault => "SET DEFAULT",
        });
    }

    /// Render `ON DELETE` / `ON UPDATE` of a foreign key.
    fn write_referential_actions(
        &self,
        out: &mut String,
        on_delete: Option<Action>,
        on_update: Option<Action>,
    ) -> Result<()> {
        if let Some(action) = on_delete {
            out.push_str(" ON DELETE ");
            self.write_referential_action(out, action);
        }
        if let Some(action) = on_update {
            ensure_supported!(
                self.descriptor().supports.constraints.foreign_key_on_update,
                "ON UPDATE on foreign keys",
                self.dialect()
            );
            out.push_str(" ON UPDATE ");
            self.write_referential_action(out, action);
        }
        Ok(())
    }

    /// Render the column definition used by CREATE TABLE and ALTER TABLE.
    fn write_column_def(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &ColumnDef,
        inline_primary_key: bool,
    ) -> Result<()> {
        let descriptor = self.descriptor();
        self.write_identifier_quoted(context, out, &column.name)?;
        out.push(' ');
        self.write_data_type(context, out, &column.data_type)?;
        let auto_increment = match (column.auto_increment, descriptor.auto_increment) {
            (false, _) => None,
            (true, Some(v)) => Some(v),
            (true, None) => {
                return Err(SqlError::feature_not_supported(
                    "auto increment columns",
                    self.dialect(),
                )
                .into());
            }
        };
        if let Some(v) = auto_increment.filter(|v| !v.after_primary_key) {
            out.push(' ');
            out.push_str(v.keyword);
        }
        if let Some(default) = &column.default {
            out.push_str(" DEFAULT ");
            self.write_expression(context, out, default)?;
        }
        if !column.nullable {
            out.push_str(" NOT NULL");
        }
        if column.unique && !column.primary_key {
            out.push_str(" UNIQUE");
        }
        if column.primary_key && inline_primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if let Some(v) = auto_increment.filter(|v| v.after_primary_key) {
            out.push(' ');
            out.push_str(v.keyword);
        }
        if let Some(references) = &column.references {
            if descriptor.supports.tables.inline_references {
                self.write_references(context, out, references)?;
            }
        }
        if !column.comment.is_empty() && descriptor.supports.comments == CommentStyle::Inline {
            out.push_str(" COMMENT ");
            self.write_value_string(context, out, &column.comment)?;
        }
        Ok(())
    }

    /// Render ` REFERENCES t (c)` with its referential actions.
    fn write_references(
        &self,
        context: &mut Context,
        out: &mut String,
        references: &References,
    ) -> Result<()> {
        out.push_str(" REFERENCES ");
        self.write_table_name(context, out, &references.table)?;
        out.push_str(" (");
        self.write_identifier_quoted(context, out, &references.column)?;
        out.push(')');
        self.write_referential_actions(out, references.on_delete, references.on_update)
    }

    /// Render `FOREIGN KEY (c) REFERENCES …` for the columns whose references cannot stay inline.
    fn write_table_foreign_keys(
        &self,
        context: &mut Context,
        out: &mut String,
        columns: &[ColumnDef],
        prefix: &str,
    ) -> Result<()> {
        if self.descriptor().supports.tables.inline_references {
            return Ok(());
        }
        for column in columns {
            let Some(references) = &column.references else {
                continue;
            };
            out.push_str(prefix);
            out.push_str("FOREIGN KEY (");
            self.write_identifier_quoted(context, out, &column.name)?;
            out.push(')');
            self.write_references(context, out, references)?;
        }
        Ok(())
    }

    /// Render the statements attaching comments, for dialects that do not declare them inline.
    fn write_comments(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        table_comment: &str,
        columns: &[ColumnDef],
    ) -> Result<()> {
        let commented = columns.iter().filter(|v| !v.comment.is_empty());
        let style = self.descriptor().supports.comments;
        match style {
            CommentStyle::Inline => {}
            CommentStyle::Unsupported => {
                ensure_supported!(
                    table_comment.is_empty() && commented.clone().next().is_none(),
                    "comments",
                    self.dialect()
                );
            }
            CommentStyle::CommentOn => {
                let mut context = context.switch_fragment(Fragment::SqlCommentOnColumn);
                if !table_comment.is_empty() {
                    out.push_str("; COMMENT ON TABLE ");
                    self.write_table_name(&mut context, out, table)?;
                    out.push_str(" IS ");
                    self.write_value_string(&mut context, out, table_comment)?;
                }
                for column in commented {
                    out.push_str("; COMMENT ON COLUMN ");
                    self.write_table_name(&mut context, out, table)?;
                    out.push('.');
                    self.write_identifier_quoted(&mut context, out, &column.name)?;
                    out.push_str(" IS ");
                    self.write_value_string(&mut context, out, &column.comment)?;
                }
            }
            CommentStyle::ExtendedProperty => {
                let mut context = context.switch_fragment(Fragment::SqlCommentOnColumn);
                let schema = if table.schema.is_empty() {
                    self.descriptor().default_schema
                } else {
                    &*table.schema
                };
                let mut property = |out: &mut String, comment: &str, column: Option<&str>| -> Result<()> {
                    out.push_str("; EXEC sp_addextendedproperty @name = ");
                    self.write_value_string(&mut context, out, "MS_Description")?;
                    out.push_str(", @value = ");
                    self.write_value_string(&mut context, out, comment)?;
                    out.push_str(", @level0type = ");
                    self.write_value_string(&mut context, out, "Schema")?;
                    out.push_str(", @level0name = ");
                    self.write_value_string(&mut context, out, schema)?;
                    out.push_str(", @level1type = ");
                    self.write_value_string(&mut context, out, "Table")?;
                    out.push_str(", @level1name = ");
                    self.write_value_string(&mut context, out, &table.name)?;
                    if let Some(column) = column {
                        out.push_str(", @level2type = ");
                        self.write_value_string(&mut context, out, "Column")?;
                        out.push_str(", @level2name = ");
                        self.write_value_string(&mut context, out, column)?;
                    }
                    Ok(())
                };
                if !table_comment.is_empty() {
                    property(out, table_comment, None)?;
                }
                for column in commented {
                    property(out, &column.comment, Some(&column.name))?;
                }
            }
        }
        Ok(())
    }

    /// Render CREATE TABLE.
    fn write_create_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        columns: &[ColumnDef],
        options: &CreateTableOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        if columns.is_empty() {
            return Err(SqlError::invalid_option(
                "create table",
                self.dialect(),
                "at least one column is required",
            )
            .into());
        }
        self.reject_unsupported_options(
            "create table",
            &[
                (
                    "if_not_exists",
                    options.if_not_exists,
                    supports.if_exists.create_table != ConditionalCreateTable::Unsupported,
                ),
                ("engine", options.engine.is_some(), supports.tables.table_options),
                ("charset", options.charset.is_some(), supports.tables.table_options),
                ("collate", options.collate.is_some(), supports.tables.table_options),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlCreateTable);
        let conditional = options
            .if_not_exists
            .then_some(supports.if_exists.create_table);
        if conditional == Some(ConditionalCreateTable::ObjectIdGuard) {
            let mut name = String::new();
            self.write_table_name(&mut context, &mut name, table)?;
            out.push_str("IF OBJECT_ID(");
            self.write_value_string(&mut context, out, &name)?;
            out.push_str(", ");
            self.write_value_string(&mut context, out, "U")?;
            out.push_str(") IS NULL ");
        }
        out.push_str("CREATE TABLE ");
        if conditional == Some(ConditionalCreateTable::IfNotExists) {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" (");
        let primary_keys = columns.iter().filter(|v| v.primary_key).collect::<Vec<_>>();
        let inline = primary_keys.len() == 1;
        try_separated_by(
            out,
            columns,
            |out, v| self.write_column_def(&mut context, out, v, inline),
            ", ",
        )?;
        if primary_keys.len() > 1 {
            let mut context = context.switch_fragment(Fragment::SqlCreateTablePrimaryKey);
            out.push_str(", PRIMARY KEY (");
            try_separated_by(
                out,
                primary_keys,
                |out, v| self.write_identifier_quoted(&mut context, out, &v.name),
                ", ",
            )?;
            out.push(')');
        }
        for unique in &options.unique_keys {
            if unique.fields.is_empty() {
                return Err(SqlError::invalid_option(
                    "create table",
                    self.dialect(),
                    "unique keys need at least one field",
                )
                .into());
            }
            let mut context = context.switch_fragment(Fragment::SqlCreateTableUnique);
            let name = match &unique.name {
                Some(v) => v.to_string(),
                None => default_constraint_name(table, &unique.fields, "uk"),
            };
            out.push_str(", CONSTRAINT ");
            self.write_identifier_quoted(&mut context, out, &name)?;
            out.push_str(" UNIQUE (");
            try_separated_by(
                out,
                &unique.fields,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            )?;
            out.push(')');
        }
        self.write_table_foreign_keys(&mut context, out, columns, ", ")?;
        out.push(')');
        if let Some(engine) = &options.engine {
            out.push_str(" ENGINE=");
            self.write_keyword_option(out, "engine", engine)?;
        }
        if let Some(charset) = &options.charset {
            out.push_str(" DEFAULT CHARSET=");
            self.write_keyword_option(out, "charset", charset)?;
        }
        if let Some(collate) = &options.collate {
            out.push_str(" COLLATE ");
            self.write_keyword_option(out, "collate", collate)?;
        }
        let comment = options.comment.as_deref().unwrap_or_default();
        if !comment.is_empty() && supports.comments == CommentStyle::Inline {
            out.push_str(" COMMENT ");
            self.write_value_string(&mut context, out, comment)?;
        }
        self.write_comments(&mut context, out, table, comment, columns)
    }

    /// Render DROP TABLE.
    fn write_drop_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &DropTableOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.reject_unsupported_options(
            "drop table",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_table),
                ("cascade", options.cascade, supports.tables.drop_cascade),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_name(&mut context, out, table)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// Render the renaming of a table.
    fn write_rename_table(
        &self,
        context: &mut Context,
        out: &mut String,
        from: &TableRef,
        to: &TableRef,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        match self.descriptor().supports.tables.rename_table {
            RenameStyle::AlterTable => {
                if !to.schema.is_empty() && to.schema != from.schema {
                    return Err(SqlError::invalid_option(
                        "rename table",
                        self.dialect(),
                        "a table cannot be moved to another schema while renaming",
                    )
                    .into());
                }
                out.push_str("ALTER TABLE ");
                self.write_table_name(&mut context, out, from)?;
                out.push_str(" RENAME TO ");
                self.write_identifier_quoted(&mut context, out, &to.name)?;
            }
            RenameStyle::Rename => {
                out.push_str("RENAME TABLE ");
                self.write_table_name(&mut context, out, from)?;
                out.push_str(" TO ");
                self.write_table_name(&mut context, out, to)?;
            }
            RenameStyle::SpRename => {
                let mut name = String::new();
                self.write_table_name(&mut context, &mut name, from)?;
                out.push_str("EXEC sp_rename ");
                self.write_value_string(&mut context, out, &name)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, &to.name)?;
            }
        }
        Ok(())
    }

    /// Render the removal of every row of a table.
    fn write_truncate_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &TruncateTableOptions,
    ) -> Result<()> {
        let tables = self.descriptor().supports.tables;
        self.reject_unsupported_options(
            "truncate table",
            &[
                ("cascade", options.cascade, tables.truncate_cascade),
                (
                    "restart_identity",
                    options.restart_identity,
                    tables.truncate_restart_identity,
                ),
            ],
        )?;
        match tables.truncate {
            TruncateStyle::Truncate { keyword, suffix } => {
                out.push_str(keyword);
                out.push(' ');
                self.write_table_name(context, out, table)?;
                if options.restart_identity {
                    out.push_str(" RESTART IDENTITY");
                }
                if options.cascade {
                    out.push_str(" CASCADE");
                }
                if let Some(suffix) = suffix {
                    out.push(' ');
                    out.push_str(suffix);
                }
            }
            TruncateStyle::DeleteFrom => {
                out.push_str("DELETE FROM ");
                self.write_table_name(context, out, table)?;
            }
        }
        Ok(())
    }

    /// Render ALTER TABLE … ADD COLUMN.
    fn write_add_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &ColumnDef,
        options: &AddColumnOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.reject_unsupported_options(
            "add column",
            &[("if_not_exists", options.if_not_exists, supports.if_exists.add_column)],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push(' ');
        out.push_str(supports.tables.add_column);
        out.push(' ');
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_column_def(&mut context, out, column, true)?;
        self.write_table_foreign_keys(&mut context, out, std::slice::from_ref(column), ", ADD ")?;
        self.write_comments(&mut context, out, table, "", std::slice::from_ref(column))
    }

    /// Render the change of type, nullability and default of a column.
    fn write_change_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &ColumnDef,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        let style = self.descriptor().supports.tables.change_column;
        let mut alter_table = String::from("ALTER TABLE ");
        self.write_table_name(&mut context, &mut alter_table, table)?;
        match style {
            ChangeColumnStyle::Unsupported => {
                return Err(
                    SqlError::feature_not_supported("changing columns", self.dialect()).into(),
                );
            }
            ChangeColumnStyle::AlterType | ChangeColumnStyle::SetDataType => {
                // Postgres chains the actions in one statement, DB2 needs one statement each
                let (set_type, separator) = if style == ChangeColumnStyle::AlterType {
                    out.push_str(&alter_table);
                    out.push(' ');
                    (" TYPE ", ", ")
                } else {
                    (" SET DATA TYPE ", "; ")
                };
                let mut alter_column = String::new();
                if style == ChangeColumnStyle::SetDataType {
                    alter_column.push_str(&alter_table);
                    alter_column.push(' ');
                }
                alter_column.push_str("ALTER COLUMN ");
                self.write_identifier_quoted(&mut context, &mut alter_column, &column.name)?;
                out.push_str(&alter_column);
                out.push_str(set_type);
                self.write_data_type(&mut context, out, &column.data_type)?;
                out.push_str(separator);
                out.push_str(&alter_column);
                out.push_str(if column.nullable {
                    " DROP NOT NULL"
                } else {
                    " SET NOT NULL"
                });
                out.push_str(separator);
                out.push_str(&alter_column);
                match &column.default {
                    Some(default) => {
                        out.push_str(" SET DEFAULT ");
                        self.write_expression(&mut context, out, default)?;
                    }
                    None => out.push_str(" DROP DEFAULT"),
                }
            }
            ChangeColumnStyle::Modify => {
                out.push_str(&alter_table);
                out.push_str(" MODIFY ");
                self.write_column_def(&mut context, out, column, false)?;
            }
            ChangeColumnStyle::ModifyParenthesized => {
                out.push_str(&alter_table);
                out.push_str(" MODIFY (");
                self.write_column_def(&mut context, out, column, false)?;
                out.push(')');
            }
            ChangeColumnStyle::AlterParenthesized => {
                out.push_str(&alter_table);
                out.push_str(" ALTER (");
                self.write_column_def(&mut context, out, column, false)?;
                out.push(')');
            }
            ChangeColumnStyle::AlterColumn => {
                out.push_str(&alter_table);
                out.push_str(" ALTER COLUMN ");
                self.write_identifier_quoted(&mut context, out, &column.name)?;
                out.push(' ');
                self.write_data_type(&mut context, out, &column.data_type)?;
                out.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
                if let Some(default) = &column.default {
                    out.push_str("; ");
                    out.push_str(&alter_table);
                    out.push_str(" ADD DEFAULT ");
                    self.write_expression(&mut context, out, default)?;
                    out.push_str(" FOR ");
                    self.write_identifier_quoted(&mut context, out, &column.name)?;
                }
            }
        }
        self.write_comments(&mut context, out, table, "", std::slice::from_ref(column))
    }

    /// Render ALTER TABLE … DROP COLUMN.
    fn write_remove_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.reject_unsupported_options(
            "remove column",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_column),
                ("cascade", options.cascade, supports.tables.remove_column_cascade),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" DROP COLUMN ");
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(&mut context, out, column)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// Render the renaming of a column.
    fn write_rename_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        from: &str,
        to: &str,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        match self.descriptor().supports.tables.rename_column {
            RenameStyle::AlterTable => {
                out.push_str("ALTER TABLE ");
                self.write_table_name(&mut context, out, table)?;
                out.push_str(" RENAME COLUMN ");
                self.write_identifier_quoted(&mut context, out, from)?;
                out.push_str(" TO ");
                self.write_identifier_quoted(&mut context, out, to)?;
            }
            RenameStyle::Rename => {
                out.push_str("RENAME COLUMN ");
                self.write_table_name(&mut context, out, table)?;
                out.push('.');
                self.write_identifier_quoted(&mut context, out, from)?;
                out.push_str(" TO ");
                self.write_identifier_quoted(&mut context, out, to)?;
            }
            RenameStyle::SpRename => {
                let mut name = String::new();
                self.write_table_name(&mut context, &mut name, table)?;
                name.push('.');
                self.write_identifier_quoted(&mut context, &mut name, from)?;
                out.push_str("EXEC sp_rename ");
                self.write_value_string(&mut context, out, &name)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, to)?;
                out.push_str(", ");
                self.write_value_string(&mut context, out, "COLUMN")?;
            }
        }
        Ok(())
    }

    /// Render CREATE INDEX.
    fn write_create_index(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        options: &IndexOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        if options.fields.is_empty() {
            return Err(SqlError::invalid_option(
                "create index",
                self.dialect(),
                "at least one field is required",
            )
            .into());
        }
        self.reject_unsupported_options(
            "create index",
            &[
                ("concurrently", options.concurrently, supports.indexes.concurrently),
                ("using", options.using.is_some(), supports.indexes.using),
                ("index_type", options.index_type.is_some(), supports.indexes.index_type),
                ("where", options.condition.is_some(), supports.indexes.partial),
                ("include", !options.include.is_empty(), supports.indexes.include),
                ("if_not_exists", options.if_not_exists, supports.if_exists.create_index),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlCreateIndex);
        let name = match &options.name {
            Some(v) => v.to_string(),
            None => {
                let mut name = table.name.to_string();
                for field in &options.fields {
                    push_name_part(&mut name, &field.name);
                }
                name
            }
        };
        out.push_str("CREATE ");
        if options.unique {
            out.push_str("UNIQUE ");
        }
        if let Some(index_type) = &options.index_type {
            self.write_keyword_option(out, "index_type", index_type)?;
            out.push(' ');
        }
        out.push_str("INDEX ");
        if options.concurrently {
            out.push_str("CONCURRENTLY ");
        }
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(&mut context, out, &name)?;
        out.push_str(" ON ");
        self.write_table_name(&mut context, out, table)?;
        if let Some(using) = &options.using {
            out.push_str(" USING ");
            self.write_keyword_option(out, "using", using)?;
        }
        out.push_str(" (");
        try_separated_by(
            out,
            &options.fields,
            |out, field| {
                self.write_column_name(&mut context, out, &field.name)?;
                if let Some(length) = field.length {
                    out.push('(');
                    write_integer!(out, length);
                    out.push(')');
                }
                if let Some(collate) = &field.collate {
                    out.push_str(" COLLATE ");
                    self.write_identifier_quoted(&mut context, out, collate)?;
                }
                match field.order {
                    Some(Order::ASC) => out.push_str(" ASC"),
                    Some(Order::DESC) => out.push_str(" DESC"),
                    None => {}
                }
                Ok(())
            },
            ", ",
        )?;
        out.push(')');
        if !options.include.is_empty() {
            out.push_str(" INCLUDE (");
            try_separated_by(
                out,
                &options.include,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            )?;
            out.push(')');
        }
        if let Some(condition) = &options.condition {
            out.push_str(" WHERE ");
            self.write_expression(&mut context, out, condition)?;
        }
        Ok(())
    }

    /// Render DROP INDEX.
    fn write_remove_index(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        name: &str,
        options: &RemoveIndexOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        self.reject_unsupported_options(
            "remove index",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_index),
                ("concurrently", options.concurrently, supports.indexes.concurrently),
                ("cascade", options.cascade, supports.tables.drop_cascade),
            ],
        )?;
        out.push_str("DROP INDEX ");
        if options.concurrently {
            out.push_str("CONCURRENTLY ");
        }
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        match supports.indexes.drop_style {
            DropIndexStyle::Standalone => {
                // Indexes live in the schema of their table
                let index = TableRef {
                    name: name.to_string().into(),
                    schema: table.schema.clone(),
                    alias: "".into(),
                };
                self.write_table_name(context, out, &index)?;
            }
            DropIndexStyle::OnTable => {
                self.write_identifier_quoted(context, out, name)?;
                out.push_str(" ON ");
                self.write_table_name(context, out, table)?;
            }
        }
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// Render ` (a, b)` with the physical columns of the attributes.
    fn write_column_list(
        &self,
        context: &mut Context,
        out: &mut String,
        attributes: &[Cow<'static, str>],
    ) -> Result<()> {
        out.push_str(" (");
        try_separated_by(
            out,
            attributes,
            |out, v| self.write_column_name(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render ALTER TABLE … ADD CONSTRAINT.
    fn write_add_constraint(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        constraint: &Constraint,
    ) -> Result<()> {
        let support = self.descriptor().supports.constraints;
        ensure_supported!(support.add, "adding constraints", self.dialect());
        let suffix = match &constraint.kind {
            ConstraintKind::Check(..) => {
                ensure_supported!(support.check, "CHECK constraints", self.dialect());
                "ck"
            }
            ConstraintKind::Unique => "uk",
            ConstraintKind::PrimaryKey => "pk",
            ConstraintKind::Default(..) => {
                ensure_supported!(support.default, "DEFAULT constraints", self.dialect());
                "df"
            }
            ConstraintKind::ForeignKey { .. } => "fk",
        };
        if constraint.deferrable.is_some() {
            ensure_supported!(support.deferrable, "deferrable constraints", self.dialect());
        }
        let fields_valid = match &constraint.kind {
            ConstraintKind::Check(..) => true,
            ConstraintKind::Default(..) => constraint.fields.len() == 1,
            _ => !constraint.fields.is_empty(),
        };
        if !fields_valid {
            return Err(SqlError::invalid_option(
                "add constraint",
                self.dialect(),
                match constraint.kind {
                    ConstraintKind::Default(..) => "a DEFAULT constraint applies to exactly one field",
                    _ => "at least one field is required",
                },
            )
            .into());
        }
        let mut context = context.switch_fragment(Fragment::SqlConstraint);
        let name = match &constraint.name {
            Some(v) => v.to_string(),
            None => default_constraint_name(table, &constraint.fields, suffix),
        };
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" ADD CONSTRAINT ");
        self.write_identifier_quoted(&mut context, out, &name)?;
        match &constraint.kind {
            ConstraintKind::Check(condition) => {
                out.push_str(" CHECK (");
                self.write_expression(&mut context, out, condition)?;
                out.push(')');
            }
            ConstraintKind::Unique => {
                out.push_str(" UNIQUE");
                self.write_column_list(&mut context, out, &constraint.fields)?;
            }
            ConstraintKind::PrimaryKey => {
                out.push_str(" PRIMARY KEY");
                self.write_column_list(&mut context, out, &constraint.fields)?;
            }
            ConstraintKind::Default(value) => {
                out.push_str(" DEFAULT ");
                self.write_expression(&mut context, out, value)?;
                out.push_str(" FOR ");
                self.write_column_name(&mut context, out, &constraint.fields[0])?;
            }
            ConstraintKind::ForeignKey {
                references,
                fields: referenced,
                on_delete,
                on_update,
            } => {
                if referenced.len() != constraint.fields.len() {
                    return Err(SqlError::invalid_option(
                        "add constraint",
                        self.dialect(),
                        "a foreign key references as many fields as it constrains",
                    )
                    .into());
                }
                out.push_str(" FOREIGN KEY");
                self.write_column_list(&mut context, out, &constraint.fields)?;
                out.push_str(" REFERENCES ");
                self.write_table_name(&mut context, out, references)?;
                out.push_str(" (");
                try_separated_by(
                    out,
                    referenced,
                    |out, v| self.write_identifier_quoted(&mut context, out, v),
                    ", ",
                )?;
                out.push(')');
                self.write_referential_actions(out, *on_delete, *on_update)?;
            }
        }
        if let Some(deferrable) = constraint.deferrable {
            out.push_str(match deferrable {
                Deferrable::InitiallyDeferred => " DEFERRABLE INITIALLY DEFERRED",
                Deferrable::InitiallyImmediate => " DEFERRABLE INITIALLY IMMEDIATE",
                Deferrable::NotDeferrable => " NOT DEFERRABLE",
            });
        }
        Ok(())
    }

    /// Render ALTER TABLE … DROP CONSTRAINT.
    fn write_remove_constraint(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        name: &str,
        options: &RemoveConstraintOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.constraints.remove, "removing constraints", self.dialect());
        self.reject_unsupported_options(
            "remove constraint",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_constraint),
                ("cascade", options.cascade, supports.constraints.remove_cascade),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlConstraint);
        out.push_str("ALTER TABLE ");
        self.write_table_name(&mut context, out, table)?;
        out.push_str(" DROP CONSTRAINT ");
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(&mut context, out, name)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// Render `SET CONSTRAINTS … DEFERRED | IMMEDIATE`.
    fn write_set_constraint_checking(
        &self,
        context: &mut Context,
        out: &mut String,
        checking: &ConstraintChecking,
    ) -> Result<()> {
        ensure_supported!(
            self.descriptor().supports.constraints.set_checking,
            "SET CONSTRAINTS",
            self.dialect()
        );
        let (names, mode) = match checking {
            ConstraintChecking::Deferred(names) => (names, " DEFERRED"),
            ConstraintChecking::Immediate(names) => (names, " IMMEDIATE"),
        };
        out.push_str("SET CONSTRAINTS ");
        if names.is_empty() {
            out.push_str("ALL");
        } else {
            try_separated_by(
                out,
                names,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            )?;
        }
        out.push_str(mode);
        Ok(())
    }

    /// Render CREATE SCHEMA.
    fn write_create_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateSchemaOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.schemas, "schemas", self.dialect());
        self.reject_unsupported_options(
            "create schema",
            &[
                ("if_not_exists", options.if_not_exists, supports.if_exists.create_schema),
                ("authorization", options.authorization.is_some(), supports.schemas.authorization),
                ("charset", options.charset.is_some(), supports.schemas.charset),
                ("collate", options.collate.is_some(), supports.schemas.collate),
                ("comment", options.comment.is_some(), supports.schemas.comment),
                ("replace", options.replace, supports.schemas.replace),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlCreateSchema);
        out.push_str("CREATE ");
        if options.replace {
            out.push_str("OR REPLACE ");
        }
        out.push_str("SCHEMA ");
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(&mut context, out, name)?;
        if let Some(authorization) = &options.authorization {
            out.push_str(" AUTHORIZATION ");
            self.write_identifier_quoted(&mut context, out, authorization)?;
        }
        if let Some(charset) = &options.charset {
            out.push_str(" DEFAULT CHARACTER SET ");
            self.write_keyword_option(out, "charset", charset)?;
        }
        if let Some(collate) = &options.collate {
            out.push_str(" COLLATE ");
            self.write_keyword_option(out, "collate", collate)?;
        }
        if let Some(comment) = &options.comment {
            out.push_str(" COMMENT ");
            self.write_value_string(&mut context, out, comment)?;
        }
        Ok(())
    }

    /// Render DROP SCHEMA.
    fn write_drop_schema(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &DropSchemaOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.schemas, "schemas", self.dialect());
        self.reject_unsupported_options(
            "drop schema",
            &[
                ("if_exists", options.if_exists, supports.if_exists.drop_schema),
                ("cascade", options.cascade, supports.schemas.drop_cascade),
            ],
        )?;
        let mut context = context.switch_fragment(Fragment::SqlDropSchema);
        out.push_str("DROP SCHEMA ");
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(&mut context, out, name)?;
        if options.cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    /// Render a `NOT IN ('a', 'b')` filter, nothing when `values` is empty.
    fn write_not_in_strings(
        &self,
        context: &mut Context,
        out: &mut String,
        prefix: &str,
        column: &str,
        values: &[&str],
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        out.push_str(prefix);
        out.push_str(column);
        out.push_str(" NOT IN (");
        try_separated_by(
            out,
            values,
            |out, v| self.write_value_string(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render the query listing the user schemas, technical schemas are excluded.
    fn write_list_schemas(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListSchemasOptions,
    ) -> Result<()> {
        ensure_supported!(
            self.descriptor().supports.schemas.schemas,
            "schemas",
            self.dialect()
        );
        let excluded = self
            .descriptor()
            .technical_schema_names()
            .iter()
            .copied()
            .chain(options.skip.iter().map(|v| &**v))
            .collect::<Vec<&str>>();
        out.push_str("SELECT schema_name FROM information_schema.schemata");
        self.write_not_in_strings(context, out, " WHERE ", "schema_name", &excluded)?;
        out.push_str(" ORDER BY schema_name");
        Ok(())
    }

    /// Render the query listing the tables, with their schema.
    fn write_list_tables(
        &self,
        context: &mut Context,
        out: &mut String,
        options: &ListTablesOptions,
    ) -> Result<()> {
        out.push_str(
            "SELECT table_name, table_schema FROM information_schema.tables WHERE table_type = 'BASE TABLE'",
        );
        self.write_not_in_strings(
            context,
            out,
            " AND ",
            "table_schema",
            self.descriptor().technical_schema_names(),
        )?;
        if let Some(schema) = &options.schema {
            out.push_str(" AND table_schema = ");
            self.write_value_string(context, out, schema)?;
        }
        out.push_str(" ORDER BY table_schema, table_name");
        Ok(())
    }

    /// Schema a table lives in: its own or the dialect default, empty when neither exists.
    fn effective_schema<'t>(&self, table: &'t TableRef) -> &'t str {
        if table.schema.is_empty() {
            self.descriptor().default_schema
        } else {
            &*table.schema
        }
    }

    /// Render the query describing the columns of a table.
    fn write_describe_table(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(
            "SELECT column_name, data_type, is_nullable, column_default FROM information_schema.columns WHERE table_name = ",
        );
        self.write_value_string(context, out, &table.name)?;
        let schema = self.effective_schema(table);
        if !schema.is_empty() {
            out.push_str(" AND table_schema = ");
            self.write_value_string(context, out, schema)?;
        }
        out.push_str(" ORDER BY ordinal_position");
        Ok(())
    }

    /// Render the query returning one row when the table exists.
    fn write_table_exists(&self, context: &mut Context, out: &mut String, table: &TableRef) -> Result<()> {
        out.push_str(
            "SELECT table_name FROM information_schema.tables WHERE table_type = 'BASE TABLE' AND table_name = ",
        );
        self.write_value_string(context, out, &table.name)?;
        let schema = self.effective_schema(table);
        if !schema.is_empty() {
            out.push_str(" AND table_schema = ");
            self.write_value_string(context, out, schema)?;
        }
        Ok(())
    }

    /// Render the query returning the server version.
    fn write_version(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        out.push_str("SELECT VERSION() AS version");
        Ok(())
    }

    /// Render CREATE DATABASE.
    fn write_create_database(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &CreateDatabaseOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.multi_databases, "databases", self.dialect());
        self.reject_unsupported_options(
            "create database",
            &[
                ("if_not_exists", options.if_not_exists, supports.if_exists.create_database),
                ("charset", options.charset.is_some(), supports.schemas.charset),
                ("collate", options.collate.is_some(), supports.schemas.collate),
                ("ctype", options.ctype.is_some(), false),
                ("template", options.template.is_some(), false),
            ],
        )?;
        out.push_str("CREATE DATABASE ");
        if options.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(context, out, name)?;
        if let Some(charset) = &options.charset {
            out.push_str(" CHARACTER SET ");
            self.write_keyword_option(out, "charset", charset)?;
        }
        if let Some(collate) = &options.collate {
            out.push_str(" COLLATE ");
            self.write_keyword_option(out, "collate", collate)?;
        }
        Ok(())
    }

    /// Render DROP DATABASE.
    fn write_drop_database(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        options: &DropDatabaseOptions,
    ) -> Result<()> {
        let supports = &self.descriptor().supports;
        ensure_supported!(supports.schemas.multi_databases, "databases", self.dialect());
        self.reject_unsupported_options(
            "drop database",
            &[("if_exists", options.if_exists, supports.if_exists.drop_database)],
        )?;
        out.push_str("DROP DATABASE ");
        if options.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(context, out, name)
    }

    /// Render the query listing the databases.
    fn write_list_databases(&self, _context: &mut Context, _out: &mut String) -> Result<()> {
        Err(SqlError::feature_not_supported("listing databases", self.dialect()).into())
    }

    /// Fails when transactions are driven through the connection instead of statements.
    fn check_transaction_statements(&self) -> Result<()> {
        let support = self.descriptor().supports.transactions;
        ensure_supported!(
            !support.connection_methods && support.start != TransactionStart::Driver,
            "transaction statements",
            self.dialect()
        );
        Ok(())
    }

    /// Render the statement opening a transaction.
    fn write_start_transaction(
        &self,
        _context: &mut Context,
        out: &mut String,
        options: &StartTransactionOptions,
    ) -> Result<()> {
        self.check_transaction_statements()?;
        let support = self.descriptor().supports.transactions;
        self.reject_unsupported_options(
            "start transaction",
            &[
                ("read_only", options.read_only, support.read_only),
                (
                    "transaction_type",
                    options.transaction_type.is_some(),
                    support.transaction_type,
                ),
            ],
        )?;
        match support.start {
            TransactionStart::StartTransaction => out.push_str("START TRANSACTION"),
            TransactionStart::SetTransaction => {
                out.push_str(if options.read_only {
                    "SET TRANSACTION READ ONLY"
                } else {
                    "SET TRANSACTION READ WRITE"
                });
                return Ok(());
            }
            _ => {
                out.push_str("BEGIN ");
                if let Some(transaction_type) = options.transaction_type {
                    out.push_str(match transaction_type {
                        TransactionType::Deferred => "DEFERRED ",
                        TransactionType::Immediate => "IMMEDIATE ",
                        TransactionType::Exclusive => "EXCLUSIVE ",
                    });
                }
                out.push_str("TRANSACTION");
            }
        }
        if options.read_only {
            out.push_str(" READ ONLY");
        }
        Ok(())
    }

    /// Render COMMIT.
    fn write_commit_transaction(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        self.check_transaction_statements()?;
        out.push_str("COMMIT");
        Ok(())
    }

    /// Render ROLLBACK.
    fn write_rollback_transaction(&self, _context: &mut Context, out: &mut String) -> Result<()> {
        self.check_transaction_statements()?;
        out.push_str("ROLLBACK");
        Ok(())
    }

    /// Render the creation of a savepoint.
    fn write_create_savepoint(&self, context: &mut Context, out: &mut String, name: &str) -> Result<()> {
        match self.descriptor().supports.transactions.savepoints {
            SavepointStyle::Unsupported => {
                Err(SqlError::feature_not_supported("savepoints", self.dialect()).into())
            }
            SavepointStyle::Standard { suffix } => {
                out.push_str("SAVEPOINT ");
                self.write_identifier_quoted(context, out, name)?;
                if let Some(suffix) = suffix {
                    out.push(' ');
                    out.push_str(suffix);
                }
                Ok(())
            }
            SavepointStyle::SaveTransaction => {
                out.push_str("SAVE TRANSACTION ");
                self.write_identifier_quoted(context, out, name)
            }
        }
    }

    /// Render the rollback to a savepoint.
    fn write_rollback_savepoint(&self, context: &mut Context, out: &mut String, name: &str) -> Result<()> {
        match self.descriptor().supports.transactions.savepoints {
            SavepointStyle::Unsupported => {
                Err(SqlError::feature_not_supported("savepoints", self.dialect()).into())
            }
            SavepointStyle::Standard { .. } => {
                out.push_str("ROLLBACK TO SAVEPOINT ");
                self.write_identifier_quoted(context, out, name)
            }
            SavepointStyle::SaveTransaction => {
                out.push_str("ROLLBACK TRANSACTION ");
                self.write_identifier_quoted(context, out, name)
            }
        }
    }

    /// Render the statement changing the isolation level.
    fn write_set_isolation_level(
        &self,
        _context: &mut Context,
        out: &mut String,
        level: IsolationLevel,
    ) -> Result<()> {
        match self.descriptor().supports.transactions.isolation_levels {
            IsolationStyle::Unsupported => {
                Err(SqlError::feature_not_supported("isolation levels", self.dialect()).into())
            }
            IsolationStyle::SetTransaction => {
                out.push_str("SET TRANSACTION ISOLATION LEVEL ");
                out.push_str(match level {
                    IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
                    IsolationLevel::ReadCommitted => "READ COMMITTED",
                    IsolationLevel::RepeatableRead => "REPEATABLE READ",
                    IsolationLevel::Serializable => "SERIALIZABLE",
                });
                Ok(())
            }
            IsolationStyle::ReadUncommittedPragma => match level {
                IsolationLevel::ReadUncommitted => {
                    out.push_str("PRAGMA read_uncommitted = 1");
                    Ok(())
                }
                IsolationLevel::Serializable => {
                    out.push_str("PRAGMA read_uncommitted = 0");
                    Ok(())
                }
                _ => Err(SqlError::invalid_option(
                    "set isolation level",
                    self.dialect(),
                    "only READ UNCOMMITTED and SERIALIZABLE can be selected",
                )
                .into()),
            },
        }
    }

    /// Render the statement disabling or enabling foreign key enforcement.
    fn write_foreign_key_checks(&self, _context: &mut Context, out: &mut String, enabled: bool) -> Result<()> {
        let Some((disable, enable)) = self.descriptor().supports.foreign_key_checks else {
            return Err(SqlError::feature_not_supported(
                "toggling foreign key checks",
                self.dialect(),
            )
            .into());
        };
        out.push_str(if enabled { enable } else { disable });
        Ok(())
    }

    /// Render raw SQL substituting the statement replacements and bind parameters.
    fn write_raw_query(&self, context: &mut Context, out: &mut String, sql: &str) -> Result<()> {
        let scan_for = ScanFor {
            named: matches!(context.replacements, Some(Replacements::Named(..))),
            positional: matches!(context.replacements, Some(Replacements::Positional(..))),
            binds: context.bind_params.is_some(),
        };
        let tokens = scan_raw(sql, self.descriptor(), scan_for)?;
        let mut context = context.switch_fragment(Fragment::Raw);
        self.write_raw_tokens(&mut context, out, &tokens, &BTreeMap::new())
    }
}

/// Columns of `rows` in order of first appearance.
fn row_columns(rows: &[Row]) -> Vec<&str> {
    let mut result = Vec::<&str>::new();
    for (name, _) in rows.iter().flatten() {
        let name: &str = name;
        if !result.contains(&name) {
            result.push(name);
        }
    }
    result
}

/// Explicit conflict fields, or the primary key of the model.
fn conflict_target(model: Option<&ModelMeta>, explicit: &[Cow<'static, str>]) -> Vec<Cow<'static, str>> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    model
        .map(|v| v.primary_keys().map(|v| v.name.clone()).collect())
        .unwrap_or_default()
}

/// `{table}_{fields}_{suffix}`.
fn default_constraint_name(table: &TableRef, fields: &[Cow<'static, str>], suffix: &str) -> String {
    let mut result = table.name.to_string();
    for field in fields {
        push_name_part(&mut result, field);
    }
    push_name_part(&mut result, suffix);
    result
}
