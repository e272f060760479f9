use quarry_core::{
    BindStyle, BindValues, CompiledStatement, Descriptor, Result, SqlError, StringEscape,
};
use std::{collections::BTreeSet, fmt::Debug};

/// Reads back the value of a string literal the way the dialect grammar does.
///
/// Returns `None` when the literal is malformed, for example when a quote
/// terminates it before the end of the text.
pub fn unquote_string(descriptor: &Descriptor, literal: &str) -> Option<String> {
    let inner = literal
        .strip_prefix(descriptor.string_prefix)?
        .strip_prefix('\'')?
        .strip_suffix('\'')?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if descriptor.string_escape == StringEscape::Backslash || chars.next()? != '\'' {
                    return None;
                }
                result.push('\'');
            }
            '\\' if descriptor.string_escape == StringEscape::Backslash => {
                result.push(match chars.next()? {
                    '0' => '\0',
                    'n' => '\n',
                    'r' => '\r',
                    'b' => '\u{8}',
                    't' => '\t',
                    'Z' => '\u{1A}',
                    c => c,
                });
            }
            c => result.push(c),
        }
    }
    Some(result)
}

/// Reads back the name of a quoted identifier, `None` when it is malformed.
pub fn unquote_identifier(descriptor: &Descriptor, quoted: &str) -> Option<String> {
    let right = descriptor.identifier_quote_right;
    let inner = quoted
        .strip_prefix(descriptor.identifier_quote_left)?
        .strip_suffix(right)?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == right && chars.next()? != right {
            return None;
        }
        result.push(c);
    }
    Some(result)
}

/// Driver placeholders appearing in `sql` outside literals and quoted identifiers.
pub fn placeholders(descriptor: &Descriptor, sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let backslash = descriptor.string_escape == StringEscape::Backslash;
    let quote_left = descriptor.identifier_quote_left as u8;
    let quote_right = descriptor.identifier_quote_right as u8;
    let mut result = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        i += 1;
        if c == b'\'' || c == quote_left {
            let end = if c == b'\'' { b'\'' } else { quote_right };
            while i < bytes.len() {
                let c = bytes[i];
                i += 1;
                if backslash && end == b'\'' && c == b'\\' {
                    i += 1;
                } else if c == end {
                    if bytes.get(i) == Some(&end) {
                        i += 1;
                    } else {
                        break;
                    }
                }
            }
            continue;
        }
        match descriptor.bind {
            BindStyle::Question if c == b'?' => result.push("?".to_string()),
            BindStyle::Numbered(prefix) if c == prefix as u8 => {
                let len = bytes[i..].iter().take_while(|v| v.is_ascii_digit()).count();
                if len > 0 {
                    result.push(sql[i - 1..i + len].to_string());
                }
                i += len;
            }
            BindStyle::Named(prefix) if c == prefix as u8 => {
                // Doubled prefix is a system variable (`@@ROWCOUNT`)
                let system = bytes.get(i) == Some(&c);
                if system {
                    i += 1;
                }
                let len = bytes[i..]
                    .iter()
                    .take_while(|v| v.is_ascii_alphanumeric() || **v == b'_')
                    .count();
                if len > 0 && !system {
                    result.push(sql[i - 1..i + len].to_string());
                }
                i += len;
            }
            _ => {}
        }
    }
    result
}

/// Every placeholder of the statement has a value and every value a placeholder.
pub fn assert_binds_complete(descriptor: &Descriptor, statement: &CompiledStatement) {
    let found = placeholders(descriptor, &statement.sql);
    match (descriptor.bind, &statement.bind) {
        (_, BindValues::None) => assert!(
            found.is_empty(),
            "Placeholders {found:?} without values in {}",
            statement.sql
        ),
        (BindStyle::Question, BindValues::Positional(values)) => assert_eq!(
            found.len(),
            values.len(),
            "Placeholders do not match the values in {}",
            statement.sql
        ),
        (BindStyle::Numbered(prefix), BindValues::Positional(values)) => assert_eq!(
            found.into_iter().collect::<BTreeSet<_>>(),
            (1..=values.len())
                .map(|i| format!("{prefix}{i}"))
                .collect::<BTreeSet<_>>(),
            "Placeholders do not match the values in {}",
            statement.sql
        ),
        (BindStyle::Named(prefix), BindValues::Named(values)) => assert_eq!(
            found.into_iter().collect::<BTreeSet<_>>(),
            values
                .keys()
                .map(|k| format!("{prefix}{k}"))
                .collect::<BTreeSet<_>>(),
            "Placeholders do not match the values in {}",
            statement.sql
        ),
        (style, values) => panic!("Bind values {values:?} do not fit the {style:?} placeholders"),
    }
}

fn expect_sql_error<T: Debug>(result: Result<T>, expected: &str, check: fn(&SqlError) -> bool) {
    let error = match result {
        Ok(value) => panic!("Expected {expected}, got {value:?}"),
        Err(error) => error,
    };
    match error.downcast_ref::<SqlError>() {
        Some(v) if check(v) => {}
        _ => panic!("Expected {expected}, got: {error:#}"),
    }
}

pub fn expect_feature_not_supported<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "FeatureNotSupported", |v| {
        matches!(v, SqlError::FeatureNotSupported { .. })
    });
}

pub fn expect_invalid_option<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "InvalidOption", |v| {
        matches!(v, SqlError::InvalidOption { .. })
    });
}

pub fn expect_invalid_identifier<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "InvalidIdentifier", |v| {
        matches!(v, SqlError::InvalidIdentifier { .. })
    });
}

pub fn expect_unsupported_value<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "UnsupportedValue", |v| {
        matches!(v, SqlError::UnsupportedValue { .. })
    });
}

pub fn expect_unbound_replacement<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "UnboundReplacement", |v| {
        matches!(v, SqlError::UnboundReplacement { .. })
    });
}

pub fn expect_ambiguous_replacement<T: Debug>(result: Result<T>) {
    expect_sql_error(result, "AmbiguousReplacement", |v| {
        matches!(v, SqlError::AmbiguousReplacement(..))
    });
}

/// Joins an indented multi line statement into the single line the writers produce.
pub fn one_line(sql: &str) -> String {
    sql.trim().lines().map(str::trim).collect::<Vec<_>>().join(" ")
}
