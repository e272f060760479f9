use crate::{Descriptor, Result, SqlError};

/// Piece of raw SQL text as seen by the replacement scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken<'s> {
    /// Copied verbatim.
    Text(&'s str),
    /// `:name` replacement.
    Named(&'s str),
    /// `?` replacement.
    Positional,
    /// `$name` or `$1` bind parameter.
    Bind(&'s str),
}

/// Placeholders the scanner looks for, everything else stays text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanFor {
    pub named: bool,
    pub positional: bool,
    pub binds: bool,
}

fn can_precede_new_token(c: Option<u8>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_ascii_whitespace() || matches!(c, b'(' | b'[' | b'>' | b',' | b'='),
    }
}

fn is_word(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Length of `[a-z_][0-9a-z_]*` at the start of `s`.
fn identifier_len(s: &[u8]) -> usize {
    match s.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == b'_' => {
            1 + s[1..].iter().take_while(|c| is_word(**c)).count()
        }
        _ => 0,
    }
}

/// Length of `[1-9][0-9]*` at the start of `s`.
fn number_len(s: &[u8]) -> usize {
    match s.first() {
        Some(b'1'..=b'9') => 1 + s[1..].iter().take_while(|c| c.is_ascii_digit()).count(),
        _ => 0,
    }
}

/// A placeholder name must be followed by one of `) , ] ;`, whitespace, `::` or the end.
fn is_placeholder_end(s: &[u8]) -> bool {
    match s.first() {
        None => true,
        Some(c) if c.is_ascii_whitespace() => true,
        Some(b')' | b',' | b']' | b';') => true,
        Some(b':') => s.get(1) == Some(&b':'),
        _ => false,
    }
}

/// Dollar quoted string opening tag at the start of `s`: returns (tag, total length).
fn dollar_tag(s: &[u8]) -> Option<(&[u8], usize)> {
    if s.first() != Some(&b'$') {
        return None;
    }
    let len = identifier_len(&s[1..]);
    if s.get(1 + len) == Some(&b'$') {
        Some((&s[1..1 + len], len + 2))
    } else {
        None
    }
}

fn is_backslash_escaped(s: &[u8], position: usize) -> bool {
    s[..position]
        .iter()
        .rev()
        .take_while(|c| **c == b'\\')
        .count()
        % 2
        == 1
}

/// Splits `sql` into text and placeholders, skipping string literals, quoted
/// identifiers, comments and dollar quoted strings.
///
/// Every syntax character involved is ASCII so slicing at their positions
/// always lands on char boundaries.
pub fn scan_raw<'s>(
    sql: &'s str,
    descriptor: &Descriptor,
    scan_for: ScanFor,
) -> Result<Vec<RawToken<'s>>> {
    #[derive(PartialEq)]
    enum State<'t> {
        Code,
        Identifier,
        String { backslash: bool },
        Dollar(&'t [u8]),
        LineComment,
        BlockComment,
    }
    let bytes = sql.as_bytes();
    let quote_left = descriptor.identifier_quote_left as u32;
    let quote_right = descriptor.identifier_quote_right as u32;
    let mut result = Vec::new();
    let mut state = State::Code;
    let mut slice_start = 0;
    let mut i = 0;
    let previous = |i: usize| if i > 0 { Some(bytes[i - 1]) } else { None };
    while i < bytes.len() {
        let c = bytes[i];
        match state {
            State::Identifier => {
                if c as u32 == quote_right {
                    state = State::Code;
                }
                i += 1;
                continue;
            }
            State::String { backslash } => {
                if c == b'\'' && (!backslash || !is_backslash_escaped(bytes, i)) {
                    state = State::Code;
                }
                i += 1;
                continue;
            }
            State::Dollar(tag) => {
                match dollar_tag(&bytes[i..]) {
                    Some((closing, len)) if closing == tag => {
                        state = State::Code;
                        i += len;
                    }
                    _ => i += 1,
                }
                continue;
            }
            State::LineComment => {
                if c == b'\n' {
                    state = State::Code;
                }
                i += 1;
                continue;
            }
            State::BlockComment => {
                if c == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::Code;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            State::Code => {}
        }
        if c as u32 == quote_left {
            state = State::Identifier;
            i += 1;
            continue;
        }
        if c == b'\'' {
            let prefixed = matches!(previous(i), Some(b'E' | b'e'))
                && can_precede_new_token(if i > 1 { Some(bytes[i - 2]) } else { None });
            state = State::String {
                backslash: descriptor.can_backslash_escape()
                    || (descriptor.supports.escape_string_constants && prefixed),
            };
            i += 1;
            continue;
        }
        if bytes[i..].starts_with(b"-- ") {
            state = State::LineComment;
            i += 3;
            continue;
        }
        if bytes[i..].starts_with(b"/*") {
            state = State::BlockComment;
            i += 2;
            continue;
        }
        if c == b'$' {
            if previous(i).is_some_and(is_word) {
                i += 1;
                continue;
            }
            if descriptor.supports.dollar_quoted_strings {
                if let Some((tag, len)) = dollar_tag(&bytes[i..]) {
                    state = State::Dollar(tag);
                    i += len;
                    continue;
                }
            }
            if scan_for.binds && can_precede_new_token(previous(i)) {
                let rest = &bytes[i + 1..];
                let len = identifier_len(rest).max(number_len(rest));
                if len > 0 && is_placeholder_end(&rest[len..]) {
                    result.push(RawToken::Text(&sql[slice_start..i]));
                    result.push(RawToken::Bind(&sql[i + 1..i + 1 + len]));
                    i += 1 + len;
                    slice_start = i;
                    continue;
                }
            }
            i += 1;
            continue;
        }
        if c == b':' && scan_for.named && can_precede_new_token(previous(i)) {
            let rest = &bytes[i + 1..];
            let len = identifier_len(rest);
            if len > 0 && is_placeholder_end(&rest[len..]) {
                result.push(RawToken::Text(&sql[slice_start..i]));
                result.push(RawToken::Named(&sql[i + 1..i + 1 + len]));
                i += 1 + len;
                slice_start = i;
                continue;
            }
        }
        if c == b'?'
            && scan_for.positional
            && can_precede_new_token(previous(i))
            && !matches!(bytes.get(i + 1), Some(b'|' | b'&'))
        {
            result.push(RawToken::Text(&sql[slice_start..i]));
            result.push(RawToken::Positional);
            i += 1;
            slice_start = i;
            continue;
        }
        i += 1;
    }
    if matches!(state, State::String { .. }) {
        return Err(SqlError::invalid_option(
            "raw SQL",
            descriptor.dialect,
            format!("unterminated string literal in `{}`", crate::truncate_long!(sql)),
        )
        .into());
    }
    result.push(RawToken::Text(&sql[slice_start..]));
    result.retain(|v| *v != RawToken::Text(""));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Descriptor, Dialect, StringEscape, Supports};
    use indoc::indoc;

    const POSTGRES: Descriptor = Descriptor {
        dialect: Dialect::Postgres,
        supports: Supports {
            escape_string_constants: true,
            dollar_quoted_strings: true,
            ..Supports::NONE
        },
        ..Descriptor::DEFAULT
    };

    const MYSQL: Descriptor = Descriptor {
        dialect: Dialect::MySql,
        identifier_quote_left: '`',
        identifier_quote_right: '`',
        string_escape: StringEscape::Backslash,
        ..Descriptor::DEFAULT
    };

    const ALL: ScanFor = ScanFor {
        named: true,
        positional: true,
        binds: true,
    };

    #[test]
    fn placeholders_outside_literals() {
        let tokens = scan_raw(
            "SELECT * FROM t WHERE a = :a AND b IN (:b, ?) AND c = $c::int",
            &POSTGRES,
            ALL,
        )
        .unwrap();
        assert_eq!(
            tokens,
            [
                RawToken::Text("SELECT * FROM t WHERE a = "),
                RawToken::Named("a"),
                RawToken::Text(" AND b IN ("),
                RawToken::Named("b"),
                RawToken::Text(", "),
                RawToken::Positional,
                RawToken::Text(") AND c = "),
                RawToken::Bind("c"),
                RawToken::Text("::int"),
            ]
        );
    }

    #[test]
    fn placeholders_inside_literals_are_text() {
        let sql = indoc! {r#"
            SELECT ':a', "?", $$ $b $$, $tag$ :c $tag$ -- :d
            /* ? */ FROM t
        "#};
        let tokens = scan_raw(sql, &POSTGRES, ALL).unwrap();
        assert_eq!(tokens, [RawToken::Text(sql)]);
    }

    #[test]
    fn escape_string_constants() {
        let tokens = scan_raw(r"SELECT E'\' :a' = :b", &POSTGRES, ALL).unwrap();
        assert_eq!(
            tokens,
            [RawToken::Text(r"SELECT E'\' :a' = "), RawToken::Named("b")]
        );
        // Without the prefix the backslash is plain text and the last quote opens a new string
        assert!(scan_raw(r"SELECT '\' :a' = :b", &POSTGRES, ALL).is_err());
    }

    #[test]
    fn backslash_dialect() {
        let tokens = scan_raw(r"SELECT '\' ?', `a?` = ?", &MYSQL, ALL).unwrap();
        assert_eq!(
            tokens,
            [RawToken::Text(r"SELECT '\' ?', `a?` = "), RawToken::Positional]
        );
    }

    #[test]
    fn operators_are_not_placeholders() {
        let sql = "SELECT a::int, b ?| c, d ?& e, x:y, f$1 FROM t";
        let tokens = scan_raw(sql, &POSTGRES, ALL).unwrap();
        assert_eq!(tokens, [RawToken::Text(sql)]);
    }

    #[test]
    fn array_positions() {
        let tokens = scan_raw("ARRAY[:a]", &POSTGRES, ALL).unwrap();
        assert_eq!(
            tokens,
            [
                RawToken::Text("ARRAY["),
                RawToken::Named("a"),
                RawToken::Text("]")
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let error = scan_raw("SELECT 'abc", &POSTGRES, ALL).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::InvalidOption { .. })
        ));
    }

    #[test]
    fn disabled_placeholders() {
        let sql = "SELECT :a, ?, $1";
        let tokens = scan_raw(sql, &POSTGRES, ScanFor::default()).unwrap();
        assert_eq!(tokens, [RawToken::Text(sql)]);
    }
}
