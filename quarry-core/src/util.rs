pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Like [`separated_by`] but stops at the first error.
pub fn try_separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> crate::Result<()>
where
    F: FnMut(&mut String, T) -> crate::Result<()>,
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v)?;
    }
    Ok(())
}

pub fn consume_while<'s>(input: &mut &'s str, mut predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len = input
        .char_indices()
        .find(|(_, c)| !predicate(c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    if len == 0 {
        return "";
    }
    let result = &input[..len];
    *input = &input[len..];
    result
}

/// Largest prefix of `value` not longer than `max` bytes ending on a char boundary.
pub fn truncate_str(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Appends `value` to an underscore separated name (default index and constraint names).
pub fn push_name_part(out: &mut String, value: &str) {
    if !out.is_empty() {
        out.push('_');
    }
    out.push_str(value);
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
