use crate::Expr;
use std::{borrow::Cow, fmt::Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(Cow<'static, str>),
    Index(usize),
}

impl From<&'static str> for PathSegment {
    fn from(value: &'static str) -> Self {
        PathSegment::Key(value.into())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Key(value.into())
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

/// Navigation inside a JSON document, `unquote` extracts the text instead of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    pub base: Expr,
    pub path: Vec<PathSegment>,
    pub unquote: bool,
}

impl JsonPath {
    /// `$.a.b[0]` notation, keys that are not plain words get double quoted.
    pub fn dollar_notation(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    out.push('.');
                    if !key.is_empty()
                        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        out.push_str(key);
                    } else {
                        out.push('"');
                        for c in key.chars() {
                            if c == '"' || c == '\\' {
                                out.push('\\');
                            }
                            out.push(c);
                        }
                        out.push('"');
                    }
                }
                PathSegment::Index(i) => {
                    let _ = write!(out, "[{i}]");
                }
            }
        }
        out
    }

    /// `a.b[0]` notation used by `GET_PATH`.
    pub fn dotted_notation(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(i) => {
                    let _ = write!(out, "[{i}]");
                }
            }
        }
        out
    }

    /// `{a,b,0}` notation used by the Postgres `#>` operators.
    pub fn brace_notation(&self) -> String {
        let mut out = String::from("{");
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match segment {
                PathSegment::Key(key) => out.push_str(key),
                PathSegment::Index(i) => {
                    let _ = write!(out, "{i}");
                }
            }
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expr;

    #[test]
    fn path_notations() {
        let path = JsonPath {
            base: Expr::col("data"),
            path: vec!["address".into(), "zip code".into(), 0.into()],
            unquote: false,
        };
        assert_eq!(path.dollar_notation(), r#"$.address."zip code"[0]"#);
        assert_eq!(path.dotted_notation(), "address.zip code[0]");
        assert_eq!(path.brace_notation(), "{address,zip code,0}");
    }
}
