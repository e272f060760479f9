use crate::Expr;
use std::borrow::Cow;

/// Function call, the name is written unquoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Cow<'static, str>,
    pub args: Vec<Expr>,
}

/// Accepted argument count of a well known function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub name: &'static str,
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn exact(name: &'static str, count: usize) -> Self {
        Arity {
            name,
            min: count,
            max: Some(count),
        }
    }

    const fn range(name: &'static str, min: usize, max: Option<usize>) -> Self {
        Arity { name, min, max }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

/// Functions whose argument count is checked before writing, unknown names are not checked.
pub static KNOWN_FUNCTIONS: &[Arity] = &[
    Arity::exact("ABS", 1),
    Arity::exact("AVG", 1),
    Arity::range("COALESCE", 1, None),
    Arity::range("CONCAT", 1, None),
    Arity::exact("COUNT", 1),
    Arity::exact("CURRENT_TIMESTAMP", 0),
    Arity::exact("LENGTH", 1),
    Arity::exact("LOWER", 1),
    Arity::exact("MAX", 1),
    Arity::exact("MIN", 1),
    Arity::exact("NOW", 0),
    Arity::exact("NULLIF", 2),
    Arity::exact("RANDOM", 0),
    Arity::exact("REPLACE", 3),
    Arity::range("ROUND", 1, Some(2)),
    Arity::range("SUBSTRING", 2, Some(3)),
    Arity::exact("SUM", 1),
    Arity::exact("TRIM", 1),
    Arity::exact("UPPER", 1),
];

pub fn function_arity(name: &str) -> Option<&'static Arity> {
    KNOWN_FUNCTIONS
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_lookup() {
        let count = function_arity("count").unwrap();
        assert!(count.accepts(1));
        assert!(!count.accepts(0));
        assert!(!count.accepts(2));
        let coalesce = function_arity("COALESCE").unwrap();
        assert!(coalesce.accepts(7));
        assert!(!coalesce.accepts(0));
        assert!(function_arity("my_function").is_none());
    }
}
