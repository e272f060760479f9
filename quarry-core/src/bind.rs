use crate::{BindStyle, Result, SqlError, Value};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display, Formatter, Write},
};

/// Values substituted into the SQL text as escaped literals (`:name` or `?`).
#[derive(Debug, Clone, PartialEq)]
pub enum Replacements {
    Positional(Vec<Value>),
    Named(BTreeMap<String, Value>),
}

impl Replacements {
    pub fn named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Replacements::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Replacements::Positional(values.into_iter().map(Into::into).collect())
    }
}

/// Caller supplied bind parameters, referenced as `$name` or `$1` inside raw SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum BindParams {
    Positional(Vec<Value>),
    Named(BTreeMap<String, Value>),
}

impl BindParams {
    pub fn named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        BindParams::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        BindParams::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Looks up `$key`, numeric keys are 1 based positions.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            BindParams::Positional(values) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| values.get(i)),
            BindParams::Named(values) => values.get(key),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        match self {
            BindParams::Positional(values) => (1..=values.len()).map(|v| v.to_string()).collect(),
            BindParams::Named(values) => values.keys().cloned().collect(),
        }
    }
}

/// Values the driver must bind, in the shape the dialect placeholders expect.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum BindValues {
    #[default]
    None,
    /// Matches `?` in order of appearance, or `$n` / `:n` by position `n - 1`.
    Positional(Vec<Value>),
    /// Matches `@name` / `:name`.
    Named(BTreeMap<String, Value>),
}

impl BindValues {
    pub fn is_empty(&self) -> bool {
        match self {
            BindValues::None => true,
            BindValues::Positional(v) => v.is_empty(),
            BindValues::Named(v) => v.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BindValues::None => 0,
            BindValues::Positional(v) => v.len(),
            BindValues::Named(v) => v.len(),
        }
    }
}

/// Output of every compilation: the SQL text and the values to bind.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub bind: BindValues,
}

impl CompiledStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bind: BindValues::None,
        }
    }
}

impl Display for CompiledStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Collects bind values while a statement is written and emits their placeholders.
#[derive(Debug, Clone)]
pub struct BindCollector {
    style: BindStyle,
    values: Vec<Value>,
    named: BTreeMap<String, Value>,
    numbered: BTreeMap<String, usize>,
    /// Placeholder names of caller parameters, generated names never take them.
    reserved: BTreeSet<String>,
    /// Caller key owning each named placeholder.
    owners: BTreeMap<String, String>,
    counter: usize,
}

impl BindCollector {
    pub fn new(style: BindStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
            named: BTreeMap::new(),
            numbered: BTreeMap::new(),
            reserved: BTreeSet::new(),
            owners: BTreeMap::new(),
            counter: 0,
        }
    }

    /// Placeholder name of the caller parameter `key`, numeric keys get a `p` prefix.
    fn param_name(key: &str) -> String {
        if key.starts_with(|c: char| c.is_ascii_digit()) {
            format!("p{key}")
        } else {
            key.to_string()
        }
    }

    /// Keeps the names of the caller parameters away from the generated ones.
    pub fn reserve<K: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = K>) {
        if let BindStyle::Named(..) = self.style {
            self.reserved
                .extend(keys.into_iter().map(|k| Self::param_name(k.as_ref())));
        }
    }

    /// Anonymous value generated by the compiler.
    pub fn push(&mut self, out: &mut String, value: Value) {
        match self.style {
            BindStyle::Question => {
                out.push('?');
                self.values.push(value);
            }
            BindStyle::Numbered(prefix) => {
                self.values.push(value);
                let _ = write!(out, "{prefix}{}", self.values.len());
            }
            BindStyle::Named(prefix) => {
                let name = loop {
                    self.counter += 1;
                    let name = format!("quarry_{}", self.counter);
                    if !self.named.contains_key(&name) && !self.reserved.contains(&name) {
                        break name;
                    }
                };
                let _ = write!(out, "{prefix}{name}");
                self.named.insert(name, value);
            }
        }
    }

    /// Caller supplied parameter `key`, repeated references share the same slot when possible.
    pub fn push_param(&mut self, out: &mut String, key: &str, value: &Value) -> Result<()> {
        match self.style {
            BindStyle::Question => {
                out.push('?');
                self.values.push(value.clone());
            }
            BindStyle::Numbered(prefix) => {
                let position = match self.numbered.get(key) {
                    Some(position) => *position,
                    None => {
                        self.values.push(value.clone());
                        self.numbered.insert(key.to_string(), self.values.len());
                        self.values.len()
                    }
                };
                let _ = write!(out, "{prefix}{position}");
            }
            BindStyle::Named(prefix) => {
                let name = Self::param_name(key);
                match self.owners.get(&name) {
                    Some(owner) if owner == key => {}
                    Some(owner) => {
                        return Err(SqlError::AmbiguousReplacement(format!(
                            "`${owner}` and `${key}` are both bound as `{prefix}{name}`"
                        ))
                        .into());
                    }
                    None if self.named.contains_key(&name) => {
                        return Err(SqlError::AmbiguousReplacement(format!(
                            "`${key}` is bound as `{prefix}{name}`, already used by a generated value"
                        ))
                        .into());
                    }
                    None => {}
                }
                let _ = write!(out, "{prefix}{name}");
                self.owners.insert(name.clone(), key.to_string());
                self.named.insert(name, value.clone());
            }
        }
        Ok(())
    }

    pub fn finish(self) -> BindValues {
        match self.style {
            BindStyle::Named(..) if !self.named.is_empty() => BindValues::Named(self.named),
            BindStyle::Question | BindStyle::Numbered(..) if !self.values.is_empty() => {
                BindValues::Positional(self.values)
            }
            _ => BindValues::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_parameters_are_reused() {
        let mut collector = BindCollector::new(BindStyle::Numbered('$'));
        let mut out = String::new();
        collector.push_param(&mut out, "id", &Value::Int64(1)).unwrap();
        out.push(' ');
        collector.push(&mut out, Value::Varchar("x".into()));
        out.push(' ');
        collector.push_param(&mut out, "id", &Value::Int64(1)).unwrap();
        assert_eq!(out, "$1 $2 $1");
        assert_eq!(
            collector.finish(),
            BindValues::Positional(vec![Value::Int64(1), Value::Varchar("x".into())])
        );
    }

    #[test]
    fn question_marks_repeat_values() {
        let mut collector = BindCollector::new(BindStyle::Question);
        let mut out = String::new();
        collector.push_param(&mut out, "a", &Value::Int64(1)).unwrap();
        collector.push_param(&mut out, "a", &Value::Int64(1)).unwrap();
        assert_eq!(out, "??");
        assert_eq!(collector.finish().len(), 2);
    }

    #[test]
    fn named_parameters() {
        let mut collector = BindCollector::new(BindStyle::Named('@'));
        let mut out = String::new();
        collector.push(&mut out, Value::Boolean(true));
        out.push(',');
        collector.push_param(&mut out, "1", &Value::Int64(5)).unwrap();
        assert_eq!(out, "@quarry_1,@p1");
        let BindValues::Named(values) = collector.finish() else {
            panic!("Expected named values");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values["p1"], Value::Int64(5));
    }

    #[test]
    fn generated_names_skip_caller_parameters() {
        let mut collector = BindCollector::new(BindStyle::Named('@'));
        collector.reserve(["quarry_1"]);
        let mut out = String::new();
        collector.push(&mut out, Value::Varchar("Ada".into()));
        out.push(',');
        collector
            .push_param(&mut out, "quarry_1", &Value::Int64(5))
            .unwrap();
        assert_eq!(out, "@quarry_2,@quarry_1");
        let BindValues::Named(values) = collector.finish() else {
            panic!("Expected named values");
        };
        assert_eq!(values["quarry_2"], Value::Varchar("Ada".into()));
        assert_eq!(values["quarry_1"], Value::Int64(5));
    }

    #[test]
    fn colliding_parameter_names() {
        let mut collector = BindCollector::new(BindStyle::Named('@'));
        let mut out = String::new();
        collector.push_param(&mut out, "p1", &Value::Int64(1)).unwrap();
        let error = collector
            .push_param(&mut out, "1", &Value::Int64(2))
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::AmbiguousReplacement(..))
        ));

        let mut collector = BindCollector::new(BindStyle::Named('@'));
        collector.push(&mut out, Value::Boolean(true));
        assert!(
            collector
                .push_param(&mut out, "quarry_1", &Value::Int64(5))
                .is_err()
        );
    }

    #[test]
    fn nothing_collected() {
        assert_eq!(
            BindCollector::new(BindStyle::Question).finish(),
            BindValues::None
        );
    }
}
