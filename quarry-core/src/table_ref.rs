use std::borrow::Cow;

/// Table reference with optional schema and alias, empty strings mean absent.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub name: Cow<'static, str>,
    pub schema: Cow<'static, str>,
    pub alias: Cow<'static, str>,
}

impl TableRef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Same table without its alias.
    pub fn unaliased(&self) -> Self {
        Self {
            name: self.name.clone(),
            schema: self.schema.clone(),
            alias: Cow::Borrowed(""),
        }
    }

    /// Name used to qualify columns: the alias when present, the table name otherwise.
    pub fn qualifier(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    /// Owned version of [`TableRef::qualifier`].
    pub fn owned_qualifier(&self) -> Cow<'static, str> {
        if self.alias.is_empty() {
            self.name.clone()
        } else {
            self.alias.clone()
        }
    }

    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(&self.schema);
            result.push('.');
        }
        result.push_str(&self.name);
        result
    }
}

impl From<&'static str> for TableRef {
    fn from(value: &'static str) -> Self {
        TableRef::new(value)
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        TableRef::new(value)
    }
}
