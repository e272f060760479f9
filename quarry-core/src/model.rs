use crate::{DataType, TableRef};
use std::borrow::Cow;

/// Logical attribute of a model and the physical column backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMeta {
    pub name: Cow<'static, str>,
    pub field: Cow<'static, str>,
    pub data_type: Option<DataType>,
    pub primary_key: bool,
}

/// Model metadata: attribute to column mapping plus the primary key.
///
/// Expressions and value lists refer to attributes, the compiler writes the
/// mapped column names. Names without an attribute entry are written as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeta {
    pub table: TableRef,
    pub attributes: Vec<AttributeMeta>,
}

impl ModelMeta {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(
        mut self,
        name: impl Into<Cow<'static, str>>,
        field: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.attributes.push(AttributeMeta {
            name: name.into(),
            field: field.into(),
            data_type: None,
            primary_key: false,
        });
        self
    }

    pub fn typed_attribute(
        mut self,
        name: impl Into<Cow<'static, str>>,
        field: impl Into<Cow<'static, str>>,
        data_type: DataType,
    ) -> Self {
        self.attributes.push(AttributeMeta {
            name: name.into(),
            field: field.into(),
            data_type: Some(data_type),
            primary_key: false,
        });
        self
    }

    pub fn primary_key(
        mut self,
        name: impl Into<Cow<'static, str>>,
        field: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.attributes.push(AttributeMeta {
            name: name.into(),
            field: field.into(),
            data_type: None,
            primary_key: true,
        });
        self
    }

    /// Physical column for `attribute`, the attribute itself when unmapped.
    pub fn field_name<'s>(&'s self, attribute: &'s str) -> &'s str {
        self.attributes
            .iter()
            .find(|v| v.name == attribute)
            .map(|v| v.field.as_ref())
            .unwrap_or(attribute)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &AttributeMeta> + Clone {
        self.attributes.iter().filter(|v| v.primary_key)
    }

    pub fn is_primary_key(&self, attribute: &str) -> bool {
        self.primary_keys().any(|v| v.name == attribute)
    }
}
