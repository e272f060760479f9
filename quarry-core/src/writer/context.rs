use crate::{
    BindCollector, BindParams, BindStyle, BindValues, ModelMeta, Replacements, Result, SqlError,
};
use std::{
    borrow::Cow,
    collections::BTreeSet,
    ops::{Deref, DerefMut},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    Casting,
    JsonPath,
    Limit,
    Raw,
    SqlAlterTable,
    SqlCommentOnColumn,
    SqlConstraint,
    SqlCreateIndex,
    SqlCreateSchema,
    SqlCreateTable,
    SqlCreateTablePrimaryKey,
    SqlCreateTableUnique,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlDropSchema,
    SqlDropTable,
    SqlInsertInto,
    SqlInsertIntoOnConflict,
    SqlInsertIntoValues,
    SqlJoin,
    SqlReturning,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectHaving,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdateSet,
    SqlUpdateWhere,
    SqlUpsert,
}

/// State carried through the writing of one statement.
///
/// Holds the statement level inputs (model, replacements, bind parameters) and
/// the values collected for the driver. A context is never reused across
/// statements, [`Context::finish`] consumes it and checks that every supplied
/// replacement and bind parameter was referenced.
#[derive(Debug)]
pub struct Context<'a> {
    pub fragment: Fragment,
    pub qualify_columns: bool,
    /// Qualifier of unqualified columns when `qualify_columns` is set.
    pub qualifier: Option<Cow<'static, str>>,
    pub model: Option<&'a ModelMeta>,
    pub replacements: Option<&'a Replacements>,
    pub bind_params: Option<&'a BindParams>,
    /// Literal values are sent through placeholders.
    pub bind_values: bool,
    pub binds: BindCollector,
    pub(crate) used_replacements: BTreeSet<String>,
    pub(crate) positional_consumed: usize,
    pub(crate) used_bind_params: BTreeSet<String>,
}

impl<'a> Context<'a> {
    pub fn new(fragment: Fragment, bind: BindStyle) -> Self {
        Self {
            fragment,
            qualify_columns: false,
            qualifier: None,
            model: None,
            replacements: None,
            bind_params: None,
            bind_values: false,
            binds: BindCollector::new(bind),
            used_replacements: BTreeSet::new(),
            positional_consumed: 0,
            used_bind_params: BTreeSet::new(),
        }
    }

    pub fn with_model(mut self, model: Option<&'a ModelMeta>) -> Self {
        self.model = model;
        self
    }

    pub fn with_replacements(mut self, replacements: Option<&'a Replacements>) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn with_bind_params(mut self, bind_params: Option<&'a BindParams>) -> Self {
        if let Some(bind_params) = bind_params {
            self.binds.reserve(bind_params.keys());
        }
        self.bind_params = bind_params;
        self
    }

    pub fn with_bind_values(mut self, bind_values: bool) -> Self {
        self.bind_values = bind_values;
        self
    }

    /// Physical column name of `attribute` according to the model.
    pub fn field_name<'s>(&self, attribute: &'s str) -> &'s str
    where
        'a: 's,
    {
        match self.model {
            Some(model) => model.field_name(attribute),
            None => attribute,
        }
    }

    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s, 'a> {
        let previous = self.fragment;
        let previous_qualify = self.qualify_columns;
        let previous_qualifier = self.qualifier.clone();
        self.fragment = fragment;
        ContextUpdater {
            previous,
            previous_qualify,
            previous_qualifier,
            context: self,
        }
    }

    /// Consumes the context returning the collected bind values.
    ///
    /// Fails when a named replacement, a positional replacement or a bind
    /// parameter was supplied but never referenced.
    pub fn finish(self) -> Result<BindValues> {
        match self.replacements {
            Some(Replacements::Named(values)) => {
                if let Some(unused) = values
                    .keys()
                    .find(|k| !self.used_replacements.contains(k.as_str()))
                {
                    return Err(SqlError::unbound_replacement(
                        format!(":{unused}"),
                        "the replacement is never referenced",
                    )
                    .into());
                }
            }
            Some(Replacements::Positional(values)) if values.len() > self.positional_consumed => {
                return Err(SqlError::unbound_replacement(
                    format!("?{}", self.positional_consumed + 1),
                    format!(
                        "{} positional replacements supplied, {} referenced",
                        values.len(),
                        self.positional_consumed
                    ),
                )
                .into());
            }
            _ => {}
        }
        if let Some(bind_params) = self.bind_params {
            if let Some(unused) = bind_params
                .keys()
                .into_iter()
                .find(|k| !self.used_bind_params.contains(k))
            {
                return Err(SqlError::unbound_replacement(
                    format!("${unused}"),
                    "the bind parameter is never referenced",
                )
                .into());
            }
        }
        Ok(self.binds.finish())
    }
}

/// Restores the fragment, the qualification and the qualifier when dropped.
pub struct ContextUpdater<'s, 'a> {
    previous: Fragment,
    previous_qualify: bool,
    previous_qualifier: Option<Cow<'static, str>>,
    context: &'s mut Context<'a>,
}

impl<'s, 'a> Deref for ContextUpdater<'s, 'a> {
    type Target = Context<'a>;
    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl<'s, 'a> DerefMut for ContextUpdater<'s, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl<'s, 'a> Drop for ContextUpdater<'s, 'a> {
    fn drop(&mut self) {
        self.context.fragment = self.previous;
        self.context.qualify_columns = self.previous_qualify;
        self.context.qualifier = self.previous_qualifier.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn fragment_is_restored() {
        let mut context = Context::new(Fragment::SqlSelect, BindStyle::Question);
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            context.qualify_columns = true;
            assert_eq!(context.fragment, Fragment::SqlSelectWhere);
            {
                let context = context.switch_fragment(Fragment::Casting);
                assert_eq!(context.fragment, Fragment::Casting);
                assert!(context.qualify_columns);
            }
            assert_eq!(context.fragment, Fragment::SqlSelectWhere);
        }
        assert_eq!(context.fragment, Fragment::SqlSelect);
        assert!(!context.qualify_columns);
    }

    #[test]
    fn unused_replacements_are_rejected() {
        let replacements = Replacements::named([("a", 1), ("b", 2)]);
        let mut context = Context::new(Fragment::None, BindStyle::Question)
            .with_replacements(Some(&replacements));
        context.used_replacements.insert("a".into());
        let error = context.finish().unwrap_err();
        assert_eq!(
            error.downcast_ref::<SqlError>(),
            Some(&SqlError::unbound_replacement(
                ":b",
                "the replacement is never referenced"
            ))
        );
    }

    #[test]
    fn unused_bind_params_are_rejected() {
        let bind = BindParams::positional([Value::Int64(1)]);
        let context =
            Context::new(Fragment::None, BindStyle::Numbered('$')).with_bind_params(Some(&bind));
        assert!(matches!(
            context.finish().unwrap_err().downcast_ref::<SqlError>(),
            Some(SqlError::UnboundReplacement { .. })
        ));
    }
}
