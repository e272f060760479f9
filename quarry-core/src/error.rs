use crate::Dialect;
use std::borrow::Cow;

/// Compile-time failures raised while turning a query into SQL text.
///
/// Every variant describes a programmer or input error: the statement is rejected
/// as a whole and no partial SQL is ever returned. Writers raise them wrapped in
/// [`crate::Error`], callers recover the kind with `error.downcast_ref::<SqlError>()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    /// Empty or malformed identifier.
    #[error("Invalid identifier `{identifier}`: {reason}")]
    InvalidIdentifier {
        identifier: String,
        reason: Cow<'static, str>,
    },
    /// The literal has no SQL representation in the target dialect.
    #[error("Value {value} cannot be written as a SQL literal: {reason}")]
    UnsupportedValue {
        value: String,
        reason: Cow<'static, str>,
    },
    /// The target dialect lacks the requested capability.
    #[error("{feature} is not supported by the {dialect} dialect")]
    FeatureNotSupported {
        feature: Cow<'static, str>,
        dialect: Dialect,
    },
    /// The options are contradictory or meaningless for the dialect.
    #[error("Invalid options for {operation} on the {dialect} dialect: {message}")]
    InvalidOption {
        operation: Cow<'static, str>,
        dialect: Dialect,
        message: String,
    },
    /// Conflicting replacement mechanisms supplied in the same call.
    #[error("Ambiguous replacements: {0}")]
    AmbiguousReplacement(String),
    /// A placeholder without a value, or a value without a placeholder.
    #[error("Unbound replacement `{placeholder}`: {reason}")]
    UnboundReplacement {
        placeholder: String,
        reason: Cow<'static, str>,
    },
}

impl SqlError {
    pub fn invalid_identifier(
        identifier: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        SqlError::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_value(
        value: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        SqlError::UnsupportedValue {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn feature_not_supported(feature: impl Into<Cow<'static, str>>, dialect: Dialect) -> Self {
        SqlError::FeatureNotSupported {
            feature: feature.into(),
            dialect,
        }
    }

    pub fn invalid_option(
        operation: impl Into<Cow<'static, str>>,
        dialect: Dialect,
        message: impl Into<String>,
    ) -> Self {
        SqlError::InvalidOption {
            operation: operation.into(),
            dialect,
            message: message.into(),
        }
    }

    pub fn unbound_replacement(
        placeholder: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        SqlError::UnboundReplacement {
            placeholder: placeholder.into(),
            reason: reason.into(),
        }
    }
}

/// Shorthand for the check-then-fail pattern used by the clause builders.
#[macro_export]
macro_rules! ensure_supported {
    ($supported:expr, $feature:expr, $dialect:expr $(,)?) => {
        if !$supported {
            return Err($crate::SqlError::feature_not_supported($feature, $dialect).into());
        }
    };
}
