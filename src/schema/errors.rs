//! Configuration error types
//!
//! Two error classes abort work instead of being reported per field:
//!
//! - [`SchemaError`]: the schema is malformed or needs setup that is missing.
//!   Raised during parsing or validation, aborting the whole call.
//! - [`InvalidArgument`]: a rule registry mutation was refused.
//!
//! Per-field validation failures are never errors; they are messages inside
//! an [`ErrorTree`](super::ErrorTree).

use thiserror::Error;

/// Placeholder used in messages for the schema root
pub const ROOT_PATH: &str = "$root";

/// Schema configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Rule name with no registered predicate
    #[error("validator for rule \"{rule}\" does not exist{}", located(.path))]
    UnknownRule { rule: String, path: String },

    /// `type` or `elementType` token outside the supported set
    #[error("unsupported type \"{token}\"{}", located(.path))]
    UnsupportedType { token: String, path: String },

    /// Built-in rule given an argument of the wrong shape
    #[error("rule \"{rule}\" expects {expected}{}", located(.path))]
    InvalidRuleArgument {
        rule: String,
        expected: &'static str,
        path: String,
    },

    /// `regex` argument that does not compile
    #[error("invalid pattern \"{pattern}\": {reason}{}", located(.path))]
    InvalidPattern {
        pattern: String,
        reason: String,
        path: String,
    },

    /// Schema property whose value is not a schema node
    #[error("non-object for property in schema{}", located(.path))]
    NonObjectProperty { path: String },

    /// Rule set that is not a mapping
    #[error("rule set must be an object{}", located(.path))]
    InvalidRuleSet { path: String },

    /// Identifier-string type used with no codec installed
    #[error("type \"{token}\" requires an identifier codec; none is installed{}", located(.path))]
    MissingIdentifierCodec { token: String, path: String },
}

fn located(path: &str) -> String {
    if path.is_empty() {
        format!(" at {}", ROOT_PATH)
    } else {
        format!(" at {}", path)
    }
}

impl SchemaError {
    pub(crate) fn unknown_rule(rule: impl Into<String>) -> Self {
        SchemaError::UnknownRule {
            rule: rule.into(),
            path: String::new(),
        }
    }

    pub(crate) fn unsupported_type(token: impl Into<String>) -> Self {
        SchemaError::UnsupportedType {
            token: token.into(),
            path: String::new(),
        }
    }

    pub(crate) fn invalid_argument(rule: impl Into<String>, expected: &'static str) -> Self {
        SchemaError::InvalidRuleArgument {
            rule: rule.into(),
            expected,
            path: String::new(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
            path: String::new(),
        }
    }

    pub(crate) fn missing_identifier_codec(token: impl Into<String>) -> Self {
        SchemaError::MissingIdentifierCodec {
            token: token.into(),
            path: String::new(),
        }
    }

    /// Returns a stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownRule { .. } => "SHAPE_UNKNOWN_RULE",
            SchemaError::UnsupportedType { .. } => "SHAPE_UNSUPPORTED_TYPE",
            SchemaError::InvalidRuleArgument { .. } => "SHAPE_INVALID_RULE_ARGUMENT",
            SchemaError::InvalidPattern { .. } => "SHAPE_INVALID_PATTERN",
            SchemaError::NonObjectProperty { .. } => "SHAPE_NON_OBJECT_PROPERTY",
            SchemaError::InvalidRuleSet { .. } => "SHAPE_INVALID_RULE_SET",
            SchemaError::MissingIdentifierCodec { .. } => "SHAPE_MISSING_IDENTIFIER_CODEC",
        }
    }

    /// Dotted path of the schema node the error was raised at
    ///
    /// Empty for the root.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::UnknownRule { path, .. }
            | SchemaError::UnsupportedType { path, .. }
            | SchemaError::InvalidRuleArgument { path, .. }
            | SchemaError::InvalidPattern { path, .. }
            | SchemaError::NonObjectProperty { path }
            | SchemaError::InvalidRuleSet { path }
            | SchemaError::MissingIdentifierCodec { path, .. } => path,
        }
    }

    /// Returns the error relocated to `at`.
    pub(crate) fn at_path(mut self, at: &str) -> Self {
        match &mut self {
            SchemaError::UnknownRule { path, .. }
            | SchemaError::UnsupportedType { path, .. }
            | SchemaError::InvalidRuleArgument { path, .. }
            | SchemaError::InvalidPattern { path, .. }
            | SchemaError::NonObjectProperty { path }
            | SchemaError::InvalidRuleSet { path }
            | SchemaError::MissingIdentifierCodec { path, .. } => *path = at.to_string(),
        }
        self
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Rejected rule registry mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// `required` and `null` drive the existence and nullability gates
    #[error("argument rule must not be required or null (got \"{0}\")")]
    ReservedRule(String),

    #[error("argument rule must not be empty")]
    EmptyRuleName,
}
