//! Type tokens accepted by the `type` and `elementType` rules

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::identifier::IdentifierCodec;
use crate::schema::{SchemaError, SchemaResult};
use crate::value::Value;

/// Supported type tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeToken {
    Array,
    Boolean,
    /// Native date value
    Date,
    /// String that parses as a date
    DateString,
    /// String that parses as JSON
    JsonString,
    Number,
    /// Value that reads as a finite number
    NumberString,
    /// Non-array mapping
    Object,
    /// Value with the identifier capability
    ObjectId,
    /// String accepted by the installed identifier codec
    ObjectIdString,
    String,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

impl TypeToken {
    pub const ALL: [TypeToken; 11] = [
        TypeToken::Array,
        TypeToken::Boolean,
        TypeToken::Date,
        TypeToken::DateString,
        TypeToken::JsonString,
        TypeToken::Number,
        TypeToken::NumberString,
        TypeToken::Object,
        TypeToken::ObjectId,
        TypeToken::ObjectIdString,
        TypeToken::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeToken::Array => "array",
            TypeToken::Boolean => "boolean",
            TypeToken::Date => "date",
            TypeToken::DateString => "dateString",
            TypeToken::JsonString => "jsonString",
            TypeToken::Number => "number",
            TypeToken::NumberString => "numberString",
            TypeToken::Object => "object",
            TypeToken::ObjectId => "objectId",
            TypeToken::ObjectIdString => "objectIdString",
            TypeToken::String => "string",
        }
    }

    /// Fails closed when the token needs an identifier codec and none is installed.
    pub fn ensure_available(&self, identifiers: Option<&dyn IdentifierCodec>) -> SchemaResult<()> {
        if *self == TypeToken::ObjectIdString && identifiers.is_none() {
            return Err(SchemaError::missing_identifier_codec(self.as_str()));
        }
        Ok(())
    }

    /// Checks a non-null value against this token.
    pub fn matches(&self, value: &Value, identifiers: Option<&dyn IdentifierCodec>) -> bool {
        match self {
            TypeToken::Array => matches!(value, Value::Array(_)),
            TypeToken::Boolean => matches!(value, Value::Bool(_)),
            TypeToken::Date => matches!(value, Value::Date(_)),
            TypeToken::DateString => match value {
                Value::String(s) => is_date_string(s),
                Value::Date(_) => true,
                _ => false,
            },
            TypeToken::JsonString => match value {
                Value::String(s) => serde_json::from_str::<serde_json::Value>(s).is_ok(),
                Value::Number(n) => n.is_finite(),
                Value::Bool(_) => true,
                _ => false,
            },
            TypeToken::Number => matches!(value, Value::Number(_)),
            TypeToken::NumberString => match value {
                Value::Array(_) | Value::Object(_) | Value::Identifier(_) => false,
                other => other.to_number().is_finite(),
            },
            TypeToken::Object => matches!(value, Value::Object(_)),
            TypeToken::ObjectId => matches!(value, Value::Identifier(_)),
            TypeToken::ObjectIdString => match (value, identifiers) {
                (Value::String(s), Some(codec)) => codec.is_valid_encoding(s),
                _ => false,
            },
            TypeToken::String => matches!(value, Value::String(_)),
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TypeToken {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| SchemaError::unsupported_type(s))
    }
}

/// Returns true if the string reads as a date or timestamp.
fn is_date_string(input: &str) -> bool {
    let s = input.trim();

    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}
