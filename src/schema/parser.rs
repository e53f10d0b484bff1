//! Builds [`Schema`] trees from JSON mappings
//!
//! A schema is written as nested objects. The rule set of a node lives under
//! a reserved key (`_rules` unless configured otherwise); every other key is
//! a child node:
//!
//! ```json
//! {
//!   "title": { "_rules": { "type": "string", "required": true } },
//!   "crew":  { "director": { "_rules": { "type": "string" } } }
//! }
//! ```

use serde_json::Value as JsonValue;

use super::errors::{SchemaError, SchemaResult};
use super::types::{RuleSet, Schema};
use crate::config::ValidatorConfig;
use crate::value::Value;

/// Default key holding a node's rule set
pub const DEFAULT_RULES_KEY: &str = "_rules";

impl Schema {
    /// Parses a schema using the default `_rules` key.
    pub fn from_json(value: &JsonValue) -> SchemaResult<Self> {
        Self::from_json_with_key(value, DEFAULT_RULES_KEY)
    }

    /// Parses a schema using the rules key from `config`.
    pub fn from_json_with_config(value: &JsonValue, config: &ValidatorConfig) -> SchemaResult<Self> {
        Self::from_json_with_key(value, &config.rules_key)
    }

    /// Parses a schema whose rule sets live under `rules_key`.
    ///
    /// # Errors
    ///
    /// - `NonObjectProperty` if the root or any child is not an object
    /// - `InvalidRuleSet` if a rule set is not an object
    pub fn from_json_with_key(value: &JsonValue, rules_key: &str) -> SchemaResult<Self> {
        parse_node(value, rules_key, "")
    }
}

impl TryFrom<JsonValue> for Schema {
    type Error = SchemaError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Schema::from_json(&value)
    }
}

impl TryFrom<&JsonValue> for Schema {
    type Error = SchemaError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        Schema::from_json(value)
    }
}

fn parse_node(value: &JsonValue, rules_key: &str, path: &str) -> SchemaResult<Schema> {
    let map = value.as_object().ok_or_else(|| SchemaError::NonObjectProperty {
        path: path.to_string(),
    })?;

    let mut schema = Schema::new();
    for (key, child) in map {
        if key == rules_key {
            let rules = child.as_object().ok_or_else(|| SchemaError::InvalidRuleSet {
                path: path.to_string(),
            })?;
            schema = schema.with_rules(
                rules
                    .iter()
                    .map(|(name, arg)| (name.clone(), Value::from(arg)))
                    .collect::<RuleSet>(),
            );
        } else {
            let child_path = make_path(path, key);
            schema = schema.property(key.clone(), parse_node(child, rules_key, &child_path)?);
        }
    }

    Ok(schema)
}

/// Creates a field path from prefix and field name.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
