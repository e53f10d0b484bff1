//! Recursive validator
//!
//! Walks the schema tree in lock-step with the data. At each node the rule
//! set is applied in priority order:
//!
//! 1. `required` decides what happens to an absent value
//! 2. `null`
//! 3. `type`, `elementNull`, `elementType`
//! 4. every other rule, in name order
//!
//! The first failing rule becomes the node's message and nothing below the
//! node is visited. A node whose rules pass recurses into its children.
//!
//! Data failures are collected into an [`ErrorTree`]. Schema problems
//! ([`SchemaError`]) abort the whole call.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::errors::{SchemaError, SchemaResult};
use super::parser::make_path;
use super::tree::ErrorTree;
use super::types::{RuleSet, Schema};
use crate::rules::{BuiltinRule, RuleRegistry, REQUIRED_MESSAGE};
use crate::value::Value;

/// Validates data against schemas using a borrowed rule registry.
///
/// The validator holds no state of its own; validating the same input twice
/// with an unchanged registry yields the same result.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Validates `data` against `schema`.
    ///
    /// Returns `Ok(None)` when the data is valid and `Ok(Some(tree))` when
    /// one or more fields failed.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the schema names an unknown rule, an
    /// unsupported type, a malformed rule argument, or needs an identifier
    /// codec the registry does not have.
    pub fn validate(&self, data: &Value, schema: &Schema) -> SchemaResult<Option<ErrorTree>> {
        self.validate_field(Some(data), schema)
    }

    /// Validates a possibly absent value against `schema`.
    pub fn validate_field(
        &self,
        value: Option<&Value>,
        schema: &Schema,
    ) -> SchemaResult<Option<ErrorTree>> {
        self.validate_node(value, schema, "").map_err(|err| {
            debug!(code = err.code(), path = err.path(), error = %err, "schema rejected");
            err
        })
    }

    fn validate_node(
        &self,
        value: Option<&Value>,
        schema: &Schema,
        path: &str,
    ) -> SchemaResult<Option<ErrorTree>> {
        let rules = schema.rule_set();

        let required = match rules.and_then(|r| r.get(BuiltinRule::Required.name())) {
            Some(arg) => BuiltinRule::Required
                .flag(arg)
                .map_err(|e| e.at_path(path))?,
            None => false,
        };

        // Absent values skip the whole subtree unless required.
        let value = match value {
            Some(value) => value,
            None if required => {
                trace!(path, "required field missing");
                return Ok(Some(ErrorTree::message_for(REQUIRED_MESSAGE)));
            }
            None => return Ok(None),
        };

        if let Some(rules) = rules {
            if let Some(message) = self.check_rules(value, rules, path)? {
                return Ok(Some(ErrorTree::Message(message)));
            }
        }

        let mut children = BTreeMap::new();
        for (key, child) in schema.properties() {
            let child_path = make_path(path, key);
            if let Some(tree) = self.validate_node(value.get(key), child, &child_path)? {
                children.insert(key.to_string(), tree);
            }
        }

        if children.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ErrorTree::Nested(children)))
        }
    }

    /// Returns the first failure message in priority order.
    fn check_rules(&self, value: &Value, rules: &RuleSet, path: &str) -> SchemaResult<Option<String>> {
        let gates = BuiltinRule::PRIORITY
            .iter()
            .filter(|rule| **rule != BuiltinRule::Required)
            .filter_map(|rule| rules.get(rule.name()).map(|arg| (rule.name(), arg)));

        let remaining = rules
            .iter()
            .filter(|(name, _)| !BuiltinRule::is_priority_name(name));

        for (name, argument) in gates.chain(remaining) {
            let outcome = self
                .registry
                .apply(name, value, argument)
                .map_err(|e| e.at_path(path))?;

            if let Some(message) = outcome {
                trace!(path, rule = name, message = %message, "field failed");
                return Ok(Some(message));
            }
        }

        Ok(None)
    }
}

/// Validates `data` against `schema` with the built-in rules only.
///
/// No identifier codec is installed, so `objectIdString` fails with
/// [`SchemaError::MissingIdentifierCodec`]. Use [`Validator`] with a
/// configured [`RuleRegistry`] for custom rules or codecs.
pub fn validate(data: &Value, schema: &Schema) -> Result<Option<ErrorTree>, SchemaError> {
    Validator::new(RuleRegistry::builtin()).validate(data, schema)
}
