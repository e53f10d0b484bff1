//! Rule registry
//!
//! Maps rule names to predicates. A registry starts with every built-in rule
//! and is owned by the application: mutation takes `&mut self`, validation
//! only borrows. Custom predicates may replace any built-in except the two
//! reserved ones, `required` and `null`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::builtin::BuiltinRule;
use crate::config::ValidatorConfig;
use crate::identifier::IdentifierCodec;
use crate::schema::{InvalidArgument, SchemaError, SchemaResult};
use crate::value::Value;

/// Custom rule predicate: `(value, argument) -> failure message`
pub type CustomPredicate = Arc<dyn Fn(&Value, &Value) -> Option<String> + Send + Sync>;

/// A registered predicate
#[derive(Clone)]
pub enum RulePredicate {
    Builtin(BuiltinRule),
    Custom(CustomPredicate),
}

impl RulePredicate {
    /// Runs the predicate. Custom predicates also see null values.
    pub fn evaluate(
        &self,
        value: &Value,
        argument: &Value,
        identifiers: Option<&dyn IdentifierCodec>,
    ) -> SchemaResult<Option<String>> {
        match self {
            RulePredicate::Builtin(rule) => Ok(rule
                .evaluate(value, argument, identifiers)?
                .map(str::to_string)),
            RulePredicate::Custom(predicate) => Ok(predicate(value, argument)),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, RulePredicate::Builtin(_))
    }
}

impl fmt::Debug for RulePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulePredicate::Builtin(rule) => f.debug_tuple("Builtin").field(&rule.name()).finish(),
            RulePredicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rule name to predicate mapping
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RulePredicate>,
    identifiers: Option<Arc<dyn IdentifierCodec>>,
}

impl RuleRegistry {
    /// Creates a registry holding every built-in rule and no identifier codec.
    pub fn new() -> Self {
        let rules = BuiltinRule::ALL
            .into_iter()
            .map(|rule| (rule.name().to_string(), RulePredicate::Builtin(rule)))
            .collect();

        Self {
            rules,
            identifiers: None,
        }
    }

    /// Shared registry with only the built-ins, used by [`crate::validate`].
    pub fn builtin() -> &'static RuleRegistry {
        static BUILTIN: OnceLock<RuleRegistry> = OnceLock::new();
        BUILTIN.get_or_init(RuleRegistry::new)
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        let mut registry = Self::new();
        registry.identifiers = config.identifier_codec.build();
        registry
    }

    pub fn with_identifier_codec(mut self, codec: impl IdentifierCodec + 'static) -> Self {
        self.set_identifier_codec(Some(Arc::new(codec)));
        self
    }

    pub fn set_identifier_codec(&mut self, codec: Option<Arc<dyn IdentifierCodec>>) {
        debug!(
            codec = codec.as_ref().map(|c| c.name()).unwrap_or("none"),
            "identifier codec installed"
        );
        self.identifiers = codec;
    }

    pub fn identifier_codec(&self) -> Option<&dyn IdentifierCodec> {
        self.identifiers.as_deref()
    }

    /// Registers or replaces the predicate under `name`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `name` is empty or reserved.
    pub fn add<F>(&mut self, name: impl Into<String>, predicate: F) -> Result<(), InvalidArgument>
    where
        F: Fn(&Value, &Value) -> Option<String> + Send + Sync + 'static,
    {
        let name = name.into();
        check_mutable(&name)?;

        let replaced = self
            .rules
            .insert(name.clone(), RulePredicate::Custom(Arc::new(predicate)));
        debug!(rule = %name, replaced = replaced.is_some(), "rule added");
        Ok(())
    }

    /// Removes the predicate under `name`; absent names are ignored.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `name` is empty or reserved.
    pub fn remove(&mut self, name: &str) -> Result<(), InvalidArgument> {
        check_mutable(name)?;

        let removed = self.rules.remove(name);
        debug!(rule = %name, removed = removed.is_some(), "rule removed");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up the predicate under `name`.
    pub fn resolve(&self, name: &str) -> SchemaResult<&RulePredicate> {
        self.rules
            .get(name)
            .ok_or_else(|| SchemaError::unknown_rule(name))
    }

    /// Resolves `name` and runs it against `value`.
    pub fn apply(&self, name: &str, value: &Value, argument: &Value) -> SchemaResult<Option<String>> {
        self.resolve(name)?
            .evaluate(value, argument, self.identifier_codec())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .field("identifiers", &self.identifiers)
            .finish()
    }
}

fn check_mutable(name: &str) -> Result<(), InvalidArgument> {
    if name.is_empty() {
        return Err(InvalidArgument::EmptyRuleName);
    }
    match BuiltinRule::from_name(name) {
        Some(rule) if rule.is_reserved() => Err(InvalidArgument::ReservedRule(name.to_string())),
        _ => Ok(()),
    }
}
