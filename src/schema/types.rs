//! Schema tree definitions
//!
//! A [`Schema`] node carries an optional [`RuleSet`] and any number of named
//! child nodes. Every child is itself a `Schema`, so a child that is not a
//! node cannot be built; the JSON parser reports it as
//! [`SchemaError::NonObjectProperty`](super::SchemaError::NonObjectProperty).

use std::collections::BTreeMap;

use crate::value::Value;

/// Named constraints attached to one schema node.
///
/// Rules are applied by priority, not by insertion order: `required`,
/// `null`, `type`, `elementNull`, `elementType`, then the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<String, Value>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, builder style
    pub fn with(mut self, name: impl Into<String>, argument: impl Into<Value>) -> Self {
        self.insert(name, argument);
        self
    }

    /// Adds or replaces a rule, returning the previous argument
    pub fn insert(&mut self, name: impl Into<String>, argument: impl Into<Value>) -> Option<Value> {
        self.rules.insert(name.into(), argument.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rules in lexical name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.rules.iter().map(|(name, arg)| (name.as_str(), arg))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, arg)| (name.into(), arg.into()))
                .collect(),
        }
    }
}

/// A schema node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    rules: Option<RuleSet>,
    properties: BTreeMap<String, Schema>,
}

impl Schema {
    /// Creates an empty node: no rules, no children
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node with rules and no children
    pub fn leaf(rules: RuleSet) -> Self {
        Self {
            rules: Some(rules),
            properties: BTreeMap::new(),
        }
    }

    /// Adds one rule to this node's rule set, creating it if needed
    pub fn rule(mut self, name: impl Into<String>, argument: impl Into<Value>) -> Self {
        self.rules
            .get_or_insert_with(RuleSet::new)
            .insert(name, argument);
        self
    }

    /// Replaces this node's rule set
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Adds or replaces a child node
    pub fn property(mut self, key: impl Into<String>, child: Schema) -> Self {
        self.properties.insert(key.into(), child);
        self
    }

    pub fn rule_set(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }

    pub fn child(&self, key: &str) -> Option<&Schema> {
        self.properties.get(key)
    }

    /// Children in key order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.properties.iter().map(|(key, child)| (key.as_str(), child))
    }

    pub fn is_leaf(&self) -> bool {
        self.properties.is_empty()
    }
}
