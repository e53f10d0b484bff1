//! Validator configuration
//!
//! Settings that an embedding application typically reads once at startup:
//! which key holds rule sets in JSON schemas, and which identifier codec to
//! install on the rule registry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::{IdentifierCodec, ObjectIdCodec, UuidCodec};
use crate::schema::DEFAULT_RULES_KEY;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rules_key must not be empty")]
    EmptyRulesKey,
}

/// Identifier codec to install on the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierCodecKind {
    /// No codec; `objectIdString` fails with a configuration error
    #[default]
    None,
    /// 24-digit hex object ids
    ObjectId,
    /// UUID strings
    Uuid,
}

impl IdentifierCodecKind {
    pub fn build(self) -> Option<Arc<dyn IdentifierCodec>> {
        match self {
            IdentifierCodecKind::None => None,
            IdentifierCodecKind::ObjectId => Some(Arc::new(ObjectIdCodec)),
            IdentifierCodecKind::Uuid => Some(Arc::new(UuidCodec)),
        }
    }
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Key holding a node's rule set in JSON schemas (default: "_rules")
    #[serde(default = "default_rules_key")]
    pub rules_key: String,

    /// Identifier codec (default: none)
    #[serde(default)]
    pub identifier_codec: IdentifierCodecKind,
}

fn default_rules_key() -> String {
    DEFAULT_RULES_KEY.to_string()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rules_key: default_rules_key(),
            identifier_codec: IdentifierCodecKind::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn with_rules_key(mut self, rules_key: impl Into<String>) -> Self {
        self.rules_key = rules_key.into();
        self
    }

    pub fn with_identifier_codec(mut self, kind: IdentifierCodecKind) -> Self {
        self.identifier_codec = kind;
        self
    }

    /// Parses and checks a JSON configuration document.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.rules_key.is_empty() {
            return Err(ConfigError::EmptyRulesKey);
        }
        Ok(())
    }
}
