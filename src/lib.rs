//! shapeguard - Rule-based validation of nested data against schema trees
//!
//! A schema mirrors the shape of the data. Each node carries a rule set
//! (`type`, `required`, `min`, `enum`, `regex`, ...) and child nodes for
//! nested properties. Validation returns a sparse error tree with a message
//! for every failing field, or `None` when the data is valid.
//!
//! ```
//! use serde_json::json;
//! use shapeguard::{validate, Schema, Value};
//!
//! let schema = Schema::from_json(&json!({
//!     "title": { "_rules": { "type": "string", "required": true } },
//!     "year":  { "_rules": { "type": "number", "min": 1900 } }
//! }))
//! .unwrap();
//!
//! let errors = validate(&Value::from(json!({ "year": 1850 })), &schema)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(errors.message_at("title"), Some("Required"));
//! assert_eq!(errors.message_at("year"), Some("Below minimum"));
//! ```

pub mod config;
pub mod identifier;
pub mod rules;
pub mod schema;
pub mod value;

pub use config::{ConfigError, IdentifierCodecKind, ValidatorConfig};
pub use identifier::{Identifier, IdentifierCodec, ObjectId, ObjectIdCodec, UuidCodec};
pub use rules::{BuiltinRule, RuleRegistry, TypeToken};
pub use schema::{
    validate, ErrorTree, InvalidArgument, RuleSet, Schema, SchemaError, SchemaResult, Validator,
};
pub use value::Value;
