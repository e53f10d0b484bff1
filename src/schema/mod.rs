//! Schema subsystem
//!
//! A schema is a tree of nodes. Each node may carry a rule set and may have
//! named children, mirroring the shape of the data it validates.
//!
//! # Design Principles
//!
//! - Malformed schemas are errors, never validation failures
//! - Rule sets apply in a fixed priority order
//! - An absent optional value skips its whole subtree
//! - Failures are reported as a sparse tree shaped like the data
//! - Validation is deterministic

mod errors;
mod parser;
mod tree;
mod types;
mod validator;

pub use errors::{InvalidArgument, SchemaError, SchemaResult, ROOT_PATH};
pub use parser::DEFAULT_RULES_KEY;
pub use tree::ErrorTree;
pub use types::{RuleSet, Schema};
pub use validator::{validate, Validator};
