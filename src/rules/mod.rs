//! Rule predicates and the registry that dispatches them
//!
//! Built-in rules are a closed enum ([`BuiltinRule`]); custom rules are
//! closures registered by name on a [`RuleRegistry`].

mod builtin;
mod registry;
mod types;

pub use builtin::*;
pub use registry::{CustomPredicate, RuleRegistry, RulePredicate};
pub use types::TypeToken;
