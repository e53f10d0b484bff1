//! Sparse error tree produced by validation

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Failure report mirroring the shape of the validated data.
///
/// Only failing properties appear; a clean subtree is simply absent. A
/// successful validation produces no tree at all (`None`).
///
/// Serializes to the plain nested form, e.g.
/// `{"crew": {"writers": "Invalid type"}, "title": "Invalid type"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorTree {
    /// Failure message at a leaf
    Message(String),
    /// Failures below this level, keyed by property
    Nested(BTreeMap<String, ErrorTree>),
}

impl ErrorTree {
    pub fn message_for(message: impl Into<String>) -> Self {
        ErrorTree::Message(message.into())
    }

    /// Returns the message if this is a leaf failure
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorTree::Message(m) => Some(m),
            ErrorTree::Nested(_) => None,
        }
    }

    /// Returns the child failure under `key`
    pub fn get(&self, key: &str) -> Option<&ErrorTree> {
        match self {
            ErrorTree::Nested(children) => children.get(key),
            ErrorTree::Message(_) => None,
        }
    }

    /// Follows a dotted path such as `crew.writers`.
    pub fn at(&self, path: &str) -> Option<&ErrorTree> {
        path.split('.').try_fold(self, |node, key| node.get(key))
    }

    /// Message at a dotted path, if that path failed at a leaf
    pub fn message_at(&self, path: &str) -> Option<&str> {
        self.at(path).and_then(ErrorTree::message)
    }

    /// Flattens the tree into `(dotted path, message)` pairs in key order.
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        match self {
            ErrorTree::Message(m) => out.push((prefix.to_string(), m)),
            ErrorTree::Nested(children) => {
                for (key, child) in children {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    child.collect_leaves(&path, out);
                }
            }
        }
    }

    /// Converts the tree to its plain JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        // String-keyed maps of strings always serialize.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.leaves().into_iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            if path.is_empty() {
                write!(f, "{}", message)?;
            } else {
                write!(f, "{}: {}", path, message)?;
            }
        }
        Ok(())
    }
}
