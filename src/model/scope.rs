//! Read-only evaluation scopes

use super::value::{Record, Value};

/// Read-only context expressions are evaluated against.
///
/// Scopes are never mutated by mapping or rendering.
pub trait Scope {
    /// Get a named value, `None` when the name is not in scope
    fn get_value(&self, name: &str) -> Option<Value>;
}

impl Scope for Record {
    fn get_value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Scope backed by a record, optionally falling back to a parent scope
pub struct SimpleScope<'p> {
    values: Record,
    parent: Option<&'p dyn Scope>,
}

impl<'p> SimpleScope<'p> {
    /// Create a root scope
    pub fn new(values: Record) -> Self {
        Self {
            values,
            parent: None,
        }
    }

    /// Create a scope whose lookups fall back to `parent`
    pub fn with_parent(values: Record, parent: &'p dyn Scope) -> Self {
        Self {
            values,
            parent: Some(parent),
        }
    }

    /// Build a root scope from a JSON object; other JSON shapes yield an empty scope
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Object(values) => Self::new(values),
            _ => Self::new(Record::new()),
        }
    }
}

impl Scope for SimpleScope<'_> {
    fn get_value(&self, name: &str) -> Option<Value> {
        self.values
            .get(name)
            .cloned()
            .or_else(|| self.parent.and_then(|parent| parent.get_value(name)))
    }
}
