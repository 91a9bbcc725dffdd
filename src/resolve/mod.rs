//! Reference resolution
//!
//! A reference such as `$.order.items[0].sku` is split into a resolver name
//! (empty for the scope resolver, `property` for `$property.x`) and a path.
//! Resolvers turn the path into a [`Resolution`] once at compile time; the
//! resolution is evaluated against a [`Scope`] on every apply.

use crate::model::{Record, Scope, Value};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors raised while building or evaluating a resolution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Reference text is malformed
    #[error("Invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// The reference text
        reference: String,
        /// What is wrong with it
        reason: String,
    },

    /// No resolver registered under this name
    #[error("Unknown resolver '{name}'")]
    UnknownResolver {
        /// Resolver name
        name: String,
    },

    /// Named value is not present
    #[error("Failed to resolve '{name}': not found")]
    NotFound {
        /// Missing name
        name: String,
    },
}

/// One step of a reference path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array position
    Index(usize),
}

/// Runtime lookup produced by a resolver
pub trait Resolution: Send + Sync + fmt::Debug {
    /// Resolve the value against a scope
    fn get_value(&self, scope: &dyn Scope) -> ResolveResult<Value>;
}

/// Turns the path part of a reference into a [`Resolution`]
pub trait Resolver: Send + Sync {
    /// Build a resolution for `path` (the text after `$name.`)
    fn get_resolution(&self, path: &str) -> ResolveResult<Arc<dyn Resolution>>;
}

/// Parse `a.b[0].c` into segments
pub fn parse_path(path: &str) -> ResolveResult<Vec<PathSegment>> {
    let invalid = |reason: &str| ResolveError::InvalidReference {
        reference: path.to_string(),
        reason: reason.to_string(),
    };

    let mut segments = Vec::new();
    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(open) => part.split_at(open),
            None => (part, ""),
        };

        if !key.is_empty() {
            segments.push(PathSegment::Key(key.to_string()));
        } else if rest.is_empty() {
            return Err(invalid("empty path segment"));
        }

        while !rest.is_empty() {
            let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
            let index = rest[1..close]
                .parse::<usize>()
                .map_err(|_| invalid("array index must be a non-negative integer"))?;
            segments.push(PathSegment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(invalid("unexpected text after ']'"));
            }
        }
    }

    Ok(segments)
}

/// Walk segments below an already resolved value; missing steps yield `Null`
pub fn walk_segments(value: Value, segments: &[PathSegment]) -> Value {
    segments.iter().fold(value, |current, segment| match (current, segment) {
        (Value::Object(mut fields), PathSegment::Key(key)) => {
            fields.swap_remove(key.as_str()).unwrap_or_default()
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            items.into_iter().nth(*index).unwrap_or_default()
        }
        _ => Value::Null,
    })
}

/// Split a leading key segment off a parsed path
fn split_root(path: &str) -> ResolveResult<(String, Vec<PathSegment>)> {
    let mut segments = parse_path(path)?.into_iter();
    match segments.next() {
        Some(PathSegment::Key(name)) => Ok((name, segments.collect())),
        _ => Err(ResolveError::InvalidReference {
            reference: path.to_string(),
            reason: "path must start with a name".to_string(),
        }),
    }
}

/// Resolves `$.name.path` against the scope
#[derive(Debug, Default)]
pub struct ScopeResolver;

#[derive(Debug)]
struct ScopeResolution {
    name: String,
    segments: Vec<PathSegment>,
}

impl Resolution for ScopeResolution {
    fn get_value(&self, scope: &dyn Scope) -> ResolveResult<Value> {
        let root = scope
            .get_value(&self.name)
            .ok_or_else(|| ResolveError::NotFound {
                name: self.name.clone(),
            })?;
        Ok(walk_segments(root, &self.segments))
    }
}

impl Resolver for ScopeResolver {
    fn get_resolution(&self, path: &str) -> ResolveResult<Arc<dyn Resolution>> {
        let (name, segments) = split_root(path)?;
        Ok(Arc::new(ScopeResolution { name, segments }))
    }
}

/// Resolves `$property.name.path` against fixed application properties.
///
/// Properties do not depend on the scope, so the value is captured when the
/// resolution is built and a missing property fails compilation.
#[derive(Debug, Default)]
pub struct PropertyResolver {
    properties: Record,
}

#[derive(Debug)]
struct ConstantResolution(Value);

impl Resolution for ConstantResolution {
    fn get_value(&self, _scope: &dyn Scope) -> ResolveResult<Value> {
        Ok(self.0.clone())
    }
}

impl PropertyResolver {
    /// Create a resolver over the given properties
    pub fn new(properties: Record) -> Self {
        Self { properties }
    }
}

impl Resolver for PropertyResolver {
    fn get_resolution(&self, path: &str) -> ResolveResult<Arc<dyn Resolution>> {
        let (name, segments) = split_root(path)?;
        let root = self
            .properties
            .get(&name)
            .cloned()
            .ok_or(ResolveError::NotFound { name })?;
        Ok(Arc::new(ConstantResolution(walk_segments(root, &segments))))
    }
}

/// Name under which the scope resolver is registered
pub const SCOPE_RESOLVER: &str = "";
/// Name under which the property resolver is registered
pub const PROPERTY_RESOLVER: &str = "property";

/// Dispatches `$name.path` references to named resolvers
pub struct CompositeResolver {
    resolvers: FxHashMap<String, Arc<dyn Resolver>>,
}

impl CompositeResolver {
    /// Create a resolver with the scope resolver and an empty property resolver
    pub fn new() -> Self {
        Self::with_properties(Record::new())
    }

    /// Create a resolver with the scope resolver and the given properties
    pub fn with_properties(properties: Record) -> Self {
        let mut resolvers: FxHashMap<String, Arc<dyn Resolver>> = FxHashMap::default();
        resolvers.insert(SCOPE_RESOLVER.to_string(), Arc::new(ScopeResolver));
        resolvers.insert(
            PROPERTY_RESOLVER.to_string(),
            Arc::new(PropertyResolver::new(properties)),
        );
        Self { resolvers }
    }

    /// Register (or replace) a named resolver
    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(name.into(), resolver);
    }

    /// Build a resolution for a full reference such as `$.a.b` or `$property.x`
    pub fn get_resolution(&self, reference: &str) -> ResolveResult<Arc<dyn Resolution>> {
        let invalid = |reason: &str| ResolveError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let body = reference
            .strip_prefix('$')
            .ok_or_else(|| invalid("references start with '$'"))?;
        let split = body.find(['.', '[']).unwrap_or(body.len());
        let (name, rest) = body.split_at(split);
        let path = rest.strip_prefix('.').unwrap_or(rest);
        if path.is_empty() {
            return Err(invalid("missing path"));
        }

        let resolver = self
            .resolvers
            .get(name)
            .ok_or_else(|| ResolveError::UnknownResolver {
                name: name.to_string(),
            })?;
        resolver.get_resolution(path)
    }
}

impl Default for CompositeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleScope;
    use serde_json::json;

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("items[1][0].sku").unwrap(),
            vec![
                PathSegment::Key("items".to_string()),
                PathSegment::Index(1),
                PathSegment::Index(0),
                PathSegment::Key("sku".to_string()),
            ]
        );
        assert!(parse_path("a..b").is_err());
        assert!(parse_path("a[x]").is_err());
        assert!(parse_path("a[0").is_err());
    }

    #[test]
    fn test_scope_resolution() {
        let resolver = CompositeResolver::new();
        let scope = SimpleScope::from_json(json!({
            "order": {"items": [{"sku": "A1"}, {"sku": "B2"}]}
        }));

        let resolution = resolver.get_resolution("$.order.items[1].sku").unwrap();
        assert_eq!(resolution.get_value(&scope).unwrap(), Value::from("B2"));

        // Missing keys below a present variable resolve to null
        let resolution = resolver.get_resolution("$.order.customer.name").unwrap();
        assert_eq!(resolution.get_value(&scope).unwrap(), Value::Null);

        // A missing variable is an error
        let resolution = resolver.get_resolution("$.invoice.id").unwrap();
        assert_eq!(
            resolution.get_value(&scope),
            Err(ResolveError::NotFound {
                name: "invoice".to_string()
            })
        );
    }

    #[test]
    fn test_property_resolution() {
        let mut properties = Record::new();
        properties.insert("branch".to_string(), Value::from("0042"));
        let resolver = CompositeResolver::with_properties(properties);
        let scope = SimpleScope::new(Record::new());

        let resolution = resolver.get_resolution("$property.branch").unwrap();
        assert_eq!(resolution.get_value(&scope).unwrap(), Value::from("0042"));

        assert!(matches!(
            resolver.get_resolution("$property.region"),
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_references() {
        let resolver = CompositeResolver::new();
        assert!(matches!(
            resolver.get_resolution("$env.HOME"),
            Err(ResolveError::UnknownResolver { name }) if name == "env"
        ));
        assert!(matches!(
            resolver.get_resolution("$."),
            Err(ResolveError::InvalidReference { .. })
        ));
        assert!(matches!(
            resolver.get_resolution("order.id"),
            Err(ResolveError::InvalidReference { .. })
        ));
    }
}
