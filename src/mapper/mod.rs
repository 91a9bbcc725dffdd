//! Mapping compiler and mapper
//!
//! A mapping specification is a JSON object from output field name to one of:
//!
//! - `null`: the field is dropped and never compiled
//! - `"=<expr>"`: an expression, compiled with the [`ExprFactory`]
//! - `{"if": .., "then": .., "else": ..}`: a conditional, each part compiled
//!   with these same rules
//! - `{"mapping": {..}}`: a nested object mapping
//! - anything else: a literal
//!
//! [`MapperFactory::new_mapper`] returns `Ok(None)` when nothing compiles;
//! callers treat that as a mapper producing nothing.

mod conditional;
mod object;

pub use conditional::{ConditionalExpr, is_conditional_mapping};
pub use object::{ObjectExpr, get_object_mapping};

use crate::config::MapperConfig;
use crate::evaluator::{EvalError, EvalResult};
use crate::expression::{CompileResult, Expr, ExprFactory};
use crate::model::{Record, Scope, Value};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Builds mappers from mapping specifications
#[derive(Clone, Default)]
pub struct MapperFactory {
    exprs: ExprFactory,
    config: MapperConfig,
}

impl MapperFactory {
    /// Create a factory
    pub fn new(exprs: ExprFactory, config: MapperConfig) -> Self {
        Self { exprs, config }
    }

    /// Expression factory used for `=` entries
    pub fn expr_factory(&self) -> &ExprFactory {
        &self.exprs
    }

    /// Configuration handed to every mapper built here
    pub fn config(&self) -> MapperConfig {
        self.config
    }

    /// Compile a mapping specification.
    ///
    /// Fails on the first entry that does not compile; the error names the field.
    pub fn new_mapper(&self, mappings: &Map<String, JsonValue>) -> CompileResult<Option<Mapper>> {
        let mut compiled = IndexMap::with_capacity(mappings.len());
        for (field, value) in mappings {
            if value.is_null() {
                continue;
            }
            let expr = self
                .compile_value(value)
                .map_err(|err| err.for_field(field.as_str()))?;
            compiled.insert(field.clone(), expr);
        }

        if compiled.is_empty() {
            return Ok(None);
        }

        log::debug!("Compiled mapper with {} field(s)", compiled.len());
        Ok(Some(Mapper {
            mappings: compiled,
            ignore_errors: self.config.ignore_errors,
        }))
    }

    fn compile_value(&self, value: &JsonValue) -> CompileResult<Expr> {
        match value {
            JsonValue::String(text) => match text.strip_prefix('=') {
                Some(source) => self.exprs.new_expr(source),
                None => Ok(Expr::literal(text.as_str())),
            },
            JsonValue::Object(fields) if is_conditional_mapping(fields) => {
                self.compile_conditional(fields)
            }
            JsonValue::Object(fields) => match get_object_mapping(fields) {
                Some(mapping) => Ok(Expr::Object(Box::new(ObjectExpr {
                    mapper: self.new_mapper(mapping)?,
                }))),
                None => Ok(Expr::Literal(Value::from(value.clone()))),
            },
            other => Ok(Expr::Literal(Value::from(other.clone()))),
        }
    }

    fn compile_conditional(&self, fields: &Map<String, JsonValue>) -> CompileResult<Expr> {
        let part = |key: &str| -> CompileResult<Expr> {
            match fields.get(key) {
                Some(value) => self.compile_value(value),
                None => Ok(Expr::Literal(Value::Null)),
            }
            .map_err(|err| err.for_field(key))
        };

        let condition = part(conditional::IF_KEY)?;
        let then_expr = part(conditional::THEN_KEY)?;
        let else_expr = if fields.contains_key(conditional::ELSE_KEY) {
            Some(part(conditional::ELSE_KEY)?)
        } else {
            None
        };

        Ok(Expr::Conditional(Box::new(ConditionalExpr {
            condition,
            then_expr,
            else_expr,
        })))
    }
}

/// Compiled set of field bindings
#[derive(Debug, Clone)]
pub struct Mapper {
    mappings: IndexMap<String, Expr>,
    ignore_errors: bool,
}

impl Mapper {
    /// Output field names, in specification order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    /// Number of compiled fields
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Always false for a mapper returned by [`MapperFactory::new_mapper`]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Whether failing fields are skipped rather than failing the apply
    pub fn ignores_errors(&self) -> bool {
        self.ignore_errors
    }

    /// Evaluate every field against the scope.
    ///
    /// With ignore-errors off the first failure aborts and nothing is
    /// returned. With it on, failing fields are logged and left out.
    pub fn apply(&self, scope: &dyn Scope) -> EvalResult<Record> {
        let mut output = Record::with_capacity(self.mappings.len());
        for (field, expr) in &self.mappings {
            match expr.eval(scope) {
                Ok(value) => {
                    output.insert(field.clone(), value);
                }
                Err(err) if self.ignore_errors => {
                    log::warn!("Skipping field [{field}]: expression eval error; {err}");
                }
                Err(err) => {
                    return Err(EvalError::Field {
                        field: field.clone(),
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::CompileError;
    use crate::model::SimpleScope;
    use crate::resolve::ResolveError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("mapping must be an object"),
        }
    }

    fn factory(ignore_errors: bool) -> MapperFactory {
        MapperFactory::new(ExprFactory::default(), MapperConfig::new(ignore_errors))
    }

    #[test]
    fn test_literal_expression_and_absent_fields() {
        let mapper = factory(false)
            .new_mapper(&spec(json!({
                "id": "=$.order.id",
                "kind": "ORDER",
                "count": 3,
                "dropped": null,
            })))
            .unwrap()
            .unwrap();

        assert_eq!(mapper.fields().collect::<Vec<_>>(), vec!["id", "kind", "count"]);

        let scope = SimpleScope::from_json(json!({"order": {"id": "A-1"}}));
        let record = mapper.apply(&scope).unwrap();
        assert_eq!(record.get("id"), Some(&Value::from("A-1")));
        assert_eq!(record.get("kind"), Some(&Value::from("ORDER")));
        assert_eq!(record.get("count"), Some(&Value::Integer(3)));
        assert!(!record.contains_key("dropped"));
    }

    #[test]
    fn test_noop_sentinel() {
        assert!(factory(false).new_mapper(&Map::new()).unwrap().is_none());
        assert!(
            factory(false)
                .new_mapper(&spec(json!({"a": null, "b": null})))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_compile_error_names_field() {
        let err = factory(false)
            .new_mapper(&spec(json!({"ok": "=$.a", "bad": "=$.a +"})))
            .unwrap_err();
        assert!(matches!(&err, CompileError::Field { field, .. } if field == "bad"));
        assert!(matches!(err.root_cause(), CompileError::Parse(_)));
    }

    #[test]
    fn test_conditional_evaluates_one_branch() {
        let mapper = factory(false)
            .new_mapper(&spec(json!({
                "status": {"if": "=$.qty > 3", "then": "BULK", "else": "=$.missing"},
                "note": {"if": "=$.qty > 100", "then": "HUGE"},
            })))
            .unwrap()
            .unwrap();

        let scope = SimpleScope::from_json(json!({"qty": 5}));
        let record = mapper.apply(&scope).unwrap();
        assert_eq!(record.get("status"), Some(&Value::from("BULK")));
        assert_eq!(record.get("note"), Some(&Value::Null));

        let scope = SimpleScope::from_json(json!({"qty": 1}));
        let err = mapper.apply(&scope).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            EvalError::Resolve(ResolveError::NotFound { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_nested_object_mapping() {
        let mapper = factory(false)
            .new_mapper(&spec(json!({
                "header": {"mapping": {"id": "=$.id", "meta": {"mapping": {}}}},
            })))
            .unwrap()
            .unwrap();

        let scope = SimpleScope::from_json(json!({"id": 9}));
        let record = Value::Object(mapper.apply(&scope).unwrap());
        assert_eq!(record.lookup("header.id"), Some(&Value::Integer(9)));
        assert_eq!(
            record.lookup("header.meta"),
            Some(&Value::Object(Record::new()))
        );
    }

    #[test]
    fn test_ignore_errors_policy() {
        let mapping = spec(json!({"good": "=$.a", "bad": "=$.nope", "also": "x"}));
        let scope = SimpleScope::from_json(json!({"a": 1}));

        let strict = factory(false).new_mapper(&mapping).unwrap().unwrap();
        assert!(matches!(
            strict.apply(&scope),
            Err(EvalError::Field { field, .. }) if field == "bad"
        ));

        let lenient = factory(true).new_mapper(&mapping).unwrap().unwrap();
        let record = lenient.apply(&scope).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("good"), Some(&Value::Integer(1)));
        assert_eq!(record.get("also"), Some(&Value::from("x")));
    }
}
