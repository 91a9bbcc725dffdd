//! Expression factory: source text to [`Expr`]

use super::Expr;
use super::error::{CompileError, CompileResult};
use crate::ast::ExpressionNode;
use crate::evaluator::{EvalResult, Evaluator, ResolutionTable};
use crate::model::{Record, Scope, Value};
use crate::parser;
use crate::registry::FunctionRegistry;
use crate::resolve::CompositeResolver;
use std::sync::Arc;

/// Expression with operators or function calls, evaluated by walking its AST
#[derive(Clone)]
pub struct ScriptExpr {
    source: String,
    ast: ExpressionNode,
    resolutions: ResolutionTable,
    functions: Arc<FunctionRegistry>,
}

impl ScriptExpr {
    /// Original source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a scope
    pub fn eval(&self, scope: &dyn Scope) -> EvalResult<Value> {
        Evaluator::new(scope, &self.resolutions, &self.functions).evaluate(&self.ast)
    }
}

/// Compiles expression source (without the leading `=`) into an [`Expr`]
#[derive(Clone)]
pub struct ExprFactory {
    resolver: Arc<CompositeResolver>,
    functions: Arc<FunctionRegistry>,
}

impl ExprFactory {
    /// Create a factory over an explicit resolver and function registry
    pub fn new(resolver: Arc<CompositeResolver>, functions: Arc<FunctionRegistry>) -> Self {
        Self {
            resolver,
            functions,
        }
    }

    /// Create a factory with the built-in functions and the given `$property` values
    pub fn with_properties(properties: Record) -> Self {
        Self::new(
            Arc::new(CompositeResolver::with_properties(properties)),
            Arc::new(FunctionRegistry::with_builtins()),
        )
    }

    /// The function registry expressions are compiled against
    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    /// Compile expression source.
    ///
    /// A bare literal compiles to [`Expr::Literal`], a bare reference to
    /// [`Expr::Resolved`], anything else to [`Expr::Script`]. References are
    /// resolved and function names checked here, not at evaluation time.
    pub fn new_expr(&self, source: &str) -> CompileResult<Expr> {
        let ast = parser::parse(source)?;
        match ast {
            ExpressionNode::Literal(literal) => Ok(Expr::Literal(literal.to_value())),
            ExpressionNode::Reference(reference) => {
                Ok(Expr::Resolved(self.resolver.get_resolution(&reference)?))
            }
            ast => self.compile_script(source, ast),
        }
    }

    fn compile_script(&self, source: &str, ast: ExpressionNode) -> CompileResult<Expr> {
        let mut references = Vec::new();
        let mut calls = Vec::new();
        ast.walk(&mut |node| match node {
            ExpressionNode::Reference(reference) => references.push(reference.as_str()),
            ExpressionNode::FunctionCall(data) => calls.push(data.name.as_str()),
            _ => {}
        });

        if let Some(name) = calls.iter().find(|name| !self.functions.contains(name)) {
            return Err(CompileError::UnknownFunction {
                name: (*name).to_string(),
            });
        }

        let mut resolutions = ResolutionTable::default();
        for reference in references {
            if !resolutions.contains_key(reference) {
                let resolution = self.resolver.get_resolution(reference)?;
                resolutions.insert(reference.to_string(), resolution);
            }
        }

        log::debug!(
            "Compiled expression '{source}' with {} reference(s)",
            resolutions.len()
        );

        Ok(Expr::Script(Box::new(ScriptExpr {
            source: source.to_string(),
            ast,
            resolutions,
            functions: Arc::clone(&self.functions),
        })))
    }
}

impl Default for ExprFactory {
    fn default() -> Self {
        Self::with_properties(Record::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleScope;
    use crate::parser::ParseError;
    use crate::resolve::ResolveError;
    use serde_json::json;

    fn properties() -> Record {
        let mut properties = Record::new();
        properties.insert("region".to_string(), Value::from("EU"));
        properties
    }

    #[test]
    fn test_expression_kinds() {
        let factory = ExprFactory::default();
        assert!(matches!(factory.new_expr("42").unwrap(), Expr::Literal(Value::Integer(42))));
        assert!(matches!(factory.new_expr("$.a.b").unwrap(), Expr::Resolved(_)));
        assert!(matches!(factory.new_expr("$.a + 1").unwrap(), Expr::Script(_)));
    }

    #[test]
    fn test_property_references() {
        let factory = ExprFactory::with_properties(properties());
        let scope = SimpleScope::from_json(json!({"id": 7}));

        let expr = factory.new_expr("string.concat($property.region, '-', $.id)").unwrap();
        assert_eq!(expr.eval(&scope).unwrap(), Value::from("EU-7"));

        assert!(matches!(
            factory.new_expr("$property.unknown"),
            Err(CompileError::Resolve(ResolveError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_compile_errors() {
        let factory = ExprFactory::default();
        assert!(matches!(
            factory.new_expr("nope.missing($.a)"),
            Err(CompileError::UnknownFunction { name }) if name == "nope.missing"
        ));
        assert!(matches!(
            factory.new_expr("$other.x"),
            Err(CompileError::Resolve(ResolveError::UnknownResolver { .. }))
        ));
        assert!(matches!(
            factory.new_expr(""),
            Err(CompileError::Parse(ParseError::EmptyExpression))
        ));
    }
}
