//! Function trait, coercion adapter and registry

use crate::model::{CoercionError, DataType, TypeCoercion, Value};
use crate::registry::signature::FunctionSignature;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// Wrong number of arguments for a fixed-arity function
    #[error("{name} function should have {expected} arguments, got {actual}")]
    InvalidArity {
        /// Function name
        name: String,
        /// Declared number of arguments
        expected: usize,
        /// Actual arguments provided
        actual: usize,
    },

    /// Argument could not be coerced to its declared type
    #[error("Function '{name}' argument {index} cannot be coerced to {expected}: {source}")]
    InvalidArgumentType {
        /// Function name
        name: String,
        /// Argument index
        index: usize,
        /// Target type
        expected: DataType,
        /// Underlying coercion failure
        source: CoercionError,
    },

    /// Runtime evaluation error raised by a function body
    #[error("Function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },

    /// A function with this name is already registered
    #[error("Function '{name}' is already registered")]
    DuplicateFunction {
        /// Function name
        name: String,
    },
}

/// A named function callable from mapping expressions.
///
/// `evaluate` receives arguments already checked and coerced against
/// [`signature`](Function::signature); call it through [`invoke`].
pub trait Function: Send + Sync {
    /// Get the function signature
    fn signature(&self) -> &FunctionSignature;

    /// Evaluate the function body with coerced arguments
    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value>;

    /// Get the qualified function name
    fn name(&self) -> &str {
        &self.signature().name
    }

    /// Get function documentation
    fn documentation(&self) -> &str {
        ""
    }
}

/// Check arity, coerce arguments to the declared types, then call the body.
///
/// Non-variadic calls coerce argument `i` to parameter `i`. Variadic calls
/// coerce every argument to the first declared parameter type; a variadic
/// function that declares no parameters accepts every argument as `Any`.
pub fn invoke(function: &dyn Function, args: &[Value]) -> FunctionResult<Value> {
    let signature = function.signature();

    if !signature.variadic && args.len() != signature.arity() {
        return Err(FunctionError::InvalidArity {
            name: signature.name.clone(),
            expected: signature.arity(),
            actual: args.len(),
        });
    }

    let mut coerced = Vec::with_capacity(args.len());
    let mut type_index = 0;
    for (index, arg) in args.iter().enumerate() {
        if !signature.variadic {
            type_index = index;
        }
        let target = signature
            .parameters
            .get(type_index)
            .copied()
            .unwrap_or(DataType::Any);

        let value = TypeCoercion::coerce_to_type(arg, target).map_err(|source| {
            FunctionError::InvalidArgumentType {
                name: signature.name.clone(),
                index,
                expected: target,
                source,
            }
        })?;
        coerced.push(value);
    }

    function.evaluate(&coerced)
}

/// Registry of functions looked up by qualified name.
///
/// Built once at startup and shared by reference; there is no global instance.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in function
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::registry::functions::register_builtin_functions(&mut registry);
        registry
    }

    /// Register a function; names must be unique
    pub fn register(&mut self, function: Arc<dyn Function>) -> FunctionResult<()> {
        let name = function.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(FunctionError::DuplicateFunction { name });
        }
        log::debug!("Registering function: {name}");
        self.functions.insert(name, function);
        Ok(())
    }

    /// Get a function by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Function>> {
        self.functions.get(name)
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
