//! Built-in function implementations

pub mod number;
pub mod string;
pub mod utility;

use crate::registry::function::{Function, FunctionRegistry};
use std::sync::Arc;

/// Register every built-in function
pub fn register_builtin_functions(registry: &mut FunctionRegistry) {
    let builtins: Vec<Arc<dyn Function>> = vec![
        Arc::new(string::ConcatFunction),
        Arc::new(string::LengthFunction),
        Arc::new(string::UpperFunction),
        Arc::new(string::LowerFunction),
        Arc::new(string::TrimFunction),
        Arc::new(string::SubstringFunction),
        Arc::new(number::RoundFunction),
        Arc::new(number::IntFunction),
        Arc::new(utility::CoalesceFunction),
        Arc::new(utility::IsNullFunction),
    ];

    for function in builtins {
        if let Err(err) = registry.register(function) {
            log::warn!("Skipping built-in function: {err}");
        }
    }
}
