//! Function registry for mapping expressions
//!
//! Functions are looked up by qualified name (`string.concat`) and invoked
//! through [`invoke`], which checks arity and coerces arguments to the
//! declared parameter types first.

pub mod function;
pub mod functions;
pub mod signature;

pub use function::{Function, FunctionError, FunctionRegistry, FunctionResult, invoke};
pub use signature::FunctionSignature;
