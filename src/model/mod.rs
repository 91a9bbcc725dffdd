//! Data model: values, records, declared types and scopes

pub mod scope;
pub mod type_coercion;
pub mod types;
pub mod value;

pub use scope::{Scope, SimpleScope};
pub use type_coercion::{CoercionError, CoercionResult, TypeCoercion};
pub use types::DataType;
pub use value::{Record, Value};
