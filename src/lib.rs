//! Expression-driven data mapping and fixed-width copybook rendering
//!
//! A [`Mapper`] is compiled once from a declarative mapping specification and
//! applied to a [`Scope`] per request, producing a flat [`Record`]. A
//! [`Copybook`] renders selected fields of that record into a fixed-width
//! string whose length depends only on the schema.
//!
//! ```
//! use copymap::{Pipeline, SimpleScope};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::from_json(r#"{
//!     "mappings": {"name": "=$.customer.name"},
//!     "copybook": {"elements": [
//!         {"index": 0, "name": "name", "maxLength": 5, "format": {"typeOf": "string"}}
//!     ]},
//!     "fieldMapping": {"name": "name"},
//!     "ignoreMappingErrors": false
//! }"#).unwrap();
//!
//! let scope = SimpleScope::from_json(json!({"customer": {"name": "AB"}}));
//! assert_eq!(pipeline.run(&scope).unwrap(), "AB---");
//! ```

pub mod ast;
pub mod config;
pub mod copybook;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod mapper;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod resolve;

// Re-export main types
pub use config::MapperConfig;
pub use copybook::{Copybook, Element, FieldMapping, Format, RenderError, SchemaError};
pub use error::{Error, Result};
pub use evaluator::EvalError;
pub use expression::{CompileError, Expr, ExprFactory};
pub use mapper::{Mapper, MapperFactory};
pub use model::{DataType, Record, Scope, SimpleScope, Value};
pub use parser::{ParseError, parse};
pub use pipeline::{Pipeline, PipelineConfig};
pub use registry::{Function, FunctionError, FunctionRegistry, FunctionSignature};
pub use resolve::{CompositeResolver, Resolution, Resolver};
