//! Fixed-width copybook records
//!
//! A [`Copybook`] is an ordered list of elements, each with an index, a name,
//! a width and a [`Format`]. Rendering looks each element up in a mapped
//! record through a [`FieldMapping`], pads it to its width and concatenates
//! by ascending index. The rendered length depends only on the schema.

mod error;
pub mod padding;
mod render;
mod schema;

pub use error::{RenderError, RenderResult, SchemaError};
pub use padding::{pad_element, pad_left, pad_right};
pub use render::{FieldMapping, Renderer, lookup_path};
pub use schema::{Copybook, Element, Format};
