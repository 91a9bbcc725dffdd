// Error types for copybook schemas and rendering

use thiserror::Error;

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A schema element has no entry in the field mapping
    #[error("Field '{field}' has no field mapping entry")]
    UnmappedField {
        /// Schema element name
        field: String,
    },

    /// The value at a mapped path does not have the shape the element needs
    #[error("Field '{field}' at path '{path}': expected {expected}, found {found}")]
    UnexpectedShape {
        /// Schema element name
        field: String,
        /// Path into the record
        path: String,
        /// Shape the element needs
        expected: &'static str,
        /// Type that was found
        found: String,
    },

    /// An array or parent element where only scalars can appear
    #[error("Field '{field}' is not a scalar element")]
    NonScalarElement {
        /// Schema element name
        field: String,
    },
}

/// Errors raised while loading or validating a schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema document is not valid JSON for the schema shape
    #[error("Invalid copybook schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Two elements on one level share an index
    #[error("Duplicate element index {index} ('{first}' and '{second}')")]
    DuplicateIndex {
        /// The shared index
        index: u32,
        /// First element with that index
        first: String,
        /// Second element with that index
        second: String,
    },

    /// Array element without child elements
    #[error("Array element '{name}' has no child elements")]
    EmptyArray {
        /// Array element name
        name: String,
    },

    /// Array child that is itself an array or a parent
    #[error("Array element '{array}' has non-scalar child '{child}'")]
    NestedArrayChild {
        /// Array element name
        array: String,
        /// Offending child name
        child: String,
    },

    /// Total record length does not fit in `usize`
    #[error("Record length overflows at element '{name}'")]
    LengthOverflow {
        /// Element whose length could not be added
        name: String,
    },
}
