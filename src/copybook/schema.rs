//! Copybook schema types

use super::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Element format, tagged by `typeOf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "typeOf", rename_all = "lowercase")]
pub enum Format {
    /// Right-justified, zero padded
    Integer,
    /// Right-justified, zero padded, decimal separator removed
    #[serde(rename = "number")]
    Float {
        /// Declared decimal places; metadata only when rendering
        #[serde(default)]
        decimals: u32,
    },
    /// Left-justified, dash padded
    String,
    /// Repeated group; `maxLength` on the element is the capacity
    Array {
        /// Child elements of each repetition
        elements: Vec<Element>,
    },
    /// Wrapper rendering one sub-element at the parent's index
    Parent {
        /// The wrapped element
        subelement: Box<Element>,
    },
}

impl Format {
    /// Integer, float or string
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Integer | Self::Float { .. } | Self::String)
    }
}

/// One schema element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Position within its level
    pub index: u32,
    /// Name looked up in the field mapping
    pub name: String,
    /// Width for scalars, capacity for arrays
    pub max_length: usize,
    /// Element format
    pub format: Format,
}

impl Element {
    /// Create an element
    pub fn new(index: u32, name: impl Into<String>, max_length: usize, format: Format) -> Self {
        Self {
            index,
            name: name.into(),
            max_length,
            format,
        }
    }

    /// Number of characters this element always renders to.
    ///
    /// Saturates at `usize::MAX` for layouts that [`Copybook::validate`] rejects.
    pub fn rendered_length(&self) -> usize {
        self.checked_rendered_length().unwrap_or(usize::MAX)
    }

    /// Rendered length, `None` on overflow
    pub fn checked_rendered_length(&self) -> Option<usize> {
        match &self.format {
            Format::Integer | Format::Float { .. } | Format::String => Some(self.max_length),
            Format::Array { elements } => elements
                .iter()
                .try_fold(0usize, |total, child| {
                    total.checked_add(child.checked_rendered_length()?)
                })?
                .checked_mul(self.max_length),
            Format::Parent { subelement } => subelement.checked_rendered_length(),
        }
    }

    /// Array children sorted by index; empty for other formats
    pub(crate) fn sorted_children(&self) -> Vec<&Element> {
        match &self.format {
            Format::Array { elements } => sorted_by_index(elements),
            _ => Vec::new(),
        }
    }
}

/// A fixed-width record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copybook {
    /// Top-level elements; indices may be sparse
    pub elements: Vec<Element>,
}

impl Copybook {
    /// Create and validate a copybook
    pub fn new(elements: Vec<Element>) -> Result<Self, SchemaError> {
        let copybook = Self { elements };
        copybook.validate()?;
        Ok(copybook)
    }

    /// Parse `{"elements": [...]}` and validate it
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let copybook: Self = serde_json::from_str(json)?;
        copybook.validate()?;
        Ok(copybook)
    }

    /// Check index uniqueness per level, array children and that the total
    /// length fits in `usize`
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_level(&self.elements)?;
        checked_total(&self.elements).map(|_| ())
    }

    /// Total rendered length, independent of record content.
    ///
    /// Saturates at `usize::MAX` for layouts that [`Copybook::validate`] rejects.
    pub fn record_length(&self) -> usize {
        checked_total(&self.elements).unwrap_or(usize::MAX)
    }

    /// Top-level elements sorted by index
    pub(crate) fn sorted_elements(&self) -> Vec<&Element> {
        sorted_by_index(&self.elements)
    }
}

fn sorted_by_index(elements: &[Element]) -> Vec<&Element> {
    let mut sorted: Vec<&Element> = elements.iter().collect();
    sorted.sort_by_key(|element| element.index);
    sorted
}

fn checked_total(elements: &[Element]) -> Result<usize, SchemaError> {
    elements.iter().try_fold(0usize, |total, element| {
        element
            .checked_rendered_length()
            .and_then(|length| total.checked_add(length))
            .ok_or_else(|| SchemaError::LengthOverflow {
                name: element.name.clone(),
            })
    })
}

fn validate_level(elements: &[Element]) -> Result<(), SchemaError> {
    let mut seen: HashMap<u32, &str> = HashMap::with_capacity(elements.len());
    for element in elements {
        if let Some(first) = seen.insert(element.index, &element.name) {
            return Err(SchemaError::DuplicateIndex {
                index: element.index,
                first: first.to_string(),
                second: element.name.clone(),
            });
        }
        validate_element(element)?;
    }
    Ok(())
}

fn validate_element(element: &Element) -> Result<(), SchemaError> {
    match &element.format {
        Format::Array { elements } => {
            if elements.is_empty() {
                return Err(SchemaError::EmptyArray {
                    name: element.name.clone(),
                });
            }
            if let Some(child) = elements.iter().find(|child| !child.format.is_scalar()) {
                return Err(SchemaError::NestedArrayChild {
                    array: element.name.clone(),
                    child: child.name.clone(),
                });
            }
            validate_level(elements)
        }
        Format::Parent { subelement } => validate_element(subelement),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "elements": [
            {"index": 0, "name": "id", "maxLength": 5, "format": {"typeOf": "string"}},
            {"index": 2, "name": "amount", "maxLength": 6, "format": {"typeOf": "number", "decimals": 2}},
            {"index": 1, "name": "items", "maxLength": 3, "format": {"typeOf": "array", "elements": [
                {"index": 0, "name": "sku", "maxLength": 4, "format": {"typeOf": "string"}},
                {"index": 1, "name": "qty", "maxLength": 2, "format": {"typeOf": "integer"}}
            ]}},
            {"index": 5, "name": "wrapper", "maxLength": 0, "format": {"typeOf": "parent",
                "subelement": {"index": 0, "name": "code", "maxLength": 3, "format": {"typeOf": "integer"}}}}
        ]
    }"#;

    #[test]
    fn test_parse_and_length() {
        let copybook = Copybook::from_json(SCHEMA).unwrap();
        assert_eq!(copybook.elements.len(), 4);
        assert_eq!(copybook.elements[1].format, Format::Float { decimals: 2 });
        assert_eq!(copybook.elements[2].rendered_length(), 18);
        assert_eq!(copybook.record_length(), 5 + 6 + 18 + 3);

        let order: Vec<&str> = copybook
            .sorted_elements()
            .iter()
            .map(|element| element.name.as_str())
            .collect();
        assert_eq!(order, vec!["id", "items", "amount", "wrapper"]);
    }

    #[test]
    fn test_decimals_default_to_zero() {
        let element: Element = serde_json::from_str(
            r#"{"index": 0, "name": "n", "maxLength": 3, "format": {"typeOf": "number"}}"#,
        )
        .unwrap();
        assert_eq!(element.format, Format::Float { decimals: 0 });
    }

    #[test]
    fn test_validation_errors() {
        let duplicate = Copybook::new(vec![
            Element::new(1, "a", 1, Format::String),
            Element::new(1, "b", 1, Format::String),
        ]);
        assert!(matches!(duplicate, Err(SchemaError::DuplicateIndex { index: 1, .. })));

        let empty = Copybook::new(vec![Element::new(
            0,
            "group",
            2,
            Format::Array { elements: vec![] },
        )]);
        assert!(matches!(empty, Err(SchemaError::EmptyArray { name }) if name == "group"));

        let nested = Copybook::new(vec![Element::new(
            0,
            "outer",
            2,
            Format::Array {
                elements: vec![Element::new(
                    0,
                    "inner",
                    2,
                    Format::Array {
                        elements: vec![Element::new(0, "x", 1, Format::String)],
                    },
                )],
            },
        )]);
        assert!(matches!(
            nested,
            Err(SchemaError::NestedArrayChild { child, .. }) if child == "inner"
        ));

        assert!(matches!(
            Copybook::from_json(r#"{"elements": [{"index": 0}]}"#),
            Err(SchemaError::Json(_))
        ));
    }

    #[test]
    fn test_length_overflow_is_rejected() {
        let wide_group = r#"{"elements": [
            {"index": 0, "name": "group", "maxLength": 18446744073709551615, "format": {"typeOf": "array", "elements": [
                {"index": 0, "name": "code", "maxLength": 2, "format": {"typeOf": "string"}}
            ]}}
        ]}"#;
        assert!(matches!(
            Copybook::from_json(wide_group),
            Err(SchemaError::LengthOverflow { name }) if name == "group"
        ));

        let half = usize::MAX / 2 + 1;
        let too_long = Copybook::new(vec![
            Element::new(0, "head", half, Format::String),
            Element::new(1, "tail", half, Format::String),
        ]);
        assert!(matches!(too_long, Err(SchemaError::LengthOverflow { name }) if name == "tail"));

        // Unvalidated layouts saturate instead of panicking
        let unchecked = Copybook {
            elements: vec![Element::new(
                0,
                "group",
                usize::MAX,
                Format::Array {
                    elements: vec![Element::new(0, "code", 2, Format::String)],
                },
            )],
        };
        assert_eq!(unchecked.elements[0].checked_rendered_length(), None);
        assert_eq!(unchecked.record_length(), usize::MAX);
    }
}
