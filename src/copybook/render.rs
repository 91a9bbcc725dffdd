//! Record rendering

use super::error::{RenderError, RenderResult};
use super::padding::pad_element;
use super::schema::{Copybook, Element, Format};
use crate::model::{Record, Value};
use indexmap::IndexMap;

/// Upper bound on output preallocation
const PREALLOCATE_LIMIT: usize = 64 * 1024;

/// Schema field name to dotted path into the mapped record
pub type FieldMapping = IndexMap<String, String>;

/// Walk a dotted path through a record; `None` when any step is missing
pub fn lookup_path<'v>(fields: &'v Record, path: &str) -> Option<&'v Value> {
    let mut keys = path.split('.');
    let root = fields.get(keys.next()?)?;
    keys.try_fold(root, |current, key| current.get(key))
}

/// Leaf text for padding; absent and null render as empty.
/// On a container, returns its type name.
fn scalar_text(value: Option<&Value>) -> Result<String, &'static str> {
    match value {
        None => Ok(String::new()),
        Some(value) => value.to_scalar_string().ok_or(value.type_name()),
    }
}

/// Pad a scalar element; array and parent formats are rejected
fn pad(element: &Element, text: &str) -> RenderResult<String> {
    pad_element(&element.format, element.max_length, text).ok_or_else(|| {
        RenderError::NonScalarElement {
            field: element.name.clone(),
        }
    })
}

/// Renders one record against a copybook
pub struct Renderer<'a> {
    field_mapping: &'a FieldMapping,
    record: &'a Record,
}

impl<'a> Renderer<'a> {
    /// Create a renderer over a field mapping and a mapped record
    pub fn new(field_mapping: &'a FieldMapping, record: &'a Record) -> Self {
        Self {
            field_mapping,
            record,
        }
    }

    /// Render every element in ascending index order
    pub fn render(&self, copybook: &Copybook) -> RenderResult<String> {
        let capacity = copybook.record_length().min(PREALLOCATE_LIMIT);
        let mut output = String::with_capacity(capacity);
        for element in copybook.sorted_elements() {
            output.push_str(&self.render_element(element)?);
        }
        log::debug!("Rendered record of {} characters", output.chars().count());
        Ok(output)
    }

    fn render_element(&self, element: &Element) -> RenderResult<String> {
        match &element.format {
            Format::Array { .. } => self.render_array(element),
            Format::Parent { subelement } => self.render_element(subelement),
            Format::Integer | Format::Float { .. } | Format::String => {
                let path = self.path_for(element)?;
                let text = scalar_text(lookup_path(self.record, path)).map_err(|found| {
                    RenderError::UnexpectedShape {
                        field: element.name.clone(),
                        path: path.to_string(),
                        expected: "scalar",
                        found: found.to_string(),
                    }
                })?;
                pad(element, &text)
            }
        }
    }

    /// Render a repeated group.
    ///
    /// Always produces `capacity` repetitions: sub-records past the end of the
    /// data are padded as empty, sub-records past capacity are dropped. Output
    /// follows the local index `i * children + j`.
    fn render_array(&self, element: &Element) -> RenderResult<String> {
        let path = self.path_for(element)?;
        let shape_error = |path: String, expected: &'static str, found: &str| {
            RenderError::UnexpectedShape {
                field: element.name.clone(),
                path,
                expected,
                found: found.to_string(),
            }
        };

        let items: &[Value] = match lookup_path(self.record, path) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(other) => return Err(shape_error(path.to_string(), "array", other.type_name())),
        };

        let capacity = element.max_length;
        if items.len() > capacity {
            log::warn!(
                "Array '{}' has {} entries, truncating to capacity {capacity}",
                element.name,
                items.len()
            );
        }

        let prefix = format!("{path}.");
        let children: Vec<(&Element, &str)> = element
            .sorted_children()
            .into_iter()
            .map(|child| (child, self.child_path(&prefix, child)))
            .collect();

        let reserve = element.rendered_length().min(PREALLOCATE_LIMIT);
        let mut output = String::with_capacity(reserve);
        for i in 0..capacity {
            let sub_record = match items.get(i) {
                None | Some(Value::Null) => None,
                Some(Value::Object(fields)) => Some(fields),
                Some(other) => {
                    return Err(shape_error(format!("{path}[{i}]"), "object", other.type_name()));
                }
            };

            for (child, relative) in &children {
                let value = sub_record.and_then(|fields| lookup_path(fields, relative));
                let text = scalar_text(value).map_err(|found| {
                    shape_error(format!("{path}[{i}].{relative}"), "scalar", found)
                })?;
                output.push_str(&pad(child, &text)?);
            }
        }
        Ok(output)
    }

    fn path_for(&self, element: &Element) -> RenderResult<&'a str> {
        self.field_mapping
            .get(&element.name)
            .map(String::as_str)
            .ok_or_else(|| RenderError::UnmappedField {
                field: element.name.clone(),
            })
    }

    /// Path of a child inside each sub-record: the mapping entry for the child
    /// under `<array path>.`, else the child's own name
    fn child_path<'e>(&self, prefix: &str, child: &'e Element) -> &'e str
    where
        'a: 'e,
    {
        self.field_mapping
            .get(&child.name)
            .and_then(|path| path.strip_prefix(prefix))
            .unwrap_or(child.name.as_str())
    }
}

impl Copybook {
    /// Render a mapped record into exactly
    /// [`record_length`](Copybook::record_length) characters
    pub fn render(&self, field_mapping: &FieldMapping, record: &Record) -> RenderResult<String> {
        Renderer::new(field_mapping, record).render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match Value::from(value) {
            Value::Object(fields) => fields,
            _ => panic!("record must be an object"),
        }
    }

    fn mapping(pairs: &[(&str, &str)]) -> FieldMapping {
        pairs
            .iter()
            .map(|(field, path)| (field.to_string(), path.to_string()))
            .collect()
    }

    #[test]
    fn test_scalars_in_index_order() {
        let copybook = Copybook::new(vec![
            Element::new(3, "amount", 6, Format::Float { decimals: 2 }),
            Element::new(0, "name", 5, Format::String),
            Element::new(1, "qty", 3, Format::Integer),
        ])
        .unwrap();
        let fields = mapping(&[("name", "customer.name"), ("qty", "qty"), ("amount", "amount")]);
        let data = record(json!({"customer": {"name": "AB"}, "qty": 7, "amount": "12.34"}));

        let rendered = copybook.render(&fields, &data).unwrap();
        assert_eq!(rendered, "AB---007001234");
        assert_eq!(rendered.len(), copybook.record_length());
    }

    #[test]
    fn test_missing_path_pads_empty() {
        let copybook = Copybook::new(vec![Element::new(0, "name", 4, Format::String)]).unwrap();
        let fields = mapping(&[("name", "customer.name")]);
        assert_eq!(copybook.render(&fields, &record(json!({}))).unwrap(), "----");
    }

    #[test]
    fn test_array_group_fills_capacity() {
        let copybook = Copybook::new(vec![Element::new(
            0,
            "items",
            3,
            Format::Array {
                elements: vec![
                    Element::new(0, "sku", 2, Format::String),
                    Element::new(1, "qty", 2, Format::Integer),
                ],
            },
        )])
        .unwrap();
        let fields = mapping(&[("items", "order.items"), ("sku", "order.items.code")]);
        let data = record(json!({"order": {"items": [{"code": "A", "qty": 5}]}}));

        let rendered = copybook.render(&fields, &data).unwrap();
        assert_eq!(rendered, "A-05--00--00");
        assert_eq!(rendered.len(), 3 * 2 * 2);
    }

    #[test]
    fn test_shape_errors() {
        let copybook = Copybook::new(vec![Element::new(0, "name", 4, Format::String)]).unwrap();
        let err = copybook
            .render(&mapping(&[("name", "name")]), &record(json!({"name": {"first": "A"}})))
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::UnexpectedShape {
                field: "name".to_string(),
                path: "name".to_string(),
                expected: "scalar",
                found: "Object".to_string(),
            }
        );

        let err = copybook.render(&FieldMapping::new(), &Record::new()).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnmappedField {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_unvalidated_container_child_is_an_error() {
        let copybook = Copybook {
            elements: vec![Element::new(
                0,
                "outer",
                1,
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
            )],
        };
        let err = copybook
            .render(&mapping(&[("outer", "outer")]), &record(json!({"outer": [{}]})))
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::NonScalarElement {
                field: "inner".to_string()
            }
        );
    }
}
