//! Core value types for mapped records

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use super::types::DataType;

/// A mapped record: field name to value.
///
/// Records are consumed by field-name lookup only, so insertion order carries
/// no meaning; `IndexMap` keeps output stable for display and serialization.
pub type Record = IndexMap<String, Value>;

/// Dynamically-typed value flowing through scopes, expressions and records
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with exact precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Keyed mapping of values
    Object(Record),
}

impl Value {
    /// Check if the value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the value is an integer or a decimal
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_))
    }

    /// Check if the value is a leaf (neither array nor object)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Truthiness used by predicates, `!`, `&&` and `||`
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Decimal(d) => !d.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Object(fields) => !fields.is_empty(),
        }
    }

    /// Get the type name for this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
        }
    }

    /// Get the DataType for this value (`Any` for null)
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Any,
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Decimal(_) => DataType::Decimal,
            Self::String(_) => DataType::String,
            Self::Array(_) => DataType::Array,
            Self::Object(_) => DataType::Object,
        }
    }

    /// Try to view as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view, promoting integers to decimals
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to view as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view as an array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to view as an object
    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a key on an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Walk a dotted path (`"a.b.c"`) through nested objects.
    ///
    /// A missing key or a non-object in the middle of the path yields `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |current, key| current.get(key))
    }

    /// Leaf rendering used by string coercion and the copybook codec.
    ///
    /// Returns `None` for arrays and objects.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Decimal(d) => Some(d.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Array(_) | Self::Object(_) => None,
        }
    }
}

/// Convert from serde_json::Value
impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else {
                    let text = n.to_string();
                    Decimal::from_str(&text)
                        .or_else(|_| Decimal::from_scientific(&text))
                        .map(Self::Decimal)
                        .unwrap_or(Self::String(text))
                }
            }
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Convert to serde_json::Value
impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(b),
            Value::Integer(i) => JsonValue::Number(i.into()),
            // String form keeps scale and precision
            Value::Decimal(d) => JsonValue::String(d.to_string()),
            Value::String(s) => JsonValue::String(s),
            Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            Value::Object(fields) => JsonValue::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

impl From<Record> for Value {
    fn from(fields: Record) -> Self {
        Self::Object(fields)
    }
}

/// Display renders leaves bare and containers as JSON
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(_) | Self::Object(_) => {
                let json: JsonValue = self.clone().into();
                write!(f, "{json}")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(items) => f.debug_list().entries(items).finish(),
            Self::Object(fields) => f.debug_map().entries(fields).finish(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let json: JsonValue = self.clone().into();
        json.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_conversion() {
        let value = Value::from(json!({
            "name": "ACME",
            "count": 3,
            "price": 12.34,
            "tags": ["a", "b"],
            "missing": null
        }));

        assert_eq!(value.get("name"), Some(&Value::from("ACME")));
        assert_eq!(value.get("count"), Some(&Value::Integer(3)));
        assert_eq!(
            value.get("price"),
            Some(&Value::Decimal(Decimal::from_str("12.34").unwrap()))
        );
        assert_eq!(value.get("tags").and_then(Value::as_array).map(<[_]>::len), Some(2));
        assert_eq!(value.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn test_lookup_walks_nested_objects() {
        let value = Value::from(json!({"a": {"b": {"c": "deep"}}, "s": "leaf"}));

        assert_eq!(value.lookup("a.b.c"), Some(&Value::from("deep")));
        assert_eq!(value.lookup("a.x.c"), None);
        assert_eq!(value.lookup("s.c"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.to_boolean());
        assert!(!Value::Integer(0).to_boolean());
        assert!(!Value::from("").to_boolean());
        assert!(Value::from("x").to_boolean());
        assert!(Value::Array(vec![Value::Null]).to_boolean());
        assert!(!Value::Object(Record::new()).to_boolean());
    }

    #[test]
    fn test_scalar_string() {
        assert_eq!(Value::Null.to_scalar_string().as_deref(), Some(""));
        assert_eq!(
            Value::Decimal(Decimal::from_str("12.30").unwrap())
                .to_scalar_string()
                .as_deref(),
            Some("12.30")
        );
        assert_eq!(Value::Array(vec![]).to_scalar_string(), None);
    }

    #[test]
    fn test_decimal_serializes_exactly() {
        let scaled = Value::Decimal(Decimal::from_str("12.30").unwrap());
        assert_eq!(serde_json::to_string(&scaled).unwrap(), r#""12.30""#);

        let wide = Value::Decimal(Decimal::from_str("1234567890123456789.01").unwrap());
        assert_eq!(
            serde_json::to_string(&wide).unwrap(),
            r#""1234567890123456789.01""#
        );

        let back: Value = serde_json::from_str(&serde_json::to_string(&scaled).unwrap()).unwrap();
        assert_eq!(back.to_scalar_string(), scaled.to_scalar_string());
    }
}
