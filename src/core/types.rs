//! Dynamic values that flow through validation.
//!
//! Input data is modelled as a closed enum, the same way a loosely typed
//! document would be: absent, null, scalars, dates, arrays, ordered objects and
//! opaque function descriptors. Rules pattern-match on it, and the interpreter
//! threads it through the compiled rule list by value.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A dynamically typed value under validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (a missing key, an array hole, or no input at all)
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Double precision number
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Point in time
    Date(DateTime<Utc>),
    /// Ordered list; `Undefined` entries are holes
    Array(Vec<Value>),
    /// Insertion-ordered key-value map
    Object(IndexMap<String, Value>),
    /// Callable descriptor
    Function(FunctionValue),
}

/// Descriptor for a callable value.
///
/// Only the shape is validated, so a function is represented by its name and
/// the number of declared parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionValue {
    /// Function name, may be empty
    pub name: String,
    /// Number of declared parameters
    pub arity: usize,
}

/// Kind tag of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Absent value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Boolean,
    /// Number
    Number,
    /// String
    String,
    /// Date
    Date,
    /// Array
    Array,
    /// Object
    Object,
    /// Function
    Function,
}

static UNDEFINED: Value = Value::Undefined;

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Create a function descriptor value.
    pub fn function(name: impl Into<String>, arity: usize) -> Self {
        Value::Function(FunctionValue {
            name: name.into(),
            arity,
        })
    }

    /// Build an object from key-value pairs, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// Check if this value is absent.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this value is present (anything but `Undefined`).
    pub fn is_defined(&self) -> bool {
        !self.is_undefined()
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a date.
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        if let Value::Date(d) = self {
            Some(d)
        } else {
            None
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Try to get this value as a mutable array.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Object(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Try to get this value as a mutable object.
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        if let Value::Object(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Try to get this value as a function descriptor.
    pub fn as_function(&self) -> Option<&FunctionValue> {
        if let Value::Function(func) = self {
            Some(func)
        } else {
            None
        }
    }

    /// Get a member by key; anything but an object yields `Undefined`.
    pub fn get(&self, key: &str) -> &Value {
        self.as_object()
            .and_then(|map| map.get(key))
            .unwrap_or(&UNDEFINED)
    }

    /// Follow a dotted member path such as `"a.b"`.
    ///
    /// Missing members resolve to `Undefined` rather than failing.
    pub fn lookup(&self, path: &str) -> &Value {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .fold(self, |current, segment| current.get(segment))
    }

    /// Convert to a JSON value.
    ///
    /// Undefined object members are skipped; undefined array entries, dates
    /// and functions are rendered the way `JSON.stringify` would.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(format_date(d)),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, v)| v.is_defined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Function(_) => serde_json::Value::Null,
        }
    }
}

/// Render a date as an ISO-8601 string with millisecond precision.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a number the way JavaScript prints it in messages.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", format_date(d)),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if item.is_defined() && !item.is_null() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "{}", self.to_json()),
            Value::Function(func) => write!(f, "[Function {}]", func.name),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Function => "function",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<FunctionValue> for Value {
    fn from(func: FunctionValue) -> Self {
        Value::Function(func)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&format_date(d)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let defined: Vec<_> = map.iter().filter(|(_, v)| v.is_defined()).collect();
                let mut out = serializer.serialize_map(Some(defined.len()))?;
                for (k, v) in defined {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::from(42).kind(), ValueKind::Number);
        assert_eq!(Value::from("a").kind(), ValueKind::String);
        assert_eq!(Value::Undefined.kind(), ValueKind::Undefined);
        assert_eq!(Value::function("f", 2).kind().to_string(), "function");
    }

    #[test]
    fn test_lookup_dotted_path() {
        let value = Value::from(json!({"a": {"b": 3}}));
        assert_eq!(value.lookup("a.b"), &Value::Number(3.0));
        assert!(value.lookup("a.c").is_undefined());
        assert!(Value::from(1).lookup("a").is_undefined());
    }

    #[test]
    fn test_display_matches_message_rendering() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_json_round_trip_skips_undefined_members() {
        let mut value = Value::from(json!({"a": 1, "b": [true, null]}));
        value
            .as_object_mut()
            .unwrap()
            .insert("c".to_string(), Value::Undefined);

        assert_eq!(value.to_json(), json!({"a": 1.0, "b": [true, null]}));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"a": 1.0, "b": [true, null]}));
    }

    #[test]
    fn test_deserialize_from_json_text() {
        let value: Value = serde_json::from_str(r#"{"name": "x", "tags": []}"#).unwrap();
        assert_eq!(value.get("name"), &Value::from("x"));
        assert_eq!(value.get("tags"), &Value::Array(Vec::new()));
    }
}
