/// The JSON-side document tree.
///
/// Unlike `serde_json::Value`, [`DocumentValue`] keeps the integer/float
/// distinction explicit and has a dedicated [`DocumentValue::Matcher`] variant,
/// so the comparator dispatches by exhaustive matching instead of inspecting
/// strings for placeholder text.
use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::matcher::Matcher;

/// A node in a normalized JSON tree.
///
/// The three numeric variants form one logical "number": comparison
/// normalizes them to `f64`.
#[derive(Debug, Clone)]
pub enum DocumentValue {
    /// JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (fits in i64).
    Integer(i64),
    /// Unsigned integer that does not fit in i64 (u64 range above `i64::MAX`).
    UnsignedInteger(u64),
    /// IEEE 754 double-precision float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<DocumentValue>),
    /// String-keyed map; `BTreeMap` gives the sorted key order used in reports.
    Object(BTreeMap<String, DocumentValue>),
    /// A placeholder rule. Only ever present in expected trees.
    Matcher(Matcher),
}

impl PartialEq for DocumentValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::UnsignedInteger(a), Self::UnsignedInteger(b)) => a == b,
            (Self::Integer(a), Self::UnsignedInteger(b))
            | (Self::UnsignedInteger(b), Self::Integer(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Matcher(a), Self::Matcher(b)) => a == b,
            (
                Self::Null
                | Self::Bool(_)
                | Self::Integer(_)
                | Self::UnsignedInteger(_)
                | Self::Float(_)
                | Self::String(_)
                | Self::Array(_)
                | Self::Object(_)
                | Self::Matcher(_),
                _,
            ) => false,
        }
    }
}

impl DocumentValue {
    /// Returns the string value if this is a `DocumentValue::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            Self::Null
            | Self::Bool(_)
            | Self::Integer(_)
            | Self::UnsignedInteger(_)
            | Self::Float(_)
            | Self::Array(_)
            | Self::Object(_)
            | Self::Matcher(_) => None,
        }
    }

    /// Returns the f64 value if this is a `DocumentValue::Float` or an integer type.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            Self::UnsignedInteger(n) => Some(*n as f64),
            Self::Null
            | Self::Bool(_)
            | Self::String(_)
            | Self::Array(_)
            | Self::Object(_)
            | Self::Matcher(_) => None,
        }
    }

    /// Returns `true` for any of the numeric variants.
    pub fn is_number(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Returns `true` if this is `DocumentValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the matcher if this is a `DocumentValue::Matcher`.
    pub fn as_matcher(&self) -> Option<&Matcher> {
        match self {
            Self::Matcher(m) => Some(m),
            Self::Null
            | Self::Bool(_)
            | Self::Integer(_)
            | Self::UnsignedInteger(_)
            | Self::Float(_)
            | Self::String(_)
            | Self::Array(_)
            | Self::Object(_) => None,
        }
    }

    /// Index into an object by key.
    pub fn get(&self, key: &str) -> Option<&DocumentValue> {
        match self {
            Self::Object(m) => m.get(key),
            Self::Null
            | Self::Bool(_)
            | Self::Integer(_)
            | Self::UnsignedInteger(_)
            | Self::Float(_)
            | Self::String(_)
            | Self::Array(_)
            | Self::Matcher(_) => None,
        }
    }

    /// The JSON type name used in type-mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) | Self::UnsignedInteger(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Matcher(_) => "matcher",
        }
    }
}

impl From<serde_json::Value> for DocumentValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UnsignedInteger(u)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::Null
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(a) => {
                Self::Array(a.into_iter().map(DocumentValue::from).collect())
            }
            serde_json::Value::Object(m) => Self::Object(
                m.into_iter()
                    .map(|(k, v)| (k, DocumentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Serializes matchers as their description strings, which is the form used
/// both for pretty renderings and for rewritten expected files.
impl Serialize for DocumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::UnsignedInteger(u) => serializer.serialize_u64(*u),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(arr) => arr.serialize(serializer),
            Self::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            Self::Matcher(matcher) => serializer.serialize_str(&matcher.describe()),
        }
    }
}

impl fmt::Display for DocumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::UnsignedInteger(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(_) => write!(f, "[...]"),
            Self::Object(_) => write!(f, "{{...}}"),
            Self::Matcher(m) => write!(f, "{m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn from_json(text: &str) -> DocumentValue {
        DocumentValue::from(serde_json::from_str::<serde_json::Value>(text).expect("valid json"))
    }

    #[test]
    fn numbers_keep_their_variant() {
        assert_eq!(from_json("7"), DocumentValue::Integer(7));
        assert_eq!(from_json("-7"), DocumentValue::Integer(-7));
        assert_eq!(
            from_json("18446744073709551615"),
            DocumentValue::UnsignedInteger(u64::MAX)
        );
        assert_eq!(from_json("7.5"), DocumentValue::Float(7.5));
    }

    #[test]
    fn integer_and_unsigned_compare_across_variants() {
        assert_eq!(DocumentValue::Integer(5), DocumentValue::UnsignedInteger(5));
        assert_ne!(DocumentValue::Integer(-5), DocumentValue::UnsignedInteger(5));
    }

    #[test]
    fn matcher_serializes_as_description() {
        let mut map = BTreeMap::new();
        map.insert("id".to_owned(), DocumentValue::Matcher(Matcher::AnyString));
        map.insert("n".to_owned(), DocumentValue::Integer(1));
        let json = serde_json::to_string(&DocumentValue::Object(map)).expect("serialize");
        assert_eq!(json, r#"{"id":"{{anyString}}","n":1}"#);
    }

    #[test]
    fn object_keys_serialize_sorted() {
        let v = from_json(r#"{"b":1,"a":2}"#);
        assert_eq!(serde_json::to_string(&v).expect("serialize"), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn type_names() {
        assert_eq!(DocumentValue::Float(1.0).type_name(), "number");
        assert_eq!(DocumentValue::UnsignedInteger(1).type_name(), "number");
        assert_eq!(from_json("[]").type_name(), "array");
        assert_eq!(from_json("{}").type_name(), "object");
        assert_eq!(DocumentValue::Null.type_name(), "null");
    }
}
