//! Attribute normalization.
//!
//! Declarative sources often wrap a single block or value in a one-element
//! list, so the same attribute can arrive as `"a-b-c"` or `["a-b-c"]`. Rules
//! never branch on that shape: they read attributes through [`unwrap`] or
//! [`canonical`] and reason about plain scalars and mappings.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::trace;

/// Strip one level of list wrapping from an attribute value.
///
/// - absent or `null` stays absent
/// - a non-empty list yields its first element, or absent when that is `null`
/// - an empty list yields absent
/// - anything else is returned unchanged
pub fn unwrap(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Null => None,
        Value::Array(items) => {
            if items.len() > 1 {
                trace!("Attribute list has {} elements, using the first", items.len());
            }
            items.first().filter(|v| !v.is_null())
        }
        other => Some(other),
    }
}

/// Unwrap an attribute and classify it.
pub fn canonical(value: Option<&Value>) -> Option<NormalizedValue<'_>> {
    unwrap(value).and_then(NormalizedValue::from_value)
}

/// Whether a value counts as "absent or empty".
///
/// Null, the empty string, empty lists and mappings, `false` and numeric zero
/// are all empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// The string form of a value.
///
/// Strings are returned as-is, numbers and booleans through their display
/// form, and lists or mappings as compact JSON.
pub fn text_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// An unwrapped, non-null attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizedValue<'a> {
    /// A string, number or boolean.
    Scalar(&'a Value),
    /// A key/value block such as `tags`.
    Mapping(&'a Map<String, Value>),
    /// A list that survived unwrapping (a list nested inside the wrapper).
    Sequence(&'a [Value]),
}

impl<'a> NormalizedValue<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(NormalizedValue::Mapping(map)),
            Value::Array(items) => Some(NormalizedValue::Sequence(items)),
            scalar => Some(NormalizedValue::Scalar(scalar)),
        }
    }

    pub fn as_mapping(&self) -> Option<&'a Map<String, Value>> {
        match *self {
            NormalizedValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping. Null entries read as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.as_mapping()?.get(key).filter(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        match *self {
            NormalizedValue::Scalar(value) => is_empty(value),
            NormalizedValue::Mapping(map) => map.is_empty(),
            NormalizedValue::Sequence(items) => items.is_empty(),
        }
    }

    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            NormalizedValue::Scalar(value) => text_form(value),
            NormalizedValue::Mapping(map) => Cow::Owned(Value::Object(map.clone()).to_string()),
            NormalizedValue::Sequence(items) => {
                Cow::Owned(Value::Array(items.to_vec()).to_string())
            }
        }
    }
}
