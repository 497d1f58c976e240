//! Backend-agnostic value type.
//!
//! [`Value`] carries record field values and cleaned form data between the
//! forms and the stores.

use std::fmt;

use chrono::{DateTime, Utc};

/// A backend-agnostic representation of a field value.
///
/// # Examples
///
/// ```
/// use scirius_db::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v.as_int(), Some(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v.as_str(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// SQL NULL / no value submitted.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer (also used for primary keys).
    Int(i64),
    /// A UTF-8 string.
    String(String),
    /// Raw binary data.
    Bytes(Vec<u8>),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// A list of values (multi-select fields).
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string unless this is `Null` or an empty string.
    pub fn as_non_empty_str(&self) -> Option<&str> {
        self.as_str().filter(|s| !s.is_empty())
    }

    /// Returns the list items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Collects the integer items of a `List`, skipping anything else.
    pub fn int_list(&self) -> Vec<i64> {
        self.as_list()
            .map(|items| items.iter().filter_map(Self::as_int).collect())
            .unwrap_or_default()
    }

    /// Renders the value the way it would appear in a submitted form.
    ///
    /// `Null` renders as an empty string and lists are comma-joined.
    pub fn to_form_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::List(items) => items
                .iter()
                .map(Self::to_form_string)
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::List(vals) => {
                write!(f, "[")?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(3).as_bool(), None);
        assert_eq!(Value::String(String::new()).as_non_empty_str(), None);
        assert_eq!(Value::from("x").as_non_empty_str(), Some("x"));
        assert!(Value::from(None::<String>).is_null());
    }

    #[test]
    fn test_int_list_skips_non_ints() {
        let v = Value::List(vec![Value::Int(1), Value::from("a"), Value::Int(5)]);
        assert_eq!(v.int_list(), vec![1, 5]);
        assert!(Value::Null.int_list().is_empty());
    }

    #[test]
    fn test_to_form_string() {
        assert_eq!(Value::Null.to_form_string(), "");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_form_string(),
            "1,2"
        );
        assert_eq!(Value::Bool(false).to_form_string(), "false");
    }

    #[test]
    fn test_display_list() {
        let v = Value::List(vec![Value::Int(1), Value::Null]);
        assert_eq!(v.to_string(), "[1, NULL]");
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(Value::Int(7)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Int", "value": 7}));
    }
}
