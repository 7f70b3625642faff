//! Primitive value and type model for configuration fields.
//!
//! Every configuration field carries values of one of four primitive kinds:
//! boolean, integer, float, or string. [`Value`] is the closed variant over
//! those kinds and [`FieldType`] is the matching type tag, dispatched on
//! exhaustively wherever a field's kind selects parser behavior.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A primitive configuration value.
///
/// Values round-trip through JSON as their natural representation (untagged),
/// so a snapshot of resolved fields serializes to `{"count": 5, "v": true}`
/// rather than a tagged enum encoding.
///
/// # Examples
///
/// ```
/// use flagconf_core::{FieldType, Value};
///
/// let v = Value::from(5);
/// assert_eq!(v.field_type(), FieldType::Int);
/// assert_eq!(v.as_int(), Some(5));
/// assert_eq!(v.to_string(), "5");
///
/// let s = Value::from("spam");
/// assert_eq!(s.field_type(), FieldType::Str);
/// assert_eq!(s.repr(), "\"spam\"");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl Value {
    /// Returns the type tag matching this value's kind.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Bool(_) => FieldType::Bool,
            Value::Int(_) => FieldType::Int,
            Value::Float(_) => FieldType::Float,
            Value::Str(_) => FieldType::Str,
        }
    }

    /// Returns the boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float payload. Integer values widen losslessly enough
    /// for configuration defaults, so they are accepted here too.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value for help text: strings are quoted, everything
    /// else displays as-is.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Type tag for a configuration field.
///
/// The definition engine matches on this exhaustively when mapping a field
/// to a parser rule, so adding a kind is a compile-time-checked extension.
///
/// # Examples
///
/// ```
/// use flagconf_core::FieldType;
///
/// assert_eq!(FieldType::Int.name(), "int");
/// assert_eq!(FieldType::Bool.fallback_doc(), "boolean flag");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Boolean flag; parsed from flag presence, not a following token.
    Bool,
    /// Integer; the following token must parse as `i64`.
    Int,
    /// Float; the following token must parse as `f64`.
    Float,
    /// String; the following token is taken verbatim.
    Str,
}

impl FieldType {
    /// Short lowercase type name used in generated help text.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Str => "string",
        }
    }

    /// Doc string used when a field declaration carries none.
    pub fn fallback_doc(&self) -> &'static str {
        match self {
            FieldType::Bool => "boolean flag",
            FieldType::Int => "int field",
            FieldType::Float => "float field",
            FieldType::Str => "string field",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_matches_value_kind() {
        assert_eq!(Value::from(true).field_type(), FieldType::Bool);
        assert_eq!(Value::from(7).field_type(), FieldType::Int);
        assert_eq!(Value::from(2.5).field_type(), FieldType::Float);
        assert_eq!(Value::from("x").field_type(), FieldType::Str);
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        assert_eq!(Value::from(7).as_bool(), None);
        assert_eq!(Value::from(true).as_int(), None);
        assert_eq!(Value::from("x").as_float(), None);
        assert_eq!(Value::from(1.0).as_str(), None);
    }

    #[test]
    fn test_as_float_widens_ints() {
        assert_eq!(Value::from(3).as_float(), Some(3.0));
    }

    #[test]
    fn test_repr_quotes_strings_only() {
        assert_eq!(Value::from("spam").repr(), "\"spam\"");
        assert_eq!(Value::from(5).repr(), "5");
        assert_eq!(Value::from(false).repr(), "false");
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&Value::from(5)).unwrap();
        assert_eq!(json, "5");
        let json = serde_json::to_string(&Value::from("spam")).unwrap();
        assert_eq!(json, "\"spam\"");
    }

    #[test]
    fn test_deserializes_natural_json() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Float(3.5));
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Bool(true));
    }
}
