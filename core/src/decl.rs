//! Field declaration shapes and their normalization.
//!
//! A configuration field can be declared in four shapes: a bare primitive
//! scalar, a `(default, doc)` pair, a `(default, type, doc)` triple, or an
//! explicit [`Field`]. Normalization reduces every shape to a [`Field`] and
//! rejects malformed declarations with a [`ConfigurationError`] naming the
//! offending field — before any command-line token is looked at.
//!
//! The well-formed shapes convert ergonomically via `From`:
//!
//! ```
//! use flagconf_core::{FieldDecl, FieldType};
//!
//! let _scalar: FieldDecl = 5.into();
//! let _with_doc: FieldDecl = (5.0, "some float field").into();
//! let _typed: FieldDecl = (None::<i64>, FieldType::Int, "an int").into();
//! ```
//!
//! The loose [`FieldDecl::tuple`] form exists so that malformed tuples are
//! representable and fail at definition time, mirroring how a dynamic
//! declaration would.

use crate::error::ConfigurationError;
use crate::field::Field;
use crate::types::{FieldType, Value};

/// One element of a loose tuple declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclItem {
    /// A primitive value (a default, or — in the last position — a doc
    /// string).
    Scalar(Value),
    /// The absence sentinel in the default position.
    None,
    /// An explicit field type in the middle position of a triple.
    Type(FieldType),
}

/// A field declaration in one of the four accepted shapes.
#[derive(Debug)]
pub enum FieldDecl {
    /// Bare primitive scalar: the default, with the type inferred from it.
    Scalar(Value),
    /// Tuple shape, checked for length and element kinds at definition time.
    Tuple(Vec<DeclItem>),
    /// Explicit field descriptor, taken as-is.
    Field(Field),
}

impl FieldDecl {
    /// Builds the loose tuple form. Well-formed shapes are normally written
    /// through the `From` conversions; this constructor is the escape hatch
    /// that lets malformed shapes reach the definition-time checks.
    pub fn tuple(items: Vec<DeclItem>) -> Self {
        FieldDecl::Tuple(items)
    }

    /// Normalizes the declaration into a [`Field`], or reports why the
    /// shape is malformed. `name` is only used for error messages.
    pub(crate) fn normalize(self, name: &str) -> Result<Field, ConfigurationError> {
        match self {
            FieldDecl::Scalar(value) => {
                let ty = value.field_type();
                Ok(field_from_parts(Some(value), ty, String::new()))
            }
            FieldDecl::Field(field) => Ok(field),
            FieldDecl::Tuple(items) => normalize_tuple(name, items),
        }
    }
}

fn normalize_tuple(name: &str, items: Vec<DeclItem>) -> Result<Field, ConfigurationError> {
    let bad_shape = || ConfigurationError::BadTupleShape(name.to_string());

    let items = match <[DeclItem; 2]>::try_from(items) {
        Ok([default, doc]) => {
            let doc = doc_string(doc).ok_or_else(bad_shape)?;
            return match default {
                DeclItem::Scalar(value) => {
                    let ty = value.field_type();
                    Ok(field_from_parts(Some(value), ty, doc))
                }
                // With no default there is nothing to infer the type from.
                DeclItem::None => Err(ConfigurationError::UnknownType(name.to_string())),
                DeclItem::Type(_) => Err(bad_shape()),
            };
        }
        Err(items) => items,
    };

    match <[DeclItem; 3]>::try_from(items) {
        Ok([default, ty, doc]) => {
            let ty = match ty {
                DeclItem::Type(ty) => ty,
                _ => return Err(bad_shape()),
            };
            let doc = doc_string(doc).ok_or_else(bad_shape)?;
            let default = match default {
                DeclItem::None => None,
                DeclItem::Scalar(value) => Some(coerce_default(name, value, ty)?),
                DeclItem::Type(_) => return Err(bad_shape()),
            };
            Ok(field_from_parts(default, ty, doc))
        }
        Err(_) => Err(bad_shape()),
    }
}

/// Checks an explicit type against the supplied default. Integer defaults
/// widen for float-typed fields; any other disagreement is an error.
fn coerce_default(
    name: &str,
    value: Value,
    ty: FieldType,
) -> Result<Value, ConfigurationError> {
    match (value.field_type(), ty) {
        (actual, expected) if actual == expected => Ok(value),
        (FieldType::Int, FieldType::Float) => Ok(Value::Float(
            value.as_float().expect("int widens to float"),
        )),
        _ => Err(ConfigurationError::TypeMismatch {
            field: name.to_string(),
            expected: ty,
        }),
    }
}

fn doc_string(item: DeclItem) -> Option<String> {
    match item {
        DeclItem::Scalar(Value::Str(s)) => Some(s),
        _ => None,
    }
}

fn field_from_parts(default: Option<Value>, ty: FieldType, doc: String) -> Field {
    let field = match ty {
        FieldType::Bool => Field::bool(None),
        FieldType::Int => Field::int(None),
        FieldType::Float => Field::float(None),
        FieldType::Str => Field::string(None),
    };
    Field {
        default,
        doc,
        ..field
    }
}

impl From<Field> for FieldDecl {
    fn from(field: Field) -> Self {
        FieldDecl::Field(field)
    }
}

impl From<Value> for FieldDecl {
    fn from(value: Value) -> Self {
        FieldDecl::Scalar(value)
    }
}

macro_rules! impl_decl_conversions {
    ($($scalar:ty),+) => {
        $(
            impl From<$scalar> for FieldDecl {
                fn from(value: $scalar) -> Self {
                    FieldDecl::Scalar(Value::from(value))
                }
            }

            impl From<($scalar, &str)> for FieldDecl {
                fn from((default, doc): ($scalar, &str)) -> Self {
                    FieldDecl::Tuple(vec![
                        DeclItem::Scalar(Value::from(default)),
                        DeclItem::Scalar(Value::from(doc)),
                    ])
                }
            }

            impl From<($scalar, FieldType, &str)> for FieldDecl {
                fn from((default, ty, doc): ($scalar, FieldType, &str)) -> Self {
                    FieldDecl::Tuple(vec![
                        DeclItem::Scalar(Value::from(default)),
                        DeclItem::Type(ty),
                        DeclItem::Scalar(Value::from(doc)),
                    ])
                }
            }

            impl From<(Option<$scalar>, FieldType, &str)> for FieldDecl {
                fn from((default, ty, doc): (Option<$scalar>, FieldType, &str)) -> Self {
                    let default = match default {
                        Some(value) => DeclItem::Scalar(Value::from(value)),
                        None => DeclItem::None,
                    };
                    FieldDecl::Tuple(vec![
                        default,
                        DeclItem::Type(ty),
                        DeclItem::Scalar(Value::from(doc)),
                    ])
                }
            }
        )+
    };
}

impl_decl_conversions!(bool, i64, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_infers_type_and_empty_doc() {
        let field = FieldDecl::from(5).normalize("a").unwrap();
        assert_eq!(field.default, Some(Value::Int(5)));
        assert_eq!(field.ty, FieldType::Int);
        assert_eq!(field.doc, "");
    }

    #[test]
    fn test_pair_carries_doc() {
        let field = FieldDecl::from((5.0, "some float field")).normalize("f").unwrap();
        assert_eq!(field.default, Some(Value::Float(5.0)));
        assert_eq!(field.ty, FieldType::Float);
        assert_eq!(field.doc, "some float field");
    }

    #[test]
    fn test_triple_with_absent_default() {
        let field = FieldDecl::from((None::<i64>, FieldType::Int, "an int"))
            .normalize("t")
            .unwrap();
        assert!(field.default.is_none());
        assert_eq!(field.ty, FieldType::Int);
    }

    #[test]
    fn test_triple_widens_int_default_for_float_field() {
        let field = FieldDecl::from((5, FieldType::Float, "")).normalize("f").unwrap();
        assert_eq!(field.default, Some(Value::Float(5.0)));
    }

    #[test]
    fn test_triple_rejects_mismatched_default() {
        let err = FieldDecl::from(("spam", FieldType::Int, "")).normalize("t").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::TypeMismatch {
                field: "t".to_string(),
                expected: FieldType::Int,
            }
        );
    }

    #[test]
    fn test_tuple_of_wrong_length_is_rejected() {
        let decl = FieldDecl::tuple(vec![
            DeclItem::Scalar(Value::Int(1)),
            DeclItem::Scalar(Value::Int(2)),
            DeclItem::Type(FieldType::Int),
            DeclItem::Scalar(Value::Str("doc".to_string())),
        ]);
        assert_eq!(
            decl.normalize("x").unwrap_err(),
            ConfigurationError::BadTupleShape("x".to_string())
        );
    }

    #[test]
    fn test_triple_second_element_must_be_a_type() {
        let decl = FieldDecl::tuple(vec![
            DeclItem::Scalar(Value::Int(5)),
            DeclItem::Scalar(Value::Int(3)),
            DeclItem::Scalar(Value::Str("doc".to_string())),
        ]);
        assert_eq!(
            decl.normalize("x").unwrap_err(),
            ConfigurationError::BadTupleShape("x".to_string())
        );
    }

    #[test]
    fn test_pair_last_element_must_be_a_string() {
        let decl = FieldDecl::tuple(vec![
            DeclItem::Scalar(Value::Int(5)),
            DeclItem::Scalar(Value::Int(3)),
        ]);
        assert_eq!(
            decl.normalize("x").unwrap_err(),
            ConfigurationError::BadTupleShape("x".to_string())
        );
    }

    #[test]
    fn test_pair_with_absent_default_has_unknown_type() {
        let decl = FieldDecl::tuple(vec![
            DeclItem::None,
            DeclItem::Scalar(Value::Str("doc".to_string())),
        ]);
        assert_eq!(
            decl.normalize("x").unwrap_err(),
            ConfigurationError::UnknownType("x".to_string())
        );
    }

    #[test]
    fn test_explicit_field_passes_through() {
        let field = FieldDecl::from(Field::bool(true).with_doc("d"))
            .normalize("b")
            .unwrap();
        assert_eq!(field.default, Some(Value::Bool(true)));
        assert_eq!(field.doc, "d");
    }
}
