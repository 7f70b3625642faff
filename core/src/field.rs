//! Field descriptors: the typed declaration of one configuration value.

use std::fmt;

use crate::types::{FieldType, Value};

/// A check run against a field's raw parsed value, in declaration order.
/// Returns a message describing the failure when the value is rejected.
pub type Validator = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// A post-parse hook that replaces a field's raw value with the final one.
/// Receives the raw coerced value (`None` when the field was absent and has
/// no default) and may return a value of a different kind entirely.
pub type Resolver = Box<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// Declarative descriptor of one configuration value.
///
/// A field pairs a default with a type tag, optional documentation, an
/// ordered list of validators, and at most one resolver. The typed
/// constructors ([`bool`](Field::bool), [`int`](Field::int),
/// [`float`](Field::float), [`string`](Field::string)) lock the field to one
/// kind; an absent default (`None`) declares the field with no value until a
/// flag supplies one.
///
/// # Examples
///
/// ```
/// use flagconf_core::{Field, FieldType};
///
/// let verbose = Field::bool(false).with_doc("enable verbose output");
/// assert_eq!(verbose.ty, FieldType::Bool);
///
/// let port = Field::int(None).with_doc("listen port");
/// assert!(port.default.is_none());
/// ```
pub struct Field {
    /// Default value, or `None` for the absence sentinel.
    pub default: Option<Value>,
    /// The field's type tag; fixed by the constructor.
    pub ty: FieldType,
    /// Documentation carried into generated help text.
    pub doc: String,
    pub(crate) validators: Vec<Validator>,
    pub(crate) resolver: Option<Resolver>,
}

impl Field {
    fn with_type(default: Option<Value>, ty: FieldType) -> Self {
        Self {
            default,
            ty,
            doc: String::new(),
            validators: Vec::new(),
            resolver: None,
        }
    }

    /// Creates a boolean field.
    pub fn bool(default: impl Into<Option<bool>>) -> Self {
        Self::with_type(default.into().map(Value::Bool), FieldType::Bool)
    }

    /// Creates an integer field.
    pub fn int(default: impl Into<Option<i64>>) -> Self {
        Self::with_type(default.into().map(Value::Int), FieldType::Int)
    }

    /// Creates a float field.
    pub fn float(default: impl Into<Option<f64>>) -> Self {
        Self::with_type(default.into().map(Value::Float), FieldType::Float)
    }

    /// Creates a string field.
    pub fn string(default: impl Into<Option<String>>) -> Self {
        Self::with_type(default.into().map(Value::Str), FieldType::Str)
    }

    /// Attaches documentation shown in generated help text.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Appends a validator. Validators run in declaration order against the
    /// raw parsed value; the first failure aborts definition.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Binds the field's resolver. At most one resolver applies per field;
    /// a later call replaces an earlier one.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagconf_core::{Field, Value};
    ///
    /// let field = Field::int(5)
    ///     .with_resolver(|raw| raw.map(|v| Value::from((v.as_int().unwrap() * 42).to_string())));
    /// assert!(field.has_resolver());
    /// ```
    pub fn with_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Whether a resolver is bound to this field.
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Runs the validators against `value` in order, stopping at the first
    /// failure.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        for validator in &self.validators {
            validator(value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("default", &self.default)
            .field("ty", &self.ty)
            .field("doc", &self.doc)
            .field("validators", &self.validators.len())
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_constructors_lock_the_kind() {
        assert_eq!(Field::bool(true).ty, FieldType::Bool);
        assert_eq!(Field::int(1).ty, FieldType::Int);
        assert_eq!(Field::float(2.5).ty, FieldType::Float);
        assert_eq!(Field::string("x".to_string()).ty, FieldType::Str);
    }

    #[test]
    fn test_absent_default_keeps_the_type() {
        let field = Field::int(None);
        assert_eq!(field.ty, FieldType::Int);
        assert!(field.default.is_none());
    }

    #[test]
    fn test_validators_run_in_order_and_stop_at_first_failure() {
        let field = Field::int(0)
            .with_validator(|v| {
                if v.as_int().unwrap_or(0) >= 0 {
                    Ok(())
                } else {
                    Err("must be non-negative".to_string())
                }
            })
            .with_validator(|_| Err("always fails".to_string()));

        assert_eq!(
            field.validate(&Value::Int(-1)),
            Err("must be non-negative".to_string())
        );
        assert_eq!(
            field.validate(&Value::Int(1)),
            Err("always fails".to_string())
        );
    }

    #[test]
    fn test_later_resolver_replaces_earlier() {
        let field = Field::int(1)
            .with_resolver(|raw| raw)
            .with_resolver(|_| Some(Value::Int(9)));
        let resolver = field.resolver.as_ref().unwrap();
        assert_eq!(resolver(Some(Value::Int(1))), Some(Value::Int(9)));
    }
}
