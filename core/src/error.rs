//! Error types for configuration definition.
//!
//! Declaration problems (malformed shapes, unsupported types, duplicate
//! fields) surface as [`ConfigurationError`] during the setup phase of
//! definition, before any token is parsed. Malformed command-line input is
//! the parser's concern and is carried through as [`DefineError::Parse`].

use thiserror::Error;

use crate::FieldType;

/// Declaration-time errors. Always fatal: a configuration that fails to
/// define cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Tuple declaration has the wrong length or a misplaced element.
    #[error(
        "bad definition for field '{0}': tuple must be (default, doc) or (default, type, doc)"
    )]
    BadTupleShape(String),

    /// Field type could not be determined (e.g. an absent default with no
    /// explicit type).
    #[error("unknown type for field '{0}': should be a bool, int, float, or string")]
    UnknownType(String),

    /// Explicit field type disagrees with the kind of the supplied default.
    #[error("default for field '{field}' does not match declared type '{expected}'")]
    TypeMismatch {
        /// Name of the offending field.
        field: String,
        /// The explicitly declared type.
        expected: FieldType,
    },

    /// Field name is empty or whitespace-only.
    #[error("field name cannot be empty")]
    EmptyFieldName,

    /// Field name contains characters that cannot form a flag.
    #[error("invalid field name '{0}': use alphanumeric characters, '-', or '_'")]
    InvalidFieldName(String),

    /// Two fields (or a field and a derived negated flag) share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// In strict mode, a field collides with the built-in help flag.
    #[error("field '{0}' collides with the built-in help flag")]
    ReservedFlag(String),

    /// A field validator rejected the parsed value.
    #[error("validation failed for field '{field}': {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// Message produced by the failing validator.
        message: String,
    },

    /// An operation that requires a defined configuration ran before
    /// definition.
    #[error("configuration has not been defined yet")]
    NotDefined,
}

/// Errors returned by the explicit-token definition entry points.
///
/// The process-argument path ([`Config::define`](crate::Config::define))
/// never returns the `Parse` variant: clap reports malformed input with a
/// usage message and exits, matching normal CLI behavior. Test harnesses
/// that feed explicit token vectors get the parse error back as a value.
#[derive(Debug, Error)]
pub enum DefineError {
    /// Declaration error raised during setup, before parsing.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Malformed command-line input, reported by the underlying parser.
    #[error(transparent)]
    Parse(#[from] clap::Error),
}

/// Convenience alias for declaration-time results.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
