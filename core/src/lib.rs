//! Declarative configuration fields compiled into a command-line flag
//! parser.
//!
//! This crate removes the boilerplate of command-line argument declaration:
//! the user declares an ordered set of configuration fields — a default
//! value, an optional explicit type, optional documentation, optional
//! validators, and an optional resolver — and the library builds the
//! argument parser, parses a token vector, coerces and resolves the values,
//! and exposes the final configuration. Token parsing itself is delegated
//! to [`clap`]; this is the declarative layer on top.
//!
//! - [`ConfigSpec`] — the ordered field declaration builder.
//! - [`Field`] — one field descriptor (default, type, doc, validators,
//!   resolver), with typed constructors per primitive kind.
//! - [`FieldDecl`] — the four accepted declaration shapes (scalar,
//!   `(default, doc)`, `(default, type, doc)`, explicit field).
//! - [`Config`] — the definition lifecycle and the resolved values.
//! - [`last_defined`] — process-wide snapshot of the most recent
//!   definition.
//!
//! Flag spellings follow the field name: single-character names get both
//! `-x` and `--x`, multi-character names get only `--name`, and boolean
//! fields derive an additional long-only `--no-<name>` flag that forces
//! the value to `false`.
//!
//! # Example
//!
//! ```
//! use flagconf_core::{ConfigSpec, Field, FieldType, Value};
//!
//! let config = ConfigSpec::new("example")
//!     .describe("Example configuration")
//!     .field("count", (5, "how many times to run"))
//!     .field("rate", 2.5)
//!     .field("t", (None::<i64>, FieldType::Int, "optional threshold"))
//!     .field("v", Field::bool(false).with_doc("verbose output"))
//!     .field(
//!         "label",
//!         Field::int(5).with_resolver(|raw| {
//!             raw.map(|v| Value::from(format!("run-{v}")))
//!         }),
//!     )
//!     .define_from(["--count", "8", "--v"])
//!     .unwrap();
//!
//! assert_eq!(config.get_int("count"), Some(8));
//! assert_eq!(config.get_float("rate"), Some(2.5));
//! assert_eq!(config.get("t"), None);
//! assert_eq!(config.get_bool("v"), Some(true));
//! assert_eq!(config.get_str("label"), Some("run-5"));
//! ```

mod decl;
mod define;
mod error;
mod field;
pub mod flags;
mod printing;
mod types;

pub use decl::{DeclItem, FieldDecl};
pub use define::{Config, ConfigSnapshot, ConfigSpec, last_defined};
pub use error::{ConfigurationError, DefineError, Result};
pub use field::{Field, Resolver, Validator};
pub use printing::{BlockStyle, render, render_with};
pub use types::{FieldType, Value};
