//! The definition engine: from declared fields to a resolved configuration.
//!
//! [`ConfigSpec`] collects an ordered set of field declarations.
//! [`Config`] owns the definition lifecycle: registering one parser rule
//! per field with the underlying [`clap`] command, parsing a token vector,
//! coercing and resolving values, and exposing the final attributes.
//!
//! The full transition runs once; re-invoking it is a no-op. Re-running
//! only the parse/resolve/assign phase against a different token vector is
//! exposed separately as [`Config::reparse`] for callers (typically test
//! harnesses) that re-evaluate an already-defined configuration.

use std::collections::HashSet;
use std::ffi::OsString;
use std::sync::{Arc, RwLock};

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tracing::{debug, info};

use crate::decl::FieldDecl;
use crate::error::{ConfigurationError, DefineError};
use crate::field::Field;
use crate::flags;
use crate::printing;
use crate::types::{FieldType, Value};

/// Ordered, explicit declaration of a configuration.
///
/// Fields are registered in order with [`field`](ConfigSpec::field); the
/// declaration is data, not introspected state, and the spec is consumed by
/// definition.
///
/// # Examples
///
/// ```
/// use flagconf_core::ConfigSpec;
///
/// let config = ConfigSpec::new("example")
///     .describe("Example configuration")
///     .field("count", (5, "how many times to run"))
///     .field("v", false)
///     .define_from(["--count", "8", "--v"])
///     .unwrap();
///
/// assert_eq!(config.get_int("count"), Some(8));
/// assert_eq!(config.get_bool("v"), Some(true));
/// ```
#[derive(Debug)]
pub struct ConfigSpec {
    name: String,
    description: Option<String>,
    strict: bool,
    fields: Vec<(String, FieldDecl)>,
}

impl ConfigSpec {
    /// Creates an empty spec. `name` is the program name shown in usage
    /// and help output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            strict: false,
            fields: Vec::new(),
        }
    }

    /// Sets the description shown at the top of generated help.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// In strict mode, a field whose spelling collides with the built-in
    /// help flag is a declaration error. By default the user's field wins
    /// and the colliding help spelling is simply not registered.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Appends a field declaration. Accepts any of the four declaration
    /// shapes via [`FieldDecl`]'s conversions.
    pub fn field(mut self, name: impl Into<String>, decl: impl Into<FieldDecl>) -> Self {
        self.fields.push((name.into(), decl.into()));
        self
    }

    /// Runs the full definition transition against the process's
    /// command-line arguments and returns the resolved configuration.
    ///
    /// Declaration errors are returned before any parsing happens;
    /// malformed command-line input is reported by the parser with a usage
    /// message and a non-zero process exit.
    pub fn define(self) -> crate::Result<Config> {
        let mut config = Config::new(self);
        config.define()?;
        Ok(config)
    }

    /// Runs the full definition transition against an explicit token
    /// vector (no binary name) and returns the resolved configuration.
    /// Parse errors come back as values instead of exiting.
    pub fn define_from<I, T>(self, args: I) -> Result<Config, DefineError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut config = Config::new(self);
        config.define_from(args)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefineState {
    Undefined,
    Defining,
    Defined,
}

/// A configuration moving through the definition lifecycle.
///
/// Constructed from a [`ConfigSpec`], a `Config` starts undefined; the
/// definition transition registers parser rules, parses, resolves, and
/// assigns final values. Once defined, attributes are readable and the
/// transition is idempotent.
#[derive(Debug)]
pub struct Config {
    name: String,
    description: Option<String>,
    strict: bool,
    decls: Vec<(String, FieldDecl)>,
    fields: Vec<(String, Field)>,
    command: Option<Command>,
    values: Vec<Option<Value>>,
    state: DefineState,
    decl_error: Option<ConfigurationError>,
}

impl Config {
    /// Wraps a spec in an undefined configuration.
    pub fn new(spec: ConfigSpec) -> Self {
        Self {
            name: spec.name,
            description: spec.description,
            strict: spec.strict,
            decls: spec.fields,
            fields: Vec::new(),
            command: None,
            values: Vec::new(),
            state: DefineState::Undefined,
            decl_error: None,
        }
    }

    /// The program name this configuration was declared with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the definition transition has completed.
    pub fn is_defined(&self) -> bool {
        self.state == DefineState::Defined
    }

    /// Runs the full definition transition against the process's
    /// command-line arguments. Idempotent: a defined configuration returns
    /// immediately.
    ///
    /// Malformed input is reported by the underlying parser with a usage
    /// message and a non-zero exit, which is the expected behavior for a
    /// configuration defined at startup.
    pub fn define(&mut self) -> crate::Result<()> {
        let tokens: Vec<OsString> = std::env::args_os().skip(1).collect();
        match self.transition(tokens) {
            Ok(()) => Ok(()),
            Err(DefineError::Parse(err)) => err.exit(),
            Err(DefineError::Configuration(err)) => Err(err),
        }
    }

    /// Runs the full definition transition against an explicit token
    /// vector (without a leading binary name). Parse errors are returned
    /// rather than exiting, for callers that drive parsing themselves.
    pub fn define_from<I, T>(&mut self, args: I) -> Result<(), DefineError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = args.into_iter().map(Into::into).collect();
        self.transition(tokens)
    }

    /// Re-runs only the parse/resolve/assign phase against a new token
    /// vector, without re-registering parser rules. The configuration must
    /// already be defined.
    pub fn reparse<I, T>(&mut self, args: I) -> Result<(), DefineError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        if !self.is_defined() {
            return Err(ConfigurationError::NotDefined.into());
        }
        let tokens: Vec<OsString> = args.into_iter().map(Into::into).collect();
        self.parse_and_assign(tokens)
    }

    fn transition(&mut self, tokens: Vec<OsString>) -> Result<(), DefineError> {
        // Guards both the defined steady state and re-entry while defining.
        if self.state != DefineState::Undefined {
            return Ok(());
        }
        // A declaration error is permanent: the declarations were consumed
        // by the attempt, so replay the recorded error instead of setting
        // up rules from nothing.
        if let Some(err) = &self.decl_error {
            return Err(err.clone().into());
        }
        self.state = DefineState::Defining;
        let result = if self.command.is_some() {
            // Rules survived an earlier parse failure; only the token
            // vector was bad, so retry parsing against the same rules.
            self.parse_and_assign(tokens)
        } else {
            match self.setup_rules() {
                Ok(()) => self.parse_and_assign(tokens),
                Err(err) => {
                    self.decl_error = Some(err.clone());
                    Err(err.into())
                }
            }
        };
        match result {
            Ok(()) => {
                self.state = DefineState::Defined;
                info!(config = %self.name, fields = self.fields.len(), "configuration defined");
                publish(self.snapshot());
                Ok(())
            }
            Err(err) => {
                self.state = DefineState::Undefined;
                Err(err)
            }
        }
    }

    /// Normalizes every declaration and registers one parser rule per
    /// field. Declaration errors surface here, before any parsing, and
    /// leave the configuration untouched: fields and command are only
    /// committed once every declaration has been accepted.
    fn setup_rules(&mut self) -> crate::Result<()> {
        let decls = std::mem::take(&mut self.decls);
        let mut cmd = Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true);
        if let Some(description) = &self.description {
            cmd = cmd.about(description.clone());
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(decls.len());
        for (name, decl) in decls {
            flags::validate_name(&name)?;
            if !seen.insert(name.clone()) {
                return Err(ConfigurationError::DuplicateField(name));
            }
            let field = decl.normalize(&name)?;
            cmd = register_field(cmd, &name, &field, &mut seen)?;
            debug!(field = %name, ty = %field.ty, "registered parser rule");
            fields.push((name, field));
        }

        cmd = self.register_help(cmd, &seen)?;
        self.fields = fields;
        self.command = Some(cmd);
        Ok(())
    }

    /// Adds the built-in help flag, yielding any spelling already taken by
    /// a user field (or erroring on the collision in strict mode).
    fn register_help(&self, mut cmd: Command, seen: &HashSet<String>) -> crate::Result<Command> {
        let long_taken = seen.contains("help");
        let short_taken = seen.contains("h");
        if self.strict && (long_taken || short_taken) {
            let collision = if long_taken { "help" } else { "h" };
            return Err(ConfigurationError::ReservedFlag(collision.to_string()));
        }
        if !long_taken {
            let mut help = Arg::new("help")
                .long("help")
                .action(ArgAction::Help)
                .help("Print help");
            if !short_taken {
                help = help.short('h');
            }
            cmd = cmd.arg(help);
        }
        Ok(cmd)
    }

    /// Parses `tokens`, runs validators and resolvers, and assigns the
    /// final values.
    fn parse_and_assign(&mut self, tokens: Vec<OsString>) -> Result<(), DefineError> {
        let command = self
            .command
            .as_ref()
            .ok_or(ConfigurationError::NotDefined)?;
        let matches = command.clone().try_get_matches_from(tokens)?;

        let mut values = Vec::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let raw = raw_value(&matches, name, field);
            if let Some(value) = &raw {
                field
                    .validate(value)
                    .map_err(|message| ConfigurationError::Validation {
                        field: name.clone(),
                        message,
                    })?;
            }
            let resolved = match &field.resolver {
                Some(resolver) => {
                    debug!(field = %name, "applying resolver");
                    resolver(raw)
                }
                None => raw,
            };
            values.push(resolved);
        }
        self.values = values;
        Ok(())
    }

    /// Looks up a resolved value by field name. `None` means the field is
    /// unknown, the configuration is not defined, or the value is the
    /// absence sentinel.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        self.values.get(index)?.as_ref()
    }

    /// Looks up a boolean value by field name.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Looks up an integer value by field name.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_int()
    }

    /// Looks up a float value by field name (integers widen).
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_float()
    }

    /// Looks up a string value by field name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// Field names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Resolved `(name, value)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .zip(&self.values)
            .map(|((name, _), value)| (name.as_str(), value.as_ref()))
    }

    /// A cloneable snapshot of the resolved values.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            name: self.name.clone(),
            entries: self
                .entries()
                .map(|(name, value)| (name.to_string(), value.cloned()))
                .collect(),
        }
    }

    /// Renders the resolved values as a bordered block; see
    /// [`printing::render`].
    pub fn render(&self, title: Option<&str>) -> crate::Result<String> {
        printing::render(self, title)
    }

    /// Renders the resolved values with an explicit block layout.
    pub fn render_with(
        &self,
        title: Option<&str>,
        style: &printing::BlockStyle,
    ) -> crate::Result<String> {
        printing::render_with(self, title, style)
    }

    /// Pretty-prints the resolved values to stdout.
    pub fn print(&self, title: Option<&str>) -> crate::Result<()> {
        print!("{}", self.render(title)?);
        Ok(())
    }

    /// Pretty-prints the resolved values with an explicit block layout.
    pub fn print_with(&self, title: Option<&str>, style: &printing::BlockStyle) -> crate::Result<()> {
        print!("{}", self.render_with(title, style)?);
        Ok(())
    }
}

/// Extracts the raw coerced value for one field from the parse result,
/// falling back to the declared default when no flag supplied one.
fn raw_value(matches: &ArgMatches, name: &str, field: &Field) -> Option<Value> {
    match field.ty {
        FieldType::Bool => {
            if matches.get_flag(&flags::negated_name(name)) {
                Some(Value::Bool(false))
            } else if matches.get_flag(name) {
                Some(Value::Bool(true))
            } else {
                field.default.clone()
            }
        }
        FieldType::Int => matches
            .get_one::<i64>(name)
            .copied()
            .map(Value::Int)
            .or_else(|| field.default.clone()),
        FieldType::Float => matches
            .get_one::<f64>(name)
            .copied()
            .map(Value::Float)
            .or_else(|| field.default.clone()),
        FieldType::Str => matches
            .get_one::<String>(name)
            .cloned()
            .map(Value::Str)
            .or_else(|| field.default.clone()),
    }
}

/// Registers the parser rule(s) for one field, dispatching on its type.
fn register_field(
    mut cmd: Command,
    name: &str,
    field: &Field,
    seen: &mut HashSet<String>,
) -> crate::Result<Command> {
    let spelling = flags::spellings(name);
    let help = help_text(field);

    match field.ty {
        FieldType::Bool => {
            // Mutually overriding pair: the positive flag sets true, the
            // negated flag sets false, absence leaves the default.
            let negated = flags::negated_name(name);
            if !seen.insert(negated.clone()) {
                return Err(ConfigurationError::DuplicateField(negated));
            }
            let negated_spelling = flags::spellings(&negated);
            let mut positive = Arg::new(name.to_string())
                .long(spelling.long)
                .action(ArgAction::SetTrue)
                .overrides_with(negated.clone())
                .help(help);
            if let Some(short) = spelling.short {
                positive = positive.short(short);
            }
            let negative = Arg::new(negated)
                .long(negated_spelling.long)
                .action(ArgAction::SetTrue)
                .overrides_with(name.to_string())
                .help(format!("sets '{name}' to false"));
            cmd = cmd.arg(positive).arg(negative);
        }
        FieldType::Int | FieldType::Float | FieldType::Str => {
            let mut arg = Arg::new(name.to_string())
                .long(spelling.long)
                .action(ArgAction::Set)
                .value_name(field.ty.name().to_ascii_uppercase())
                .help(help);
            if let Some(short) = spelling.short {
                arg = arg.short(short);
            }
            arg = match field.ty {
                FieldType::Int => arg
                    .value_parser(clap::value_parser!(i64))
                    .allow_negative_numbers(true),
                FieldType::Float => arg
                    .value_parser(clap::value_parser!(f64))
                    .allow_negative_numbers(true),
                _ => arg.value_parser(clap::value_parser!(String)),
            };
            cmd = cmd.arg(arg);
        }
    }
    Ok(cmd)
}

/// Builds the auto-generated per-flag help text:
/// `"<type>, default: <repr>. <doc>"`, with a per-type fallback doc when
/// the declaration carries none.
fn help_text(field: &Field) -> String {
    let doc = if field.doc.is_empty() {
        field.ty.fallback_doc()
    } else {
        field.doc.as_str()
    };
    let default = match &field.default {
        Some(value) => value.repr(),
        None => "none".to_string(),
    };
    format!("{}, default: {}. {}", field.ty.name(), default, doc)
}

/// Serializable snapshot of a defined configuration's resolved values.
///
/// Snapshots are what the process-wide [`last_defined`] slot stores; they
/// are cheap to clone and carry no parser state.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSnapshot {
    name: String,
    entries: Vec<(String, Option<Value>)>,
}

impl ConfigSnapshot {
    /// The program name of the configuration this snapshot came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a resolved value by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// `(name, value)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// The snapshot as a JSON object mapping field names to values
    /// (absent values map to `null`).
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in self.entries() {
            map.insert(name.to_string(), json_value(value));
        }
        serde_json::Value::Object(map)
    }
}

fn json_value(value: Option<&Value>) -> serde_json::Value {
    match value {
        None => serde_json::Value::Null,
        Some(Value::Bool(b)) => serde_json::Value::Bool(*b),
        Some(Value::Int(i)) => serde_json::Value::from(*i),
        Some(Value::Float(x)) => serde_json::Value::from(*x),
        Some(Value::Str(s)) => serde_json::Value::from(s.as_str()),
    }
}

static LAST_DEFINED: RwLock<Option<Arc<ConfigSnapshot>>> = RwLock::new(None);

fn publish(snapshot: ConfigSnapshot) {
    if let Ok(mut slot) = LAST_DEFINED.write() {
        *slot = Some(Arc::new(snapshot));
    }
}

/// Returns a snapshot of the most recently defined configuration in this
/// process, if any.
///
/// The slot is overwritten by each completed definition transition and has
/// no teardown. Configuration definition is expected to happen once near
/// process startup; the accessor exists so code elsewhere in a program can
/// read the configuration without threading the instance through call
/// parameters.
pub fn last_defined() -> Option<Arc<ConfigSnapshot>> {
    LAST_DEFINED.read().ok().and_then(|slot| slot.clone())
}
