//! Flag-spelling derivation from field names.
//!
//! A single-character field name gets both a short and a long spelling
//! (`-a` and `--a`, equivalent); a multi-character name gets only the long
//! spelling (`--aa` — there is no single-dash multi-letter form). Boolean
//! fields additionally derive a negated flag from `no-` + name; since that
//! name is always multi-character, the negated flag is long-only
//! (`--no-d`).

use crate::error::ConfigurationError;

/// The command-line spellings derived for one field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpelling {
    /// Short form, present only for single-character names.
    pub short: Option<char>,
    /// Long form, always present.
    pub long: String,
}

/// Derives the flag spellings for a field name.
///
/// # Examples
///
/// ```
/// use flagconf_core::flags::spellings;
///
/// let single = spellings("a");
/// assert_eq!(single.short, Some('a'));
/// assert_eq!(single.long, "a");
///
/// let multi = spellings("aa");
/// assert_eq!(multi.short, None);
/// assert_eq!(multi.long, "aa");
/// ```
pub fn spellings(name: &str) -> FlagSpelling {
    let mut chars = name.chars();
    let short = match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    };
    FlagSpelling {
        short,
        long: name.to_string(),
    }
}

/// The derived name of a boolean field's negated flag.
pub fn negated_name(name: &str) -> String {
    format!("no-{name}")
}

/// Checks that a name can form a flag: non-empty, no whitespace, no
/// leading dash, and only alphanumeric characters, `-`, or `_`.
pub fn validate_name(name: &str) -> Result<(), ConfigurationError> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::EmptyFieldName);
    }
    let well_formed = !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(ConfigurationError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}
