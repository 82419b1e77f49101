//! Error types for rule definition and reconciliation.
//!
//! All fallible operations in the workspace return `RuleResult<T>`.
//! Validation variants carry the offending direction and keys so a caller
//! can fix the declaration without reading the validator.

use std::fmt;

use thiserror::Error;

use crate::value::Direction;

/// A required parameter the caller did not supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingParameter {
    Path,
    /// Only reported when the rule is not being ensured absent.
    Value,
}

impl fmt::Display for MissingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingParameter::Path => f.write_str("path is a required parameter."),
            MissingParameter::Value => f.write_str(
                "value is a required parameter unless ensuring a setting is absent.",
            ),
        }
    }
}

/// The unified error type for authorization rule handling.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The value payload is not a mapping.
    #[error("Value must be a hash but was {found}")]
    TypeMismatch { found: &'static str },

    /// A match entry carries keys outside `certname` / `extensions`.
    #[error(
        "Only one of 'certname' and 'extensions' are allowed keys in a {direction} hash. Found '{}'.",
        .keys.join(", ")
    )]
    UnknownKey { direction: Direction, keys: Vec<String> },

    /// A match entry has zero keys, or both recognized keys at once.
    #[error("Only one of 'certname' and 'extensions' are allowed keys in a {direction} hash.")]
    MultipleOrMissingKey { direction: Direction },

    /// One or more required parameters were not supplied.
    ///
    /// Every missing parameter is reported in a single message.
    #[error("{}", render_missing(.0))]
    MissingParameters(Vec<MissingParameter>),

    /// The path policy rejected the target file path.
    #[error("File paths must be fully qualified, not '{path}'")]
    PathSyntax { path: String },

    /// A rule manifest could not be read or parsed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The storage collaborator failed to read, write, or remove a rule.
    #[error("store error: {reason}")]
    StoreError { reason: String },

    /// The change writer could not record a reconciliation outcome.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },
}

fn render_missing(missing: &[MissingParameter]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convenience alias used throughout the authz-rule crates.
pub type RuleResult<T> = Result<T, RuleError>;
