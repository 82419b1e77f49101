//! Access-control rule value types.
//!
//! A rule's `value` is a list of `AccessControlRuleSet`s. Each set is a
//! mapping with optional `allow` / `deny` keys, and each key holds either a
//! single `MatchEntry` or a list of them. A `MatchEntry` identifies a client
//! by exactly one of `certname` or `extensions`.
//!
//! The raw JSON mapping is kept next to the typed view: comparison and change
//! rendering work on the raw value so nothing the caller wrote is lost.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of a match entry that identifies a client by certificate name.
pub const CERTNAME_KEY: &str = "certname";

/// Key of a match entry that identifies a client by certificate extensions.
pub const EXTENSIONS_KEY: &str = "extensions";

/// The only keys a match entry may carry.
pub const MATCH_KEYS: [&str; 2] = [CERTNAME_KEY, EXTENSIONS_KEY];

/// The two rule directions recognized inside a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Allow,
    Deny,
}

impl Direction {
    /// Both directions, in the order they are inspected.
    pub const ALL: [Direction; 2] = [Direction::Allow, Direction::Deny];

    /// The mapping key this direction is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Direction::Allow => "allow",
            Direction::Deny => "deny",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One identity-matching clause.
///
/// The matched value is opaque here: a certname may be a literal, a glob or
/// a regex, and extensions are an arbitrary structure understood by the
/// server that enforces the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEntry {
    Certname(Value),
    Extensions(Value),
}

impl MatchEntry {
    /// The mapping key this entry was declared with.
    pub fn key(&self) -> &'static str {
        match self {
            MatchEntry::Certname(_) => CERTNAME_KEY,
            MatchEntry::Extensions(_) => EXTENSIONS_KEY,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            MatchEntry::Certname(v) | MatchEntry::Extensions(v) => v,
        }
    }
}

/// Either a single item or an ordered list of items.
///
/// Deserializes untagged: a sequence becomes `Many`, anything else `Single`.
/// `Many` is declared first so a sequence is never swallowed by `Single`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    Single(T),
}

impl<T> OneOrMany<T> {
    /// Borrow the items as a slice, regardless of variant.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Single(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Consume into a `Vec`, wrapping a `Single` item.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Single(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// The validated contents of one direction key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionRules {
    /// A mapping or a list; every mapping in it is a valid `MatchEntry`.
    Entries(OneOrMany<MatchEntry>),

    /// Any other shape (e.g. a bare string). Accepted without inspection.
    Unchecked(Value),
}

impl DirectionRules {
    /// The validated match entries, empty for `Unchecked`.
    pub fn entries(&self) -> &[MatchEntry] {
        match self {
            DirectionRules::Entries(entries) => entries.as_slice(),
            DirectionRules::Unchecked(_) => &[],
        }
    }
}

/// One validated `allow` / `deny` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlRuleSet {
    raw: Value,
    allow: Option<DirectionRules>,
    deny: Option<DirectionRules>,
    skipped: usize,
}

impl AccessControlRuleSet {
    /// Assemble a rule set from its raw mapping and the typed direction views.
    ///
    /// `skipped` is the number of non-mapping list elements that were
    /// tolerated and left uninspected.
    pub fn new(
        raw: Value,
        allow: Option<DirectionRules>,
        deny: Option<DirectionRules>,
        skipped: usize,
    ) -> Self {
        Self {
            raw,
            allow,
            deny,
            skipped,
        }
    }

    /// The mapping exactly as the caller supplied it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    pub fn rules(&self, direction: Direction) -> Option<&DirectionRules> {
        match direction {
            Direction::Allow => self.allow.as_ref(),
            Direction::Deny => self.deny.as_ref(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl fmt::Display for AccessControlRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Name of a JSON value's shape, as used in type-mismatch diagnostics.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "hash",
    }
}
