//! The managed rule entity and the parameters it is defined from.
//!
//! `RuleParams` is what a caller declares: every field except `name` may be
//! missing. `Rule` is the validated, immutable result of defining a rule
//! from those parameters; reconciliation never edits it in place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{AccessControlRuleSet, OneOrMany};

/// Whether the rule should exist in its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

/// Caller-supplied desired state, before any validation.
///
/// Example in TOML:
/// ```toml
/// [[rules]]
/// name = "puppetlabs certificate status"
/// path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
/// value = { allow = { certname = "admin.example.com" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleParams {
    /// Identity of the rule inside its file.
    pub name: String,

    /// Absolute path of the file the rule lives in.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub ensure: Ensure,

    /// One rule set or a list of them.
    #[serde(default)]
    pub value: Option<OneOrMany<Value>>,
}

impl RuleParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    /// Set the value; a JSON array is taken as a list of rule sets.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(match value {
            Value::Array(items) => OneOrMany::Many(items),
            other => OneOrMany::Single(other),
        });
        self
    }
}

/// A validated authorization rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    path: String,
    ensure: Ensure,
    value: Vec<AccessControlRuleSet>,
}

impl Rule {
    /// Assemble a rule from already-validated parts.
    ///
    /// Only `authz_rule_core::define_rule` calls this. Every other caller
    /// should go through `define_rule`, which runs the path policy, the
    /// value validator and the required-parameter guard first.
    #[doc(hidden)]
    pub fn from_validated_parts(
        name: impl Into<String>,
        path: impl Into<String>,
        ensure: Ensure,
        value: Vec<AccessControlRuleSet>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ensure,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn ensure(&self) -> Ensure {
        self.ensure
    }

    pub fn value(&self) -> &[AccessControlRuleSet] {
        &self.value
    }

    /// The desired rule sets as the caller wrote them.
    pub fn raw_values(&self) -> Vec<Value> {
        self.value.iter().map(|set| set.raw().clone()).collect()
    }
}
