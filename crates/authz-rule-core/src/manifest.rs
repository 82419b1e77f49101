//! TOML rule manifests.
//!
//! A manifest declares any number of rules as `[[rules]]` tables. Each value
//! may be a single inline table or an array of tables:
//!
//! ```toml
//! [[rules]]
//! name = "certificate status"
//! path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
//! value = { allow = { certname = "admin.example.com" } }
//!
//! [[rules]]
//! name = "retired endpoint"
//! path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
//! ensure = "absent"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use authz_rule_contracts::{
    error::{RuleError, RuleResult},
    rule::{Rule, RuleParams},
};

use crate::{definition::define_rule, traits::PathPolicy};

/// The top-level structure deserialized from a TOML rule manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleManifest {
    /// Declared rules, in file order.
    #[serde(default)]
    pub rules: Vec<RuleParams>,
}

impl RuleManifest {
    /// Parse `s` as a TOML rule manifest.
    ///
    /// Returns `RuleError::ConfigError` if the TOML is malformed or does not
    /// match the manifest schema. Rule values are not validated here.
    pub fn from_toml_str(s: &str) -> RuleResult<Self> {
        let manifest: RuleManifest = toml::from_str(s).map_err(|e| RuleError::ConfigError {
            reason: format!("failed to parse rule manifest TOML: {}", e),
        })?;
        debug!(rules = manifest.rules.len(), "parsed rule manifest");
        Ok(manifest)
    }

    /// Read the file at `path` and parse it as a TOML rule manifest.
    pub fn from_file(path: &Path) -> RuleResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| RuleError::ConfigError {
            reason: format!("failed to read rule manifest '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Define every declared rule, stopping at the first invalid one.
    pub fn define_all(&self, policy: &dyn PathPolicy) -> RuleResult<Vec<Rule>> {
        self.rules
            .iter()
            .cloned()
            .map(|params| define_rule(params, policy))
            .collect()
    }
}
