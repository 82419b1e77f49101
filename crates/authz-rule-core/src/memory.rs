//! In-memory implementation of `RuleStore`.
//!
//! `InMemoryRuleStore` keeps every rule's values in a map keyed by
//! `(path, name)`. Clones share the same map, so a host can hand one clone
//! to the `Reconciler` and keep another to inspect the result.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::Value;
use tracing::debug;

use authz_rule_contracts::error::{RuleError, RuleResult};

use crate::traits::RuleStore;

type RuleKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleStore {
    pub(crate) rules: Arc<Mutex<HashMap<RuleKey, Vec<Value>>>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with persisted values for rule `name` in `path`.
    pub fn with_rule(self, path: &str, name: &str, values: Vec<Value>) -> RuleResult<Self> {
        self.lock()?.insert(key(path, name), values);
        Ok(self)
    }

    /// Number of rules currently held, across all paths.
    pub fn len(&self) -> RuleResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RuleResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> RuleResult<MutexGuard<'_, HashMap<RuleKey, Vec<Value>>>> {
        self.rules.lock().map_err(|e| RuleError::StoreError {
            reason: format!("rule store lock poisoned: {}", e),
        })
    }
}

impl RuleStore for InMemoryRuleStore {
    fn read(&self, path: &str, name: &str) -> RuleResult<Option<Vec<Value>>> {
        Ok(self.lock()?.get(&key(path, name)).cloned())
    }

    fn write(&self, path: &str, name: &str, values: &[Value]) -> RuleResult<()> {
        debug!(path, rule = name, count = values.len(), "storing rule values");
        self.lock()?.insert(key(path, name), values.to_vec());
        Ok(())
    }

    fn remove(&self, path: &str, name: &str) -> RuleResult<()> {
        debug!(path, rule = name, "removing rule");
        self.lock()?.remove(&key(path, name));
        Ok(())
    }
}

fn key(path: &str, name: &str) -> RuleKey {
    (path.to_string(), name.to_string())
}
