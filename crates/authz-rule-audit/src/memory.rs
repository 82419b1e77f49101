//! `InMemoryChangeLog`: the reference `ChangeWriter`.
//!
//! Clones share one chain, so a host hands a clone to the `Reconciler` and
//! keeps another to export and verify. A poisoned lock is reported as
//! `AuditWriteFailed` by `write` and `export_log`; `verify_integrity`
//! answers `false`, since an unreadable chain cannot be vouched for.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use authz_rule_contracts::{
    error::{RuleError, RuleResult},
    outcome::ChangeRecord,
};
use authz_rule_core::traits::ChangeWriter;

use crate::{
    chain::{first_broken_link, hash_event},
    event::{ChangeEvent, ChangeLog},
};

#[derive(Clone, Default)]
pub struct InMemoryChangeLog {
    pub(crate) events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl InMemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every event written so far.
    pub fn export_log(&self) -> RuleResult<ChangeLog> {
        let events = self.lock()?.clone();
        let terminal_hash = events
            .last()
            .map(|event| event.this_hash.clone())
            .unwrap_or_default();

        Ok(ChangeLog {
            events,
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// Check that no stored event has been altered, reordered, or dropped.
    pub fn verify_integrity(&self) -> bool {
        let Ok(events) = self.lock() else {
            warn!("change log lock poisoned; integrity cannot be verified");
            return false;
        };

        match first_broken_link(&events) {
            None => true,
            Some(sequence) => {
                warn!(sequence, "change log chain broken");
                false
            }
        }
    }

    fn lock(&self) -> RuleResult<MutexGuard<'_, Vec<ChangeEvent>>> {
        self.events.lock().map_err(|e| RuleError::AuditWriteFailed {
            reason: format!("change log lock poisoned: {}", e),
        })
    }
}

impl ChangeWriter for InMemoryChangeLog {
    fn write(&self, record: &ChangeRecord) -> RuleResult<()> {
        let mut events = self.lock()?;

        let sequence = events.len() as u64;
        let prev_hash = events
            .last()
            .map_or(ChangeEvent::GENESIS_HASH, |event| event.this_hash.as_str())
            .to_string();
        let this_hash = hash_event(sequence, record, &prev_hash)?;

        events.push(ChangeEvent {
            sequence,
            record: record.clone(),
            prev_hash,
            this_hash,
        });

        info!(
            run_id = %record.run_id,
            path = %record.path,
            rule = %record.rule_name,
            sequence,
            changed = record.outcome.is_change(),
            "reconciliation recorded"
        );

        Ok(())
    }
}
