//! Change events and exported change logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use authz_rule_contracts::outcome::ChangeRecord;

/// One reconciliation record, linked into the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    pub record: ChangeRecord,
    /// `this_hash` of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    pub this_hash: String,
}

impl ChangeEvent {
    /// `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// True if this event is about rule `name` in the file at `path`.
    pub fn concerns(&self, path: &str, name: &str) -> bool {
        self.record.path == path && self.record.rule_name == name
    }
}

/// A snapshot of the change log taken by `InMemoryChangeLog::export_log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLog {
    pub events: Vec<ChangeEvent>,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the last event; empty for an empty log.
    pub terminal_hash: String,
}

impl ChangeLog {
    /// Events that modified a file (created, changed, or removed a rule).
    pub fn changes(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.events
            .iter()
            .filter(|event| event.record.outcome.is_change())
    }

    /// Every event for one rule, oldest first.
    pub fn history<'a>(
        &'a self,
        path: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ChangeEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.concerns(path, name))
    }
}
