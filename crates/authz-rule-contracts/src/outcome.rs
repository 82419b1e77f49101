//! Reconciliation outcomes and the records written for them.
//!
//! `ReconcileOutcome` is what the reconciler returns for one rule.
//! `ChangeRecord` is what gets handed to the change writer, one per rule per
//! pass, including passes that changed nothing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one reconciliation pass across all the rules it touched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new random run identifier (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What reconciling a single rule did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// Every desired rule set was already in the file. Nothing was written.
    InSync,

    /// The rule did not exist and was written.
    Created {
        /// Human-readable change description for audit display.
        description: String,
    },

    /// The rule existed but lacked some desired rule set and was rewritten.
    Changed {
        /// Human-readable change description for audit display.
        description: String,
    },

    /// The rule existed and was removed because it is ensured absent.
    Removed,

    /// The rule is ensured absent and was already missing.
    AlreadyAbsent,
}

impl ReconcileOutcome {
    /// True if the persisted file was modified.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::Created { .. }
                | ReconcileOutcome::Changed { .. }
                | ReconcileOutcome::Removed
        )
    }
}

/// An immutable record of one rule's reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub run_id: RunId,
    pub rule_name: String,
    pub path: String,
    pub outcome: ReconcileOutcome,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
