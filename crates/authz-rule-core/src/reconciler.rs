//! The reconciler: brings a rule's persisted state in line with its
//! declaration.
//!
//! For every rule it is asked to reconcile, the reconciler:
//!
//! 1. Reads the rule's current values from the `RuleStore`.
//! 2. Decides what to do from `ensure` and the containment check.
//! 3. Writes or removes through the `RuleStore` when needed.
//! 4. Records the outcome through the `ChangeWriter`.
//!
//! The decision never depends on the rendered change description. Rules are
//! reconciled one at a time; serializing concurrent passes over the same
//! file is the host's job.

use chrono::Utc;
use tracing::{debug, info};

use authz_rule_contracts::{
    error::RuleResult,
    outcome::{ChangeRecord, ReconcileOutcome, RunId},
    rule::{Ensure, Rule},
};
use authz_rule_sync::{describe_change, in_sync};

use crate::traits::{ChangeWriter, RuleStore};

/// Reconciles validated rules against a store and records each outcome.
pub struct Reconciler {
    store: Box<dyn RuleStore>,
    writer: Box<dyn ChangeWriter>,
    run_id: RunId,
}

impl Reconciler {
    /// Create a reconciler for one pass, with a fresh `RunId`.
    pub fn new(store: Box<dyn RuleStore>, writer: Box<dyn ChangeWriter>) -> Self {
        Self {
            store,
            writer,
            run_id: RunId::new(),
        }
    }

    /// The identifier stamped on every record this reconciler writes.
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Reconcile a single rule.
    ///
    /// Store and change-writer errors are propagated unchanged. When the
    /// store write succeeds but recording fails, the write is not undone.
    pub fn reconcile(&self, rule: &Rule) -> RuleResult<ReconcileOutcome> {
        debug!(
            run_id = %self.run_id,
            rule = rule.name(),
            path = rule.path(),
            ensure = ?rule.ensure(),
            "reconciling rule"
        );

        let current = self.store.read(rule.path(), rule.name())?;

        let outcome = match (rule.ensure(), current) {
            (Ensure::Present, None) => {
                let desired = rule.raw_values();
                let description = describe_change(&[], &desired);
                self.store.write(rule.path(), rule.name(), &desired)?;
                info!(rule = rule.name(), path = rule.path(), "rule created");
                ReconcileOutcome::Created { description }
            }

            (Ensure::Present, Some(current)) => {
                let desired = rule.raw_values();
                if in_sync(&desired, &current) {
                    ReconcileOutcome::InSync
                } else {
                    let description = describe_change(&current, &desired);
                    self.store.write(rule.path(), rule.name(), &desired)?;
                    info!(
                        rule = rule.name(),
                        path = rule.path(),
                        %description,
                        "rule value changed"
                    );
                    ReconcileOutcome::Changed { description }
                }
            }

            (Ensure::Absent, Some(_)) => {
                self.store.remove(rule.path(), rule.name())?;
                info!(rule = rule.name(), path = rule.path(), "rule removed");
                ReconcileOutcome::Removed
            }

            (Ensure::Absent, None) => ReconcileOutcome::AlreadyAbsent,
        };

        let record = ChangeRecord {
            run_id: self.run_id.clone(),
            rule_name: rule.name().to_string(),
            path: rule.path().to_string(),
            outcome: outcome.clone(),
            timestamp: Utc::now(),
        };
        self.writer.write(&record)?;

        debug!(rule = rule.name(), outcome = ?outcome, "reconciliation recorded");
        Ok(outcome)
    }

    /// Reconcile `rules` in order, stopping at the first error.
    pub fn reconcile_all(&self, rules: &[Rule]) -> RuleResult<Vec<ReconcileOutcome>> {
        rules.iter().map(|rule| self.reconcile(rule)).collect()
    }
}
