//! Seam traits between the rule core and its host.
//!
//! - `PathPolicy`   — decides whether a target file path is acceptable
//! - `RuleStore`    — reads and writes a rule's persisted values
//! - `ChangeWriter` — records what each reconciliation did
//!
//! The host supplies all three. The core never touches the file system or
//! any global platform state itself.

use serde_json::Value;

use authz_rule_contracts::{error::RuleResult, outcome::ChangeRecord};

/// Platform rules for the `path` parameter of a rule.
pub trait PathPolicy: Send + Sync {
    /// Return `RuleError::PathSyntax` if `path` is not fully qualified.
    fn check(&self, path: &str) -> RuleResult<()>;
}

/// Storage for named rules inside a structured configuration file.
///
/// The file format is the implementation's concern. Values cross this
/// boundary already decoded.
pub trait RuleStore: Send + Sync {
    /// Read the persisted values of rule `name` in the file at `path`.
    ///
    /// Returns `None` when the file holds no such rule. Returned values may
    /// contain nested lists.
    fn read(&self, path: &str, name: &str) -> RuleResult<Option<Vec<Value>>>;

    /// Replace the persisted values of rule `name`, creating it if needed.
    fn write(&self, path: &str, name: &str, values: &[Value]) -> RuleResult<()>;

    /// Remove rule `name` from the file at `path`.
    fn remove(&self, path: &str, name: &str) -> RuleResult<()>;
}

/// Sink for reconciliation records.
///
/// Every reconciliation, including one that changed nothing, produces one
/// record. A failed write aborts the reconciliation with
/// `RuleError::AuditWriteFailed`.
pub trait ChangeWriter: Send + Sync {
    fn write(&self, record: &ChangeRecord) -> RuleResult<()>;
}
