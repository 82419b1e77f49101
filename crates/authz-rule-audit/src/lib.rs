//! # authz-rule-audit
//!
//! A tamper-evident record of what reconciliation did to each rule.
//!
//! `InMemoryChangeLog` implements the reconciler's `ChangeWriter`. Every
//! `ChangeRecord` becomes a `ChangeEvent` whose SHA-256 hash commits to the
//! rule's file path and name, the run, the outcome, and the previous event.
//! Rewriting an outcome, re-attributing a record to another rule, or
//! dropping an event is caught by `verify_chain`.
//!
//! ```rust,ignore
//! use authz_rule_audit::InMemoryChangeLog;
//! use authz_rule_core::Reconciler;
//!
//! let log = InMemoryChangeLog::new();
//! let reconciler = Reconciler::new(Box::new(store), Box::new(log.clone()));
//! reconciler.reconcile(&rule)?;
//!
//! let exported = log.export_log()?;
//! for event in exported.history(rule.path(), rule.name()) { /* ... */ }
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{first_broken_link, hash_event, verify_chain};
pub use event::{ChangeEvent, ChangeLog};
pub use memory::InMemoryChangeLog;
