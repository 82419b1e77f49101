//! # authz-rule-contracts
//!
//! Shared types and the error taxonomy for managed authorization rules.
//!
//! All crates in the workspace import from here. No validation or
//! reconciliation logic lives in this crate, only data definitions and
//! error types.

pub mod error;
pub mod outcome;
pub mod rule;
pub mod value;
