//! # authz-rule-validate
//!
//! Structural validation for authorization rule declarations.
//!
//! ## Overview
//!
//! [`validate`] checks one candidate rule set: a mapping whose `allow` and
//! `deny` keys each hold a match entry or a list of them, where every match
//! entry has exactly one of `certname` / `extensions`.
//! [`check_required`] enforces which parameters a declaration must carry.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use serde_json::json;
//! use authz_rule_validate::validate;
//!
//! let set = validate(&json!({ "allow": { "certname": "foo.example.com" } }))?;
//! ```

pub mod required;
pub mod validator;

pub use required::check_required;
pub use validator::{validate, validate_all, validate_params};

// ── Tests ─────────────────────────────────────────────────────────────────────
