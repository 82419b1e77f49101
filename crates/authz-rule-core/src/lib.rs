//! # authz-rule-core
//!
//! Rule definition and reconciliation for managed authorization rules.
//!
//! This crate provides:
//! - The seam traits (`PathPolicy`, `RuleStore`, `ChangeWriter`)
//! - Built-in POSIX / Windows path policies
//! - `define_rule`, which validates parameters into an immutable `Rule`
//! - The `Reconciler`, which brings a store in line with a set of rules
//! - TOML manifests declaring many rules at once
//!
//! ## Usage
//!
//! ```rust,ignore
//! use authz_rule_core::{define_rule, HostPathPolicy, InMemoryRuleStore, Reconciler};
//!
//! let rule = define_rule(params, &HostPathPolicy::detect())?;
//! let reconciler = Reconciler::new(Box::new(store), Box::new(change_log));
//! let outcome = reconciler.reconcile(&rule)?;
//! ```

pub mod definition;
pub mod manifest;
pub mod memory;
pub mod path;
pub mod reconciler;
pub mod traits;

pub use definition::define_rule;
pub use manifest::RuleManifest;
pub use memory::InMemoryRuleStore;
pub use path::{HostPathPolicy, PosixPathPolicy, WindowsPathPolicy};
pub use reconciler::Reconciler;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use serde_json::{json, Value};

    use authz_rule_contracts::{
        error::{RuleError, RuleResult},
        outcome::{ChangeRecord, ReconcileOutcome},
        rule::{Ensure, RuleParams},
        value::{Direction, MatchEntry},
    };

    use crate::{
        define_rule,
        traits::{ChangeWriter, PathPolicy, RuleStore},
        HostPathPolicy, InMemoryRuleStore, PosixPathPolicy, Reconciler, RuleManifest,
        WindowsPathPolicy,
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

    const AUTH_CONF: &str = "/etc/puppetlabs/puppetserver/conf.d/auth.conf";

    /// Collects every record so tests can inspect what was written.
    #[derive(Clone, Default)]
    struct RecordingWriter {
        records: Arc<Mutex<Vec<ChangeRecord>>>,
    }

    impl RecordingWriter {
        fn records(&self) -> Vec<ChangeRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl ChangeWriter for RecordingWriter {
        fn write(&self, record: &ChangeRecord) -> RuleResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    /// Always fails, simulating an unavailable audit sink.
    struct FailingWriter;

    impl ChangeWriter for FailingWriter {
        fn write(&self, _record: &ChangeRecord) -> RuleResult<()> {
            Err(RuleError::AuditWriteFailed {
                reason: "sink offline".to_string(),
            })
        }
    }

    fn allow(certname: &str) -> Value {
        json!({ "allow": { "certname": certname } })
    }

    fn present_rule(name: &str, value: Value) -> authz_rule_contracts::rule::Rule {
        let params = RuleParams::new(name).with_path(AUTH_CONF).with_value(value);
        define_rule(params, &PosixPathPolicy).unwrap()
    }

    fn reconciler(store: &InMemoryRuleStore, writer: &RecordingWriter) -> Reconciler {
        Reconciler::new(Box::new(store.clone()), Box::new(writer.clone()))
    }

    /// Poison the store's lock by panicking while holding it.
    fn poison(store: &InMemoryRuleStore) {
        let rules = Arc::clone(&store.rules);
        let _ = std::thread::spawn(move || {
            let _guard = rules.lock().unwrap();
            panic!("rule store writer crashed");
        })
        .join();
    }

    const MANIFEST: &str = r#"
        [[rules]]
        name = "status"
        path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
        value = { allow = { certname = "admin.example.com" } }
    "#;

    // ── 1. path policies ──────────────────────────────────────────────────────

    #[test]
    fn test_posix_policy() {
        assert!(PosixPathPolicy.check("/etc/auth.conf").is_ok());
        assert!(matches!(
            PosixPathPolicy.check("etc/auth.conf"),
            Err(RuleError::PathSyntax { .. })
        ));
        assert!(PosixPathPolicy.check("C:/auth.conf").is_err());
    }

    #[test]
    fn test_windows_policy() {
        assert!(WindowsPathPolicy.check("C:/ProgramData/auth.conf").is_ok());
        assert!(WindowsPathPolicy.check("//fileserver/share/auth.conf").is_ok());
        assert!(WindowsPathPolicy.check("//fileserver").is_err());
        assert!(WindowsPathPolicy.check("C:auth.conf").is_err());
        assert!(WindowsPathPolicy.check("/etc/auth.conf").is_err());
    }

    /// The detected host policy accepts an absolute POSIX path off Windows.
    #[test]
    #[cfg(not(windows))]
    fn test_host_policy_detects_posix() {
        let policy = HostPathPolicy::detect();
        assert!(matches!(policy, HostPathPolicy::Posix(_)));
        assert!(policy.check("/etc/auth.conf").is_ok());
        assert!(matches!(
            policy.check("auth.conf"),
            Err(RuleError::PathSyntax { .. })
        ));
    }

    #[test]
    #[cfg(windows)]
    fn test_host_policy_detects_windows() {
        let policy = HostPathPolicy::detect();
        assert!(matches!(policy, HostPathPolicy::Windows(_)));
        assert!(policy.check("C:/ProgramData/auth.conf").is_ok());
    }

    // ── 2. rule definition ────────────────────────────────────────────────────

    #[test]
    fn test_define_valid_rule() {
        let rule = present_rule("status", json!([allow("a"), allow("b")]));
        assert_eq!(rule.name(), "status");
        assert_eq!(rule.path(), AUTH_CONF);
        assert_eq!(rule.ensure(), Ensure::Present);
        assert_eq!(rule.raw_values(), vec![allow("a"), allow("b")]);
    }

    /// A defined rule carries the validator's typed view of every value.
    #[test]
    fn test_defined_rule_holds_validated_sets() {
        let rule = present_rule(
            "status",
            json!({ "allow": { "certname": "a" }, "deny": ["*", { "extensions": "x" }] }),
        );

        let set = &rule.value()[0];
        assert_eq!(
            set.rules(Direction::Allow).unwrap().entries(),
            &[MatchEntry::Certname(json!("a"))]
        );
        assert_eq!(
            set.rules(Direction::Deny).unwrap().entries(),
            &[MatchEntry::Extensions(json!("x"))]
        );
        assert_eq!(set.skipped(), 1);
    }

    /// Path syntax is checked before the value.
    #[test]
    fn test_define_rejects_relative_path_first() {
        let params = RuleParams::new("r")
            .with_path("auth.conf")
            .with_value(json!("not a mapping"));
        match define_rule(params, &PosixPathPolicy) {
            Err(RuleError::PathSyntax { path }) => assert_eq!(path, "auth.conf"),
            other => panic!("expected PathSyntax, got {:?}", other),
        }
    }

    /// Value shape is checked before required parameters.
    #[test]
    fn test_define_rejects_invalid_value_before_required_check() {
        let params = RuleParams::new("r").with_value(json!({ "allow": {} }));
        assert!(matches!(
            define_rule(params, &PosixPathPolicy),
            Err(RuleError::MultipleOrMissingKey { .. })
        ));
    }

    #[test]
    fn test_define_requires_value_unless_absent() {
        let params = RuleParams::new("r").with_path(AUTH_CONF);
        let err = define_rule(params, &PosixPathPolicy).unwrap_err();
        assert!(err.to_string().contains("value is a required parameter"));

        let params = RuleParams::new("r")
            .with_path(AUTH_CONF)
            .with_ensure(Ensure::Absent);
        let rule = define_rule(params, &PosixPathPolicy).unwrap();
        assert!(rule.value().is_empty());
    }

    // ── 3. reconciliation ─────────────────────────────────────────────────────

    #[test]
    fn test_reconcile_creates_missing_rule() {
        let store = InMemoryRuleStore::new();
        let writer = RecordingWriter::default();
        let rule = present_rule("status", allow("a"));

        let outcome = reconciler(&store, &writer).reconcile(&rule).unwrap();

        assert!(matches!(outcome, ReconcileOutcome::Created { .. }));
        assert_eq!(store.read(AUTH_CONF, "status").unwrap(), Some(vec![allow("a")]));
        assert_eq!(writer.records().len(), 1);
    }

    /// A persisted superset is left untouched.
    #[test]
    fn test_reconcile_in_sync_does_not_write() {
        let store = InMemoryRuleStore::new()
            .with_rule(AUTH_CONF, "status", vec![allow("a"), allow("b")])
            .unwrap();
        let writer = RecordingWriter::default();
        let rule = present_rule("status", allow("a"));

        let outcome = reconciler(&store, &writer).reconcile(&rule).unwrap();

        assert_eq!(outcome, ReconcileOutcome::InSync);
        assert_eq!(
            store.read(AUTH_CONF, "status").unwrap(),
            Some(vec![allow("a"), allow("b")])
        );
        assert_eq!(writer.records()[0].outcome, ReconcileOutcome::InSync);
    }

    #[test]
    fn test_reconcile_changes_out_of_sync_rule() {
        let store = InMemoryRuleStore::new()
            .with_rule(AUTH_CONF, "status", vec![allow("b")])
            .unwrap();
        let writer = RecordingWriter::default();
        let rule = present_rule("status", allow("a"));

        let outcome = reconciler(&store, &writer).reconcile(&rule).unwrap();

        match outcome {
            ReconcileOutcome::Changed { description } => {
                assert!(description.starts_with("value changed ["));
                assert!(description.contains(&allow("a").to_string()));
                assert!(description.contains(&allow("b").to_string()));
            }
            other => panic!("expected Changed, got {:?}", other),
        }
        assert_eq!(store.read(AUTH_CONF, "status").unwrap(), Some(vec![allow("a")]));
    }

    #[test]
    fn test_reconcile_absent_removes_then_is_noop() {
        let store = InMemoryRuleStore::new()
            .with_rule(AUTH_CONF, "old", vec![allow("a")])
            .unwrap();
        let writer = RecordingWriter::default();
        let params = RuleParams::new("old")
            .with_path(AUTH_CONF)
            .with_ensure(Ensure::Absent);
        let rule = define_rule(params, &PosixPathPolicy).unwrap();
        let reconciler = reconciler(&store, &writer);

        assert_eq!(reconciler.reconcile(&rule).unwrap(), ReconcileOutcome::Removed);
        assert!(store.is_empty().unwrap());
        assert_eq!(
            reconciler.reconcile(&rule).unwrap(),
            ReconcileOutcome::AlreadyAbsent
        );

        let records = writer.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| &r.run_id == reconciler.run_id()));
    }

    /// A failing change writer aborts the reconciliation.
    #[test]
    fn test_reconcile_propagates_audit_failure() {
        let store = InMemoryRuleStore::new();
        let reconciler = Reconciler::new(Box::new(store), Box::new(FailingWriter));
        let rule = present_rule("status", allow("a"));

        assert!(matches!(
            reconciler.reconcile(&rule),
            Err(RuleError::AuditWriteFailed { .. })
        ));
    }

    /// A poisoned store reports errors instead of looking empty.
    #[test]
    fn test_poisoned_store_surfaces_errors() {
        let store = InMemoryRuleStore::new()
            .with_rule("/a", "r", vec![allow("a")])
            .unwrap();
        poison(&store);

        assert!(matches!(store.is_empty(), Err(RuleError::StoreError { .. })));
        assert!(matches!(store.len(), Err(RuleError::StoreError { .. })));
        assert!(matches!(
            store.read("/a", "r"),
            Err(RuleError::StoreError { .. })
        ));
        match store.clone().with_rule("/b", "r", vec![allow("b")]) {
            Err(RuleError::StoreError { reason }) => {
                assert!(reason.contains("rule store lock poisoned"), "got: {reason}");
            }
            other => panic!("expected StoreError, got {:?}", other),
        }
    }

    /// A poisoned store aborts reconciliation before anything is recorded.
    #[test]
    fn test_reconcile_on_poisoned_store_fails() {
        let store = InMemoryRuleStore::new();
        let writer = RecordingWriter::default();
        poison(&store);

        let result = reconciler(&store, &writer).reconcile(&present_rule("status", allow("a")));

        assert!(matches!(result, Err(RuleError::StoreError { .. })));
        assert!(writer.records().is_empty());
    }

    // ── 4. manifests ──────────────────────────────────────────────────────────

    #[test]
    fn test_manifest_defines_all_rules() {
        let toml = r#"
            [[rules]]
            name = "status"
            path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
            value = { allow = { certname = "admin.example.com" } }

            [[rules]]
            name = "catalog"
            path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
            value = [
                { allow = [{ certname = "a" }, { extensions = { pp_role = "db" } }] },
                { deny = { certname = "b" } },
            ]

            [[rules]]
            name = "retired"
            path = "/etc/puppetlabs/puppetserver/conf.d/auth.conf"
            ensure = "absent"
        "#;

        let manifest = RuleManifest::from_toml_str(toml).unwrap();
        let rules = manifest.define_all(&PosixPathPolicy).unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].raw_values(), vec![json!({ "allow": { "certname": "admin.example.com" } })]);
        assert_eq!(rules[1].value().len(), 2);
        assert_eq!(rules[2].ensure(), Ensure::Absent);
    }

    #[test]
    fn test_manifest_rejects_invalid_rule() {
        let toml = r#"
            [[rules]]
            name = "broken"
            path = "/etc/auth.conf"
            value = { deny = { unknown = "b" } }
        "#;

        let manifest = RuleManifest::from_toml_str(toml).unwrap();
        assert!(matches!(
            manifest.define_all(&PosixPathPolicy),
            Err(RuleError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_manifest_parse_error() {
        match RuleManifest::from_toml_str("this is not valid toml ][[[") {
            Err(RuleError::ConfigError { reason }) => {
                assert!(
                    reason.contains("failed to parse rule manifest TOML"),
                    "expected parse error message, got: {reason}"
                );
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = RuleManifest::from_file(file.path()).unwrap();
        assert_eq!(manifest.rules.len(), 1);
        assert_eq!(manifest.rules[0].name, "status");

        let rules = manifest.define_all(&PosixPathPolicy).unwrap();
        assert_eq!(
            rules[0].raw_values(),
            vec![json!({ "allow": { "certname": "admin.example.com" } })]
        );
    }

    #[test]
    fn test_manifest_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rules.toml");

        match RuleManifest::from_file(&missing) {
            Err(RuleError::ConfigError { reason }) => {
                assert!(
                    reason.contains("failed to read rule manifest"),
                    "expected read error message, got: {reason}"
                );
                assert!(reason.contains("rules.toml"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
