//! # authz-rule-sync
//!
//! Decides whether a rule's persisted values already satisfy its desired
//! values, and renders the change for audit display.
//!
//! Sync is containment, not equality: the persisted file may hold more rule
//! sets than the declaration names and still be in sync.

pub mod comparator;

pub use comparator::{describe_change, flatten, in_sync};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::{describe_change, flatten, in_sync};

    fn allow(certname: &str) -> Value {
        json!({ "allow": { "certname": certname } })
    }

    // ── 1. containment ────────────────────────────────────────────────────────

    /// Extra persisted entries do not break sync.
    #[test]
    fn test_superset_is_in_sync() {
        let desired = vec![allow("a")];
        let current = vec![allow("a"), allow("b")];
        assert!(in_sync(&desired, &current));
    }

    #[test]
    fn test_missing_entry_is_out_of_sync() {
        let desired = vec![allow("a"), allow("c")];
        let current = vec![allow("a"), allow("b")];
        assert!(!in_sync(&desired, &current));
    }

    #[test]
    fn test_empty_desired_is_in_sync() {
        assert!(in_sync(&[], &[]));
        assert!(in_sync(&[], &[allow("a")]));
    }

    #[test]
    fn test_empty_current_is_out_of_sync() {
        assert!(!in_sync(&[allow("a")], &[]));
    }

    /// Duplicates in desired are irrelevant.
    #[test]
    fn test_duplicate_desired_entries() {
        assert!(in_sync(&[allow("a"), allow("a")], &[allow("a")]));
    }

    /// Nested persisted lists are flattened before comparison.
    #[test]
    fn test_nested_current_is_flattened() {
        let current = vec![json!([allow("a"), [allow("b")]])];
        assert_eq!(flatten(&current), vec![&allow("a"), &allow("b")]);
        assert!(in_sync(&[allow("b")], &current));
    }

    // ── 2. change description ─────────────────────────────────────────────────

    /// A contained desired value adds nothing to the rendered target.
    #[test]
    fn test_describe_change_when_contained() {
        let current = vec![allow("a"), allow("b")];
        let text = describe_change(&current, &[allow("a")]);

        let expected_list = format!("{}, {}", allow("a"), allow("b"));
        assert_eq!(
            text,
            format!("value changed [{expected_list}] to [{expected_list}]")
        );
    }

    /// New desired values are appended after the current ones, once each.
    #[test]
    fn test_describe_change_appends_new_values() {
        let current = vec![allow("a")];
        let desired = vec![allow("c"), allow("a"), allow("c")];
        let text = describe_change(&current, &desired);

        assert_eq!(
            text,
            format!(
                "value changed [{}] to [{}, {}]",
                allow("a"),
                allow("a"),
                allow("c")
            )
        );
    }

    #[test]
    fn test_describe_change_from_nothing() {
        let text = describe_change(&[], &[allow("a")]);
        assert_eq!(text, format!("value changed [] to [{}]", allow("a")));
    }
}
