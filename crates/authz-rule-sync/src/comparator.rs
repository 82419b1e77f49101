//! Containment-based sync decisions for rule values.
//!
//! A rule is in sync when every desired rule set already appears somewhere in
//! the persisted values. Extra persisted rule sets never make a rule out of
//! sync. Persisted values may arrive as nested lists; they are flattened
//! before comparison.

use serde_json::Value;
use tracing::debug;

/// Flatten nested lists into a single sequence, depth first, in order.
pub fn flatten(values: &[Value]) -> Vec<&Value> {
    let mut flat = Vec::with_capacity(values.len());
    push_flat(values, &mut flat);
    flat
}

fn push_flat<'v>(values: &'v [Value], out: &mut Vec<&'v Value>) {
    for value in values {
        match value {
            Value::Array(items) => push_flat(items, out),
            other => out.push(other),
        }
    }
}

/// Return true if every element of `desired` is contained in `current`.
///
/// Duplicates on either side do not matter. An empty `desired` is always in
/// sync.
pub fn in_sync(desired: &[Value], current: &[Value]) -> bool {
    let present = flatten(current);
    let missing = desired
        .iter()
        .filter(|want| !present.contains(want))
        .count();

    debug!(
        desired = desired.len(),
        current = present.len(),
        missing,
        "compared rule values"
    );

    missing == 0
}

/// Render the transition from `current` to the union of `current` and
/// `desired`, for audit display.
///
/// The rendered target is always the de-duplicated union in first-seen
/// order, even when nothing would be written. Use [`in_sync`] to decide
/// whether a write is needed.
pub fn describe_change(current: &[Value], desired: &[Value]) -> String {
    let before = flatten(current);

    let mut merged: Vec<&Value> = Vec::with_capacity(before.len() + desired.len());
    for value in before.iter().copied().chain(flatten(desired)) {
        if !merged.contains(&value) {
            merged.push(value);
        }
    }

    format!("value changed [{}] to [{}]", join(&before), join(&merged))
}

fn join(values: &[&Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
