//! Shape validation for access-control rule sets.
//!
//! Validation walks a candidate value in three layers:
//!
//! 1. **Rule set** — the candidate must be a mapping, otherwise
//!    `TypeMismatch`. Only the `allow` and `deny` keys are inspected; any
//!    other top-level key passes through untouched.
//! 2. **Direction** — a mapping is checked as one match entry, a list has
//!    each of its mapping elements checked. Non-mapping list elements are
//!    skipped. Any other shape is kept as `DirectionRules::Unchecked`.
//! 3. **Match entry** — keys outside `certname` / `extensions` fail with
//!    `UnknownKey`; then exactly one key must remain, otherwise
//!    `MultipleOrMissingKey`.
//!
//! The first failure aborts; nothing is retained from a failed run.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use authz_rule_contracts::{
    error::{RuleError, RuleResult},
    rule::RuleParams,
    value::{
        shape_name, AccessControlRuleSet, Direction, DirectionRules, MatchEntry, OneOrMany,
        CERTNAME_KEY, MATCH_KEYS,
    },
};

/// Validate one candidate rule set and return its typed view.
///
/// The returned `AccessControlRuleSet` keeps `candidate` verbatim as its raw
/// value.
pub fn validate(candidate: &Value) -> RuleResult<AccessControlRuleSet> {
    let Some(map) = candidate.as_object() else {
        let found = shape_name(candidate);
        warn!(found, "rule value is not a mapping");
        return Err(RuleError::TypeMismatch { found });
    };

    let mut skipped = 0;
    let allow = validate_direction(map, Direction::Allow, &mut skipped)?;
    let deny = validate_direction(map, Direction::Deny, &mut skipped)?;

    Ok(AccessControlRuleSet::new(
        candidate.clone(),
        allow,
        deny,
        skipped,
    ))
}

/// Validate every supplied rule set, stopping at the first failure.
pub fn validate_all(values: &OneOrMany<Value>) -> RuleResult<Vec<AccessControlRuleSet>> {
    debug!(count = values.len(), "validating rule sets");
    values.iter().map(validate).collect()
}

/// Validate every value carried by `params`, if any.
pub fn validate_params(params: &RuleParams) -> RuleResult<Vec<AccessControlRuleSet>> {
    match &params.value {
        Some(values) => validate_all(values),
        None => Ok(Vec::new()),
    }
}

fn validate_direction(
    map: &Map<String, Value>,
    direction: Direction,
    skipped: &mut usize,
) -> RuleResult<Option<DirectionRules>> {
    let Some(rules) = map.get(direction.key()) else {
        return Ok(None);
    };

    let view = match rules {
        Value::Object(entry) => {
            DirectionRules::Entries(OneOrMany::Single(validate_entry(entry, direction)?))
        }

        Value::Array(items) => {
            // Non-mapping elements are tolerated and never inspected.
            let mappings: Vec<&Map<String, Value>> =
                items.iter().filter_map(Value::as_object).collect();
            let ignored = items.len() - mappings.len();
            if ignored > 0 {
                debug!(%direction, ignored, "skipping non-mapping list elements");
                *skipped += ignored;
            }

            let entries = mappings
                .into_iter()
                .map(|entry| validate_entry(entry, direction))
                .collect::<RuleResult<Vec<_>>>()?;
            DirectionRules::Entries(OneOrMany::Many(entries))
        }

        other => {
            debug!(
                %direction,
                shape = shape_name(other),
                "direction value is neither a mapping nor a list; left unchecked"
            );
            DirectionRules::Unchecked(other.clone())
        }
    };

    Ok(Some(view))
}

fn validate_entry(entry: &Map<String, Value>, direction: Direction) -> RuleResult<MatchEntry> {
    let unknown: Vec<String> = entry
        .keys()
        .filter(|key| !MATCH_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        warn!(%direction, keys = ?unknown, "match entry has unknown keys");
        return Err(RuleError::UnknownKey {
            direction,
            keys: unknown,
        });
    }

    let mut keys = entry.iter();
    match (keys.next(), keys.next()) {
        (Some((key, value)), None) if key == CERTNAME_KEY => {
            Ok(MatchEntry::Certname(value.clone()))
        }
        (Some((_, value)), None) => Ok(MatchEntry::Extensions(value.clone())),
        _ => {
            warn!(%direction, keys = entry.len(), "match entry must have exactly one key");
            Err(RuleError::MultipleOrMissingKey { direction })
        }
    }
}
