//! Hashing and verification for the change chain.
//!
//! Each event's hash commits to the rule it describes, not just to an opaque
//! blob, so a record cannot be moved onto another rule or file without
//! breaking the chain. Hash input, in order:
//!
//! | field              | encoding                                  |
//! |--------------------|-------------------------------------------|
//! | sequence           | 8-byte little-endian                      |
//! | prev_hash          | 64 ASCII hex chars                        |
//! | run_id             | 16 raw UUID bytes                         |
//! | path               | 8-byte LE length, then UTF-8              |
//! | rule_name          | 8-byte LE length, then UTF-8              |
//! | outcome            | 8-byte LE length, then canonical JSON     |
//! | timestamp          | RFC 3339, nanosecond precision            |

use chrono::SecondsFormat;
use sha2::{Digest, Sha256};

use authz_rule_contracts::{
    error::{RuleError, RuleResult},
    outcome::ChangeRecord,
};

use crate::event::ChangeEvent;

/// Compute the lowercase hex SHA-256 of one change event.
pub fn hash_event(sequence: u64, record: &ChangeRecord, prev_hash: &str) -> RuleResult<String> {
    let outcome = serde_json::to_vec(&record.outcome).map_err(|e| RuleError::AuditWriteFailed {
        reason: format!(
            "failed to encode outcome for rule '{}': {}",
            record.rule_name, e
        ),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(record.run_id.0.as_bytes());
    update_framed(&mut hasher, record.path.as_bytes());
    update_framed(&mut hasher, record.rule_name.as_bytes());
    update_framed(&mut hasher, &outcome);
    hasher.update(
        record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );

    Ok(hex::encode(hasher.finalize()))
}

// Length prefix keeps ("/a", "bc") and ("/ab", "c") apart.
fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Sequence number of the first event whose link or hash does not check out.
///
/// `None` means the whole chain is intact, including the empty chain.
pub fn first_broken_link(events: &[ChangeEvent]) -> Option<u64> {
    let mut expected_prev: &str = ChangeEvent::GENESIS_HASH;

    for (position, event) in (0u64..).zip(events) {
        let hash_ok = matches!(
            hash_event(event.sequence, &event.record, &event.prev_hash),
            Ok(recomputed) if recomputed == event.this_hash
        );
        if event.sequence != position || event.prev_hash != expected_prev || !hash_ok {
            return Some(position);
        }
        expected_prev = event.this_hash.as_str();
    }

    None
}

/// True if every event links to its predecessor and hashes correctly.
pub fn verify_chain(events: &[ChangeEvent]) -> bool {
    first_broken_link(events).is_none()
}
