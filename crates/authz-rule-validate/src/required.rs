//! Required-parameter guard for rule definitions.

use tracing::warn;

use authz_rule_contracts::{
    error::{MissingParameter, RuleError, RuleResult},
    rule::{Ensure, RuleParams},
};

/// Check that `params` carries every parameter its `ensure` state needs.
///
/// `path` is always required. `value` is required unless the rule is
/// ensured absent. Both checks run before reporting, so a declaration
/// missing both gets one error naming both.
pub fn check_required(params: &RuleParams) -> RuleResult<()> {
    let mut missing = Vec::new();

    if params.path.is_none() {
        missing.push(MissingParameter::Path);
    }
    if params.value.is_none() && params.ensure != Ensure::Absent {
        missing.push(MissingParameter::Value);
    }

    if missing.is_empty() {
        return Ok(());
    }

    warn!(rule = %params.name, missing = ?missing, "rule is missing required parameters");
    Err(RuleError::MissingParameters(missing))
}
