//! Turning caller-supplied parameters into a validated `Rule`.

use tracing::debug;

use authz_rule_contracts::{
    error::{MissingParameter, RuleError, RuleResult},
    rule::{Rule, RuleParams},
};
use authz_rule_validate::{check_required, validate_params};

use crate::traits::PathPolicy;

/// Validate `params` and build the immutable `Rule` they describe.
///
/// Checks run in this order, and the first failure aborts:
///
/// 1. the path, if supplied, against `policy`
/// 2. every supplied rule set, via the validator
/// 3. the required-parameter guard
pub fn define_rule(params: RuleParams, policy: &dyn PathPolicy) -> RuleResult<Rule> {
    debug!(rule = %params.name, ensure = ?params.ensure, "defining rule");

    if let Some(path) = &params.path {
        policy.check(path)?;
    }
    let value = validate_params(&params)?;
    check_required(&params)?;

    let RuleParams {
        name, path, ensure, ..
    } = params;
    let path = path.ok_or(RuleError::MissingParameters(vec![MissingParameter::Path]))?;

    Ok(Rule::from_validated_parts(name, path, ensure, value))
}
