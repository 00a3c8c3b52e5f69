//! Turning a solved model into rules.

use minacl_core::{AclRule, Decision, MinimalAcl};
use minacl_policy::CoverageModel;
use minacl_solver::SolveOutcome;

/// Builds the rule table for a solve outcome.
///
/// Permits come first, then denies, each in request order. Any non-optimal
/// outcome yields an empty (header-only) table; no partial rule set is
/// ever produced.
pub fn materialize(coverage: &CoverageModel, outcome: &SolveOutcome) -> MinimalAcl {
    if !outcome.status.is_optimal() {
        return MinimalAcl::empty();
    }

    let permits = outcome
        .permits
        .iter()
        .filter_map(|&i| coverage.permits.get(i))
        .map(|candidate| AclRule::new(&candidate.key, Decision::Permit));
    let denies = outcome
        .denies
        .iter()
        .filter_map(|&j| coverage.denies.get(j))
        .map(|candidate| AclRule::new(&candidate.key, Decision::Deny));

    MinimalAcl {
        rules: permits.chain(denies).collect(),
    }
}
