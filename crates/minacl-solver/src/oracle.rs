//! The integer-program oracle seam.
//!
//! The covering model is solved through [`IntegerProgramOracle`], so any
//! conforming 0/1 solver can replace the bundled branch-and-bound.

use crate::program::{IntegerProgram, VarId};
use minacl_core::{Result, SolveStatus};
use std::time::Duration;

/// Values at or above this are read as "selected".
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Resource limits for one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveLimits {
    /// Wall-clock budget for the call.
    pub time_limit: Duration,
}

impl SolveLimits {
    /// Limits with the given wall-clock budget.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

/// Result of one solve.
///
/// `values` is only populated when `status` is [`SolveStatus::Optimal`].
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Outcome status.
    pub status: SolveStatus,
    /// One value per program variable (empty unless optimal).
    pub values: Vec<f64>,
    /// Objective value at `values` (only when optimal).
    pub objective: Option<f64>,
}

impl Solution {
    /// An optimal solution.
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
        }
    }

    /// A solution carrying only a failure status.
    pub fn without_values(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
        }
    }

    /// Value of a variable, if available.
    pub fn value(&self, var: VarId) -> Option<f64> {
        if !self.status.is_optimal() {
            return None;
        }
        self.values.get(var.index()).copied()
    }

    /// Whether a variable is set, using [`SELECTION_THRESHOLD`].
    ///
    /// Always `false` for non-optimal solutions.
    pub fn is_selected(&self, var: VarId) -> bool {
        self.value(var).is_some_and(|v| v >= SELECTION_THRESHOLD)
    }
}

/// A solver for [`IntegerProgram`]s.
///
/// Implementations must honor `limits.time_limit` by returning
/// [`SolveStatus::TimedOut`] rather than an error, and must not return
/// values for any non-optimal status.
pub trait IntegerProgramOracle: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Minimizes the program's objective subject to its constraints.
    fn solve(&self, program: &IntegerProgram, limits: &SolveLimits) -> Result<Solution>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_threshold() {
        let solution = Solution::optimal(vec![0.0, 0.5, 0.999_999, 0.499_9], 1.0);
        assert!(!solution.is_selected(VarId(0)));
        assert!(solution.is_selected(VarId(1)));
        assert!(solution.is_selected(VarId(2)));
        assert!(!solution.is_selected(VarId(3)));
        assert!(!solution.is_selected(VarId(9)));
    }

    #[test]
    fn test_non_optimal_values_are_ignored() {
        let solution = Solution {
            status: SolveStatus::TimedOut,
            values: vec![1.0],
            objective: Some(1.0),
        };
        assert!(solution.value(VarId(0)).is_none());
        assert!(!solution.is_selected(VarId(0)));
    }

    #[test]
    fn test_without_values() {
        let solution = Solution::without_values(SolveStatus::Infeasible);
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.values.is_empty());
        assert!(solution.objective.is_none());
    }
}
