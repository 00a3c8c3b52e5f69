//! The minimal-ACL covering model.
//!
//! Variables: `p_{i}` per permit candidate, `d_{j}` per deny candidate and
//! `u2_{pattern}` per ambiguous pattern. Constraints:
//!
//! - exact cover: for each U1 pattern, the permits carrying it sum to 1;
//! - activation: `u2_r ≥ p_i` for each permit exposing `r`, and
//!   `u2_r ≤ Σ p_i` over those permits;
//! - deny coverage: for each U2 pattern, `Σ d_j ≥ u2_r` over denies
//!   carrying `r`.
//!
//! The objective is either the weighted `Σ d + w · Σ p` or a two-phase
//! lexicographic solve (fewest denies, then fewest permits).

use crate::oracle::{IntegerProgramOracle, SolveLimits, Solution};
use crate::program::{Comparison, IntegerProgram, LinearExpr, VarId};
use minacl_core::{Config, ObjectiveStrategy, Result, SolveStatus};
use minacl_policy::CoverageModel;
use std::time::{Duration, Instant};

/// Options for [`solve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOptions {
    /// Objective formulation.
    pub objective: ObjectiveStrategy,
    /// Permit weight for [`ObjectiveStrategy::Weighted`].
    pub permit_weight: f64,
    /// Wall-clock budget shared by every phase.
    pub time_limit: Duration,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SolverOptions {
    fn from(config: &Config) -> Self {
        Self {
            objective: config.objective,
            permit_weight: config.permit_weight,
            time_limit: Duration::from_secs(config.solver_time_limit_secs),
        }
    }
}

/// The program built from a coverage model, with handles to its variables.
#[derive(Clone, Debug)]
pub struct AclModel {
    program: IntegerProgram,
    permit_vars: Vec<VarId>,
    deny_vars: Vec<VarId>,
    activation_vars: Vec<VarId>,
}

impl AclModel {
    /// Builds variables and constraints. The objective is left empty.
    pub fn build(coverage: &CoverageModel) -> Self {
        let mut program = IntegerProgram::new("minimal_acl");

        let permit_vars: Vec<VarId> = (0..coverage.permits.len())
            .map(|i| program.add_binary(format!("p_{i}")))
            .collect();
        let deny_vars: Vec<VarId> = (0..coverage.denies.len())
            .map(|j| program.add_binary(format!("d_{j}")))
            .collect();

        for pattern in &coverage.u1 {
            let covering = coverage
                .exact_cover_of(pattern)
                .iter()
                .map(|&i| permit_vars[i]);
            program.add_constraint(
                format!("exact_cover[{pattern}]"),
                LinearExpr::sum(covering),
                Comparison::Equal,
                1.0,
            );
        }

        let mut activation_vars = Vec::with_capacity(coverage.u2.len());
        for pattern in &coverage.u2 {
            let activated = program.add_binary(format!("u2_{pattern}"));
            activation_vars.push(activated);

            let activators = coverage.activators_of(pattern);
            for &i in activators {
                program.add_constraint(
                    format!("activate[{pattern}][p_{i}]"),
                    LinearExpr::sum([activated]).add(permit_vars[i], -1.0),
                    Comparison::GreaterOrEqual,
                    0.0,
                );
            }
            let exposing = LinearExpr::sum(activators.iter().map(|&i| permit_vars[i]));
            program.add_constraint(
                format!("activation_or[{pattern}]"),
                LinearExpr::sum([activated]).add_scaled(&exposing, -1.0),
                Comparison::LessOrEqual,
                0.0,
            );

            let deniers = LinearExpr::sum(coverage.deniers_of(pattern).iter().map(|&j| deny_vars[j]));
            program.add_constraint(
                format!("deny_cover[{pattern}]"),
                deniers.add(activated, -1.0),
                Comparison::GreaterOrEqual,
                0.0,
            );
        }

        tracing::info!(
            variables = program.variable_count(),
            constraints = program.constraint_count(),
            "built minimal-ACL program"
        );

        Self {
            program,
            permit_vars,
            deny_vars,
            activation_vars,
        }
    }

    /// The underlying program.
    pub fn program(&self) -> &IntegerProgram {
        &self.program
    }

    /// Permit variables, by candidate position.
    pub fn permit_vars(&self) -> &[VarId] {
        &self.permit_vars
    }

    /// Deny variables, by candidate position.
    pub fn deny_vars(&self) -> &[VarId] {
        &self.deny_vars
    }

    /// Activation variables, in U2 order.
    pub fn activation_vars(&self) -> &[VarId] {
        &self.activation_vars
    }

    fn permit_count(&self) -> LinearExpr {
        LinearExpr::sum(self.permit_vars.iter().copied())
    }

    fn deny_count(&self) -> LinearExpr {
        LinearExpr::sum(self.deny_vars.iter().copied())
    }

    fn selected(vars: &[VarId], solution: &Solution) -> Vec<usize> {
        vars.iter()
            .enumerate()
            .filter(|(_, var)| solution.is_selected(**var))
            .map(|(position, _)| position)
            .collect()
    }
}

/// Result of solving the covering model.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    /// Final status. Selections are empty unless optimal.
    pub status: SolveStatus,
    /// Selected permit candidate positions.
    pub permits: Vec<usize>,
    /// Selected deny candidate positions.
    pub denies: Vec<usize>,
    /// Objective of the last phase, when optimal.
    pub objective: Option<f64>,
    /// Number of model variables.
    pub variables: usize,
    /// Number of model constraints (before any phase-2 bound).
    pub constraints: usize,
}

impl SolveOutcome {
    fn failed(status: SolveStatus, model: &AclModel) -> Self {
        Self {
            status,
            permits: Vec::new(),
            denies: Vec::new(),
            objective: None,
            variables: model.program.variable_count(),
            constraints: model.program.constraint_count(),
        }
    }

    fn from_solution(solution: &Solution, model: &AclModel, constraints: usize) -> Self {
        Self {
            status: SolveStatus::Optimal,
            permits: AclModel::selected(&model.permit_vars, solution),
            denies: AclModel::selected(&model.deny_vars, solution),
            objective: solution.objective,
            variables: model.program.variable_count(),
            constraints,
        }
    }
}

/// Builds and solves the covering model for `coverage`.
pub fn solve(
    coverage: &CoverageModel,
    oracle: &dyn IntegerProgramOracle,
    options: &SolverOptions,
) -> Result<SolveOutcome> {
    let model = AclModel::build(coverage);
    let constraints = model.program.constraint_count();
    let started = Instant::now();

    tracing::info!(
        oracle = oracle.name(),
        objective = %options.objective,
        time_limit_secs = options.time_limit.as_secs(),
        "solving minimal-ACL program"
    );

    match options.objective {
        ObjectiveStrategy::Weighted => {
            let mut program = model.program.clone();
            program.set_objective(
                model
                    .deny_count()
                    .add_scaled(&model.permit_count(), options.permit_weight),
            );
            let solution = oracle.solve(&program, &SolveLimits::with_time_limit(options.time_limit))?;
            Ok(finish(&solution, &model, constraints))
        }
        ObjectiveStrategy::Lexicographic => {
            let mut program = model.program.clone();
            program.set_objective(model.deny_count());
            let first = oracle.solve(&program, &SolveLimits::with_time_limit(options.time_limit))?;
            let Some(min_denies) = first.objective.filter(|_| first.status.is_optimal()) else {
                tracing::warn!(status = %first.status, "deny-minimization phase did not finish");
                return Ok(SolveOutcome::failed(first.status, &model));
            };
            let min_denies = min_denies.round();
            tracing::debug!(min_denies, "deny count fixed");

            program.add_constraint(
                "deny_count_bound",
                model.deny_count(),
                Comparison::LessOrEqual,
                min_denies,
            );
            program.set_objective(model.permit_count());
            let remaining = options.time_limit.saturating_sub(started.elapsed());
            let second = oracle.solve(&program, &SolveLimits::with_time_limit(remaining))?;
            Ok(finish(&second, &model, constraints))
        }
    }
}

fn finish(solution: &Solution, model: &AclModel, constraints: usize) -> SolveOutcome {
    if !solution.status.is_optimal() {
        tracing::warn!(status = %solution.status, "solver returned without an optimal solution");
        return SolveOutcome::failed(solution.status, model);
    }
    let outcome = SolveOutcome::from_solution(solution, model, constraints);
    tracing::info!(
        permits = outcome.permits.len(),
        denies = outcome.denies.len(),
        objective = ?outcome.objective,
        "optimal minimal ACL found"
    );
    outcome
}
