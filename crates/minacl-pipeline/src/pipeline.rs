//! Stage orchestration.
//!
//! ```text
//! RelationGraph ──enumerate──▶ AccessPatterns ──classify(Policy)──▶ Classification
//!      ──CoverageModel::build──▶ CoverageModel ──solve(oracle)──▶ SolveOutcome
//!      ──materialize──▶ MinimalAcl
//! ```
//!
//! Every stage takes the previous stage's output by value or shared
//! reference; nothing is mutated after loading.

use crate::materialize::materialize;
use minacl_core::{AccessPatterns, Config, Error, MinimalAcl, Result, SolveStatus, Warning};
use minacl_graph::{
    EnumerationOptions, GraphStats, RelationGraph, enumerate_parallel, enumerate_patterns,
};
use minacl_policy::{CoverageModel, Policy, classify};
use minacl_solver::{BranchAndBound, IntegerProgramOracle, SolveOutcome, SolverOptions, solve};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stage name attached to solver status errors.
const OPTIMIZATION_STAGE: &str = "minimal-ACL optimization";

/// Counters gathered along the run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Size of the input graph.
    pub graph: GraphStats,
    /// (source, target) pairs with at least one pattern.
    pub requests: usize,
    /// Requests the policy authorizes.
    pub authorized: usize,
    /// Requests the policy does not authorize.
    pub unauthorized: usize,
    /// Unambiguous patterns.
    pub u1: usize,
    /// Ambiguous patterns.
    pub u2: usize,
    /// Model variables.
    pub variables: usize,
    /// Model constraints.
    pub constraints: usize,
    /// Final objective value, when optimal.
    pub objective: Option<f64>,
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The derived rules (empty unless the solve was optimal).
    pub acl: MinimalAcl,
    /// Solver status.
    pub status: SolveStatus,
    /// Run counters.
    pub stats: RunStats,
    /// Non-fatal findings.
    pub warnings: Vec<Warning>,
    time_limit_secs: u64,
}

impl RunReport {
    /// Returns the status error for a non-optimal solve.
    pub fn check_status(&self) -> Result<()> {
        match Error::from_status(self.status, OPTIMIZATION_STAGE, self.time_limit_secs) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The minimal-ACL pipeline.
pub struct Pipeline {
    config: Config,
    oracle: Arc<dyn IntegerProgramOracle>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("oracle", &self.oracle.name())
            .finish()
    }
}

impl Pipeline {
    /// Creates a pipeline using the bundled branch-and-bound oracle.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            oracle: Arc::new(BranchAndBound::new()),
        })
    }

    /// Replaces the integer-program oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn IntegerProgramOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage on the calling thread.
    pub fn run(&self, graph: &RelationGraph, policy: &Policy) -> Result<RunReport> {
        let stats = self.check_graph(graph)?;
        let patterns = enumerate_patterns(graph, EnumerationOptions::from(&self.config));
        let (coverage, warnings, stats) = self.prepare(patterns, policy, stats)?;
        let outcome = solve(&coverage, self.oracle.as_ref(), &SolverOptions::from(&self.config))?;
        Ok(self.report(&coverage, outcome, warnings, stats))
    }

    /// Runs the pipeline with parallel enumeration and a blocking-pool solve.
    pub async fn run_parallel(&self, graph: Arc<RelationGraph>, policy: &Policy) -> Result<RunReport> {
        let stats = self.check_graph(&graph)?;
        let patterns = enumerate_parallel(
            graph,
            EnumerationOptions::from(&self.config),
            self.config.effective_workers(),
        )
        .await?;
        let (coverage, warnings, stats) = self.prepare(patterns, policy, stats)?;

        let oracle = Arc::clone(&self.oracle);
        let options = SolverOptions::from(&self.config);
        let (coverage, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = solve(&coverage, oracle.as_ref(), &options);
            (coverage, outcome)
        })
        .await
        .map_err(|e| Error::worker(format!("solver task failed: {e}")))?;

        Ok(self.report(&coverage, outcome?, warnings, stats))
    }

    /// Loads a graph CSV and a policy file, then runs [`Pipeline::run_parallel`].
    pub async fn run_paths(&self, graph: &Path, policy: &Path) -> Result<RunReport> {
        let (graph, policy) = load_inputs(graph.to_path_buf(), policy.to_path_buf()).await?;
        self.run_parallel(Arc::new(graph), &policy).await
    }

    fn check_graph(&self, graph: &RelationGraph) -> Result<RunStats> {
        if graph.is_empty() {
            return Err(Error::empty_graph("the graph has no edges"));
        }
        Ok(RunStats {
            graph: graph.stats(),
            ..RunStats::default()
        })
    }

    fn prepare(
        &self,
        patterns: AccessPatterns,
        policy: &Policy,
        mut stats: RunStats,
    ) -> Result<(CoverageModel, Vec<Warning>, RunStats)> {
        if patterns.is_empty() {
            return Err(Error::empty_graph(format!(
                "no (source, target) pair is connected within {} hop(s)",
                self.config.max_hop_length
            )));
        }
        stats.requests = patterns.len();

        let classification = classify(patterns, policy);
        stats.authorized = classification.authorized.len();
        stats.unauthorized = classification.unauthorized.len();

        let coverage = CoverageModel::build(&classification);
        stats.u1 = coverage.u1.len();
        stats.u2 = coverage.u2.len();
        Ok((coverage, classification.warnings, stats))
    }

    fn report(
        &self,
        coverage: &CoverageModel,
        outcome: SolveOutcome,
        warnings: Vec<Warning>,
        mut stats: RunStats,
    ) -> RunReport {
        stats.variables = outcome.variables;
        stats.constraints = outcome.constraints;
        stats.objective = outcome.objective;

        let acl = materialize(coverage, &outcome);
        if outcome.status.is_optimal() {
            tracing::info!(
                permits = acl.permit_count(),
                denies = acl.deny_count(),
                "derived minimal ACL"
            );
        } else {
            tracing::error!(
                status = %outcome.status,
                "no minimal ACL derived; output will contain only the header"
            );
        }

        RunReport {
            acl,
            status: outcome.status,
            stats,
            warnings,
            time_limit_secs: self.config.solver_time_limit_secs,
        }
    }
}

/// Reads the graph CSV and the policy file on the blocking pool.
async fn load_inputs(graph: PathBuf, policy: PathBuf) -> Result<(RelationGraph, Policy)> {
    tokio::task::spawn_blocking(move || {
        let graph = RelationGraph::from_csv_path(&graph)?;
        let policy = Policy::from_path(&policy)?;
        Ok::<_, Error>((graph, policy))
    })
    .await
    .map_err(|e| Error::worker(format!("input loading task failed: {e}")))?
}
