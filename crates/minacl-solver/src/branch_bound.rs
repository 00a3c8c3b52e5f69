//! Exact depth-first branch-and-bound for 0/1 integer programs.
//!
//! The search keeps a partial assignment and, at every node:
//!
//! 1. propagates each touched constraint using activity bounds (the least
//!    and greatest value its left-hand side can still reach), fixing every
//!    variable whose other value would make the constraint unsatisfiable;
//! 2. prunes against the incumbent with a lower bound made of the fixed
//!    cost plus one cheapest variable from each of a set of pairwise
//!    disjoint, still-unsatisfied `≥` rows;
//! 3. branches on a variable of the most constrained unsatisfied `≥` row,
//!    trying `1` first, or otherwise on the first free variable at its
//!    cheaper value.
//!
//! Exploring the whole tree proves optimality or infeasibility. If the
//! deadline passes first, the result is [`SolveStatus::TimedOut`] and the
//! incumbent is discarded.

use crate::oracle::{IntegerProgramOracle, SolveLimits, Solution};
use crate::program::{Comparison, IntegerProgram};
use minacl_core::{Result, SolveStatus};
use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

/// Numerical tolerance for constraint and bound comparisons.
const EPS: f64 = 1e-9;

/// Bundled exact solver backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound;

impl BranchAndBound {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl IntegerProgramOracle for BranchAndBound {
    fn name(&self) -> &str {
        "branch-and-bound"
    }

    fn solve(&self, program: &IntegerProgram, limits: &SolveLimits) -> Result<Solution> {
        program.validate()?;
        let started = Instant::now();
        // A budget past the clock's range means no deadline at all.
        let deadline = started.checked_add(limits.time_limit);

        let mut search = Search::new(program, deadline);
        let status = search.run();
        tracing::debug!(
            program = program.name(),
            %status,
            nodes = search.nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "branch-and-bound finished"
        );

        match (status, search.best) {
            (SolveStatus::Optimal, Some((objective, assignment))) => {
                let values = assignment
                    .into_iter()
                    .map(|v| if v { 1.0 } else { 0.0 })
                    .collect();
                Ok(Solution::optimal(values, objective))
            }
            (SolveStatus::Optimal, None) => Ok(Solution::without_values(SolveStatus::Infeasible)),
            (status, _) => Ok(Solution::without_values(status)),
        }
    }
}

// ============================================================================
// Search state
// ============================================================================

/// A constraint with merged, non-zero coefficients.
struct Row {
    terms: Vec<(usize, f64)>,
    comparison: Comparison,
    rhs: f64,
}

impl Row {
    fn has_upper(&self) -> bool {
        matches!(self.comparison, Comparison::Equal | Comparison::LessOrEqual)
    }

    fn has_lower(&self) -> bool {
        matches!(self.comparison, Comparison::Equal | Comparison::GreaterOrEqual)
    }
}

/// Reachable range of a row's left-hand side under the current assignment.
struct Activity {
    fixed: f64,
    min_free: f64,
    max_free: f64,
}

impl Activity {
    fn min(&self) -> f64 {
        self.fixed + self.min_free
    }

    fn max(&self) -> f64 {
        self.fixed + self.max_free
    }
}

/// One branching decision on the DFS stack.
struct Frame {
    var: usize,
    mark: usize,
    alternative: Option<bool>,
}

struct Search {
    rows: Vec<Row>,
    var_rows: Vec<Vec<usize>>,
    costs: Vec<f64>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    stamp: Vec<u64>,
    generation: u64,
    deadline: Option<Instant>,
    best: Option<(f64, Vec<bool>)>,
    nodes: u64,
}

impl Search {
    fn new(program: &IntegerProgram, deadline: Option<Instant>) -> Self {
        let n = program.variable_count();

        let mut costs = vec![0.0; n];
        for &(var, coefficient) in program.objective().terms() {
            costs[var.index()] += coefficient;
        }

        let mut rows = Vec::with_capacity(program.constraint_count());
        let mut var_rows = vec![Vec::new(); n];
        for constraint in program.constraints() {
            let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
            for &(var, coefficient) in constraint.expr.terms() {
                *merged.entry(var.index()).or_insert(0.0) += coefficient;
            }
            let terms: Vec<(usize, f64)> = merged
                .into_iter()
                .filter(|(_, c)| c.abs() > EPS)
                .collect();
            for &(var, _) in &terms {
                var_rows[var].push(rows.len());
            }
            rows.push(Row {
                terms,
                comparison: constraint.comparison,
                rhs: constraint.rhs,
            });
        }

        let row_count = rows.len();
        Self {
            rows,
            var_rows,
            costs,
            values: vec![None; n],
            trail: Vec::with_capacity(n),
            queue: VecDeque::new(),
            queued: vec![false; row_count],
            stamp: vec![0; n],
            generation: 0,
            deadline,
            best: None,
            nodes: 0,
        }
    }

    /// Runs the search to completion or to the deadline.
    ///
    /// Returns `Optimal` when the tree was exhausted (the caller turns a
    /// missing incumbent into `Infeasible`).
    fn run(&mut self) -> SolveStatus {
        for row in 0..self.rows.len() {
            self.enqueue(row);
        }
        if !self.propagate() {
            return SolveStatus::Infeasible;
        }

        let mut stack: Vec<Frame> = Vec::new();
        loop {
            self.nodes += 1;
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return SolveStatus::TimedOut;
            }

            let mut descended = false;
            let pruned = self
                .best
                .as_ref()
                .map(|(objective, _)| *objective)
                .is_some_and(|incumbent| self.lower_bound() >= incumbent - EPS);

            if !pruned {
                match self.choose_branch() {
                    None => self.record_incumbent(),
                    Some((var, first)) => {
                        stack.push(Frame {
                            var,
                            mark: self.trail.len(),
                            alternative: Some(!first),
                        });
                        descended = self.assign_and_propagate(var, first);
                    }
                }
            }

            if descended {
                continue;
            }

            // Backtrack to the deepest frame with an untried value.
            loop {
                let Some(frame) = stack.last_mut() else {
                    return SolveStatus::Optimal;
                };
                self.undo_to(frame.mark);
                match frame.alternative.take() {
                    Some(value) => {
                        let var = frame.var;
                        if self.assign_and_propagate(var, value) {
                            break;
                        }
                    }
                    None => {
                        stack.pop();
                    }
                }
            }
        }
    }

    fn record_incumbent(&mut self) {
        let assignment: Vec<bool> = self.values.iter().map(|v| v.unwrap_or(false)).collect();
        let objective: f64 = assignment
            .iter()
            .zip(&self.costs)
            .filter(|(v, _)| **v)
            .map(|(_, c)| c)
            .sum();
        let improves = self
            .best
            .as_ref()
            .is_none_or(|(incumbent, _)| objective < incumbent - EPS);
        if improves {
            tracing::trace!(objective, nodes = self.nodes, "new incumbent");
            self.best = Some((objective, assignment));
        }
    }

    // ------------------------------------------------------------------------
    // Assignment and propagation
    // ------------------------------------------------------------------------

    fn enqueue(&mut self, row: usize) {
        if !self.queued[row] {
            self.queued[row] = true;
            self.queue.push_back(row);
        }
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
        for i in 0..self.var_rows[var].len() {
            let row = self.var_rows[var][i];
            self.enqueue(row);
        }
    }

    fn assign_and_propagate(&mut self, var: usize, value: bool) -> bool {
        self.assign(var, value);
        self.propagate()
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.values[var] = None;
            }
        }
    }

    fn activity(&self, row: &Row) -> Activity {
        let mut activity = Activity {
            fixed: 0.0,
            min_free: 0.0,
            max_free: 0.0,
        };
        for &(var, a) in &row.terms {
            match self.values[var] {
                Some(true) => activity.fixed += a,
                Some(false) => {}
                None if a < 0.0 => activity.min_free += a,
                None => activity.max_free += a,
            }
        }
        activity
    }

    /// Propagates queued rows to a fixpoint. Returns `false` on conflict.
    fn propagate(&mut self) -> bool {
        let mut implied: Vec<(usize, bool)> = Vec::new();
        while let Some(r) = self.queue.pop_front() {
            self.queued[r] = false;
            implied.clear();

            let row = &self.rows[r];
            let activity = self.activity(row);
            let (min, max) = (activity.min(), activity.max());

            if (row.has_upper() && min > row.rhs + EPS) || (row.has_lower() && max < row.rhs - EPS)
            {
                self.clear_queue();
                return false;
            }

            for &(var, a) in &row.terms {
                if self.values[var].is_some() {
                    continue;
                }
                if row.has_upper() {
                    if a > 0.0 && min + a > row.rhs + EPS {
                        implied.push((var, false));
                    } else if a < 0.0 && min - a > row.rhs + EPS {
                        implied.push((var, true));
                    }
                }
                if row.has_lower() {
                    if a > 0.0 && max - a < row.rhs - EPS {
                        implied.push((var, true));
                    } else if a < 0.0 && max + a < row.rhs - EPS {
                        implied.push((var, false));
                    }
                }
            }

            for i in 0..implied.len() {
                let (var, value) = implied[i];
                match self.values[var] {
                    Some(current) if current != value => {
                        self.clear_queue();
                        return false;
                    }
                    Some(_) => {}
                    None => self.assign(var, value),
                }
            }
        }
        true
    }

    fn clear_queue(&mut self) {
        while let Some(r) = self.queue.pop_front() {
            self.queued[r] = false;
        }
    }

    // ------------------------------------------------------------------------
    // Bounding and branching
    // ------------------------------------------------------------------------

    /// Amount a `≥` side still needs from free positive terms, if any.
    fn shortfall(&self, row: &Row) -> Option<f64> {
        if !row.has_lower() {
            return None;
        }
        let need = row.rhs - self.activity(row).fixed;
        (need > EPS).then_some(need)
    }

    fn lower_bound(&mut self) -> f64 {
        let mut bound: f64 = self
            .values
            .iter()
            .zip(&self.costs)
            .map(|(value, &c)| match value {
                Some(true) => c,
                Some(false) => 0.0,
                None => c.min(0.0),
            })
            .sum();

        let mut demands: Vec<(f64, usize)> = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            if self.shortfall(row).is_none() {
                continue;
            }
            let cheapest = row
                .terms
                .iter()
                .filter(|&&(var, a)| a > 0.0 && self.values[var].is_none())
                .map(|&(var, _)| self.costs[var])
                .fold(f64::INFINITY, f64::min);
            if cheapest.is_finite() && cheapest > EPS {
                demands.push((cheapest, r));
            }
        }
        demands.sort_by(|l, r| r.0.total_cmp(&l.0));

        self.generation += 1;
        let generation = self.generation;
        for (cost, r) in demands {
            let free_positive = self.rows[r]
                .terms
                .iter()
                .filter(|&&(var, a)| a > 0.0 && self.values[var].is_none());
            if free_positive.clone().any(|&(var, _)| self.stamp[var] == generation) {
                continue;
            }
            let vars: Vec<usize> = free_positive.map(|&(var, _)| var).collect();
            for var in vars {
                self.stamp[var] = generation;
            }
            bound += cost;
        }
        bound
    }

    fn choose_branch(&self) -> Option<(usize, bool)> {
        let mut tightest: Option<(usize, usize)> = None;
        for (r, row) in self.rows.iter().enumerate() {
            if self.shortfall(row).is_none() {
                continue;
            }
            let free = row
                .terms
                .iter()
                .filter(|&&(var, a)| a > 0.0 && self.values[var].is_none())
                .count();
            if free > 0 && tightest.is_none_or(|(best, _)| free < best) {
                tightest = Some((free, r));
            }
        }

        if let Some((_, r)) = tightest {
            return self.rows[r]
                .terms
                .iter()
                .filter(|&&(var, a)| a > 0.0 && self.values[var].is_none())
                .min_by(|a, b| self.costs[a.0].total_cmp(&self.costs[b.0]))
                .map(|&(var, _)| (var, true));
        }

        self.values
            .iter()
            .position(Option::is_none)
            .map(|var| (var, self.costs[var] < 0.0))
    }
}

// ============================================================================
// Tests
// ============================================================================
