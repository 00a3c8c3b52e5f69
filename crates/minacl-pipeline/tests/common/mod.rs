//! Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use minacl_core::{Config, RelationPattern, Result, SolveStatus};
use minacl_graph::{Edge, RelationGraph};
use minacl_pipeline::Pipeline;
use minacl_policy::Policy;
use minacl_solver::{IntegerProgram, IntegerProgramOracle, SolveLimits, Solution};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Oracle that never solves anything and always reports one status.
#[derive(Debug)]
pub struct FixedStatusOracle {
    status: SolveStatus,
    calls: AtomicUsize,
}

impl FixedStatusOracle {
    pub fn new(status: SolveStatus) -> Arc<Self> {
        Arc::new(Self {
            status,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IntegerProgramOracle for FixedStatusOracle {
    fn name(&self) -> &str {
        "fixed-status"
    }

    fn solve(&self, _program: &IntegerProgram, _limits: &SolveLimits) -> Result<Solution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Solution::without_values(self.status))
    }
}

/// Input files laid out in a temporary directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Writes `system_graph.csv` with a header row.
    pub fn graph(&self, edges: &[(&str, &str, &str)]) -> PathBuf {
        let mut text = String::from("source,target,label\n");
        for (s, t, l) in edges {
            text.push_str(&format!("{s},{t},{l}\n"));
        }
        self.write("system_graph.csv", &text)
    }

    /// Writes `rebac_policy.txt`, one pattern per line.
    pub fn policy(&self, patterns: &[&[&str]]) -> PathBuf {
        let text: String = patterns
            .iter()
            .map(|p| format!("{}\n", p.join(", ")))
            .collect();
        self.write("rebac_policy.txt", &text)
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, text).expect("write fixture");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn graph(edges: &[(&str, &str, &str)]) -> RelationGraph {
    RelationGraph::from_edges(edges.iter().map(|(s, t, l)| Edge::new(*s, *t, *l)))
}

pub fn policy(patterns: &[&[&str]]) -> Policy {
    Policy::new(
        patterns
            .iter()
            .map(|p| RelationPattern::from_labels(p.iter().copied())),
    )
}

pub fn pipeline() -> Pipeline {
    Pipeline::new(Config::default()).expect("default config is valid")
}

pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open output");
    reader
        .records()
        .map(|r| r.expect("row").iter().map(str::to_string).collect())
        .collect()
}

/// A -owns-> B -member-> C
pub const CHAIN: [(&str, &str, &str); 2] = [("A", "B", "owns"), ("B", "C", "member")];

/// The chain plus A -member-> C and D -member-> C: the pattern `member`
/// is then carried by the authorized (A, C) and the unauthorized (B, C)
/// and (D, C).
pub const AMBIGUOUS: [(&str, &str, &str); 4] = [
    ("A", "B", "owns"),
    ("B", "C", "member"),
    ("A", "C", "member"),
    ("D", "C", "member"),
];
