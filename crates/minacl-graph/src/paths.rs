//! Bounded relation-pattern enumeration.
//!
//! For every (source, target) pair with source ≠ target, collects the set of
//! label sequences of all walks from source to target with 1 to
//! `max_hop_length` edges. Walks may revisit nodes unless
//! [`EnumerationOptions::allow_revisits`] is off, in which case only simple
//! paths are followed.
//!
//! One breadth-first traversal per source serves every target of that
//! source: a pattern is recorded each time the frontier lands on a node
//! other than the source. With revisits allowed, the frontier is keyed on
//! `(node, pattern)` because two walks ending at the same node with the same
//! labels have identical continuations.

use crate::RelationGraph;
use minacl_core::{AccessPatterns, Config, Error, RelationPattern, RequestKey, Result};
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Traversal options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// Longest walk, in edges. Zero yields no patterns.
    pub max_hop_length: usize,
    /// Whether a walk may re-enter a node already on it.
    pub allow_revisits: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            max_hop_length: minacl_core::config::DEFAULT_MAX_HOP_LENGTH,
            allow_revisits: true,
        }
    }
}

impl From<&Config> for EnumerationOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_hop_length: config.max_hop_length,
            allow_revisits: config.allow_revisits,
        }
    }
}

/// One frontier entry.
struct Walk {
    node: NodeIndex,
    pattern: RelationPattern,
    /// Nodes on the walk, tracked only for simple-path traversal.
    visited: Vec<NodeIndex>,
}

/// Enumerates patterns for every pair, sequentially.
pub fn enumerate_patterns(graph: &RelationGraph, options: EnumerationOptions) -> AccessPatterns {
    let sources: Vec<&str> = graph.sources().iter().map(String::as_str).collect();
    let patterns = enumerate_from(graph, &sources, options);
    tracing::info!(
        requests = patterns.len(),
        patterns = patterns.pattern_count(),
        max_hop_length = options.max_hop_length,
        "enumerated relation patterns"
    );
    patterns
}

/// Enumerates patterns for every pair, spreading sources across `workers`
/// blocking tasks.
///
/// Produces the same result as [`enumerate_patterns`].
pub async fn enumerate_parallel(
    graph: Arc<RelationGraph>,
    options: EnumerationOptions,
    workers: usize,
) -> Result<AccessPatterns> {
    let sources: Vec<String> = graph.sources().iter().cloned().collect();
    let workers = workers.max(1).min(sources.len().max(1));
    if workers == 1 {
        return Ok(enumerate_patterns(&graph, options));
    }

    let chunk_size = sources.len().div_ceil(workers);
    let mut tasks = tokio::task::JoinSet::new();
    for chunk in sources.chunks(chunk_size) {
        let graph = Arc::clone(&graph);
        let chunk = chunk.to_vec();
        tasks.spawn_blocking(move || {
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            enumerate_from(&graph, &refs, options)
        });
    }

    let mut merged = AccessPatterns::new();
    while let Some(joined) = tasks.join_next().await {
        let partial = joined.map_err(|e| Error::worker(format!("enumeration task failed: {e}")))?;
        merged.merge(partial);
    }

    tracing::info!(
        requests = merged.len(),
        patterns = merged.pattern_count(),
        max_hop_length = options.max_hop_length,
        workers,
        "enumerated relation patterns"
    );
    Ok(merged)
}

fn enumerate_from(
    graph: &RelationGraph,
    sources: &[&str],
    options: EnumerationOptions,
) -> AccessPatterns {
    let mut patterns = AccessPatterns::new();
    for source in sources {
        if let Some(start) = graph.get_index(source) {
            walk_from(graph, start, options, &mut patterns);
        }
    }
    patterns
}

fn walk_from(
    graph: &RelationGraph,
    start: NodeIndex,
    options: EnumerationOptions,
    out: &mut AccessPatterns,
) {
    let source = graph.node_id(start);
    let mut seen: HashSet<(NodeIndex, RelationPattern)> = HashSet::new();
    let mut queue: VecDeque<Walk> = VecDeque::new();
    queue.push_back(Walk {
        node: start,
        pattern: RelationPattern::default(),
        visited: vec![start],
    });

    while let Some(walk) = queue.pop_front() {
        if walk.node != start && !walk.pattern.is_empty() {
            out.insert(
                RequestKey::new(source, graph.node_id(walk.node)),
                walk.pattern.clone(),
            );
        }

        if walk.pattern.len() >= options.max_hop_length {
            continue;
        }

        for (neighbor, label) in graph.neighbors(walk.node) {
            if !options.allow_revisits && walk.visited.contains(&neighbor) {
                continue;
            }
            let pattern = walk.pattern.extended(label);
            if options.allow_revisits {
                if !seen.insert((neighbor, pattern.clone())) {
                    continue;
                }
                queue.push_back(Walk {
                    node: neighbor,
                    pattern,
                    visited: Vec::new(),
                });
            } else {
                let mut visited = walk.visited.clone();
                visited.push(neighbor);
                queue.push_back(Walk {
                    node: neighbor,
                    pattern,
                    visited,
                });
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
