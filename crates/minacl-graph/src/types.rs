//! Core graph types for the system relationship graph.
//!
//! The graph is a static labeled multigraph: several edges may connect the
//! same pair of nodes with different labels. It is built once from
//! relationship records and read-only afterwards.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Edge struct
// ============================================================================

/// One relationship record: `source --label--> target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Origin node ID.
    pub source: String,
    /// Destination node ID.
    pub target: String,
    /// Relation label.
    pub label: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// GraphStats struct
// ============================================================================

/// Size summary of a loaded graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Distinct nodes.
    pub nodes: usize,
    /// Edges, counting parallel edges separately.
    pub edges: usize,
    /// Nodes with at least one outgoing edge.
    pub sources: usize,
    /// Nodes with at least one incoming edge.
    pub targets: usize,
    /// Distinct relation labels.
    pub labels: usize,
}

// ============================================================================
// RelationGraph struct
// ============================================================================

/// Directed labeled multigraph over string node IDs.
///
/// Wraps a petgraph `DiGraph` (node weight = ID, edge weight = label) with a
/// lookup table from ID to index, and tracks which nodes ever appear as an
/// edge origin or destination.
#[derive(Clone, Debug, Default)]
pub struct RelationGraph {
    graph: DiGraph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
    sources: BTreeSet<String>,
    targets: BTreeSet<String>,
}

impl RelationGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a sequence of edges.
    pub fn from_edges<I: IntoIterator<Item = Edge>>(edges: I) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Adds an edge, creating either endpoint if needed.
    pub fn add_edge(&mut self, edge: Edge) {
        let from = self.ensure_node(&edge.source);
        let to = self.ensure_node(&edge.target);
        self.graph.add_edge(from, to, edge.label);
        self.sources.insert(edge.source);
        self.targets.insert(edge.target);
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Gets the petgraph index for a node ID.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Gets the node ID stored at an index.
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Nodes that appear as an edge origin, in ID order.
    pub fn sources(&self) -> &BTreeSet<String> {
        &self.sources
    }

    /// Nodes that appear as an edge destination, in ID order.
    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// Outgoing `(neighbor, label)` pairs of a node.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &str)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().as_str()))
    }

    /// Returns an iterator over all edges.
    pub fn iter_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| {
            Edge::new(
                self.graph[e.source()].clone(),
                self.graph[e.target()].clone(),
                e.weight().clone(),
            )
        })
    }

    /// Summarizes the graph for progress reporting.
    pub fn stats(&self) -> GraphStats {
        let labels: BTreeSet<&str> = self.graph.edge_weights().map(String::as_str).collect();
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            sources: self.sources.len(),
            targets: self.targets.len(),
            labels: labels.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
