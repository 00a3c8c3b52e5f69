//! Relationship graph infrastructure for minacl.
//!
//! - [`types`]: the labeled multigraph ([`RelationGraph`]) and its edges
//! - [`loader`]: CSV loading with strict three-field records
//! - [`paths`]: bounded relation-pattern enumeration per (source, target)

#![forbid(unsafe_code)]

pub mod loader;
pub mod paths;
pub mod types;

pub use loader::read_edges;
pub use paths::{EnumerationOptions, enumerate_parallel, enumerate_patterns};
pub use types::{Edge, GraphStats, RelationGraph};
