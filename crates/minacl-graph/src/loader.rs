//! Loading the relationship graph from delimited records.
//!
//! Each record is `source,target,label`. The first record is always treated
//! as a header and skipped. A record with any other field count, or with an
//! empty field, aborts the load: no partial graph is ever returned.

use crate::{Edge, RelationGraph};
use minacl_core::{Error, Result};
use std::io::Read;
use std::path::Path;

/// Reads edges from CSV text.
///
/// `input` names the source in error messages.
pub fn read_edges<R: Read>(reader: R, input: &str) -> Result<Vec<Edge>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut edges = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != 3 {
            return Err(Error::parse(
                input,
                line,
                format!(
                    "expected 3 fields (source, target, label), found {}",
                    record.len()
                ),
            ));
        }
        let (source, target, label) = (&record[0], &record[1], &record[2]);

        if let Some(name) = [("source", source), ("target", target), ("label", label)]
            .iter()
            .find(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
        {
            return Err(Error::parse(input, line, format!("empty {name} field")));
        }

        edges.push(Edge::new(source, target, label));
    }

    Ok(edges)
}

impl RelationGraph {
    /// Builds a graph from CSV text.
    pub fn from_reader<R: Read>(reader: R, input: &str) -> Result<Self> {
        let edges = read_edges(reader, input)?;
        let graph = Self::from_edges(edges);
        let stats = graph.stats();
        tracing::info!(
            input,
            nodes = stats.nodes,
            edges = stats.edges,
            sources = stats.sources,
            targets = stats.targets,
            labels = stats.labels,
            "loaded relationship graph"
        );
        Ok(graph)
    }

    /// Builds a graph from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_reader(file, &path.display().to_string())
    }
}
