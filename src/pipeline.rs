//! Pipeline payload structures
//!
//! Nodes and edges arrive from a visual pipeline editor and carry many
//! attributes (position, type, data, handles...). Only `id` on nodes and
//! `source`/`target` on edges matter here; everything else is dropped by serde.

use serde::{Deserialize, Serialize};

/// Pipeline submitted for analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub nodes: Vec<PipelineNode>,
    pub edges: Vec<PipelineEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
}

/// Directed edge `source -> target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineEdge {
    pub source: String,
    pub target: String,
}

impl Pipeline {
    /// Node identifiers in submission order (duplicates kept)
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Edges as `(source, target)` pairs in submission order
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
    }
}

impl PipelineNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl PipelineEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Result of analyzing one pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
}
