//! DAG Module - acyclicity checking for submitted pipelines
//!
//! - `graph`: PipelineGraph built from node IDs and edges, Kahn's algorithm
//!
//! The checker is a pure function: it never fails and has no side effects.

mod graph;

pub use graph::PipelineGraph;

/// Decide whether the pipeline described by `node_ids` and `edges` is a DAG.
///
/// The verdict covers every ID mentioned anywhere, declared or referenced only
/// by an edge. An empty node list is acyclic whatever the edges say.
pub fn is_dag<'a, N, E>(node_ids: N, edges: E) -> bool
where
    N: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    PipelineGraph::new(node_ids, edges).is_dag()
}
