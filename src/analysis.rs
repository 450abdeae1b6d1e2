//! Pipeline analysis: counts plus DAG verdict, within resource limits

use tracing::{debug, instrument};

use crate::dag::PipelineGraph;
use crate::error::Result;
use crate::limits::ResourceLimits;
use crate::pipeline::{AnalysisReport, Pipeline};

/// Analyze a submitted pipeline.
///
/// `num_nodes` and `num_edges` are the lengths of the submitted lists,
/// duplicates included. Fails only when the pipeline exceeds `limits`.
#[instrument(skip_all, fields(nodes = pipeline.nodes.len(), edges = pipeline.edges.len()))]
pub fn analyze(pipeline: &Pipeline, limits: &ResourceLimits) -> Result<AnalysisReport> {
    let num_nodes = pipeline.nodes.len();
    let num_edges = pipeline.edges.len();
    limits.check(num_nodes, num_edges)?;

    let graph = PipelineGraph::new(pipeline.node_ids(), pipeline.edge_pairs());
    let is_dag = graph.is_dag();
    debug!(
        universe = graph.node_count(),
        declared = graph.declared_count(),
        dangling = graph.dangling_ids().len(),
        is_dag,
        "pipeline analyzed"
    );

    Ok(AnalysisReport {
        num_nodes,
        num_edges,
        is_dag,
    })
}
