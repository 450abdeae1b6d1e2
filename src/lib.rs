//! Pipeparse - pipeline graph analysis service
//!
//! Counts the nodes and edges of a submitted pipeline and decides whether it
//! forms a directed acyclic graph.

pub mod analysis;
pub mod config;
pub mod dag;
pub mod error;
pub mod limits;
pub mod pipeline;
pub mod server;

pub use analysis::analyze;
pub use config::ServerConfig;
pub use dag::{is_dag, PipelineGraph};
pub use error::{FixSuggestion, PipeError, Result};
pub use limits::ResourceLimits;
pub use pipeline::{AnalysisReport, Pipeline, PipelineEdge, PipelineNode};
