//! Error types with error codes
//!
//! Error code ranges:
//! - PIPE-000-009: Payload errors
//! - PIPE-010-019: Configuration errors
//! - PIPE-020-029: IO / file input errors
//!
//! The DAG checker itself never fails; every variant here belongs to the
//! transport or CLI boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipeError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum PipeError {
    // ═══════════════════════════════════════════
    // PAYLOAD ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[PIPE-001] Invalid pipeline payload: {details}")]
    InvalidPayload { details: String },

    #[error("[PIPE-002] Pipeline has {count} nodes (limit: {max})")]
    TooManyNodes { count: usize, max: usize },

    #[error("[PIPE-003] Pipeline has {count} edges (limit: {max})")]
    TooManyEdges { count: usize, max: usize },

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[PIPE-010] Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("[PIPE-011] Invalid allowed origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    // ═══════════════════════════════════════════
    // IO ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[PIPE-020] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PIPE-021] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipeError {
    /// Get the error code (e.g., "PIPE-001")
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "PIPE-001",
            Self::TooManyNodes { .. } => "PIPE-002",
            Self::TooManyEdges { .. } => "PIPE-003",
            Self::ConfigError { .. } => "PIPE-010",
            Self::InvalidOrigin { .. } => "PIPE-011",
            Self::Io(_) => "PIPE-020",
            Self::Json(_) => "PIPE-021",
        }
    }

    /// True for errors caused by the submitted pipeline rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPayload { .. } | Self::TooManyNodes { .. } | Self::TooManyEdges { .. }
        )
    }
}

impl FixSuggestion for PipeError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            PipeError::InvalidPayload { .. } => Some(
                "Send {\"nodes\": [{\"id\": ...}], \"edges\": [{\"source\": ..., \"target\": ...}]}",
            ),
            PipeError::TooManyNodes { .. } => Some("Split the pipeline or raise max_nodes"),
            PipeError::TooManyEdges { .. } => Some("Split the pipeline or raise max_edges"),
            PipeError::ConfigError { .. } => Some("Check config.toml syntax and field names"),
            PipeError::InvalidOrigin { .. } => {
                Some("Use a full origin such as http://localhost:3000")
            }
            PipeError::Io(_) => Some("Check file path and permissions"),
            PipeError::Json(_) => Some("Check the file is valid pipeline JSON"),
        }
    }
}
