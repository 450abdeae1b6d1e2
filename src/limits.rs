//! Resource limits for pipeline analysis
//!
//! Bounds worst-case latency and memory of a single request:
//! - Node count
//! - Edge count
//! - Request body size

use serde::{Deserialize, Serialize};

use crate::error::{PipeError, Result};

/// Limits applied to every submitted pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum number of entries in `nodes`
    pub max_nodes: usize,

    /// Maximum number of entries in `edges`
    pub max_edges: usize,

    /// Maximum request body size (in bytes)
    pub max_body_bytes: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_nodes: 10_000,
            max_edges: 50_000,
            max_body_bytes: 2 * 1024 * 1024, // 2 MB
        }
    }
}

impl ResourceLimits {
    /// Create limits suitable for testing (more restrictive)
    pub fn testing() -> Self {
        Self {
            max_nodes: 100,
            max_edges: 200,
            max_body_bytes: 64 * 1024, // 64 KB
        }
    }

    /// Create unlimited configuration (use with caution!)
    pub fn unlimited() -> Self {
        Self {
            max_nodes: usize::MAX,
            max_edges: usize::MAX,
            max_body_bytes: usize::MAX,
        }
    }

    /// Check node and edge counts against the limits
    pub fn check(&self, num_nodes: usize, num_edges: usize) -> Result<()> {
        if num_nodes > self.max_nodes {
            return Err(PipeError::TooManyNodes {
                count: num_nodes,
                max: self.max_nodes,
            });
        }
        if num_edges > self.max_edges {
            return Err(PipeError::TooManyEdges {
                count: num_edges,
                max: self.max_edges,
            });
        }
        Ok(())
    }
}
