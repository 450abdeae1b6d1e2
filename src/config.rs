//! Pipeparse Configuration Module
//!
//! Process-wide server configuration, built once at startup and shared
//! read-only afterwards.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (`--bind`, `--allowed-origin`)
//! 2. Environment variables (`PIPEPARSE_BIND`, `PIPEPARSE_ALLOWED_ORIGIN`,
//!    `PIPEPARSE_MAX_NODES`, `PIPEPARSE_MAX_EDGES`, `PIPEPARSE_MAX_BODY_BYTES`)
//! 3. Config file (`--config <path>` or `~/.config/pipeparse/config.toml`)
//! 4. Defaults

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PipeError, Result};
use crate::limits::ResourceLimits;

pub const ENV_BIND: &str = "PIPEPARSE_BIND";
pub const ENV_ALLOWED_ORIGIN: &str = "PIPEPARSE_ALLOWED_ORIGIN";
pub const ENV_MAX_NODES: &str = "PIPEPARSE_MAX_NODES";
pub const ENV_MAX_EDGES: &str = "PIPEPARSE_MAX_EDGES";
pub const ENV_MAX_BODY_BYTES: &str = "PIPEPARSE_MAX_BODY_BYTES";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub limits: ResourceLimits,
}

/// Listener and cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,

    /// The single origin allowed to call the API from a browser
    pub allowed_origin: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/pipeparse/` on Unix, `%APPDATA%/pipeparse/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pipeparse")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. The default location is optional and
    /// yields the default config when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let default = Self::config_path();
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| PipeError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PipeError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with process environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Merge with variables from `lookup`. Empty values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = var(ENV_BIND) {
            self.server.bind = parse_env(ENV_BIND, &bind)?;
        }
        if let Some(origin) = var(ENV_ALLOWED_ORIGIN) {
            self.server.allowed_origin = origin;
        }
        if let Some(max) = var(ENV_MAX_NODES) {
            self.limits.max_nodes = parse_env(ENV_MAX_NODES, &max)?;
        }
        if let Some(max) = var(ENV_MAX_EDGES) {
            self.limits.max_edges = parse_env(ENV_MAX_EDGES, &max)?;
        }
        if let Some(max) = var(ENV_MAX_BODY_BYTES) {
            self.limits.max_body_bytes = parse_env(ENV_MAX_BODY_BYTES, &max)?;
        }

        Ok(self)
    }

    /// Check the config and normalize the allowed origin
    /// (lowercased host, no trailing slash).
    pub fn validate(mut self) -> Result<Self> {
        self.server.allowed_origin = normalize_origin(&self.server.allowed_origin)?;
        Ok(self)
    }

    #[inline]
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| PipeError::ConfigError {
        reason: format!("{key}='{value}': {e}"),
    })
}

/// Reduce an origin string to its canonical `scheme://host[:port]` form
pub fn normalize_origin(origin: &str) -> Result<String> {
    let invalid = |reason: &str| PipeError::InvalidOrigin {
        origin: origin.to_string(),
        reason: reason.to_string(),
    };

    if origin.trim() == "*" {
        return Err(invalid("wildcard origins cannot be combined with credentials"));
    }

    let url = Url::parse(origin.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("an origin has no path, query or fragment"));
    }

    Ok(url.origin().ascii_serialization())
}
