//! Error types for BOM Core
//!
//! Everything here is fatal for a run. Per-layer failures never reach this
//! level; they are folded into the aggregate set as degraded outcomes.

use bom_aggregate::ResolveError;
use bom_query::SnapshotError;
use bom_report::ReportError;
use std::path::PathBuf;

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for [`BomConfig`](crate::BomConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fatal run failure
#[derive(Debug, thiserror::Error)]
pub enum BomError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Boundary could not be resolved
    #[error("boundary resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// Feature snapshot could not be loaded
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Report could not be written
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
