//! Error types for BOM Query

use crate::layer::LayerId;
use bom_model::{DegradedReason, ModelError};

/// Result type for feature queries
pub type QueryResult<T> = Result<T, QueryError>;

/// Feature query failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// Layer id is not known to the service
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),

    /// Backend failed (network, auth, server error)
    #[error("backend error: {message}")]
    Backend {
        /// Backend message
        message: String,
    },

    /// Filter geometry could not be evaluated
    #[error("invalid filter geometry: {0}")]
    InvalidGeometry(#[from] ModelError),

    /// Query is malformed
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl QueryError {
    /// Create backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<QueryError> for DegradedReason {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::LayerNotFound(layer) => Self::LayerNotFound(layer.to_string()),
            QueryError::Backend { message } => Self::Backend(message),
            QueryError::InvalidGeometry(err) => Self::InvalidGeometry(err.to_string()),
            QueryError::InvalidQuery(message) => Self::Backend(message),
        }
    }
}

/// Snapshot loading failure
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file could not be read
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        /// Snapshot path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON is malformed
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
