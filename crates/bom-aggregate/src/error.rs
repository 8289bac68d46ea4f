//! Error types for boundary resolution

use bom_query::QueryError;

/// Map selection could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Boundary layer is not in the active map
    #[error("boundary layer {0} not found in the active map")]
    LayerMissing(String),

    /// Map view could not be read
    #[error("map selection unavailable: {0}")]
    Unavailable(String),
}

/// Fatal boundary resolution failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// No identifier given and none discoverable
    #[error("no boundary identifier given; enter an identifier or select a boundary")]
    BlankIdentifier,

    /// Nothing selected on the map
    #[error("no boundary selected on the map")]
    NothingSelected,

    /// More than one candidate boundary
    #[error("{count} boundaries match {what}; exactly one is required")]
    Ambiguous {
        /// What was being resolved
        what: String,
        /// Candidates found
        count: usize,
    },

    /// No boundary with this identifier
    #[error("no boundary found for {0}")]
    NotFound(String),

    /// Boundary layer query failed
    #[error("boundary query failed: {0}")]
    Backend(#[from] QueryError),

    /// Boundary geometry is missing or not a usable polygon
    #[error("boundary {id} has invalid geometry: {reason}")]
    InvalidGeometry {
        /// Boundary identifier
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// Map selection failed
    #[error(transparent)]
    Selection(#[from] SelectionError),
}
