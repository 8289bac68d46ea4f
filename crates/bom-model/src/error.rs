//! Error types for BOM Model

/// Errors raised while constructing model values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Boundary identifier was empty after trimming
    #[error("boundary identifier is blank")]
    BlankIdentifier,

    /// Boundary geometry is not a polygon
    #[error("boundary geometry must be a polygon, got {0}")]
    NotAPolygon(&'static str),

    /// Geometry has no coordinates
    #[error("geometry has no coordinates")]
    EmptyGeometry,

    /// Path or ring has too few vertices
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Coordinate is NaN or infinite
    #[error("geometry contains a non-finite coordinate")]
    NonFiniteCoordinate,
}
