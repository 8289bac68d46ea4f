//! Error types for BOM Report

use std::path::PathBuf;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Report writing failure
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Template file does not exist
    #[error("report template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// Template exists but could not be read as a workbook
    #[error("failed to read template {}: {message}", path.display())]
    Template {
        /// Template path
        path: PathBuf,
        /// Reader message
        message: String,
    },

    /// Required sheet is absent from the template
    #[error("sheet '{0}' not found in the template")]
    MissingSheet(String),

    /// Cell reference is not valid A1 notation
    #[error("invalid cell reference '{0}'")]
    InvalidCell(String),

    /// Output could not be written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Manifest serialization failed
    #[error("manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reason an export was not attempted
///
/// Never fatal: the run completes and the metrics are still reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportSkip {
    /// Export flag not set
    #[error("export not requested")]
    NotRequested,

    /// A vendor rate was left blank
    #[error("{0} vendor rate is blank")]
    MissingRate(&'static str),
}
