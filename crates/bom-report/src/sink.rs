//! Workbook sink port
//!
//! The writer only needs to see sheet names, set cells, hide sheets and
//! save. Anything that can do that (a spreadsheet library, a manifest file)
//! can receive a report.

use crate::error::ReportResult;
use bom_metrics::MetricValue;
use std::path::{Path, PathBuf};

/// Destination workbook opened from a template
#[cfg_attr(test, mockall::automock)]
pub trait WorkbookSink {
    /// Sheet names present in the template
    fn sheet_names(&self) -> Vec<String>;

    /// Set one cell
    fn write_cell(&mut self, sheet: &str, cell: &str, value: MetricValue) -> ReportResult<()>;

    /// Hide a sheet
    fn hide_sheet(&mut self, sheet: &str) -> ReportResult<()>;

    /// Persist to `output`; returns the path actually written
    fn save(&mut self, output: &Path) -> ReportResult<PathBuf>;

    /// Check for a sheet
    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|name| name == sheet)
    }
}
