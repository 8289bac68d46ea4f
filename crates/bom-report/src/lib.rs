//! BOM Report - template mapping and workbook output
//!
//! - [`ReportSchema`]: versioned metric → cell mapping (v1.4)
//! - [`WorkbookSink`]: destination port; [`JsonWorkbook`] writes a cell manifest
//! - [`ReportWriter`]: applies rates, timestamp and metrics, hides rate cards
//! - [`ExportRequest`]: export flag + vendor rate gating
//! - [`output`]: default output location and `.xlsx` coercion

#![warn(unreachable_pub)]

mod error;
mod export;
pub mod output;
mod schema;
mod sink;
mod workbook;
mod writer;

pub use error::{ExportSkip, ReportError, ReportResult};
pub use export::{ExportRequest, VendorRates};
pub use schema::{
    CellMapping, CellRef, RateCells, ReportSchema, CONSTRUCTION_RATE_SHEET, DESIGN_RATE_SHEET,
    ENGINEERING_SHEET, SUMMARY_SHEET,
};
pub use sink::WorkbookSink;
pub use workbook::{manifest_path, CellManifest, JsonWorkbook, ManifestSheet};
pub use writer::{ReportWriter, WriteSummary, TIMESTAMP_FORMAT};
