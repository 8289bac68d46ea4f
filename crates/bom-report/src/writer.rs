//! Report writer
//!
//! Maps a [`DerivedMetrics`] set onto a workbook through a [`ReportSchema`].
//! Only a missing summary sheet is fatal; everything else that is absent is
//! logged and skipped.

use crate::error::{ReportError, ReportResult};
use crate::export::VendorRates;
use crate::schema::{CellMapping, CellRef, ReportSchema, ENGINEERING_SHEET, SUMMARY_SHEET};
use crate::sink::WorkbookSink;
use bom_metrics::{DerivedMetrics, MetricValue};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Summary timestamp format
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// What a write produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Path the sink saved to
    pub saved_to: PathBuf,
    /// Cells set, including rate cells
    pub cells_written: usize,
    /// Mapped metrics absent from the set
    pub skipped: Vec<String>,
}

/// Writes derived metrics into a workbook sink
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    schema: ReportSchema,
}

impl ReportWriter {
    /// Create writer for a schema
    #[inline]
    #[must_use]
    pub fn new(schema: ReportSchema) -> Self {
        Self { schema }
    }

    /// Schema in use
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    /// Write metrics, rates and the run timestamp, then save
    pub fn write(
        &self,
        sink: &mut dyn WorkbookSink,
        metrics: &DerivedMetrics,
        rates: &VendorRates,
        run_at: NaiveDateTime,
        output: &Path,
    ) -> ReportResult<WriteSummary> {
        let rate_cells = self.schema.rates();
        let mut written = 0;
        let mut skipped = Vec::new();

        for (cell, rate, label) in [
            (rate_cells.construction_card, &rates.construction, "construction"),
            (rate_cells.design_card, &rates.design, "design"),
        ] {
            if sink.has_sheet(cell.sheet) {
                set(sink, cell, MetricValue::Text(rate.clone()))?;
                written += 1;
            } else {
                tracing::warn!(sheet = cell.sheet, rate = label, "rate card sheet not found in template");
            }
        }

        if !sink.has_sheet(SUMMARY_SHEET) {
            tracing::error!(sheet = SUMMARY_SHEET, "summary sheet not found in template");
            return Err(ReportError::MissingSheet(SUMMARY_SHEET.to_string()));
        }
        let timestamp = run_at.format(TIMESTAMP_FORMAT).to_string();
        set(sink, rate_cells.summary_design, MetricValue::Text(rates.design.clone()))?;
        set(
            sink,
            rate_cells.summary_construction,
            MetricValue::Text(rates.construction.clone()),
        )?;
        set(sink, rate_cells.summary_timestamp, MetricValue::Text(timestamp))?;
        written += 3;

        if sink.has_sheet(ENGINEERING_SHEET) {
            written += write_mappings(
                sink,
                ENGINEERING_SHEET,
                self.schema.engineering(),
                metrics,
                &mut skipped,
            )?;
        } else {
            tracing::warn!(sheet = ENGINEERING_SHEET, "engineering sheet not found in template");
        }
        written += write_mappings(sink, SUMMARY_SHEET, self.schema.summary(), metrics, &mut skipped)?;

        for sheet in self.schema.hidden_sheets() {
            if sink.has_sheet(sheet) {
                sink.hide_sheet(sheet)?;
            }
        }

        let saved_to = sink.save(output)?;
        tracing::info!(
            path = %saved_to.display(),
            schema = self.schema.version(),
            cells = written,
            skipped = skipped.len(),
            "report saved"
        );
        Ok(WriteSummary {
            saved_to,
            cells_written: written,
            skipped,
        })
    }
}

fn set(sink: &mut dyn WorkbookSink, cell: CellRef, value: MetricValue) -> ReportResult<()> {
    if !cell.is_valid() {
        return Err(ReportError::InvalidCell(cell.to_string()));
    }
    sink.write_cell(cell.sheet, cell.cell, value)
}

fn write_mappings(
    sink: &mut dyn WorkbookSink,
    sheet: &'static str,
    mappings: &[CellMapping],
    metrics: &DerivedMetrics,
    skipped: &mut Vec<String>,
) -> ReportResult<usize> {
    let mut written = 0;
    for mapping in mappings {
        let Some(value) = metrics.get_by_name(&mapping.metric) else {
            tracing::warn!(metric = %mapping.metric, sheet, "metric not in derived set, skipping");
            skipped.push(mapping.metric.clone());
            continue;
        };
        for cell in &mapping.cells {
            set(sink, CellRef::new(sheet, cell), value.clone())?;
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MockWorkbookSink;
    use bom_aggregate::AggregateSet;
    use bom_test_utils::test_boundary;

    fn run_at() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 3)
            .and_then(|date| date.and_hms_opt(14, 5, 9))
            .unwrap()
    }

    #[test]
    fn missing_summary_never_saves() {
        let mut sink = MockWorkbookSink::new();
        sink.expect_sheet_names()
            .returning(|| vec!["RateCard".to_string()]);
        sink.expect_has_sheet()
            .returning(|sheet| sheet == "RateCard");
        sink.expect_write_cell()
            .withf(|sheet, cell, value| {
                sheet == "RateCard" && cell == "E2" && value.as_str() == Some("C1")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        sink.expect_save().never();

        let metrics = bom_metrics::calculate(&test_boundary("FDH01"), &AggregateSet::empty());
        let rates = VendorRates::new("C1", "D1");
        let err = ReportWriter::default()
            .write(&mut sink, &metrics, &rates, run_at(), Path::new("out.xlsx"))
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingSheet(sheet) if sheet == "Summary"));
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(
            run_at().format(TIMESTAMP_FORMAT).to_string(),
            "06-03-2025 14:05:09"
        );
    }
}
