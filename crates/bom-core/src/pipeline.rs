//! Boundary roll-up pipeline
//!
//! One run, strictly in order:
//! 1. Resolve the boundary (fatal on failure)
//! 2. Run every aggregator (failures degrade, never abort)
//! 3. Derive metrics and advisories
//! 4. Export through the report writer when requested and the rates are set

use crate::config::BomConfig;
use crate::error::BomError;
use bom_aggregate::{
    aggregate_all, AggregateSet, AggregationContext, BoundaryResolver, BoundarySlot, MapSelection,
};
use bom_metrics::{calculate, DerivedMetrics};
use bom_model::Boundary;
use bom_query::{FeatureService, LayerKey};
use bom_report::{
    output, ExportRequest, ExportSkip, JsonWorkbook, ReportResult, ReportWriter, WorkbookSink,
    WriteSummary,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use ulid::Ulid;

/// Unique run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Ulid);

impl RunId {
    /// Generate new run id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opens the report template as a workbook sink
pub type WorkbookOpener = fn(&Path) -> ReportResult<Box<dyn WorkbookSink>>;

fn open_json_workbook(template: &Path) -> ReportResult<Box<dyn WorkbookSink>> {
    Ok(Box::new(JsonWorkbook::open(template)?))
}

/// What happened to the export step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Export was not attempted
    Skipped(ExportSkip),
    /// Report written
    Written(WriteSummary),
}

/// Completed run
#[derive(Debug, Clone)]
pub struct BomRun {
    /// Run identifier
    pub run_id: RunId,
    /// Resolved boundary
    pub boundary: Boundary,
    /// Per-aggregator outcomes
    pub aggregates: AggregateSet,
    /// Derived metrics and advisories
    pub metrics: DerivedMetrics,
    /// Export step result
    pub export: ExportOutcome,
}

/// Roll-up pipeline over one feature service
pub struct BomPipeline<'a> {
    config: BomConfig,
    service: &'a dyn FeatureService,
    writer: ReportWriter,
    open_workbook: WorkbookOpener,
}

impl<'a> BomPipeline<'a> {
    /// Create pipeline
    #[must_use]
    pub fn new(config: BomConfig, service: &'a dyn FeatureService) -> Self {
        Self {
            config,
            service,
            writer: ReportWriter::default(),
            open_workbook: open_json_workbook,
        }
    }

    /// With a different workbook sink for the template
    #[inline]
    #[must_use]
    pub fn with_workbook_opener(mut self, opener: WorkbookOpener) -> Self {
        self.open_workbook = opener;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BomConfig {
        &self.config
    }

    /// Run once for the boundary in `slot`, or the map selection when blank
    ///
    /// The resolved identifier is written back into `slot`.
    pub async fn run(
        &self,
        slot: &mut BoundarySlot,
        selection: &dyn MapSelection,
        export: &ExportRequest,
    ) -> Result<BomRun, BomError> {
        let run_id = RunId::new();
        tracing::info!(%run_id, requested = slot.get().unwrap_or_default(), "BOM run started");

        let resolver = BoundaryResolver::new(
            self.service,
            self.config.layers.get(LayerKey::FdhBoundary),
        )
        .with_default_spatial_reference(self.config.boundary_reference());
        let boundary = resolver.resolve(slot, selection).await.map_err(|err| {
            tracing::error!(%run_id, error = %err, "boundary resolution failed");
            err
        })?;

        let ctx = AggregationContext::new(self.service, &self.config.layers, &boundary)
            .with_spatial_reference(self.config.filter_reference());
        let aggregates = aggregate_all(&ctx).await;
        let metrics = calculate(&boundary, &aggregates);

        let export = self.export(&boundary, &metrics, export)?;
        tracing::info!(
            %run_id,
            boundary = %boundary.id(),
            advisories = metrics.advisories().len(),
            degraded = aggregates.degraded().len(),
            "BOM run completed"
        );
        Ok(BomRun {
            run_id,
            boundary,
            aggregates,
            metrics,
            export,
        })
    }

    fn export(
        &self,
        boundary: &Boundary,
        metrics: &DerivedMetrics,
        request: &ExportRequest,
    ) -> Result<ExportOutcome, BomError> {
        let rates = match request.validate() {
            Ok(rates) => rates,
            Err(skip) => {
                if skip == ExportSkip::NotRequested {
                    tracing::info!(boundary = %boundary.id(), "export not requested");
                } else {
                    tracing::warn!(boundary = %boundary.id(), reason = %skip, "export skipped");
                }
                return Ok(ExportOutcome::Skipped(skip));
            }
        };

        let mut workbook = (self.open_workbook)(&self.config.template_path)?;
        let run_at = now();
        let path = output::resolve_output_path(
            request.output.as_deref(),
            self.config.output_dir.as_deref(),
            Some(boundary.id()),
            run_at,
        );
        let summary = self
            .writer
            .write(workbook.as_mut(), metrics, &rates, run_at, &path)?;
        Ok(ExportOutcome::Written(summary))
    }
}

impl fmt::Debug for BomPipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BomPipeline")
            .field("config", &self.config)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
