//! BOM Core - boundary roll-up orchestration
//!
//! Ties the workspace together:
//!
//! - [`BomConfig`]: layer catalog, spatial references, template and output locations
//! - [`BomPipeline`]: resolve → aggregate → derive → export, one boundary per run
//! - [`BomError`]: the fatal tier; per-layer failures stay inside the aggregate set
//!
//! # Example
//!
//! ```rust,ignore
//! use bom_aggregate::{BoundarySlot, StaticSelection};
//! use bom_core::{BomConfig, BomPipeline};
//! use bom_query::InMemoryFeatureService;
//! use bom_report::ExportRequest;
//!
//! let service = InMemoryFeatureService::from_snapshot_file("features.json")?;
//! let pipeline = BomPipeline::new(BomConfig::default(), &service);
//! let mut slot = BoundarySlot::new("FDH01");
//! let run = pipeline
//!     .run(&mut slot, &StaticSelection::none(), &ExportRequest::disabled())
//!     .await?;
//! println!("{}", run.metrics.to_json());
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod pipeline;

pub use config::{BomConfig, CONFIG_ENV, DEFAULT_TEMPLATE};
pub use error::{BomError, ConfigError};
pub use pipeline::{BomPipeline, BomRun, ExportOutcome, RunId, WorkbookOpener};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
