//! BOM Aggregate
//!
//! Boundary resolution and the boundary-scoped layer aggregators:
//!
//! - [`BoundaryResolver`]: identifier or map selection → exactly one [`Boundary`]
//! - one module per layer, each with a pure `tally` and an async `aggregate`
//! - [`aggregate_all`]: every aggregator, sequentially, into an [`AggregateSet`]
//!
//! Aggregators never fail. A layer that cannot be queried yields
//! [`LayerOutcome::Degraded`](bom_model::LayerOutcome::Degraded) and the run
//! carries on with zeros for it.
//!
//! [`Boundary`]: bom_model::Boundary

#![warn(unreachable_pub)]

mod context;
mod error;
mod resolver;
mod set;

pub mod addresses;
pub mod cabinets;
pub mod cables;
pub mod conduit;
pub mod drops;
pub mod guys;
pub mod risers;
pub mod slack_loops;
pub mod splice;
pub mod strand;
pub mod structures;

pub use context::AggregationContext;
pub use error::{ResolveError, SelectionError};
pub use resolver::{BoundaryResolver, BoundarySlot, MapSelection, StaticSelection, ID_FIELD};
pub use set::{aggregate_all, AggregateSet};
