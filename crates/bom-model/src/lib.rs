//! BOM Model
//!
//! Foundation types shared by every stage of the boundary roll-up:
//!
//! - [`AttributeValue`]: scalar attribute with lossless-or-zero numeric coercion
//! - [`Geometry`]: point / polyline / polygon with an optional spatial reference
//! - [`FeatureRecord`]: one row returned by a layer query
//! - [`Boundary`]: the resolved service-area polygon scoping every query
//! - [`category`]: closed category enums and the always-populated [`CategoryTotals`]
//! - [`LayerOutcome`]: data vs legitimately-empty vs degraded aggregator results
//!
//! # Example
//!
//! ```rust,ignore
//! use bom_model::{AttributeValue, FeatureRecord};
//!
//! let feature = FeatureRecord::new()
//!     .with_attr("UG1FT", 120.5)
//!     .with_attr("Cond_Diam", "2\"");
//!
//! assert_eq!(feature.number("UG1FT"), 120.5);
//! assert_eq!(feature.number("missing"), 0.0);
//! ```

#![warn(unreachable_pub)]

// Core modules
mod attribute;
mod boundary;
pub mod category;
mod error;
mod feature;
mod geometry;
mod outcome;
pub mod units;

// Re-exports
pub use attribute::{AttributeValue, Attributes};
pub use boundary::{Boundary, BoundaryAttributes, BoundaryId, UNKNOWN_ATTRIBUTE};
pub use category::{Category, CategoryTotals};
pub use error::ModelError;
pub use feature::FeatureRecord;
pub use geometry::{Geometry, Shape, SpatialReference};
pub use outcome::{DegradedReason, LayerOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
