//! BOM Query
//!
//! The feature-service port the roll-up engine queries through, plus an
//! in-memory backend:
//!
//! - [`FeatureService`]: async query port (mockable with the `mock` feature)
//! - [`FeatureQuery`]: spatial / attribute filter, out fields, geometry flag
//! - [`LayerCatalog`]: thematic layer → portal item id
//! - [`InMemoryFeatureService`]: [`geo`]-backed evaluation over a [`Snapshot`]

#![warn(unreachable_pub)]

mod error;
mod filter;
mod layer;
mod memory;
mod service;

pub use error::{QueryError, QueryResult, SnapshotError};
pub use filter::{AttributeFilter, FeatureQuery, OutFields, SpatialFilter, SpatialRelation};
pub use layer::{LayerCatalog, LayerId, LayerKey};
pub use memory::{InMemoryFeatureService, Snapshot};
#[cfg(any(test, feature = "mock"))]
pub use service::MockFeatureService;
pub use service::FeatureService;
