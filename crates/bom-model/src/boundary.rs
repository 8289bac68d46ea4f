//! Service-area boundary
//!
//! Resolved once per run and passed by reference into every aggregator.

use crate::error::ModelError;
use crate::geometry::{Geometry, SpatialReference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for descriptive attributes the boundary layer left empty
pub const UNKNOWN_ATTRIBUTE: &str = "Unknown";

/// Upper-cased boundary identifier (`cab_id`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundaryId(String);

impl BoundaryId {
    /// Normalize a raw identifier
    ///
    /// # Errors
    /// Returns `ModelError::BlankIdentifier` when nothing remains after trimming.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::BlankIdentifier);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive boundary attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryAttributes {
    /// `Serv_Area`
    pub service_area: String,
    /// `City_Code`
    pub city_code: String,
    /// `Const_Ven`
    pub construction_vendor: String,
}

impl Default for BoundaryAttributes {
    fn default() -> Self {
        Self {
            service_area: UNKNOWN_ATTRIBUTE.to_string(),
            city_code: UNKNOWN_ATTRIBUTE.to_string(),
            construction_vendor: UNKNOWN_ATTRIBUTE.to_string(),
        }
    }
}

/// Resolved service-area boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    id: BoundaryId,
    object_id: Option<i64>,
    geometry: Geometry,
    attributes: BoundaryAttributes,
}

impl Boundary {
    /// Create boundary
    ///
    /// Geometry without a spatial reference is tagged WGS84.
    ///
    /// # Errors
    /// Returns `ModelError::NotAPolygon` for non-polygon geometry.
    pub fn new(
        id: BoundaryId,
        geometry: Geometry,
        attributes: BoundaryAttributes,
    ) -> Result<Self, ModelError> {
        if !geometry.is_polygon() {
            return Err(ModelError::NotAPolygon(geometry.shape.kind()));
        }
        Ok(Self {
            id,
            object_id: None,
            geometry: geometry.or_spatial_reference(SpatialReference::WGS84),
            attributes,
        })
    }

    /// With source object id
    #[inline]
    #[must_use]
    pub fn with_object_id(mut self, object_id: i64) -> Self {
        self.object_id = Some(object_id);
        self
    }

    /// Identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &BoundaryId {
        &self.id
    }

    /// Source object id
    #[inline]
    #[must_use]
    pub fn object_id(&self) -> Option<i64> {
        self.object_id
    }

    /// Polygon geometry
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Descriptive attributes
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &BoundaryAttributes {
        &self.attributes
    }
}
