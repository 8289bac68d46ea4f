//! Feature geometry
//!
//! Shapes follow the GIS service's JSON layout (`x`/`y`, `paths`, `rings`)
//! and convert into [`geo`] types for spatial predicates.

use crate::error::ModelError;
use geo::{Coord, LineString, MultiLineString, Point, Polygon};
use serde::{Deserialize, Serialize};

/// Spatial reference by well-known id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference {
    /// Well-known id
    pub wkid: u32,
}

impl SpatialReference {
    /// WGS 1984 geographic coordinates
    pub const WGS84: Self = Self { wkid: 4326 };

    /// Web Mercator, used by the layer query filters
    pub const WEB_MERCATOR: Self = Self { wkid: 102_100 };

    /// Create from a well-known id
    #[inline]
    #[must_use]
    pub const fn new(wkid: u32) -> Self {
        Self { wkid }
    }
}

/// Shape of a geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Single point
    Point {
        /// Easting / longitude
        x: f64,
        /// Northing / latitude
        y: f64,
    },
    /// One or more connected paths
    Polyline {
        /// Vertex lists
        paths: Vec<Vec<[f64; 2]>>,
    },
    /// Exterior ring followed by holes
    Polygon {
        /// Vertex rings
        rings: Vec<Vec<[f64; 2]>>,
    },
}

impl Shape {
    /// Shape kind name
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::Polyline { .. } => "polyline",
            Self::Polygon { .. } => "polygon",
        }
    }
}

/// Geometry with optional spatial reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Shape coordinates
    #[serde(flatten)]
    pub shape: Shape,
    /// Spatial reference, if the source supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

impl Geometry {
    /// Point geometry
    #[inline]
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self::from_shape(Shape::Point { x, y })
    }

    /// Polyline geometry
    #[inline]
    #[must_use]
    pub fn polyline(paths: Vec<Vec<[f64; 2]>>) -> Self {
        Self::from_shape(Shape::Polyline { paths })
    }

    /// Polygon geometry
    #[inline]
    #[must_use]
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self::from_shape(Shape::Polygon { rings })
    }

    #[inline]
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            spatial_reference: None,
        }
    }

    /// With spatial reference
    #[inline]
    #[must_use]
    pub fn with_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = Some(spatial_reference);
        self
    }

    /// Fill in a spatial reference only when none is set
    #[inline]
    #[must_use]
    pub fn or_spatial_reference(mut self, fallback: SpatialReference) -> Self {
        self.spatial_reference.get_or_insert(fallback);
        self
    }

    /// Spatial reference
    #[inline]
    #[must_use]
    pub fn spatial_reference(&self) -> Option<SpatialReference> {
        self.spatial_reference
    }

    /// Check for polygon shape
    #[inline]
    #[must_use]
    pub fn is_polygon(&self) -> bool {
        matches!(self.shape, Shape::Polygon { .. })
    }

    /// Convert to a [`geo::Geometry`]
    ///
    /// # Errors
    /// - `ModelError::EmptyGeometry` for shapes without coordinates
    /// - `ModelError::DegenerateGeometry` for paths under 2 or rings under 3 vertices
    /// - `ModelError::NonFiniteCoordinate` for NaN / infinite coordinates
    pub fn to_geo(&self) -> Result<geo::Geometry<f64>, ModelError> {
        match &self.shape {
            Shape::Point { x, y } => {
                let coord = coord(&[*x, *y])?;
                Ok(geo::Geometry::Point(Point::from(coord)))
            }
            Shape::Polyline { paths } => {
                if paths.is_empty() {
                    return Err(ModelError::EmptyGeometry);
                }
                let mut lines = paths
                    .iter()
                    .map(|path| line_string(path, 2))
                    .collect::<Result<Vec<_>, _>>()?;
                if lines.len() == 1 {
                    Ok(geo::Geometry::LineString(lines.remove(0)))
                } else {
                    Ok(geo::Geometry::MultiLineString(MultiLineString::new(lines)))
                }
            }
            Shape::Polygon { rings } => {
                let (exterior, holes) = rings.split_first().ok_or(ModelError::EmptyGeometry)?;
                let exterior = line_string(exterior, 3)?;
                let holes = holes
                    .iter()
                    .map(|ring| line_string(ring, 3))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(geo::Geometry::Polygon(Polygon::new(exterior, holes)))
            }
        }
    }
}

fn coord(pair: &[f64; 2]) -> Result<Coord<f64>, ModelError> {
    if pair.iter().all(|value| value.is_finite()) {
        Ok(Coord {
            x: pair[0],
            y: pair[1],
        })
    } else {
        Err(ModelError::NonFiniteCoordinate)
    }
}

fn line_string(vertices: &[[f64; 2]], min_vertices: usize) -> Result<LineString<f64>, ModelError> {
    if vertices.len() < min_vertices {
        return Err(ModelError::DegenerateGeometry(format!(
            "{} vertices (need at least {min_vertices})",
            vertices.len()
        )));
    }
    let coords = vertices.iter().map(coord).collect::<Result<Vec<_>, _>>()?;
    Ok(LineString::new(coords))
}
