//! In-memory feature service
//!
//! Evaluates [`FeatureQuery`] against features held in memory, using
//! [`geo::Relate`] for the spatial predicate. Backs the CLI's snapshot mode
//! and every test that needs real spatial behavior.
//!
//! Coordinates are compared as stored; no reprojection takes place, so a
//! snapshot must keep every layer and the boundary in one coordinate space.

use crate::error::{QueryError, QueryResult, SnapshotError};
use crate::filter::{FeatureQuery, SpatialRelation};
use crate::layer::LayerId;
use crate::service::FeatureService;
use async_trait::async_trait;
use bom_model::FeatureRecord;
use geo::Relate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Serialized layer contents plus the identifiers selected on the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Features per layer item id
    #[serde(default)]
    pub layers: BTreeMap<LayerId, Vec<FeatureRecord>>,
    /// Boundary identifiers selected on the map
    #[serde(default)]
    pub selection: Vec<String>,
}

impl Snapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Feature service over in-memory layers
#[derive(Debug, Default)]
pub struct InMemoryFeatureService {
    layers: HashMap<LayerId, Vec<FeatureRecord>>,
    failing: HashSet<LayerId>,
    log: Mutex<Vec<(LayerId, FeatureQuery)>>,
}

impl InMemoryFeatureService {
    /// Create empty service
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create service from a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        snapshot
            .layers
            .iter()
            .fold(Self::new(), |service, (layer, features)| {
                service.with_layer(layer.clone(), features.clone())
            })
    }

    /// Create service from snapshot JSON text
    pub fn from_snapshot_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(Self::from_snapshot(&Snapshot::from_json(json)?))
    }

    /// Create service from a snapshot file
    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Ok(Self::from_snapshot(&Snapshot::from_file(path)?))
    }

    /// With a layer's features (replaces any previous contents)
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<LayerId>, features: Vec<FeatureRecord>) -> Self {
        self.layers.insert(layer.into(), features);
        self
    }

    /// With a layer whose every query fails with a backend error
    #[must_use]
    pub fn with_failing_layer(mut self, layer: impl Into<LayerId>) -> Self {
        self.failing.insert(layer.into());
        self
    }

    /// Number of queries served so far
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.log.lock().len()
    }

    /// Queries served so far, in order
    #[must_use]
    pub fn queries(&self) -> Vec<(LayerId, FeatureQuery)> {
        self.log.lock().clone()
    }

    fn evaluate(&self, layer: &LayerId, query: &FeatureQuery) -> QueryResult<Vec<FeatureRecord>> {
        if self.failing.contains(layer) {
            return Err(QueryError::backend(format!("layer {layer} is unavailable")));
        }
        let features = self
            .layers
            .get(layer)
            .ok_or_else(|| QueryError::LayerNotFound(layer.clone()))?;

        let filter_shape = match &query.spatial {
            Some(filter) => Some((filter.geometry.to_geo()?, filter.relation)),
            None => None,
        };

        let mut matched = Vec::new();
        for feature in features {
            if let Some(attribute) = &query.attribute {
                if !attribute.matches(feature) {
                    continue;
                }
            }
            if let Some((shape, relation)) = &filter_shape {
                let Some(candidate) = feature.geometry.as_ref().and_then(|g| g.to_geo().ok())
                else {
                    continue;
                };
                let matrix = shape.relate(&candidate);
                let hit = match relation {
                    SpatialRelation::Contains => matrix.is_contains(),
                    SpatialRelation::Intersects => matrix.is_intersects(),
                };
                if !hit {
                    continue;
                }
            }
            matched.push(project(feature, query));
        }
        Ok(matched)
    }
}

fn project(feature: &FeatureRecord, query: &FeatureQuery) -> FeatureRecord {
    FeatureRecord {
        attributes: feature
            .attributes
            .iter()
            .filter(|(name, _)| query.out_fields.includes(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        geometry: if query.return_geometry {
            feature.geometry.clone()
        } else {
            None
        },
    }
}

#[async_trait]
impl FeatureService for InMemoryFeatureService {
    async fn query(&self, layer: &LayerId, query: &FeatureQuery) -> QueryResult<Vec<FeatureRecord>> {
        self.log.lock().push((layer.clone(), query.clone()));
        let result = self.evaluate(layer, query);
        match &result {
            Ok(features) => tracing::debug!(%layer, count = features.len(), "query served"),
            Err(err) => tracing::debug!(%layer, error = %err, "query failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AttributeFilter;
    use bom_model::Geometry;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn square(size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [size, 0.0],
            [size, size],
            [0.0, size],
            [0.0, 0.0],
        ]])
    }

    fn service() -> InMemoryFeatureService {
        InMemoryFeatureService::new().with_layer(
            "poles",
            vec![
                FeatureRecord::new()
                    .with_attr("MR_Level", 1)
                    .with_geometry(Geometry::point(5.0, 5.0)),
                FeatureRecord::new()
                    .with_attr("MR_Level", 3)
                    .with_geometry(Geometry::point(50.0, 50.0)),
                FeatureRecord::new().with_attr("MR_Level", 2),
            ],
        )
    }

    #[tokio::test]
    async fn contains_skips_outside_and_geometryless() {
        let service = service();
        let hits = service
            .query(&LayerId::new("poles"), &FeatureQuery::contained_by(&square(10.0)))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].integer("MR_Level"), 1);
        assert!(hits[0].geometry.is_none());
    }

    #[tokio::test]
    async fn intersects_polyline_touching_point() {
        let service = InMemoryFeatureService::new().with_layer(
            "poles",
            vec![FeatureRecord::new().with_geometry(Geometry::point(1.0, 1.0))],
        );
        let strand = Geometry::polyline(vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]]);
        let hits = service
            .query(&LayerId::new("poles"), &FeatureQuery::intersecting(&strand))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn projection_and_geometry() {
        let service = InMemoryFeatureService::new().with_layer(
            "conduit",
            vec![FeatureRecord::new()
                .with_attr("UG1FT", 10.0)
                .with_attr("Owner", "x")
                .with_geometry(Geometry::point(1.0, 1.0))],
        );
        let query = FeatureQuery::contained_by(&square(10.0))
            .with_out_fields("UG1FT")
            .with_geometry();
        let hits = service.query(&LayerId::new("conduit"), &query).await.unwrap();
        assert_eq!(hits[0].attributes.len(), 1);
        assert!(hits[0].geometry.is_some());
    }

    #[tokio::test]
    async fn attribute_filter() {
        let service = InMemoryFeatureService::new().with_layer(
            "fdh",
            vec![
                FeatureRecord::new().with_attr("cab_id", "A1"),
                FeatureRecord::new().with_attr("cab_id", "B2"),
            ],
        );
        let query = FeatureQuery::matching(AttributeFilter::eq("cab_id", "B2"));
        let hits = service.query(&LayerId::new("fdh"), &query).await.unwrap();
        assert_eq!(hits, vec![FeatureRecord::new().with_attr("cab_id", "B2")]);
        assert_eq!(service.query_count(), 1);
    }

    #[tokio::test]
    async fn missing_and_failing_layers() {
        let service = InMemoryFeatureService::new().with_failing_layer("down");
        let query = FeatureQuery::contained_by(&square(1.0));
        assert_eq!(
            service.query(&LayerId::new("nope"), &query).await,
            Err(QueryError::LayerNotFound(LayerId::new("nope")))
        );
        assert!(matches!(
            service.query(&LayerId::new("down"), &query).await,
            Err(QueryError::Backend { .. })
        ));
    }

    #[tokio::test]
    async fn degenerate_filter_geometry_is_rejected() {
        let service = service();
        let query = FeatureQuery::contained_by(&Geometry::polygon(vec![vec![[0.0, 0.0]]]));
        assert!(matches!(
            service.query(&LayerId::new("poles"), &query).await,
            Err(QueryError::InvalidGeometry(_))
        ));
    }

    #[tokio::test]
    async fn snapshot_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"layers":{{"risers":[{{"attributes":{{"id":1}},"geometry":{{"type":"point","x":1.0,"y":1.0}}}}]}},"selection":["fdh01"]}}"#
        )
        .unwrap();

        let snapshot = Snapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.selection, vec!["fdh01".to_string()]);

        let service = InMemoryFeatureService::from_snapshot(&snapshot);
        let hits = service
            .query(&LayerId::new("risers"), &FeatureQuery::contained_by(&square(2.0)))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn missing_snapshot_file() {
        let err = Snapshot::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
