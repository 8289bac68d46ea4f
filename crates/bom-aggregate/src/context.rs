//! Shared aggregation context
//!
//! Carries the resolved boundary, the feature service and the layer catalog
//! into every aggregator explicitly, so log lines name the boundary they
//! belong to without any captured state.

use bom_model::{Boundary, DegradedReason, FeatureRecord, Geometry, LayerOutcome, SpatialReference};
use bom_query::{FeatureQuery, FeatureService, LayerCatalog, LayerKey, QueryResult};

/// Everything an aggregator needs for one run
#[derive(Clone, Copy)]
pub struct AggregationContext<'a> {
    service: &'a dyn FeatureService,
    catalog: &'a LayerCatalog,
    boundary: &'a Boundary,
    spatial_reference: SpatialReference,
}

impl<'a> AggregationContext<'a> {
    /// Create context; filters are evaluated in Web Mercator
    #[inline]
    #[must_use]
    pub fn new(
        service: &'a dyn FeatureService,
        catalog: &'a LayerCatalog,
        boundary: &'a Boundary,
    ) -> Self {
        Self {
            service,
            catalog,
            boundary,
            spatial_reference: SpatialReference::WEB_MERCATOR,
        }
    }

    /// With filter spatial reference
    #[inline]
    #[must_use]
    pub fn with_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = spatial_reference;
        self
    }

    /// Resolved boundary
    #[inline]
    #[must_use]
    pub fn boundary(&self) -> &'a Boundary {
        self.boundary
    }

    /// Layer catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'a LayerCatalog {
        self.catalog
    }

    /// Features of `layer` contained by the boundary
    pub async fn contained(
        &self,
        layer: LayerKey,
        out_fields: &str,
        return_geometry: bool,
    ) -> QueryResult<Vec<FeatureRecord>> {
        self.contained_by(layer, self.boundary.geometry(), out_fields, return_geometry)
            .await
    }

    /// Features of `layer` contained by an arbitrary polygon
    pub async fn contained_by(
        &self,
        layer: LayerKey,
        geometry: &Geometry,
        out_fields: &str,
        return_geometry: bool,
    ) -> QueryResult<Vec<FeatureRecord>> {
        let query = self.finish_query(FeatureQuery::contained_by(geometry), out_fields, return_geometry);
        self.service.query(&self.catalog.get(layer), &query).await
    }

    /// Features of `layer` intersecting `geometry`
    pub async fn intersecting(
        &self,
        layer: LayerKey,
        geometry: &Geometry,
        out_fields: &str,
        return_geometry: bool,
    ) -> QueryResult<Vec<FeatureRecord>> {
        let query = self.finish_query(FeatureQuery::intersecting(geometry), out_fields, return_geometry);
        self.service.query(&self.catalog.get(layer), &query).await
    }

    fn finish_query(&self, query: FeatureQuery, out_fields: &str, return_geometry: bool) -> FeatureQuery {
        let query = query
            .in_spatial_reference(self.spatial_reference)
            .with_out_fields(out_fields);
        if return_geometry {
            query.with_geometry()
        } else {
            query
        }
    }

    /// Settle a single-query aggregator: tally on data, log and absorb the rest
    pub(crate) fn settle<T>(
        &self,
        layer: LayerKey,
        result: QueryResult<Vec<FeatureRecord>>,
        tally: impl FnOnce(&[FeatureRecord]) -> T,
    ) -> LayerOutcome<T> {
        self.settle_with(layer, result.map(|features| {
            if features.is_empty() {
                None
            } else {
                Some(tally(&features))
            }
        }))
    }

    /// Settle a multi-query aggregator; `None` means legitimately empty
    pub(crate) fn settle_with<T>(&self, layer: LayerKey, result: QueryResult<Option<T>>) -> LayerOutcome<T> {
        match result {
            Ok(Some(data)) => LayerOutcome::Data(data),
            Ok(None) => {
                tracing::info!(boundary = %self.boundary.id(), %layer, "no features within boundary");
                LayerOutcome::Empty
            }
            Err(err) => {
                tracing::warn!(
                    boundary = %self.boundary.id(),
                    %layer,
                    error = %err,
                    "layer query failed; totals fall back to zero"
                );
                LayerOutcome::Degraded(DegradedReason::from(err))
            }
        }
    }
}

impl std::fmt::Debug for AggregationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationContext")
            .field("boundary", self.boundary.id())
            .field("spatial_reference", &self.spatial_reference)
            .finish_non_exhaustive()
    }
}
