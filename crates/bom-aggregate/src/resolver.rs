//! Boundary resolver
//!
//! Turns an identifier, or the boundary currently selected on a map, into
//! exactly one [`Boundary`]. Every failure here is fatal for the run.

use crate::error::{ResolveError, SelectionError};
use bom_model::{
    AttributeValue, Boundary, BoundaryAttributes, BoundaryId, FeatureRecord, SpatialReference,
    UNKNOWN_ATTRIBUTE,
};
use bom_query::{AttributeFilter, FeatureQuery, FeatureService, LayerId};

/// Identifier field on the boundary layer
pub const ID_FIELD: &str = "cab_id";

const OUT_FIELDS: &str = "OBJECTID, cab_id, Serv_Area, City_Code, Const_Ven";

/// Source of boundaries selected in an interactive map view
pub trait MapSelection {
    /// Identifiers of the selected boundary features, `None` where unset
    fn selected(&self) -> Result<Vec<Option<String>>, SelectionError>;
}

/// Fixed selection, for runs without a live map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSelection {
    layer_present: bool,
    ids: Vec<Option<String>>,
}

impl StaticSelection {
    /// Selection of the given identifiers
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            layer_present: true,
            ids: ids.into_iter().map(|id| Some(id.into())).collect(),
        }
    }

    /// Layer present, nothing selected
    #[must_use]
    pub fn none() -> Self {
        Self {
            layer_present: true,
            ids: Vec::new(),
        }
    }

    /// Boundary layer absent from the map
    #[must_use]
    pub fn missing_layer() -> Self {
        Self::default()
    }

    /// With a selected feature that carries no identifier
    #[must_use]
    pub fn with_unnamed(mut self) -> Self {
        self.ids.push(None);
        self
    }
}

impl MapSelection for StaticSelection {
    fn selected(&self) -> Result<Vec<Option<String>>, SelectionError> {
        if self.layer_present {
            Ok(self.ids.clone())
        } else {
            Err(SelectionError::LayerMissing("FDH_Boundary".to_string()))
        }
    }
}

/// Caller's identifier parameter; receives the id discovered on the map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundarySlot(Option<String>);

impl BoundarySlot {
    /// Slot holding a raw identifier
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    /// Empty slot
    #[must_use]
    pub fn empty() -> Self {
        Self(None)
    }

    /// Current value
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn set(&mut self, id: &BoundaryId) {
        self.0 = Some(id.to_string());
    }

    fn is_blank(&self) -> bool {
        self.get().map_or(true, |raw| raw.trim().is_empty())
    }
}

/// Resolves boundaries against the boundary layer
pub struct BoundaryResolver<'a> {
    service: &'a dyn FeatureService,
    layer: LayerId,
    default_spatial_reference: SpatialReference,
}

impl<'a> BoundaryResolver<'a> {
    /// Create resolver over the boundary layer
    #[must_use]
    pub fn new(service: &'a dyn FeatureService, layer: LayerId) -> Self {
        Self {
            service,
            layer,
            default_spatial_reference: SpatialReference::WGS84,
        }
    }

    /// With the spatial reference assumed for untagged boundary geometry
    #[inline]
    #[must_use]
    pub fn with_default_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.default_spatial_reference = spatial_reference;
        self
    }

    /// Resolve exactly one boundary
    ///
    /// A blank slot falls back to the map selection; the identifier found
    /// there is written back into the slot.
    pub async fn resolve(
        &self,
        slot: &mut BoundarySlot,
        selection: &dyn MapSelection,
    ) -> Result<Boundary, ResolveError> {
        let id = if slot.is_blank() {
            let id = Self::from_selection(selection)?;
            tracing::info!(boundary = %id, "boundary taken from map selection");
            slot.set(&id);
            id
        } else {
            let raw = slot.get().unwrap_or_default();
            BoundaryId::parse(raw).map_err(|_| ResolveError::BlankIdentifier)?
        };

        let query = FeatureQuery::matching(AttributeFilter::eq(ID_FIELD, id.as_str()))
            .with_out_fields(OUT_FIELDS)
            .with_geometry();
        let mut features = self.service.query(&self.layer, &query).await?;
        match features.len() {
            0 => Err(ResolveError::NotFound(id.to_string())),
            1 => {
                let boundary =
                    to_boundary(id, features.remove(0), self.default_spatial_reference)?;
                tracing::info!(
                    boundary = %boundary.id(),
                    service_area = %boundary.attributes().service_area,
                    city_code = %boundary.attributes().city_code,
                    "boundary resolved"
                );
                Ok(boundary)
            }
            count => Err(ResolveError::Ambiguous {
                what: id.to_string(),
                count,
            }),
        }
    }

    /// Resolve every boundary selected on the map in one query
    pub async fn resolve_selection_set(
        &self,
        selection: &dyn MapSelection,
    ) -> Result<Vec<Boundary>, ResolveError> {
        let ids: Vec<BoundaryId> = selection
            .selected()?
            .iter()
            .flatten()
            .filter_map(|raw| BoundaryId::parse(raw).ok())
            .collect();
        if ids.is_empty() {
            return Err(ResolveError::NothingSelected);
        }
        tracing::info!(count = ids.len(), "resolving selected boundaries");

        let filter = AttributeFilter::any_of(ID_FIELD, ids.iter().map(BoundaryId::as_str));
        let query = FeatureQuery::matching(filter).with_geometry();
        let features = self.service.query(&self.layer, &query).await?;
        if features.is_empty() {
            return Err(ResolveError::NotFound(
                ids.iter().map(BoundaryId::as_str).collect::<Vec<_>>().join(", "),
            ));
        }

        features
            .into_iter()
            .map(|feature| {
                let id = BoundaryId::parse(&feature.text(ID_FIELD))
                    .map_err(|_| ResolveError::BlankIdentifier)?;
                to_boundary(id, feature, self.default_spatial_reference)
            })
            .collect()
    }

    fn from_selection(selection: &dyn MapSelection) -> Result<BoundaryId, ResolveError> {
        let selected = selection.selected()?;
        match selected.as_slice() {
            [] => Err(ResolveError::NothingSelected),
            [only] => only
                .as_deref()
                .and_then(|raw| BoundaryId::parse(raw).ok())
                .ok_or(ResolveError::BlankIdentifier),
            many => Err(ResolveError::Ambiguous {
                what: "the map selection".to_string(),
                count: many.len(),
            }),
        }
    }
}

fn descriptive(feature: &FeatureRecord, field: &str) -> String {
    match feature.attr(field) {
        AttributeValue::Null => UNKNOWN_ATTRIBUTE.to_string(),
        value => value.as_text().into_owned(),
    }
}

fn to_boundary(
    id: BoundaryId,
    feature: FeatureRecord,
    default_spatial_reference: SpatialReference,
) -> Result<Boundary, ResolveError> {
    let invalid = |reason: String| ResolveError::InvalidGeometry {
        id: id.to_string(),
        reason,
    };
    let attributes = BoundaryAttributes {
        service_area: descriptive(&feature, "Serv_Area"),
        city_code: descriptive(&feature, "City_Code"),
        construction_vendor: descriptive(&feature, "Const_Ven"),
    };
    let object_id = match feature.attr("OBJECTID") {
        AttributeValue::Null => None,
        value => Some(value.as_i64()),
    };
    let geometry = feature
        .geometry
        .ok_or_else(|| invalid("no geometry returned".to_string()))?;
    geometry.to_geo().map_err(|err| invalid(err.to_string()))?;

    let geometry = geometry.or_spatial_reference(default_spatial_reference);
    let boundary =
        Boundary::new(id.clone(), geometry, attributes).map_err(|err| invalid(err.to_string()))?;
    Ok(match object_id {
        Some(object_id) => boundary.with_object_id(object_id),
        None => boundary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_model::{Geometry, SpatialReference};
    use bom_query::{InMemoryFeatureService, MockFeatureService, QueryError};

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    fn fdh(id: &str) -> FeatureRecord {
        FeatureRecord::new()
            .with_attr("OBJECTID", 7)
            .with_attr("cab_id", id)
            .with_attr("Serv_Area", "North")
            .with_attr("City_Code", "AUS")
            .with_geometry(square())
    }

    fn service(features: Vec<FeatureRecord>) -> InMemoryFeatureService {
        InMemoryFeatureService::new().with_layer("fdh", features)
    }

    #[tokio::test]
    async fn resolves_by_identifier() {
        let service = service(vec![fdh("FDH01"), fdh("FDH02")]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let mut slot = BoundarySlot::new(" fdh01 ");

        let boundary = resolver.resolve(&mut slot, &StaticSelection::none()).await.unwrap();
        assert_eq!(boundary.id().as_str(), "FDH01");
        assert_eq!(boundary.object_id(), Some(7));
        assert_eq!(boundary.attributes().service_area, "North");
        assert_eq!(boundary.attributes().construction_vendor, UNKNOWN_ATTRIBUTE);
        assert_eq!(boundary.geometry().spatial_reference(), Some(SpatialReference::WGS84));
        assert_eq!(slot.get(), Some(" fdh01 "));
    }

    #[tokio::test]
    async fn falls_back_to_map_selection_and_writes_slot() {
        let service = service(vec![fdh("FDH02")]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let mut slot = BoundarySlot::empty();

        let boundary = resolver
            .resolve(&mut slot, &StaticSelection::new(["fdh02"]))
            .await
            .unwrap();
        assert_eq!(boundary.id().as_str(), "FDH02");
        assert_eq!(slot.get(), Some("FDH02"));
    }

    async fn resolve_blank(selection: StaticSelection) -> ResolveError {
        let service = service(vec![fdh("A")]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let err = resolver
            .resolve(&mut BoundarySlot::new("   "), &selection)
            .await
            .unwrap_err();
        assert_eq!(service.query_count(), 0);
        err
    }

    #[tokio::test]
    async fn selection_failures() {
        assert_eq!(resolve_blank(StaticSelection::none()).await, ResolveError::NothingSelected);
        assert!(matches!(
            resolve_blank(StaticSelection::missing_layer()).await,
            ResolveError::Selection(SelectionError::LayerMissing(_))
        ));
        assert_eq!(
            resolve_blank(StaticSelection::none().with_unnamed()).await,
            ResolveError::BlankIdentifier
        );
        assert!(matches!(
            resolve_blank(StaticSelection::new(["A", "B"])).await,
            ResolveError::Ambiguous { count: 2, .. }
        ));
    }

    #[tokio::test]
    async fn missing_and_duplicate_boundaries() {
        let service = service(vec![fdh("DUP"), fdh("DUP")]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let none = StaticSelection::none();

        let err = resolver.resolve(&mut BoundarySlot::new("NOPE"), &none).await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("NOPE".to_string()));

        let err = resolver.resolve(&mut BoundarySlot::new("dup"), &none).await.unwrap_err();
        assert!(matches!(err, ResolveError::Ambiguous { count: 2, .. }));
    }

    #[tokio::test]
    async fn non_polygon_boundary_is_fatal() {
        let service = service(vec![FeatureRecord::new()
            .with_attr("cab_id", "PT")
            .with_geometry(Geometry::point(0.0, 0.0))]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let err = resolver
            .resolve(&mut BoundarySlot::new("PT"), &StaticSelection::none())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidGeometry { .. }));
    }

    #[tokio::test]
    async fn backend_failure_is_fatal() {
        let mut service = MockFeatureService::new();
        service
            .expect_query()
            .times(1)
            .returning(|_, _| Err(QueryError::backend("401 unauthorized")));
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));
        let err = resolver
            .resolve(&mut BoundarySlot::new("X"), &StaticSelection::none())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Backend(QueryError::backend("401 unauthorized")));
    }

    #[tokio::test]
    async fn selection_set_resolves_all_matches() {
        let service = service(vec![fdh("A1"), fdh("B2"), fdh("C3")]);
        let resolver = BoundaryResolver::new(&service, LayerId::new("fdh"));

        let boundaries = resolver
            .resolve_selection_set(&StaticSelection::new(["a1", "c3", "zz"]))
            .await
            .unwrap();
        let ids: Vec<_> = boundaries.iter().map(|b| b.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["A1", "C3"]);

        let err = resolver
            .resolve_selection_set(&StaticSelection::new(["zz"]))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound("ZZ".to_string()));
    }
}
