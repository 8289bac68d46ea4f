//! Testing utilities for the BOM workspace
//!
//! Shared geometry builders, feature fixtures and an in-memory service
//! keyed by [`LayerKey`].

#![allow(missing_docs)]

use bom_model::{Boundary, BoundaryAttributes, BoundaryId, FeatureRecord, Geometry};
use bom_query::{InMemoryFeatureService, LayerCatalog, LayerKey};

/// Closed axis-aligned square ring
pub fn square(min: f64, max: f64) -> Geometry {
    Geometry::polygon(vec![vec![
        [min, min],
        [max, min],
        [max, max],
        [min, max],
        [min, min],
    ]])
}

/// Boundary covering `0..100` on both axes
pub fn test_boundary(id: &str) -> Boundary {
    let attributes = BoundaryAttributes {
        service_area: "North".to_string(),
        city_code: "AUS".to_string(),
        construction_vendor: "Acme".to_string(),
    };
    Boundary::new(BoundaryId::parse(id).unwrap(), square(0.0, 100.0), attributes).unwrap()
}

/// Boundary-layer feature for `test_boundary`
pub fn boundary_feature(id: &str, min: f64, max: f64) -> FeatureRecord {
    FeatureRecord::new()
        .with_attr("OBJECTID", 1)
        .with_attr("cab_id", id)
        .with_attr("Serv_Area", "North")
        .with_attr("City_Code", "AUS")
        .with_attr("Const_Ven", "Acme")
        .with_geometry(square(min, max))
}

pub fn point_at(x: f64, y: f64) -> FeatureRecord {
    FeatureRecord::new().with_geometry(Geometry::point(x, y))
}

pub fn line(from: [f64; 2], to: [f64; 2]) -> FeatureRecord {
    FeatureRecord::new().with_geometry(Geometry::polyline(vec![vec![from, to]]))
}

pub fn conduit(diam: &str, ug1: f64, bom_calc: f64) -> FeatureRecord {
    line([10.0, 10.0], [20.0, 10.0])
        .with_attr("Cond_Diam", diam)
        .with_attr("UG1FT", ug1)
        .with_attr("LaborFootage", ug1)
        .with_attr("BOMCalc", bom_calc)
}

pub fn cable(name: &str, fiber: i64, placement: &str, hierarchy: &str, slack: f64) -> FeatureRecord {
    line([10.0, 20.0], [30.0, 20.0])
        .with_attr("cable_name", name)
        .with_attr("fibercount", fiber)
        .with_attr("placementtype", placement)
        .with_attr("hierarchy", hierarchy)
        .with_attr("SpliceSlack", slack)
        .with_attr("LengthFT", slack)
}

pub fn strand_line(from: [f64; 2], to: [f64; 2], calcfootage: f64) -> FeatureRecord {
    line(from, to).with_attr("calcfootage", calcfootage)
}

pub fn pole(x: f64, y: f64, mr_level: i64) -> FeatureRecord {
    point_at(x, y).with_attr("MR_Level", mr_level)
}

/// In-memory service built against a layer catalog
#[derive(Debug, Default)]
pub struct LayerFixture {
    catalog: LayerCatalog,
    service: InMemoryFeatureService,
}

impl LayerFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: LayerCatalog) -> Self {
        Self {
            catalog,
            service: InMemoryFeatureService::new(),
        }
    }

    pub fn with(mut self, layer: LayerKey, features: Vec<FeatureRecord>) -> Self {
        self.service = self.service.with_layer(self.catalog.get(layer), features);
        self
    }

    /// Every layer present and empty
    pub fn with_all_layers_empty(mut self) -> Self {
        for layer in LayerKey::ALL {
            self.service = self.service.with_layer(self.catalog.get(layer), Vec::new());
        }
        self
    }

    pub fn failing(mut self, layer: LayerKey) -> Self {
        self.service = self.service.with_failing_layer(self.catalog.get(layer));
        self
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn build(self) -> (LayerCatalog, InMemoryFeatureService) {
        (self.catalog, self.service)
    }
}
