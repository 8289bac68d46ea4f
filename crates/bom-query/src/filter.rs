//! Query description
//!
//! A [`FeatureQuery`] mirrors what the GIS query endpoint accepts: an
//! optional spatial filter, an optional attribute filter, the fields to
//! return, and whether geometry comes back.

use bom_model::{FeatureRecord, Geometry, SpatialReference};

/// Spatial relationship tested by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialRelation {
    /// Filter geometry contains the feature
    Contains,
    /// Feature intersects the filter geometry
    Intersects,
}

/// Geometry-based filter
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    /// Filter geometry
    pub geometry: Geometry,
    /// Relationship to test
    pub relation: SpatialRelation,
    /// Spatial reference the filter is evaluated in
    pub spatial_reference: SpatialReference,
}

/// `field = value` or `field IN (values)` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Field name
    pub field: String,
    /// Accepted values
    pub values: Vec<String>,
}

impl AttributeFilter {
    /// Single-value equality
    #[inline]
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            values: vec![value.into()],
        }
    }

    /// Any of several values
    #[must_use]
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Check a feature against the filter
    #[must_use]
    pub fn matches(&self, feature: &FeatureRecord) -> bool {
        let actual = feature.text(&self.field);
        !feature.attr(&self.field).is_null() && self.values.iter().any(|value| *value == actual)
    }

    /// Render as a SQL where clause
    #[must_use]
    pub fn to_where_clause(&self) -> String {
        let quoted: Vec<String> = self
            .values
            .iter()
            .map(|value| format!("'{}'", value.replace('\'', "''")))
            .collect();
        match quoted.as_slice() {
            [single] => format!("{} = {single}", self.field),
            _ => format!("{} IN ({})", self.field, quoted.join(",")),
        }
    }
}

/// Fields returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutFields {
    /// Every field (`*`)
    #[default]
    All,
    /// Named fields only
    Fields(Vec<String>),
}

impl OutFields {
    /// Parse a comma-separated field list; `*` means all
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let fields: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(ToString::to_string)
            .collect();
        if fields.is_empty() || fields.iter().any(|field| field == "*") {
            Self::All
        } else {
            Self::Fields(fields)
        }
    }

    /// Check whether a field is returned
    #[must_use]
    pub fn includes(&self, field: &str) -> bool {
        match self {
            Self::All => true,
            Self::Fields(fields) => fields.iter().any(|name| name == field),
        }
    }
}

/// One layer query
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    /// Spatial filter
    pub spatial: Option<SpatialFilter>,
    /// Attribute filter
    pub attribute: Option<AttributeFilter>,
    /// Returned fields
    pub out_fields: OutFields,
    /// Whether geometry is returned
    pub return_geometry: bool,
}

impl FeatureQuery {
    /// Features contained by `geometry`
    #[must_use]
    pub fn contained_by(geometry: &Geometry) -> Self {
        Self::spatial(geometry, SpatialRelation::Contains)
    }

    /// Features intersecting `geometry`
    #[must_use]
    pub fn intersecting(geometry: &Geometry) -> Self {
        Self::spatial(geometry, SpatialRelation::Intersects)
    }

    fn spatial(geometry: &Geometry, relation: SpatialRelation) -> Self {
        Self {
            spatial: Some(SpatialFilter {
                geometry: geometry.clone(),
                relation,
                spatial_reference: SpatialReference::WEB_MERCATOR,
            }),
            attribute: None,
            out_fields: OutFields::All,
            return_geometry: false,
        }
    }

    /// Features matching an attribute filter
    #[must_use]
    pub fn matching(filter: AttributeFilter) -> Self {
        Self {
            spatial: None,
            attribute: Some(filter),
            out_fields: OutFields::All,
            return_geometry: false,
        }
    }

    /// With filter spatial reference
    #[inline]
    #[must_use]
    pub fn in_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        if let Some(filter) = self.spatial.as_mut() {
            filter.spatial_reference = spatial_reference;
        }
        self
    }

    /// With returned fields (comma-separated, `*` for all)
    #[inline]
    #[must_use]
    pub fn with_out_fields(mut self, fields: &str) -> Self {
        self.out_fields = OutFields::parse(fields);
        self
    }

    /// With geometry returned
    #[inline]
    #[must_use]
    pub fn with_geometry(mut self) -> Self {
        self.return_geometry = true;
        self
    }

    /// Spatial relation, if any
    #[inline]
    #[must_use]
    pub fn relation(&self) -> Option<SpatialRelation> {
        self.spatial.as_ref().map(|filter| filter.relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_rendering() {
        assert_eq!(
            AttributeFilter::eq("cab_id", "FDH01").to_where_clause(),
            "cab_id = 'FDH01'"
        );
        assert_eq!(
            AttributeFilter::any_of("cab_id", ["A", "O'B"]).to_where_clause(),
            "cab_id IN ('A','O''B')"
        );
    }

    #[test]
    fn attribute_filter_matches_text_and_numbers() {
        let filter = AttributeFilter::any_of("cab_id", ["FDH01", "144"]);
        assert!(filter.matches(&FeatureRecord::new().with_attr("cab_id", "FDH01")));
        assert!(filter.matches(&FeatureRecord::new().with_attr("cab_id", 144)));
        assert!(!filter.matches(&FeatureRecord::new().with_attr("cab_id", "fdh01")));
        assert!(!filter.matches(&FeatureRecord::new()));
    }

    #[test]
    fn out_fields_parsing() {
        assert_eq!(OutFields::parse("*"), OutFields::All);
        assert_eq!(OutFields::parse(""), OutFields::All);
        let fields = OutFields::parse("UG1FT, LaborFootage,BOMCalc");
        assert!(fields.includes("LaborFootage"));
        assert!(!fields.includes("duct_count"));
    }

    #[test]
    fn builder_sets_relation_and_reference() {
        let square = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]);
        let query = FeatureQuery::intersecting(&square)
            .in_spatial_reference(SpatialReference::WGS84)
            .with_out_fields("MR_Level")
            .with_geometry();
        assert_eq!(query.relation(), Some(SpatialRelation::Intersects));
        assert_eq!(
            query.spatial.as_ref().map(|filter| filter.spatial_reference),
            Some(SpatialReference::WGS84)
        );
        assert!(query.return_geometry);
    }
}
