//! Feature records returned by layer queries

use crate::attribute::{AttributeValue, Attributes};
use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

static NULL: AttributeValue = AttributeValue::Null;

/// One feature returned by a layer query
///
/// Aggregators only read records; nothing downstream of the query mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Attribute mapping
    #[serde(default)]
    pub attributes: Attributes,
    /// Geometry, when the query asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl FeatureRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// With geometry
    #[inline]
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Raw attribute; missing keys read as `null`
    #[inline]
    #[must_use]
    pub fn attr(&self, key: &str) -> &AttributeValue {
        self.attributes.get(key).unwrap_or(&NULL)
    }

    /// Attribute coerced to a float
    #[inline]
    #[must_use]
    pub fn number(&self, key: &str) -> f64 {
        self.attr(key).as_f64()
    }

    /// Attribute coerced to an integer
    #[inline]
    #[must_use]
    pub fn integer(&self, key: &str) -> i64 {
        self.attr(key).as_i64()
    }

    /// Attribute rendered as text
    #[inline]
    #[must_use]
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        self.attr(key).as_text()
    }

    /// Attribute trimmed and upper-cased
    #[inline]
    #[must_use]
    pub fn text_upper(&self, key: &str) -> String {
        self.text(key).trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attributes_read_as_null() {
        let feature = FeatureRecord::new().with_attr("calcfootage", "bad");
        assert!(feature.attr("nope").is_null());
        assert_eq!(feature.number("calcfootage"), 0.0);
        assert_eq!(feature.text("nope"), "");
    }

    #[test]
    fn upper_text_is_trimmed() {
        let feature = FeatureRecord::new().with_attr("placementtype", " ug ");
        assert_eq!(feature.text_upper("placementtype"), "UG");
    }

    #[test]
    fn deserializes_without_geometry() {
        let feature: FeatureRecord =
            serde_json::from_str(r#"{"attributes":{"MR_Level":2}}"#).unwrap();
        assert_eq!(feature.integer("MR_Level"), 2);
        assert!(feature.geometry.is_none());
    }
}
