//! Immutable derived metrics set

use crate::advisory::Advisory;
use crate::key::MetricKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Count, footage, mileage or percentage
    Number(f64),
    /// Boundary descriptive attribute
    Text(String),
}

impl MetricValue {
    /// Numeric value, if numeric
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Text value, if text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for MetricValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for MetricValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Flat metric set computed once per run
///
/// Built by [`calculate`](crate::calculate) only; there is no way to change
/// a value afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    values: BTreeMap<MetricKey, MetricValue>,
    advisories: Vec<Advisory>,
}

impl DerivedMetrics {
    pub(crate) fn new(values: BTreeMap<MetricKey, MetricValue>, advisories: Vec<Advisory>) -> Self {
        Self { values, advisories }
    }

    /// Value for a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: MetricKey) -> Option<&MetricValue> {
        self.values.get(&key)
    }

    /// Value by stable name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&MetricValue> {
        MetricKey::from_name(name).and_then(|key| self.get(key))
    }

    /// Numeric value; zero when absent or text
    #[must_use]
    pub fn number(&self, key: MetricKey) -> f64 {
        self.get(key).and_then(MetricValue::as_f64).unwrap_or(0.0)
    }

    /// Iterate values in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &MetricValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    /// Number of metrics
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check for an empty set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Advisories raised while calculating
    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Flat `name → value` JSON object
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        MetricValue::Number(number) => serde_json::Number::from_f64(*number)
                            .map_or(serde_json::Value::Null, serde_json::Value::Number),
                        MetricValue::Text(text) => serde_json::Value::String(text.clone()),
                    };
                    (key.as_str().to_string(), value)
                })
                .collect(),
        )
    }
}
