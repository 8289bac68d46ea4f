//! Attribute values
//!
//! Layer attributes arrive loosely typed: the same field can hold a number,
//! a numeric string, `null`, or garbage depending on who digitized the
//! feature. Coercion never fails; anything that is not a usable number
//! becomes zero.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute mapping of a feature record
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Missing or `null`
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
}

impl AttributeValue {
    /// Check for `null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coerce to a float
    ///
    /// `null`, booleans, non-finite floats and unparsable text all yield `0.0`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) if value.is_finite() => *value,
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
            Self::Null | Self::Bool(_) | Self::Float(_) => 0.0,
        }
    }

    /// Coerce to an integer
    ///
    /// Floats truncate toward zero. Text must parse as an integer literal,
    /// so `"3.0"` yields `0`.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Int(value) => *value,
            Self::Float(value) if value.is_finite() => value.trunc() as i64,
            Self::Text(text) => text.trim().parse::<i64>().unwrap_or(0),
            Self::Null | Self::Bool(_) | Self::Float(_) => 0,
        }
    }

    /// Render as text
    ///
    /// `null` renders empty. Integral floats render without a fraction so a
    /// fiber count stored as `12.0` still reads `"12"`.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(AttributeValue::Int(12).as_f64(), 12.0);
        assert_eq!(AttributeValue::Float(1.5).as_f64(), 1.5);
        assert_eq!(AttributeValue::from(" 42.25 ").as_f64(), 42.25);
        assert_eq!(AttributeValue::Null.as_f64(), 0.0);
        assert_eq!(AttributeValue::from("n/a").as_f64(), 0.0);
        assert_eq!(AttributeValue::Bool(true).as_f64(), 0.0);
        assert_eq!(AttributeValue::Float(f64::NAN).as_f64(), 0.0);
        assert_eq!(AttributeValue::from("inf").as_f64(), 0.0);
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(AttributeValue::Float(3.7).as_i64(), 3);
        assert_eq!(AttributeValue::from("4").as_i64(), 4);
        assert_eq!(AttributeValue::from("3.0").as_i64(), 0);
        assert_eq!(AttributeValue::Null.as_i64(), 0);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(AttributeValue::Int(144).as_text(), "144");
        assert_eq!(AttributeValue::Float(12.0).as_text(), "12");
        assert_eq!(AttributeValue::Null.as_text(), "");
        assert_eq!(AttributeValue::from("AE").as_text(), "AE");
    }

    #[test]
    fn deserializes_loose_json() {
        let values: Vec<AttributeValue> =
            serde_json::from_str(r#"[null, 3, 2.5, "UG", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttributeValue::Null,
                AttributeValue::Int(3),
                AttributeValue::Float(2.5),
                AttributeValue::from("UG"),
                AttributeValue::Bool(true),
            ]
        );
    }

    proptest! {
        #[test]
        fn coercion_never_panics(text in ".*") {
            let value = AttributeValue::from(text.as_str());
            let number = value.as_f64();
            prop_assert!(number.is_finite());
            let _ = value.as_i64();
        }
    }
}
