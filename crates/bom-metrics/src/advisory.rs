//! Data-quality advisories
//!
//! Advisories never stop a run. They travel with the derived metrics so the
//! operator can judge the data before trusting the report.

use serde::Serialize;
use std::fmt;

/// A non-fatal data-quality finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// An aggregator fell back to zeros
    DegradedLayer {
        /// Aggregator name
        layer: String,
        /// Failure reason
        reason: String,
    },
    /// Strand plus UG1 footage is zero; percentages forced to zero
    PercentDivisionByZero,
    /// Aerial fiber footage is below strand footage; PFA-2 clamped to zero
    NegativePfa2 {
        /// Unclamped value
        raw: f64,
    },
    /// No passive cabinets of a recognized size
    ZeroCabinets,
    /// Strand present but no anchors
    AnchorsMissing {
        /// Strand footage
        strand_ft: f64,
    },
    /// UGuard adapters present but no risers
    RisersMissing {
        /// Adapter count
        uguard_adapters: u64,
    },
    /// 4" conduit present, possibly a special crossing
    SpecialCrossingFootage {
        /// 4" conduit footage
        feet: f64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegradedLayer { layer, reason } => {
                write!(f, "{layer} totals fell back to zero: {reason}")
            }
            Self::PercentDivisionByZero => f.write_str(
                "AE/UG percentage divides by zero; recalculate strand and conduit geometry",
            ),
            Self::NegativePfa2 { raw } => write!(
                f,
                "PFA-2 is negative ({raw:.2}); strand may remain in an all-UG boundary or footage needs recalculating; set to 0"
            ),
            Self::ZeroCabinets => {
                f.write_str("no passive cabinets found; the cabinet size attribute may be unpopulated")
            }
            Self::AnchorsMissing { strand_ft } => write!(
                f,
                "{strand_ft:.2} ft of strand intersects poles but there are no anchors"
            ),
            Self::RisersMissing { uguard_adapters } => write!(
                f,
                "there are {uguard_adapters} UGuard adapters but no risers"
            ),
            Self::SpecialCrossingFootage { feet } => write!(
                f,
                "{feet:.2} ft of 4\" conduit; this may indicate a special crossing"
            ),
        }
    }
}
