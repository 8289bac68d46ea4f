//! Aggregator outcomes
//!
//! An aggregator never fails the run. It reports one of three outcomes so
//! callers can tell a boundary with no conduit apart from a conduit layer
//! that could not be reached.

/// Why an aggregator fell back to zeros
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DegradedReason {
    /// Layer id is not known to the feature service
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// Backend query failed
    #[error("backend query failed: {0}")]
    Backend(String),

    /// Boundary or feature geometry could not be used
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Outcome of one aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum LayerOutcome<T> {
    /// Features were found and tallied
    Data(T),
    /// Query succeeded but returned no features
    Empty,
    /// Query failed; totals fall back to zero
    Degraded(DegradedReason),
}

impl<T> LayerOutcome<T> {
    /// Tallied data, if any
    #[inline]
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Empty | Self::Degraded(_) => None,
        }
    }

    /// Check for legitimately empty result
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check for backend failure
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Degradation reason
    #[inline]
    #[must_use]
    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            Self::Degraded(reason) => Some(reason),
            Self::Data(_) | Self::Empty => None,
        }
    }

    /// Transform the tallied data
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LayerOutcome<U> {
        match self {
            Self::Data(data) => LayerOutcome::Data(f(data)),
            Self::Empty => LayerOutcome::Empty,
            Self::Degraded(reason) => LayerOutcome::Degraded(reason),
        }
    }
}

impl<T: Clone + Default> LayerOutcome<T> {
    /// Tallied data, or all-zero totals
    #[inline]
    #[must_use]
    pub fn data_or_default(&self) -> T {
        self.data().cloned().unwrap_or_default()
    }
}
