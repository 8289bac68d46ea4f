//! Service drop counts and lengths

use crate::context::AggregationContext;
use bom_model::{FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

/// Drops longer than this are counted separately
pub const LONG_DROP_FT: f64 = 600.0;

/// Drop totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropTotals {
    /// Drops
    pub count: u64,
    /// Drops over 600 ft
    pub over_600_ft: u64,
    /// Σ `calcfootage`
    pub total_ft: f64,
}

impl DropTotals {
    /// Mean drop length, zero with no drops
    #[must_use]
    pub fn average_ft(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ft / self.count as f64
        }
    }
}

/// Tally drops by `calcfootage`
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> DropTotals {
    let mut totals = DropTotals::default();
    for feature in features {
        let footage = feature.number("calcfootage");
        totals.count += 1;
        totals.total_ft += footage;
        if footage > LONG_DROP_FT {
            totals.over_600_ft += 1;
        }
    }
    totals
}

/// Aggregate drops contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<DropTotals> {
    let result = ctx.contained(LayerKey::Drops, "*", false).await;
    let outcome = ctx.settle(LayerKey::Drops, result, tally);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            drops = totals.count,
            over_600_ft = totals.over_600_ft,
            average_ft = totals.average_ft(),
            "drop totals"
        );
    }
    outcome
}
