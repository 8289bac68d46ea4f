//! Guy and anchor counts

use crate::context::AggregationContext;
use bom_model::category::GuyType;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

/// Count of each guy type; the sum is the anchor count
pub type GuyCounts = CategoryTotals<GuyType, u64>;

/// Tally guys by `Guy_Type`
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> GuyCounts {
    let mut counts = GuyCounts::new();
    for feature in features {
        if let Some(kind) = GuyType::classify(&feature.text("Guy_Type")) {
            counts.add(kind, 1);
        }
    }
    counts
}

/// Aggregate guys contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<GuyCounts> {
    let result = ctx.contained(LayerKey::Guys, "Guy_Type", false).await;
    let outcome = ctx.settle(LayerKey::Guys, result, tally);
    if let Some(counts) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            down = counts.get(GuyType::Down),
            dirt = counts.get(GuyType::Dirt),
            rock = counts.get(GuyType::Rock),
            anchors = counts.sum(),
            "guy totals"
        );
    }
    outcome
}
