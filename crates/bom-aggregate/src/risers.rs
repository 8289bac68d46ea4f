//! Riser count

use crate::context::AggregationContext;
use bom_model::LayerOutcome;
use bom_query::LayerKey;

/// Count risers contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<u64> {
    let result = ctx.contained(LayerKey::Risers, "*", false).await;
    let outcome = ctx.settle(LayerKey::Risers, result, |features| features.len() as u64);
    if let Some(count) = outcome.data() {
        tracing::info!(boundary = %ctx.boundary().id(), risers = count, "riser count");
    }
    outcome
}
