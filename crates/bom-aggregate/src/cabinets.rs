//! Passive and active cabinet counts

use crate::context::AggregationContext;
use bom_model::category::CabinetSize;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::{LayerKey, QueryResult};

/// Cabinet counts within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CabinetTotals {
    /// Passive cabinets per size
    pub passive: CategoryTotals<CabinetSize, u64>,
    /// Active cabinets
    pub active: u64,
}

impl CabinetTotals {
    /// Passive cabinets of a recognized size
    #[must_use]
    pub fn total_passive(&self) -> u64 {
        self.passive.sum()
    }
}

/// Tally passive cabinets by `Cab_Size`
#[must_use]
pub fn tally_passive(features: &[FeatureRecord]) -> CategoryTotals<CabinetSize, u64> {
    let mut counts = CategoryTotals::new();
    for feature in features {
        if let Some(size) = CabinetSize::classify(&feature.text("Cab_Size")) {
            counts.add(size, 1);
        }
    }
    counts
}

/// Aggregate cabinets contained by the boundary
///
/// An empty passive layer makes the whole aggregate empty, active count
/// included.
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<CabinetTotals> {
    let outcome = ctx.settle_with(LayerKey::PassiveCabinets, run(ctx).await);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            passive = totals.total_passive(),
            active = totals.active,
            "cabinet totals"
        );
    }
    outcome
}

async fn run(ctx: &AggregationContext<'_>) -> QueryResult<Option<CabinetTotals>> {
    let passive = ctx.contained(LayerKey::PassiveCabinets, "Cab_Size", false).await?;
    if passive.is_empty() {
        return Ok(None);
    }
    let active = ctx.contained(LayerKey::ActiveCabinets, "*", false).await?;
    Ok(Some(CabinetTotals {
        passive: tally_passive(&passive),
        active: active.len() as u64,
    }))
}
