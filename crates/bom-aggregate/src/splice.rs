//! Splice closure counts and bracket derivation
//!
//! Aerial closures need a bracket: Coyote One closures hang from a hanger
//! bracket, every other aerial closure (including unrecognized sizes) takes
//! an offset bracket.

use crate::context::AggregationContext;
use bom_model::category::SpliceSize;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

/// Closure counts within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpliceTotals {
    /// Closures per recognized size
    pub by_size: CategoryTotals<SpliceSize, u64>,
    /// Aerial Coyote One closures
    pub hanger_brackets: u64,
    /// Aerial closures of any other size
    pub offset_brackets: u64,
}

impl SpliceTotals {
    /// Closures of a recognized size
    #[must_use]
    pub fn total_closures(&self) -> u64 {
        self.by_size.sum()
    }

    /// Closures lashed to strand
    #[must_use]
    pub fn lash_closures(&self) -> u64 {
        self.hanger_brackets + self.offset_brackets
    }

    /// Underground closures
    #[must_use]
    pub fn ug_closures(&self) -> u64 {
        self.lash_closures().abs_diff(self.total_closures())
    }
}

/// Tally splice enclosures
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> SpliceTotals {
    let mut totals = SpliceTotals::default();
    for feature in features {
        let size = SpliceSize::classify(&feature.text("splicesize"));
        if let Some(size) = size {
            totals.by_size.add(size, 1);
        }
        if feature.text("placementtype") == "AE" {
            if size == Some(SpliceSize::CoyoteOne) {
                totals.hanger_brackets += 1;
            } else {
                totals.offset_brackets += 1;
            }
        }
    }
    totals
}

/// Aggregate splice enclosures contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<SpliceTotals> {
    let result = ctx
        .contained(LayerKey::SpliceEnclosures, "splicesize, placementtype", false)
        .await;
    let outcome = ctx.settle(LayerKey::SpliceEnclosures, result, tally);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            closures = totals.total_closures(),
            hanger_brackets = totals.hanger_brackets,
            offset_brackets = totals.offset_brackets,
            ug_closures = totals.ug_closures(),
            "splice closure totals"
        );
    }
    outcome
}
