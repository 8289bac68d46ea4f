//! Maintenance loop roll-up
//!
//! Only loops whose `type` is `Maintenance Loop` count; every other loop
//! type is already represented in the cables' splice slack.

use crate::context::AggregationContext;
use bom_model::category::{FiberCount, Placement};
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

/// Loop type that is counted
pub const MAINTENANCE_LOOP: &str = "MAINTENANCE LOOP";

/// Maintenance loop totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlackLoopTotals {
    /// Underground loop footage per cable capacity
    pub ug_ft: CategoryTotals<FiberCount>,
    /// Aerial loop footage per cable capacity
    pub ae_ft: CategoryTotals<FiberCount>,
    /// Underground loops
    pub ug_loops: u64,
    /// Aerial loops
    pub ae_loops: u64,
}

impl SlackLoopTotals {
    /// Loop footage for one capacity across placements
    #[must_use]
    pub fn footage(&self, fiber: FiberCount) -> f64 {
        self.ug_ft.get(fiber) + self.ae_ft.get(fiber)
    }
}

/// Tally slack loop features
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> SlackLoopTotals {
    let mut totals = SlackLoopTotals::default();
    for feature in features {
        if feature.text_upper("type") != MAINTENANCE_LOOP {
            continue;
        }
        let capacity = FiberCount::classify(&feature.text("cable_capacity"));
        let length = feature.number("loop_length");
        match Placement::classify(&feature.text("placement").to_uppercase()) {
            Some(Placement::Ug) => {
                if let Some(capacity) = capacity {
                    totals.ug_ft.add(capacity, length);
                }
                totals.ug_loops += 1;
            }
            Some(Placement::Ae) => {
                if let Some(capacity) = capacity {
                    totals.ae_ft.add(capacity, length);
                }
                totals.ae_loops += 1;
            }
            None => {}
        }
    }
    totals
}

/// Aggregate slack loops contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<SlackLoopTotals> {
    let result = ctx
        .contained(LayerKey::SlackLoops, "cable_capacity, placement, loop_length, type", false)
        .await;
    let outcome = ctx.settle(LayerKey::SlackLoops, result, tally);
    if let Some(totals) = outcome.data() {
        for fiber in FiberCount::ALL {
            let (ug, ae) = (totals.ug_ft.get(*fiber), totals.ae_ft.get(*fiber));
            if ug > 0.0 || ae > 0.0 {
                tracing::info!(boundary = %ctx.boundary().id(), capacity = %fiber, ug_ft = ug, ae_ft = ae, "maintenance loops");
            }
        }
        tracing::info!(
            boundary = %ctx.boundary().id(),
            ug_loops = totals.ug_loops,
            ae_loops = totals.ae_loops,
            "maintenance loop counts"
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slack_loop(kind: &str, capacity: &str, placement: &str, length: f64) -> FeatureRecord {
        FeatureRecord::new()
            .with_attr("type", kind)
            .with_attr("cable_capacity", capacity)
            .with_attr("placement", placement)
            .with_attr("loop_length", length)
    }

    #[test]
    fn only_maintenance_loops_count() {
        let totals = tally(&[
            slack_loop("Maintenance Loop", "144", "UG", 100.0),
            slack_loop(" maintenance loop ", "144", "ae", 60.0),
            slack_loop("Splice Loop", "144", "UG", 500.0),
            slack_loop("", "144", "UG", 500.0),
        ]);
        assert_eq!(totals.ug_ft.get(FiberCount::F144), 100.0);
        assert_eq!(totals.ae_ft.get(FiberCount::F144), 60.0);
        assert_eq!(totals.footage(FiberCount::F144), 160.0);
        assert_eq!((totals.ug_loops, totals.ae_loops), (1, 1));
    }

    #[test]
    fn unknown_capacity_still_counts_loop() {
        let totals = tally(&[slack_loop("Maintenance Loop", "6", "UG", 80.0)]);
        assert_eq!(totals.ug_ft.sum(), 0.0);
        assert_eq!(totals.ug_loops, 1);
    }

    #[test]
    fn unknown_placement_is_skipped() {
        let totals = tally(&[slack_loop("Maintenance Loop", "12", "BURIED", 80.0)]);
        assert_eq!(totals, SlackLoopTotals::default());
    }
}
