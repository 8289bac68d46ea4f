//! Fiber cable roll-up
//!
//! Splice slack is bucketed by fiber count and by hierarchy, each split by
//! placement. Per-cable splice counts (`SP1`..`SP3`) come from the first
//! record of each `(cable_name, fibercount)` pair only, since one logical
//! cable is often drawn as several feature records.

use crate::context::AggregationContext;
use bom_model::category::{FiberCount, Hierarchy, Placement};
use bom_model::units::round2;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;
use std::collections::HashSet;

const OUT_FIELDS: &str =
    "cable_name, placementtype, fibercount, hierarchy, LengthFT, SpliceSlack, SP1, SP2, SP3";

/// Base SP3 count added to the logged total
pub const SP3_BASE: f64 = 24.0;

/// Cable totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CableTotals {
    /// Underground splice slack per fiber count, rounded
    pub slack_ug: CategoryTotals<FiberCount>,
    /// Aerial splice slack per fiber count, rounded
    pub slack_ae: CategoryTotals<FiberCount>,
    /// Underground splice slack per hierarchy, rounded
    pub hierarchy_ug: CategoryTotals<Hierarchy>,
    /// Aerial splice slack per hierarchy, rounded
    pub hierarchy_ae: CategoryTotals<Hierarchy>,
    /// Σ underground `LengthFT`, rounded
    pub ug_linear_ft: f64,
    /// Σ aerial `LengthFT`, rounded
    pub ae_linear_ft: f64,
    /// Σ `SP1` over unique cables
    pub sp1: f64,
    /// Σ `SP2` over unique cables
    pub sp2: f64,
    /// Σ `SP3` over unique non-F1 cables
    pub sp3_excluding_f1: f64,
    /// Unique `(cable_name, fibercount)` pairs
    pub unique_cables: usize,
}

impl CableTotals {
    /// Splice slack for one placement and fiber count
    #[must_use]
    pub fn slack(&self, placement: Placement, fiber: FiberCount) -> f64 {
        match placement {
            Placement::Ug => self.slack_ug.get(fiber),
            Placement::Ae => self.slack_ae.get(fiber),
        }
    }

    /// Σ underground splice slack over all buckets
    #[must_use]
    pub fn total_slack_ug(&self) -> f64 {
        self.slack_ug.sum()
    }

    /// Σ aerial splice slack over all buckets
    #[must_use]
    pub fn total_slack_ae(&self) -> f64 {
        self.slack_ae.sum()
    }

    /// Splice slack for one hierarchy and placement
    #[must_use]
    pub fn hierarchy(&self, tier: Hierarchy, placement: Placement) -> f64 {
        match placement {
            Placement::Ug => self.hierarchy_ug.get(tier),
            Placement::Ae => self.hierarchy_ae.get(tier),
        }
    }

    /// SP3 including the base count
    #[must_use]
    pub fn total_sp3(&self) -> f64 {
        self.sp3_excluding_f1 + SP3_BASE
    }

    /// Heatshrink sleeves
    #[must_use]
    pub fn heatshrink(&self) -> f64 {
        self.sp1 + self.sp2 + self.sp3_excluding_f1
    }
}

/// Tally cable features
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> CableTotals {
    let mut totals = CableTotals::default();
    let mut seen = HashSet::new();

    for feature in features {
        let fiber_code = feature.text("fibercount").into_owned();
        let placement = Placement::classify(&feature.text_upper("placementtype"));
        let hierarchy = Hierarchy::classify(&feature.text_upper("hierarchy"));
        let slack = feature.number("SpliceSlack");

        if let (Some(fiber), Some(placement)) = (FiberCount::classify(&fiber_code), placement) {
            match placement {
                Placement::Ug => totals.slack_ug.add(fiber, slack),
                Placement::Ae => totals.slack_ae.add(fiber, slack),
            }
        }
        if let (Some(tier), Some(placement)) = (hierarchy, placement) {
            match placement {
                Placement::Ug => totals.hierarchy_ug.add(tier, slack),
                Placement::Ae => totals.hierarchy_ae.add(tier, slack),
            }
        }
        match placement {
            Some(Placement::Ug) => totals.ug_linear_ft += feature.number("LengthFT"),
            Some(Placement::Ae) => totals.ae_linear_ft += feature.number("LengthFT"),
            None => {}
        }

        let key = (feature.text("cable_name").into_owned(), fiber_code);
        if seen.insert(key) {
            totals.sp1 += feature.number("SP1");
            totals.sp2 += feature.number("SP2");
            if hierarchy != Some(Hierarchy::F1) {
                totals.sp3_excluding_f1 += feature.number("SP3");
            }
        }
    }

    totals.slack_ug = totals.slack_ug.map(round2);
    totals.slack_ae = totals.slack_ae.map(round2);
    totals.hierarchy_ug = totals.hierarchy_ug.map(round2);
    totals.hierarchy_ae = totals.hierarchy_ae.map(round2);
    totals.ug_linear_ft = round2(totals.ug_linear_ft);
    totals.ae_linear_ft = round2(totals.ae_linear_ft);
    totals.unique_cables = seen.len();
    totals
}

/// Aggregate cables contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<CableTotals> {
    let result = ctx.contained(LayerKey::Cables, OUT_FIELDS, false).await;
    let outcome = ctx.settle(LayerKey::Cables, result, tally);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            unique_cables = totals.unique_cables,
            slack_ug_ft = totals.total_slack_ug(),
            slack_ae_ft = totals.total_slack_ae(),
            ug_linear_ft = totals.ug_linear_ft,
            ae_linear_ft = totals.ae_linear_ft,
            sp1 = totals.sp1,
            sp2 = totals.sp2,
            sp3 = totals.total_sp3(),
            heatshrink = totals.heatshrink(),
            "cable totals"
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cable(name: &str, fiber: i64, placement: &str, hierarchy: &str) -> FeatureRecord {
        FeatureRecord::new()
            .with_attr("cable_name", name)
            .with_attr("fibercount", fiber)
            .with_attr("placementtype", placement)
            .with_attr("hierarchy", hierarchy)
    }

    #[test]
    fn slack_is_bucketed_by_fiber_and_placement() {
        let totals = tally(&[
            cable("A", 144, "UG", "F1").with_attr("SpliceSlack", 100.0),
            cable("A", 144, " ae ", "F1").with_attr("SpliceSlack", 50.0),
            cable("B", 48, "AE", "F2").with_attr("SpliceSlack", 25.5),
            cable("C", 864, "UG", "F2").with_attr("SpliceSlack", 1000.0),
        ]);
        assert_eq!(totals.slack(Placement::Ug, FiberCount::F144), 100.0);
        assert_eq!(totals.slack(Placement::Ae, FiberCount::F144), 50.0);
        assert_eq!(totals.slack(Placement::Ae, FiberCount::F48), 25.5);
        assert_eq!(totals.total_slack_ug(), 100.0);
        assert_eq!(totals.hierarchy(Hierarchy::F2, Placement::Ug), 1000.0);
        assert_eq!(totals.hierarchy(Hierarchy::F1, Placement::Ae), 50.0);
    }

    #[test]
    fn float_fiber_counts_normalize() {
        let totals = tally(&[FeatureRecord::new()
            .with_attr("fibercount", 12.0)
            .with_attr("placementtype", "UG")
            .with_attr("SpliceSlack", 30.0)]);
        assert_eq!(totals.slack(Placement::Ug, FiberCount::F12), 30.0);
    }

    #[test]
    fn unique_cables_count_splices_once() {
        let totals = tally(&[
            cable("A", 144, "UG", "F2")
                .with_attr("SP1", 2)
                .with_attr("SP2", 1)
                .with_attr("SP3", 4),
            cable("A", 144, "AE", "F2")
                .with_attr("SP1", 2)
                .with_attr("SP2", 1)
                .with_attr("SP3", 4),
            cable("A", 48, "UG", "F2").with_attr("SP1", 1),
            cable("F", 288, "UG", "F1").with_attr("SP3", 10),
        ]);
        assert_eq!(totals.unique_cables, 3);
        assert_eq!(totals.sp1, 3.0);
        assert_eq!(totals.sp2, 1.0);
        assert_eq!(totals.sp3_excluding_f1, 4.0);
        assert_eq!(totals.total_sp3(), 28.0);
        assert_eq!(totals.heatshrink(), 8.0);
    }

    #[test]
    fn linear_footage_by_placement() {
        let totals = tally(&[
            cable("A", 12, "UG", "F2").with_attr("LengthFT", 100.004),
            cable("B", 12, "AE", "F2").with_attr("LengthFT", 40.0),
            cable("C", 12, "BURIED", "F2").with_attr("LengthFT", 999.0),
        ]);
        assert_eq!(totals.ug_linear_ft, 100.0);
        assert_eq!(totals.ae_linear_ft, 40.0);
    }

    proptest! {
        #[test]
        fn bucket_sums_bounded_by_raw_slack(
            rows in proptest::collection::vec((0usize..5, 0.0f64..500.0, any::<bool>()), 0..40)
        ) {
            let fibers = [12i64, 48, 288, 6, 1000];
            let features: Vec<_> = rows
                .iter()
                .map(|(fiber, slack, aerial)| {
                    cable("X", fibers[*fiber], if *aerial { "AE" } else { "UG" }, "F2")
                        .with_attr("SpliceSlack", *slack)
                })
                .collect();
            let raw: f64 = rows.iter().map(|(_, slack, _)| slack).sum();
            let totals = tally(&features);
            // each bucket is rounded to the cent
            let tolerance = 0.005 * 14.0 + 1e-6;
            prop_assert!(totals.total_slack_ug() + totals.total_slack_ae() <= raw + tolerance);
        }
    }
}
