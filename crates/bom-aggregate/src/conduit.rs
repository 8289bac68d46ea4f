//! Underground conduit roll-up

use crate::context::AggregationContext;
use bom_model::category::ConduitSize;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

const OUT_FIELDS: &str = "UG1FT, LaborFootage, BOMCalc, reareasment, Cond_Diam";

/// Conduit totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConduitTotals {
    /// Σ `UG1FT`
    pub ug1_ft: f64,
    /// Σ `LaborFootage`
    pub ug2_ft: f64,
    /// Σ `UG1FT` where `reareasment` is `Y`
    pub ug1_reareasment_ft: f64,
    /// Footage per diameter; 1.25" and 2" use `BOMCalc`, 4" uses `UG1FT`
    pub by_size: CategoryTotals<ConduitSize>,
}

impl ConduitTotals {
    /// Footage for one diameter
    #[inline]
    #[must_use]
    pub fn footage(&self, size: ConduitSize) -> f64 {
        self.by_size.get(size)
    }
}

/// Tally conduit features
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> ConduitTotals {
    let mut totals = ConduitTotals::default();
    for feature in features {
        let ug1 = feature.number("UG1FT");
        match ConduitSize::classify(&feature.text("Cond_Diam")) {
            Some(size @ (ConduitSize::Inch1_25 | ConduitSize::Inch2)) => {
                totals.by_size.add(size, feature.number("BOMCalc"));
            }
            Some(ConduitSize::Inch4) => totals.by_size.add(ConduitSize::Inch4, ug1),
            None => {}
        }
        totals.ug1_ft += ug1;
        totals.ug2_ft += feature.number("LaborFootage");
        if feature.text_upper("reareasment") == "Y" {
            totals.ug1_reareasment_ft += ug1;
        }
    }
    totals
}

/// Aggregate conduit contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<ConduitTotals> {
    let result = ctx.contained(LayerKey::Conduit, OUT_FIELDS, false).await;
    let outcome = ctx.settle(LayerKey::Conduit, result, tally);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            ug1_ft = totals.ug1_ft,
            ug2_ft = totals.ug2_ft,
            conduit_1_25in_ft = totals.footage(ConduitSize::Inch1_25),
            conduit_2in_ft = totals.footage(ConduitSize::Inch2),
            conduit_4in_ft = totals.footage(ConduitSize::Inch4),
            ug1_reareasment_ft = totals.ug1_reareasment_ft,
            "conduit totals"
        );
        if totals.footage(ConduitSize::Inch4) > 0.0 {
            tracing::warn!(
                boundary = %ctx.boundary().id(),
                feet = totals.footage(ConduitSize::Inch4),
                "4\" conduit present; this may indicate a special crossing"
            );
        }
    }
    outcome
}
