//! Homes-passed inputs: addresses, MDU and do-not-build boundaries

use crate::context::AggregationContext;
use bom_model::{FeatureRecord, LayerOutcome};
use bom_query::{LayerKey, QueryResult};

/// Address and dwelling-unit totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressTotals {
    /// Address points
    pub addresses: u64,
    /// MDU boundaries
    pub mdu_boundaries: u64,
    /// Σ `hhp_count` over MDU boundaries
    pub mdu_hhp: i64,
    /// Do-not-build boundaries
    pub dnb_boundaries: u64,
    /// Address points inside do-not-build boundaries
    pub dnb_addresses: u64,
}

/// Σ `hhp_count`; unparsable values add nothing
#[must_use]
pub fn sum_hhp(mdus: &[FeatureRecord]) -> i64 {
    mdus.iter().map(|mdu| mdu.integer("hhp_count")).sum()
}

/// Aggregate address, MDU and do-not-build counts
///
/// Empty only when all three layers return nothing.
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<AddressTotals> {
    let outcome = ctx.settle_with(LayerKey::AddressMaster, run(ctx).await);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            addresses = totals.addresses,
            mdu_boundaries = totals.mdu_boundaries,
            mdu_hhp = totals.mdu_hhp,
            dnb_boundaries = totals.dnb_boundaries,
            dnb_addresses = totals.dnb_addresses,
            "homes passed"
        );
    }
    outcome
}

async fn run(ctx: &AggregationContext<'_>) -> QueryResult<Option<AddressTotals>> {
    let addresses = ctx.contained(LayerKey::AddressMaster, "*", false).await?;
    let mdus = ctx.contained(LayerKey::MduBoundary, "hhp_count", false).await?;
    let dnbs = ctx.contained(LayerKey::DoNotBuild, "*", true).await?;

    let mut dnb_addresses = 0;
    for polygon in dnbs.iter().filter_map(|dnb| dnb.geometry.as_ref()) {
        dnb_addresses += ctx
            .contained_by(LayerKey::AddressMaster, polygon, "*", false)
            .await?
            .len() as u64;
    }

    if addresses.is_empty() && mdus.is_empty() && dnbs.is_empty() {
        return Ok(None);
    }
    Ok(Some(AddressTotals {
        addresses: addresses.len() as u64,
        mdu_boundaries: mdus.len() as u64,
        mdu_hhp: sum_hhp(&mdus),
        dnb_boundaries: dnbs.len() as u64,
        dnb_addresses,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hhp_coercion() {
        let mdus = [
            FeatureRecord::new().with_attr("hhp_count", 24),
            FeatureRecord::new().with_attr("hhp_count", "12"),
            FeatureRecord::new().with_attr("hhp_count", "lots"),
            FeatureRecord::new(),
        ];
        assert_eq!(sum_hhp(&mdus), 36);
    }
}
