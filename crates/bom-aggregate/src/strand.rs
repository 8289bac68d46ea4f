//! Aerial strand, pole and UGuard adapter roll-up
//!
//! Three joins run here:
//!
//! - strand contained by the boundary, with a 10% sag allowance
//! - poles intersecting each strand segment (make-ready counts)
//! - conduits intersecting each pole contained by the boundary (duct counts)
//!
//! Poles are queried once per strand segment, so a pole shared by two
//! segments is counted twice. Pole totals feed grounding and make-ready
//! material, and the template has always been filled from that count.

use crate::context::AggregationContext;
use bom_model::{FeatureRecord, Geometry, LayerOutcome};
use bom_query::{LayerKey, QueryResult};

/// Sag allowance applied to strand footage
pub const SAG_FACTOR: f64 = 1.10;

/// Summed duct count at which a pole takes a UGuard adapter
pub const UGUARD_DUCT_THRESHOLD: i64 = 3;

/// Strand and pole totals within a boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrandTotals {
    /// Σ `calcfootage` with sag allowance
    pub strand_ft: f64,
    /// Σ `calcfootage` where `reareasment` is `Y`, with sag allowance
    pub strand_reareasment_ft: f64,
    /// Poles touching strand, once per touching segment
    pub pole_count: u64,
    /// Of those, poles at make-ready level 1 or 2
    pub make_ready_poles: u64,
    /// Poles whose intersecting conduits carry three or more ducts
    pub uguard_adapters: u64,
}

/// Raw strand footage before the sag allowance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrandFootage {
    /// Σ `calcfootage`
    pub strand_ft: f64,
    /// Σ `calcfootage` where `reareasment` is `Y`
    pub reareasment_ft: f64,
}

/// Tally raw strand footage
#[must_use]
pub fn tally_strand(features: &[FeatureRecord]) -> StrandFootage {
    features.iter().fold(StrandFootage::default(), |mut acc, feature| {
        let footage = feature.number("calcfootage");
        acc.strand_ft += footage;
        if feature.text_upper("reareasment") == "Y" {
            acc.reareasment_ft += footage;
        }
        acc
    })
}

/// Check a pole's make-ready level
#[must_use]
pub fn is_make_ready(pole: &FeatureRecord) -> bool {
    let level = pole.number("MR_Level");
    level == 1.0 || level == 2.0
}

/// Σ `duct_count` over conduits at a pole; unparsable counts add nothing
#[must_use]
pub fn duct_sum(conduits: &[FeatureRecord]) -> i64 {
    conduits.iter().map(|conduit| conduit.integer("duct_count")).sum()
}

/// Check whether a summed duct count earns an adapter
#[inline]
#[must_use]
pub fn needs_uguard(duct_sum: i64) -> bool {
    duct_sum >= UGUARD_DUCT_THRESHOLD
}

/// Aggregate strand, poles and adapters
///
/// An empty strand layer makes the whole aggregate empty, adapters included.
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<StrandTotals> {
    let outcome = ctx.settle_with(LayerKey::Strand, run(ctx).await);
    if let Some(totals) = outcome.data() {
        tracing::info!(
            boundary = %ctx.boundary().id(),
            strand_ft = totals.strand_ft,
            strand_reareasment_ft = totals.strand_reareasment_ft,
            pole_count = totals.pole_count,
            make_ready_poles = totals.make_ready_poles,
            uguard_adapters = totals.uguard_adapters,
            "strand and pole totals"
        );
    }
    outcome
}

async fn run(ctx: &AggregationContext<'_>) -> QueryResult<Option<StrandTotals>> {
    let strand = ctx.contained(LayerKey::Strand, "calcfootage, reareasment", true).await?;
    if strand.is_empty() {
        return Ok(None);
    }
    let footage = tally_strand(&strand);

    let mut pole_count = 0;
    let mut make_ready_poles = 0;
    for segment in strand.iter().filter_map(|feature| feature.geometry.as_ref()) {
        let poles = ctx.intersecting(LayerKey::Poles, segment, "MR_Level", true).await?;
        pole_count += poles.len() as u64;
        make_ready_poles += poles.iter().filter(|pole| is_make_ready(pole)).count() as u64;
    }

    let poles = ctx.contained(LayerKey::Poles, "OBJECTID", true).await?;
    let mut uguard_adapters = 0;
    for location in poles.iter().filter_map(|pole| pole.geometry.as_ref()) {
        if needs_uguard(ducts_at(ctx, location).await?) {
            uguard_adapters += 1;
        }
    }

    Ok(Some(StrandTotals {
        strand_ft: footage.strand_ft * SAG_FACTOR,
        strand_reareasment_ft: footage.reareasment_ft * SAG_FACTOR,
        pole_count,
        make_ready_poles,
        uguard_adapters,
    }))
}

async fn ducts_at(ctx: &AggregationContext<'_>, pole: &Geometry) -> QueryResult<i64> {
    let conduits = ctx.intersecting(LayerKey::Conduit, pole, "duct_count", false).await?;
    Ok(duct_sum(&conduits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_model::AttributeValue;

    #[test]
    fn strand_footage_and_reareasment() {
        let footage = tally_strand(&[
            FeatureRecord::new()
                .with_attr("calcfootage", 300.0)
                .with_attr("reareasment", "y"),
            FeatureRecord::new().with_attr("calcfootage", 700.0),
        ]);
        assert_eq!(footage.strand_ft, 1000.0);
        assert_eq!(footage.reareasment_ft, 300.0);
    }

    #[test]
    fn make_ready_levels() {
        let pole = |level: AttributeValue| FeatureRecord::new().with_attr("MR_Level", level);
        assert!(is_make_ready(&pole(1.into())));
        assert!(is_make_ready(&pole(2.0.into())));
        assert!(is_make_ready(&pole("2".into())));
        assert!(!is_make_ready(&pole(3.into())));
        assert!(!is_make_ready(&FeatureRecord::new()));
    }

    #[test]
    fn uguard_threshold() {
        let conduit = |ducts: i64| FeatureRecord::new().with_attr("duct_count", ducts);
        assert_eq!(duct_sum(&[conduit(2), conduit(1)]), 3);
        assert!(needs_uguard(duct_sum(&[conduit(2), conduit(1)])));
        assert!(!needs_uguard(duct_sum(&[conduit(2)])));
        assert_eq!(
            duct_sum(&[conduit(2), FeatureRecord::new().with_attr("duct_count", "two")]),
            2
        );
    }
}
