//! All aggregators for one boundary

use crate::addresses::AddressTotals;
use crate::cabinets::CabinetTotals;
use crate::cables::CableTotals;
use crate::conduit::ConduitTotals;
use crate::context::AggregationContext;
use crate::drops::DropTotals;
use crate::guys::GuyCounts;
use crate::slack_loops::SlackLoopTotals;
use crate::splice::SpliceTotals;
use crate::strand::StrandTotals;
use crate::structures::StructureCounts;
use crate::{addresses, cabinets, cables, conduit, drops, guys, risers, slack_loops, splice, strand, structures};
use bom_model::{DegradedReason, LayerOutcome};

/// Outcome of every aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSet {
    /// Conduit
    pub conduit: LayerOutcome<ConduitTotals>,
    /// Structures
    pub structures: LayerOutcome<StructureCounts>,
    /// Splice closures
    pub splice: LayerOutcome<SpliceTotals>,
    /// Cables
    pub cables: LayerOutcome<CableTotals>,
    /// Maintenance loops
    pub slack_loops: LayerOutcome<SlackLoopTotals>,
    /// Strand and poles
    pub strand: LayerOutcome<StrandTotals>,
    /// Guys
    pub guys: LayerOutcome<GuyCounts>,
    /// Cabinets
    pub cabinets: LayerOutcome<CabinetTotals>,
    /// Risers
    pub risers: LayerOutcome<u64>,
    /// Drops
    pub drops: LayerOutcome<DropTotals>,
    /// Addresses and dwelling units
    pub addresses: LayerOutcome<AddressTotals>,
}

impl AggregateSet {
    /// Every aggregator legitimately empty
    #[must_use]
    pub fn empty() -> Self {
        Self {
            conduit: LayerOutcome::Empty,
            structures: LayerOutcome::Empty,
            splice: LayerOutcome::Empty,
            cables: LayerOutcome::Empty,
            slack_loops: LayerOutcome::Empty,
            strand: LayerOutcome::Empty,
            guys: LayerOutcome::Empty,
            cabinets: LayerOutcome::Empty,
            risers: LayerOutcome::Empty,
            drops: LayerOutcome::Empty,
            addresses: LayerOutcome::Empty,
        }
    }

    /// Aggregators that fell back to zeros, in run order
    #[must_use]
    pub fn degraded(&self) -> Vec<(&'static str, DegradedReason)> {
        let reasons = [
            ("conduit", self.conduit.degraded_reason()),
            ("structures", self.structures.degraded_reason()),
            ("splice_enclosures", self.splice.degraded_reason()),
            ("cables", self.cables.degraded_reason()),
            ("slack_loops", self.slack_loops.degraded_reason()),
            ("strand", self.strand.degraded_reason()),
            ("guys", self.guys.degraded_reason()),
            ("cabinets", self.cabinets.degraded_reason()),
            ("risers", self.risers.degraded_reason()),
            ("drops", self.drops.degraded_reason()),
            ("addresses", self.addresses.degraded_reason()),
        ];
        reasons
            .into_iter()
            .filter_map(|(name, reason)| reason.map(|reason| (name, reason.clone())))
            .collect()
    }
}

impl Default for AggregateSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Run every aggregator, one query at a time, in fixed order
pub async fn aggregate_all(ctx: &AggregationContext<'_>) -> AggregateSet {
    tracing::info!(boundary = %ctx.boundary().id(), "aggregating layers");
    let set = AggregateSet {
        conduit: conduit::aggregate(ctx).await,
        structures: structures::aggregate(ctx).await,
        splice: splice::aggregate(ctx).await,
        cables: cables::aggregate(ctx).await,
        slack_loops: slack_loops::aggregate(ctx).await,
        strand: strand::aggregate(ctx).await,
        guys: guys::aggregate(ctx).await,
        cabinets: cabinets::aggregate(ctx).await,
        risers: risers::aggregate(ctx).await,
        drops: drops::aggregate(ctx).await,
        addresses: addresses::aggregate(ctx).await,
    };
    let degraded = set.degraded().len();
    if degraded > 0 {
        tracing::warn!(boundary = %ctx.boundary().id(), degraded, "aggregation finished with degraded layers");
    } else {
        tracing::info!(boundary = %ctx.boundary().id(), "aggregation finished");
    }
    set
}
