//! Derived metrics calculator
//!
//! A pure function of the boundary and the aggregate set. Footage is fed in
//! as aggregated (strand already carries its sag allowance); the anchor
//! allowance is added here, after percentages and mileage are taken.

use crate::advisory::Advisory;
use crate::key::MetricKey;
use crate::metrics::{DerivedMetrics, MetricValue};
use bom_aggregate::AggregateSet;
use bom_model::category::{
    CabinetSize, ConduitSize, FiberCount, GuyType, Hierarchy, Placement, SpliceSize, StructureType,
};
use bom_model::units::{feet_to_miles, round2};
use bom_model::{Boundary, Category};
use std::collections::BTreeMap;

/// Conduit footage per coupler
pub const FEET_PER_COUPLER: f64 = 300.0;

/// Strand allowance per anchor
pub const STRAND_FT_PER_ANCHOR: f64 = 25.0;

/// Allowance added to 4" conduit for a special crossing
pub const SPECIAL_CROSSING_ALLOWANCE_FT: f64 = 50.0;

/// Share of touching poles that need grounding
pub const GROUNDED_POLE_RATIO: f64 = 0.25;

/// Tree trimming per strand foot
pub const TREE_TRIMMING_RATIO: f64 = 0.175;

/// Lashing wire per strand foot
pub const LASHING_WIRE_RATIO: f64 = 1.5;

/// Fixed engineering project-manager run time
pub const E_EPMRT_1: f64 = 10.0;

/// Couplers for a conduit run; never a partial coupler
#[must_use]
pub fn couplers(feet: f64) -> f64 {
    let raw = feet / FEET_PER_COUPLER;
    if raw < 1.0 {
        0.0
    } else {
        raw.round_ties_even()
    }
}

/// Aerial / underground split in percent; zeros when there is no footage
#[must_use]
pub fn percent_split(strand_ft: f64, ug1_ft: f64) -> Option<(f64, f64)> {
    let total = strand_ft + ug1_ft;
    if total == 0.0 {
        None
    } else {
        Some((strand_ft / total * 100.0, ug1_ft / total * 100.0))
    }
}

/// Special crossing footage
#[must_use]
pub fn special_crossing(conduit_4in_ft: f64) -> f64 {
    if conduit_4in_ft > 0.0 {
        conduit_4in_ft + SPECIAL_CROSSING_ALLOWANCE_FT
    } else {
        0.0
    }
}

fn fiber_key(fiber: FiberCount) -> MetricKey {
    match fiber {
        FiberCount::F12 => MetricKey::Fiber12,
        FiberCount::F24 => MetricKey::Fiber24,
        FiberCount::F48 => MetricKey::Fiber48,
        FiberCount::F96 => MetricKey::Fiber96,
        FiberCount::F144 => MetricKey::Fiber144,
        FiberCount::F288 => MetricKey::Fiber288,
        FiberCount::F432 => MetricKey::Fiber432,
    }
}

fn slackloop_ug_key(fiber: FiberCount) -> MetricKey {
    match fiber {
        FiberCount::F12 => MetricKey::Slackloop12Ug,
        FiberCount::F24 => MetricKey::Slackloop24Ug,
        FiberCount::F48 => MetricKey::Slackloop48Ug,
        FiberCount::F96 => MetricKey::Slackloop96Ug,
        FiberCount::F144 => MetricKey::Slackloop144Ug,
        FiberCount::F288 => MetricKey::Slackloop288Ug,
        FiberCount::F432 => MetricKey::Slackloop432Ug,
    }
}

fn structure_key(kind: StructureType) -> MetricKey {
    match kind {
        StructureType::Fp => MetricKey::FpCount,
        StructureType::Sv => MetricKey::SvCount,
        StructureType::Mv => MetricKey::MvCount,
        StructureType::Lv => MetricKey::LvCount,
        StructureType::Xl => MetricKey::XlCount,
        StructureType::Xsv => MetricKey::XsvCount,
        StructureType::NidBox => MetricKey::NidCount,
        StructureType::Xxl => MetricKey::AxlCount,
    }
}

fn splice_key(size: SpliceSize) -> MetricKey {
    match size {
        SpliceSize::CoyoteOne => MetricKey::CoyoteCount,
        SpliceSize::X17 => MetricKey::X17Count,
        SpliceSize::X22 => MetricKey::X22Count,
        SpliceSize::X28 => MetricKey::X28Count,
        SpliceSize::X19 => MetricKey::X19Count,
        SpliceSize::Runt => MetricKey::RuntCount,
    }
}

fn passive_key(size: CabinetSize) -> MetricKey {
    match size {
        CabinetSize::S144 => MetricKey::Passive144,
        CabinetSize::S288 => MetricKey::Passive288,
        CabinetSize::S432 => MetricKey::Passive432,
        CabinetSize::S576 => MetricKey::Passive576,
    }
}

fn guy_key(kind: GuyType) -> MetricKey {
    match kind {
        GuyType::Down => MetricKey::DownCount,
        GuyType::Dirt => MetricKey::DirtCount,
        GuyType::Rock => MetricKey::RockCount,
    }
}

#[derive(Default)]
struct Builder {
    values: BTreeMap<MetricKey, MetricValue>,
    advisories: Vec<Advisory>,
}

impl Builder {
    fn set(&mut self, key: MetricKey, value: impl Into<MetricValue>) {
        self.values.insert(key, value.into());
    }

    fn advise(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }
}

/// Compute the derived metrics for one boundary
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn calculate(boundary: &Boundary, set: &AggregateSet) -> DerivedMetrics {
    let mut out = Builder::default();

    for (layer, reason) in set.degraded() {
        out.advise(Advisory::DegradedLayer {
            layer: layer.to_string(),
            reason: reason.to_string(),
        });
    }

    let conduit = set.conduit.data_or_default();
    let structures = set.structures.data_or_default();
    let splice = set.splice.data_or_default();
    let cables = set.cables.data_or_default();
    let loops = set.slack_loops.data_or_default();
    let strand = set.strand.data_or_default();
    let guys = set.guys.data_or_default();
    let cabinets = set.cabinets.data_or_default();
    let risers = set.risers.data_or_default();
    let drops = set.drops.data_or_default();
    let addresses = set.addresses.data_or_default();

    // boundary
    let attributes = boundary.attributes();
    out.set(MetricKey::CabId, boundary.id().as_str());
    out.set(MetricKey::ServArea, attributes.service_area.as_str());
    out.set(MetricKey::CityCode, attributes.city_code.as_str());
    out.set(MetricKey::ConstVen, attributes.construction_vendor.as_str());

    // conduit
    let conduit_4in = conduit.footage(ConduitSize::Inch4);
    out.set(MetricKey::TotalUg1Ft, conduit.ug1_ft);
    out.set(MetricKey::TotalUg2Ft, conduit.ug2_ft);
    out.set(MetricKey::TotalUg1FtReareasment, conduit.ug1_reareasment_ft);
    out.set(MetricKey::Conduit1In, conduit.footage(ConduitSize::Inch1_25));
    out.set(MetricKey::Conduit2In, conduit.footage(ConduitSize::Inch2));
    out.set(MetricKey::Conduit4In, conduit_4in);
    out.set(MetricKey::Couplers1In, couplers(conduit.footage(ConduitSize::Inch1_25)));
    out.set(MetricKey::Couplers2In, couplers(conduit.footage(ConduitSize::Inch2)));
    out.set(MetricKey::Couplers4In, couplers(conduit_4in));
    out.set(MetricKey::SpecialCrossing, special_crossing(conduit_4in));
    if conduit_4in > 0.0 {
        out.advise(Advisory::SpecialCrossingFootage { feet: conduit_4in });
    }

    // structures and closures
    for (kind, count) in structures.iter() {
        out.set(structure_key(kind), count);
    }
    for (size, count) in splice.by_size.iter() {
        out.set(splice_key(size), count);
    }
    out.set(MetricKey::TotalClosureCount, splice.total_closures());
    out.set(MetricKey::HangerBracket, splice.hanger_brackets);
    out.set(MetricKey::OffsetBracket, splice.offset_brackets);
    out.set(MetricKey::LashClosureCount, splice.lash_closures());
    out.set(MetricKey::UgClosureCount, splice.ug_closures());

    // fiber
    for fiber in FiberCount::ALL.iter().copied() {
        let material = cables.slack(Placement::Ug, fiber)
            + cables.slack(Placement::Ae, fiber)
            + loops.footage(fiber);
        out.set(fiber_key(fiber), material);
        out.set(slackloop_ug_key(fiber), loops.ug_ft.get(fiber));
    }
    out.set(MetricKey::TotalSp1, cables.sp1);
    out.set(MetricKey::TotalSp2, cables.sp2);
    out.set(MetricKey::TotalSp3ExcludingF1, cables.sp3_excluding_f1);
    out.set(MetricKey::TotalHeatshrink, cables.heatshrink());
    out.set(MetricKey::Pfd1, cables.total_slack_ug() + loops.ug_ft.sum());
    out.set(MetricKey::TotalAeFtg, cables.total_slack_ae());
    out.set(MetricKey::TotalUgFtg, cables.total_slack_ug());
    out.set(MetricKey::FiberFootageUgLinear, cables.ug_linear_ft);
    out.set(MetricKey::FiberFootageAeLinear, cables.ae_linear_ft);
    out.set(MetricKey::TotalLinearFootage, cables.ug_linear_ft + cables.ae_linear_ft);
    out.set(MetricKey::TotalUgSlackloops, loops.ug_loops);
    out.set(MetricKey::TotalAeSlackloops, loops.ae_loops);

    let f1_ug = cables.hierarchy(Hierarchy::F1, Placement::Ug);
    let f1_ae = cables.hierarchy(Hierarchy::F1, Placement::Ae);
    let f2_ug = cables.hierarchy(Hierarchy::F2, Placement::Ug);
    let f2_ae = cables.hierarchy(Hierarchy::F2, Placement::Ae);
    out.set(MetricKey::TotalF1Ug, f1_ug);
    out.set(MetricKey::TotalF1Ae, f1_ae);
    out.set(MetricKey::TotalF2Ug, f2_ug);
    out.set(MetricKey::TotalF2Ae, f2_ae);
    out.set(MetricKey::TotalF1, f1_ug + f1_ae);
    out.set(MetricKey::TotalF2, f2_ug + f2_ae);
    out.set(MetricKey::TotalF1Miles, feet_to_miles(f1_ug + f1_ae));
    out.set(MetricKey::TotalF1AeMiles, feet_to_miles(f1_ae));
    out.set(MetricKey::TotalF1UgMiles, feet_to_miles(f1_ug));
    out.set(MetricKey::TotalF2Miles, feet_to_miles(f2_ug + f2_ae));
    out.set(MetricKey::TotalF2AeMiles, feet_to_miles(f2_ae));
    out.set(MetricKey::TotalF2UgMiles, feet_to_miles(f2_ug));

    // strand split, before the anchor allowance
    out.set(MetricKey::EstTotalMiles, feet_to_miles(strand.strand_ft + conduit.ug1_ft));
    out.set(MetricKey::AeBomMiles, feet_to_miles(strand.strand_ft));
    out.set(MetricKey::UgBomMiles, feet_to_miles(conduit.ug1_ft));
    let (percent_ae, percent_ug) = percent_split(strand.strand_ft, conduit.ug1_ft).unwrap_or_else(|| {
        out.advise(Advisory::PercentDivisionByZero);
        (0.0, 0.0)
    });
    out.set(MetricKey::PercentAe, percent_ae);
    out.set(MetricKey::PercentUg, percent_ug);

    let pfa_2 = cables.total_slack_ae() - strand.strand_ft;
    if pfa_2 < 0.0 {
        out.advise(Advisory::NegativePfa2 { raw: pfa_2 });
    }
    out.set(MetricKey::Pfa2, pfa_2.max(0.0));
    out.set(MetricKey::Snowshoes, loops.ae_loops + splice.lash_closures());

    // strand, poles, anchors
    let anchors = guys.sum();
    for (kind, count) in guys.iter() {
        out.set(guy_key(kind), count);
    }
    #[allow(clippy::cast_precision_loss)]
    let strand_with_anchors = strand.strand_ft + STRAND_FT_PER_ANCHOR * anchors as f64;
    out.set(MetricKey::TotalAnchors, anchors);
    out.set(MetricKey::TotalStrandFtg, strand_with_anchors);
    out.set(MetricKey::TotalStrandFtgReareasment, strand.strand_reareasment_ft);
    out.set(MetricKey::TotalPoleCount, strand.pole_count);
    out.set(MetricKey::MrFilteredPoleCount, strand.make_ready_poles);
    out.set(MetricKey::UguardAdapter, strand.uguard_adapters);
    #[allow(clippy::cast_precision_loss)]
    let grounded_poles = strand.pole_count as f64 * GROUNDED_POLE_RATIO;
    out.set(MetricKey::GroundedPoles, grounded_poles);
    out.set(MetricKey::TreeTrimming, strand_with_anchors * TREE_TRIMMING_RATIO);
    out.set(MetricKey::LashingWire, round2(strand_with_anchors * LASHING_WIRE_RATIO));
    out.set(MetricKey::EEpmrt1, E_EPMRT_1);

    // cabinets and risers
    for (size, count) in cabinets.passive.iter() {
        out.set(passive_key(size), count);
    }
    out.set(MetricKey::TotalCabinets, cabinets.total_passive());
    out.set(MetricKey::ActiveCabinetCount, cabinets.active);
    out.set(MetricKey::TotalRisers, risers);
    if cabinets.total_passive() == 0 {
        out.advise(Advisory::ZeroCabinets);
    }
    if strand.uguard_adapters > 0 && risers == 0 {
        out.advise(Advisory::RisersMissing {
            uguard_adapters: strand.uguard_adapters,
        });
    }
    if anchors == 0 && strand_with_anchors > 0.0 {
        out.advise(Advisory::AnchorsMissing {
            strand_ft: strand_with_anchors,
        });
    }

    // drops and homes passed
    out.set(MetricKey::DropCount, drops.count);
    out.set(MetricKey::CountOver600Ft, drops.over_600_ft);
    out.set(MetricKey::AverageCalcfootage, drops.average_ft());
    out.set(MetricKey::TotalHhpMdu, addresses.mdu_hhp);
    #[allow(clippy::cast_precision_loss)]
    let total_hhp = drops.count as f64 + addresses.mdu_hhp as f64;
    out.set(MetricKey::TotalHhp, total_hhp);
    out.set(MetricKey::TotalDnbAddresses, addresses.dnb_addresses);
    out.set(MetricKey::TotalAddresses, addresses.addresses);
    out.set(MetricKey::MduBoundaryCount, addresses.mdu_boundaries);
    out.set(MetricKey::DnbBoundaryCount, addresses.dnb_boundaries);

    for advisory in &out.advisories {
        tracing::warn!(boundary = %boundary.id(), %advisory, "advisory");
    }
    tracing::info!(
        boundary = %boundary.id(),
        metrics = out.values.len(),
        advisories = out.advisories.len(),
        "derived metrics calculated"
    );
    DerivedMetrics::new(out.values, out.advisories)
}
