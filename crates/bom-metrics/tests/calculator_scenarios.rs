//! Derived metric scenarios over hand-built aggregate sets

use bom_aggregate::cabinets::CabinetTotals;
use bom_aggregate::cables::CableTotals;
use bom_aggregate::conduit::ConduitTotals;
use bom_aggregate::drops::DropTotals;
use bom_aggregate::addresses::AddressTotals;
use bom_aggregate::slack_loops::SlackLoopTotals;
use bom_aggregate::splice::SpliceTotals;
use bom_aggregate::strand::StrandTotals;
use bom_aggregate::AggregateSet;
use bom_metrics::{calculate, couplers, Advisory, MetricKey, MetricValue};
use bom_model::category::{CabinetSize, ConduitSize, FiberCount, GuyType, Hierarchy, SpliceSize};
use bom_model::{CategoryTotals, DegradedReason, LayerOutcome};
use bom_test_utils::test_boundary;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn strand(strand_ft: f64) -> LayerOutcome<StrandTotals> {
    LayerOutcome::Data(StrandTotals {
        strand_ft,
        ..StrandTotals::default()
    })
}

fn conduit(ug1_ft: f64, four_inch_ft: f64) -> LayerOutcome<ConduitTotals> {
    let mut by_size = CategoryTotals::new();
    by_size.add(ConduitSize::Inch4, four_inch_ft);
    LayerOutcome::Data(ConduitTotals {
        ug1_ft,
        by_size,
        ..ConduitTotals::default()
    })
}

fn with_cabinet() -> LayerOutcome<CabinetTotals> {
    let mut passive = CategoryTotals::new();
    passive.add(CabinetSize::S288, 1);
    LayerOutcome::Data(CabinetTotals { passive, active: 0 })
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn all_aerial_boundary() {
    let set = AggregateSet {
        strand: strand(1000.0),
        conduit: conduit(0.0, 0.0),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::PercentAe), 100.0);
    assert_eq!(metrics.number(MetricKey::PercentUg), 0.0);
    assert_eq!(metrics.number(MetricKey::AeBomMiles), 0.19);
    assert_eq!(metrics.number(MetricKey::UgBomMiles), 0.0);
    assert_eq!(metrics.number(MetricKey::EstTotalMiles), 0.19);
    assert!(metrics.advisories().contains(&Advisory::AnchorsMissing { strand_ft: 1000.0 }));
    assert!(!metrics.advisories().contains(&Advisory::PercentDivisionByZero));
}

#[test]
fn nothing_to_split() {
    let metrics = calculate(&test_boundary("FDH01"), &AggregateSet::empty());

    assert_eq!(metrics.number(MetricKey::PercentAe), 0.0);
    assert_eq!(metrics.number(MetricKey::PercentUg), 0.0);
    assert!(metrics.advisories().contains(&Advisory::PercentDivisionByZero));
    assert!(metrics.advisories().contains(&Advisory::ZeroCabinets));
    assert_eq!(metrics.number(MetricKey::EEpmrt1), 10.0);
    assert_eq!(metrics.len(), MetricKey::ALL.len());
}

#[test]
fn special_crossing_from_four_inch_conduit() {
    let set = AggregateSet {
        conduit: conduit(500.0, 200.0),
        cabinets: with_cabinet(),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::SpecialCrossing), 250.0);
    assert_eq!(metrics.number(MetricKey::Conduit4In), 200.0);
    assert_eq!(metrics.number(MetricKey::Couplers4In), 0.0);
    assert!(metrics
        .advisories()
        .contains(&Advisory::SpecialCrossingFootage { feet: 200.0 }));
    assert!(!metrics.advisories().contains(&Advisory::ZeroCabinets));
    assert_eq!(metrics.number(MetricKey::TotalCabinets), 1.0);
    assert_eq!(metrics.number(MetricKey::Passive288), 1.0);
}

#[test]
fn pfa_2_is_clamped() {
    let mut slack_ae = CategoryTotals::new();
    slack_ae.add(FiberCount::F48, 400.0);
    let set = AggregateSet {
        strand: strand(1000.0),
        cables: LayerOutcome::Data(CableTotals {
            slack_ae,
            ..CableTotals::default()
        }),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::Pfa2), 0.0);
    assert!(metrics.advisories().contains(&Advisory::NegativePfa2 { raw: -600.0 }));
}

#[test]
fn pfa_2_positive_passes_through() {
    let mut slack_ae = CategoryTotals::new();
    slack_ae.add(FiberCount::F48, 1200.0);
    let set = AggregateSet {
        strand: strand(1000.0),
        cables: LayerOutcome::Data(CableTotals {
            slack_ae,
            ..CableTotals::default()
        }),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::Pfa2), 200.0);
    assert_eq!(metrics.number(MetricKey::TotalAeFtg), 1200.0);
    assert_eq!(metrics.number(MetricKey::Fiber48), 1200.0);
}

#[test]
fn anchors_extend_strand_after_split() {
    let mut guys = CategoryTotals::new();
    guys.add(GuyType::Down, 2);
    guys.add(GuyType::Rock, 1);
    let set = AggregateSet {
        strand: LayerOutcome::Data(StrandTotals {
            strand_ft: 1000.0,
            pole_count: 8,
            make_ready_poles: 3,
            ..StrandTotals::default()
        }),
        conduit: conduit(1000.0, 0.0),
        guys: LayerOutcome::Data(guys),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::TotalAnchors), 3.0);
    assert_eq!(metrics.number(MetricKey::DownCount), 2.0);
    assert_eq!(metrics.number(MetricKey::TotalStrandFtg), 1075.0);
    assert_eq!(metrics.number(MetricKey::PercentAe), 50.0);
    assert_eq!(metrics.number(MetricKey::AeBomMiles), 0.19);
    assert_eq!(metrics.number(MetricKey::LashingWire), 1612.5);
    approx(metrics.number(MetricKey::TreeTrimming), 1075.0 * 0.175);
    assert_eq!(metrics.number(MetricKey::GroundedPoles), 2.0);
    assert_eq!(metrics.number(MetricKey::TotalPoleCount), 8.0);
    assert_eq!(metrics.number(MetricKey::MrFilteredPoleCount), 3.0);
    assert!(!metrics
        .advisories()
        .iter()
        .any(|advisory| matches!(advisory, Advisory::AnchorsMissing { .. })));
}

#[test]
fn fiber_material_combines_slack_and_loops() {
    let mut slack_ug = CategoryTotals::new();
    slack_ug.add(FiberCount::F144, 300.0);
    let mut slack_ae = CategoryTotals::new();
    slack_ae.add(FiberCount::F144, 200.0);
    let mut hierarchy_ug = CategoryTotals::new();
    hierarchy_ug.add(Hierarchy::F1, 300.0);
    let mut hierarchy_ae = CategoryTotals::new();
    hierarchy_ae.add(Hierarchy::F2, 5280.0);
    let mut loops_ug = CategoryTotals::new();
    loops_ug.add(FiberCount::F144, 100.0);
    let mut loops_ae = CategoryTotals::new();
    loops_ae.add(FiberCount::F144, 50.0);

    let mut by_size = CategoryTotals::new();
    by_size.add(SpliceSize::X22, 3);
    let set = AggregateSet {
        cables: LayerOutcome::Data(CableTotals {
            slack_ug,
            slack_ae,
            hierarchy_ug,
            hierarchy_ae,
            ..CableTotals::default()
        }),
        slack_loops: LayerOutcome::Data(SlackLoopTotals {
            ug_ft: loops_ug,
            ae_ft: loops_ae,
            ug_loops: 2,
            ae_loops: 1,
        }),
        splice: LayerOutcome::Data(SpliceTotals {
            by_size,
            hanger_brackets: 2,
            offset_brackets: 0,
        }),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::Fiber144), 650.0);
    assert_eq!(metrics.number(MetricKey::Slackloop144Ug), 100.0);
    assert_eq!(metrics.number(MetricKey::Pfd1), 400.0);
    assert_eq!(metrics.number(MetricKey::TotalF1Ug), 300.0);
    assert_eq!(metrics.number(MetricKey::TotalF2Ae), 5280.0);
    assert_eq!(metrics.number(MetricKey::TotalF2Miles), 1.0);
    assert_eq!(metrics.number(MetricKey::TotalF2AeMiles), 1.0);
    assert_eq!(metrics.number(MetricKey::TotalClosureCount), 3.0);
    assert_eq!(metrics.number(MetricKey::LashClosureCount), 2.0);
    assert_eq!(metrics.number(MetricKey::UgClosureCount), 1.0);
    assert_eq!(metrics.number(MetricKey::Snowshoes), 3.0);
    assert_eq!(metrics.number(MetricKey::TotalAeSlackloops), 1.0);
}

#[test]
fn homes_passed_and_drops() {
    let set = AggregateSet {
        drops: LayerOutcome::Data(DropTotals {
            count: 4,
            over_600_ft: 1,
            total_ft: 1000.0,
        }),
        addresses: LayerOutcome::Data(AddressTotals {
            addresses: 40,
            mdu_boundaries: 1,
            mdu_hhp: 12,
            dnb_boundaries: 1,
            dnb_addresses: 3,
        }),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::TotalHhp), 16.0);
    assert_eq!(metrics.number(MetricKey::TotalHhpMdu), 12.0);
    assert_eq!(metrics.number(MetricKey::AverageCalcfootage), 250.0);
    assert_eq!(metrics.number(MetricKey::CountOver600Ft), 1.0);
    assert_eq!(metrics.number(MetricKey::TotalDnbAddresses), 3.0);
}

#[test]
fn boundary_attributes_are_text() {
    let metrics = calculate(&test_boundary("fdh01"), &AggregateSet::empty());

    assert_eq!(
        metrics.get(MetricKey::CabId),
        Some(&MetricValue::Text("FDH01".to_string()))
    );
    assert_eq!(
        metrics.get_by_name("const_ven").and_then(MetricValue::as_str),
        Some("Acme")
    );
    assert_eq!(metrics.to_json()["serv_area"], "North");
}

#[test]
fn risers_missing_for_uguard() {
    let set = AggregateSet {
        strand: LayerOutcome::Data(StrandTotals {
            strand_ft: 100.0,
            uguard_adapters: 2,
            ..StrandTotals::default()
        }),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(metrics.number(MetricKey::UguardAdapter), 2.0);
    assert!(metrics
        .advisories()
        .contains(&Advisory::RisersMissing { uguard_adapters: 2 }));
}

#[test]
fn degraded_layers_lead_the_advisories() {
    let set = AggregateSet {
        drops: LayerOutcome::Degraded(DegradedReason::Backend("timeout".to_string())),
        ..AggregateSet::empty()
    };
    let metrics = calculate(&test_boundary("FDH01"), &set);

    assert_eq!(
        metrics.advisories().first(),
        Some(&Advisory::DegradedLayer {
            layer: "drops".to_string(),
            reason: "backend query failed: timeout".to_string(),
        })
    );
    assert_eq!(metrics.number(MetricKey::DropCount), 0.0);
}

proptest! {
    #[test]
    fn percentages_sum_to_hundred(strand_ft in 0.0f64..1e6, ug1 in 0.0f64..1e6) {
        prop_assume!(strand_ft + ug1 > 0.0);
        let set = AggregateSet {
            strand: strand(strand_ft),
            conduit: conduit(ug1, 0.0),
            ..AggregateSet::empty()
        };
        let metrics = calculate(&test_boundary("FDH01"), &set);
        let sum = metrics.number(MetricKey::PercentAe) + metrics.number(MetricKey::PercentUg);
        prop_assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn pfa_2_never_negative(slack in 0.0f64..1e5, strand_ft in 0.0f64..1e5) {
        let mut slack_ae = CategoryTotals::new();
        slack_ae.add(FiberCount::F12, slack);
        let set = AggregateSet {
            strand: strand(strand_ft),
            cables: LayerOutcome::Data(CableTotals { slack_ae, ..CableTotals::default() }),
            ..AggregateSet::empty()
        };
        let metrics = calculate(&test_boundary("FDH01"), &set);
        prop_assert!(metrics.number(MetricKey::Pfa2) >= 0.0);
    }

    #[test]
    fn couplers_are_whole_and_never_partial(feet in 0.0f64..1e6) {
        let count = couplers(feet);
        prop_assert_eq!(count.fract(), 0.0);
        if feet < 300.0 {
            prop_assert_eq!(count, 0.0);
        } else {
            prop_assert!(count >= 1.0);
        }
    }

    #[test]
    fn calculation_is_deterministic(strand_ft in 0.0f64..1e5, ug1 in 0.0f64..1e5) {
        let set = AggregateSet {
            strand: strand(strand_ft),
            conduit: conduit(ug1, 0.0),
            ..AggregateSet::empty()
        };
        let boundary = test_boundary("FDH01");
        prop_assert_eq!(calculate(&boundary, &set), calculate(&boundary, &set));
    }
}
