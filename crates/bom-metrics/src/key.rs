//! Metric keys
//!
//! The key names are the template's stable vocabulary; spelling (including
//! the odd `_Y` / `_y` suffixes) must not change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! metric_keys {
    ( $( $variant:ident => $name:literal ),+ $(,)? ) => {
        /// Name of one derived metric
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum MetricKey {
            $( $variant ),+
        }

        impl MetricKey {
            /// Every key, in reporting order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable metric name
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $name ),+
                }
            }
        }
    };
}

metric_keys! {
    TotalUg1Ft => "total_ug1ft",
    TotalUg2Ft => "total_ug2ft",
    Conduit1In => "total_1in_conduit",
    Conduit2In => "total_2in_conduit",
    Conduit4In => "total_4in_conduit",
    Couplers1In => "conduit_couplers_1in",
    Couplers2In => "conduit_couplers_2in",
    Couplers4In => "conduit_couplers_4in",
    TotalSp1 => "total_sp1",
    TotalSp2 => "total_sp2",
    TotalSp3ExcludingF1 => "total_sp3_excluding_f1",
    Fiber12 => "fiber_12",
    Fiber24 => "fiber_24",
    Fiber48 => "fiber_48",
    Fiber96 => "fiber_96",
    Fiber144 => "fiber_144",
    Fiber288 => "fiber_288",
    Fiber432 => "fiber_432",
    TotalHeatshrink => "total_heatshrink",
    FpCount => "fp_count",
    SvCount => "sv_count",
    MvCount => "mv_count",
    LvCount => "lv_count",
    XlCount => "xl_count",
    XsvCount => "xsv_count",
    NidCount => "nid_count",
    AxlCount => "axl_count",
    CoyoteCount => "coyote_count",
    X17Count => "x17_count",
    X22Count => "x22_count",
    X28Count => "x28_count",
    X19Count => "x19_count",
    RuntCount => "runt_count",
    TotalClosureCount => "total_closure_count",
    HangerBracket => "hanger_bracket",
    OffsetBracket => "offset_bracket",
    DropCount => "drop_count",
    TotalHhpMdu => "total_hhp_mdu",
    TotalDnbAddresses => "total_dnb_addresses",
    Slackloop12Ug => "slackloop_12_ug",
    Slackloop24Ug => "slackloop_24_ug",
    Slackloop48Ug => "slackloop_48_ug",
    Slackloop96Ug => "slackloop_96_ug",
    Slackloop144Ug => "slackloop_144_ug",
    Slackloop288Ug => "slackloop_288_ug",
    Slackloop432Ug => "slackloop_432_ug",
    Pfd1 => "pfd_1",
    TotalStrandFtg => "total_strand_ftg",
    EstTotalMiles => "est_total_miles",
    AeBomMiles => "ae_bom_miles",
    UgBomMiles => "ug_bom_miles",
    PercentAe => "percent_ae",
    PercentUg => "percent_ug",
    LashClosureCount => "lash_closure_count",
    TotalF1 => "total_f1",
    TotalF2 => "total_f2",
    TotalF1Miles => "total_f1_miles",
    TotalF1AeMiles => "total_f1_ae_miles",
    TotalF1UgMiles => "total_f1_ug_miles",
    TotalF2Miles => "total_f2_miles",
    TotalF2AeMiles => "total_f2_ae_miles",
    TotalF2UgMiles => "total_f2_ug_miles",
    TotalF2Ug => "total_f2_ug",
    TotalF2Ae => "total_f2_ae",
    TotalAeFtg => "total_ae_ftg",
    TotalUgFtg => "total_ug_ftg",
    TotalF1Ae => "total_f1_ae",
    TotalF1Ug => "total_f1_ug",
    Passive144 => "passive_144",
    Passive288 => "passive_288",
    Passive432 => "passive_432",
    Passive576 => "passive_576",
    UgClosureCount => "ug_closure_count",
    Snowshoes => "snowshoes",
    Pfa2 => "pfa_2",
    TotalRisers => "total_risers",
    CabId => "cab_id",
    ServArea => "serv_area",
    CityCode => "city_code",
    ConstVen => "const_ven",
    TotalStrandFtgReareasment => "total_strand_ftg_reareasment_y",
    FiberFootageUgLinear => "total_fiber_footage_ug_linear",
    FiberFootageAeLinear => "total_fiber_footage_ae_linear",
    TotalCabinets => "total_cabinets",
    CountOver600Ft => "count_over_600ft",
    AverageCalcfootage => "average_calcfootage",
    TotalPoleCount => "total_pole_count",
    MrFilteredPoleCount => "mr_filtered_pole_count",
    TotalLinearFootage => "total_linear_footage",
    ActiveCabinetCount => "active_cabinet_count",
    GroundedPoles => "grounded_poles",
    TreeTrimming => "tree_trimming",
    TotalUg1FtReareasment => "total_ug1ft_reareasment_Y",
    EEpmrt1 => "e_epmrt_1",
    TotalHhp => "total_hhp",
    DownCount => "down_count",
    DirtCount => "dirt_count",
    RockCount => "rock_count",
    TotalAnchors => "total_anchors",
    UguardAdapter => "uguard_adapter",
    LashingWire => "lashing_wire",
    SpecialCrossing => "special_crossing",
    TotalAddresses => "total_addresses",
    MduBoundaryCount => "mdu_boundary_count",
    DnbBoundaryCount => "dnb_boundary_count",
    TotalUgSlackloops => "total_ug_slackloops",
    TotalAeSlackloops => "total_ae_slackloops",
}

impl MetricKey {
    /// Look up a key by its stable name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown metric key: {name}")))
    }
}
