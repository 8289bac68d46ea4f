//! Versioned template cell mapping
//!
//! The mapping is fixed per template version. One metric may land in several
//! cells; every destination receives the same value.

use std::fmt;

/// Main sheet, required
pub const SUMMARY_SHEET: &str = "Summary";
/// Engineering sheet, optional
pub const ENGINEERING_SHEET: &str = "Engineering";
/// Construction rate card, hidden after writing
pub const CONSTRUCTION_RATE_SHEET: &str = "RateCard";
/// Design rate card, hidden after writing
pub const DESIGN_RATE_SHEET: &str = "RateCard_E";

/// Sheet + A1 cell reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    /// Sheet name
    pub sheet: &'static str,
    /// A1 reference
    pub cell: &'static str,
}

impl CellRef {
    /// Create cell reference
    #[inline]
    #[must_use]
    pub const fn new(sheet: &'static str, cell: &'static str) -> Self {
        Self { sheet, cell }
    }

    /// Check the reference is A1 notation (letters then a non-zero row)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let split = self
            .cell
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.cell.len());
        let (column, row) = self.cell.split_at(split);
        !column.is_empty()
            && column.chars().all(|c| c.is_ascii_uppercase())
            && !row.is_empty()
            && !row.starts_with('0')
            && row.chars().all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.cell)
    }
}

/// One metric and every cell it is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMapping {
    /// Metric name
    pub metric: String,
    /// Destination cells on the mapping's sheet
    pub cells: Vec<&'static str>,
}

/// Where the vendor rates and run timestamp land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateCells {
    /// Construction rate on its rate card
    pub construction_card: CellRef,
    /// Design rate on its rate card
    pub design_card: CellRef,
    /// Design rate on the summary
    pub summary_design: CellRef,
    /// Construction rate on the summary
    pub summary_construction: CellRef,
    /// Run timestamp on the summary
    pub summary_timestamp: CellRef,
}

/// Full template mapping for one schema version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSchema {
    version: &'static str,
    summary: Vec<CellMapping>,
    engineering: Vec<CellMapping>,
    rates: RateCells,
    hidden_sheets: Vec<&'static str>,
}

const SUMMARY_V1_4: &[(&str, &[&str])] = &[
    ("total_ug1ft", &["D66", "D67", "D131"]),
    ("total_ug2ft", &["D68"]),
    ("total_1in_conduit", &["D126"]),
    ("total_2in_conduit", &["D125"]),
    ("total_4in_conduit", &["D127"]),
    ("total_sp1", &["D93"]),
    ("total_sp2", &["D94"]),
    ("total_sp3_excluding_f1", &["D95"]),
    ("fiber_12", &["D108"]),
    ("fiber_24", &["D107"]),
    ("fiber_48", &["D106"]),
    ("fiber_96", &["D105"]),
    ("fiber_144", &["D104"]),
    ("fiber_288", &["D103"]),
    ("fiber_432", &["D110"]),
    ("total_heatshrink", &["D132"]),
    ("fp_count", &["D79", "D123"]),
    ("sv_count", &["D74", "D118"]),
    ("mv_count", &["D75", "D119"]),
    ("lv_count", &["D76", "D120"]),
    ("xl_count", &["D77", "D121"]),
    ("xsv_count", &["D73", "D117"]),
    ("nid_count", &["D142"]),
    ("axl_count", &["D122"]),
    ("coyote_count", &["D133"]),
    ("x17_count", &["D134"]),
    ("x22_count", &["D135"]),
    ("x28_count", &["D137"]),
    ("x19_count", &["D136"]),
    ("runt_count", &["D138"]),
    ("total_closure_count", &["D89"]),
    ("hanger_bracket", &["D140"]),
    ("offset_bracket", &["D141"]),
    ("lash_closure_count", &["D91"]),
    ("drop_count", &["C25"]),
    ("total_hhp_mdu", &["C24"]),
    ("total_strand_ftg", &["D49", "D50", "D113", "D114"]),
    ("est_total_miles", &["C28"]),
    ("ae_bom_miles", &["C29"]),
    ("ug_bom_miles", &["C30"]),
    ("percent_ae", &["C31"]),
    ("percent_ug", &["C32"]),
    ("total_hhp", &["C26"]),
    ("total_f1_miles", &["C35"]),
    ("total_f2_miles", &["C38"]),
    ("total_f2_ug", &["C40"]),
    ("total_f2_ae", &["C39"]),
    ("total_ae_ftg", &["C33"]),
    ("total_ug_ftg", &["C34"]),
    ("total_f1_ae", &["C36"]),
    ("total_f1_ug", &["C37"]),
    ("pfd_1", &["D71"]),
    ("passive_144", &["D149"]),
    ("passive_288", &["D150"]),
    ("passive_432", &["D151"]),
    ("passive_576", &["D152"]),
    ("ug_closure_count", &["D147", "D148"]),
    ("snowshoes", &["D92", "D113"]),
    ("conduit_couplers_1in", &["D128"]),
    ("conduit_couplers_2in", &["D129"]),
    ("conduit_couplers_4in", &["D130"]),
    ("pfa_2", &["D51"]),
    ("total_risers", &["D58", "D112"]),
    ("cab_id", &["F2"]),
    ("serv_area", &["F3"]),
    ("city_code", &["F4"]),
    ("total_strand_ftg_reareasment_y", &["D52"]),
    ("total_cabinets", &["C42"]),
    ("count_over_600ft", &["C41"]),
    ("average_calcfootage", &["C44"]),
    ("total_pole_count", &["C27"]),
    ("mr_filtered_pole_count", &["D59"]),
    ("active_cabinet_count", &["C43", "D86", "D87", "D78", "D122"]),
    ("grounded_poles", &["D57"]),
    ("tree_trimming", &["D53"]),
    ("total_ug1ft_reareasment_Y", &["D72"]),
    ("down_count", &["D54"]),
    ("dirt_count", &["D55"]),
    ("rock_count", &["D56"]),
    ("total_anchors", &["D144"]),
    ("uguard_adapter", &["D111"]),
    ("lashing_wire", &["D116"]),
    ("special_crossing", &["D70"]),
];

const ENGINEERING_V1_4: &[(&str, &[&str])] = &[
    ("total_fiber_footage_ug_linear", &["F9"]),
    ("total_fiber_footage_ae_linear", &["F13"]),
    ("total_linear_footage", &["F7", "F15"]),
    ("e_epmrt_1", &["F19"]),
];

fn mappings(table: &[(&str, &'static [&'static str])]) -> Vec<CellMapping> {
    table
        .iter()
        .map(|(metric, cells)| CellMapping {
            metric: (*metric).to_string(),
            cells: cells.to_vec(),
        })
        .collect()
}

impl ReportSchema {
    /// Template mapping version 1.4
    #[must_use]
    pub fn v1_4() -> Self {
        Self {
            version: "1.4",
            summary: mappings(SUMMARY_V1_4),
            engineering: mappings(ENGINEERING_V1_4),
            rates: RateCells {
                construction_card: CellRef::new(CONSTRUCTION_RATE_SHEET, "E2"),
                design_card: CellRef::new(DESIGN_RATE_SHEET, "E2"),
                summary_design: CellRef::new(SUMMARY_SHEET, "F5"),
                summary_construction: CellRef::new(SUMMARY_SHEET, "F6"),
                summary_timestamp: CellRef::new(SUMMARY_SHEET, "F7"),
            },
            hidden_sheets: vec![CONSTRUCTION_RATE_SHEET, DESIGN_RATE_SHEET],
        }
    }

    /// With an extra summary mapping
    #[must_use]
    pub fn with_summary_cells(mut self, metric: impl Into<String>, cells: &[&'static str]) -> Self {
        self.summary.push(CellMapping {
            metric: metric.into(),
            cells: cells.to_vec(),
        });
        self
    }

    /// Schema version
    #[inline]
    #[must_use]
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Summary sheet mappings
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &[CellMapping] {
        &self.summary
    }

    /// Engineering sheet mappings
    #[inline]
    #[must_use]
    pub fn engineering(&self) -> &[CellMapping] {
        &self.engineering
    }

    /// Rate and timestamp cells
    #[inline]
    #[must_use]
    pub fn rates(&self) -> &RateCells {
        &self.rates
    }

    /// Sheets hidden after writing
    #[inline]
    #[must_use]
    pub fn hidden_sheets(&self) -> &[&'static str] {
        &self.hidden_sheets
    }

    /// Every metric cell reference, summary first
    pub fn cell_refs(&self) -> impl Iterator<Item = CellRef> + '_ {
        let summary = self
            .summary
            .iter()
            .flat_map(|mapping| mapping.cells.iter().map(|cell| CellRef::new(SUMMARY_SHEET, cell)));
        let engineering = self.engineering.iter().flat_map(|mapping| {
            mapping
                .cells
                .iter()
                .map(|cell| CellRef::new(ENGINEERING_SHEET, cell))
        });
        summary.chain(engineering)
    }
}

impl Default for ReportSchema {
    fn default() -> Self {
        Self::v1_4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_metrics::MetricKey;

    #[test]
    fn every_mapped_metric_is_known() {
        let schema = ReportSchema::v1_4();
        for mapping in schema.summary().iter().chain(schema.engineering()) {
            assert!(
                MetricKey::from_name(&mapping.metric).is_some(),
                "unknown metric {}",
                mapping.metric
            );
        }
    }

    #[test]
    fn every_cell_is_a1() {
        let schema = ReportSchema::v1_4();
        assert!(schema.cell_refs().all(|cell| cell.is_valid()));
        assert!(!CellRef::new(SUMMARY_SHEET, "D0").is_valid());
        assert!(!CellRef::new(SUMMARY_SHEET, "12").is_valid());
        assert!(!CellRef::new(SUMMARY_SHEET, "d5").is_valid());
    }

    #[test]
    fn replicated_destinations() {
        let schema = ReportSchema::v1_4();
        let strand = schema
            .summary()
            .iter()
            .find(|mapping| mapping.metric == "total_strand_ftg")
            .map(|mapping| mapping.cells.clone());
        assert_eq!(strand, Some(vec!["D49", "D50", "D113", "D114"]));
        assert_eq!(schema.version(), "1.4");
        assert_eq!(schema.rates().summary_timestamp.to_string(), "Summary!F7");
    }
}
