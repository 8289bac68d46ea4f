//! BOM Metrics - derived quantities for the BOM template
//!
//! [`calculate`] turns an [`AggregateSet`](bom_aggregate::AggregateSet) into
//! an immutable [`DerivedMetrics`] set: mileage, AE/UG split, couplers,
//! strand allowances, material totals and homes passed, plus the
//! [`Advisory`] findings raised along the way.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod advisory;
mod calculator;
mod key;
mod metrics;

pub use advisory::Advisory;
pub use calculator::{
    calculate, couplers, percent_split, special_crossing, E_EPMRT_1, FEET_PER_COUPLER,
    GROUNDED_POLE_RATIO, LASHING_WIRE_RATIO, SPECIAL_CROSSING_ALLOWANCE_FT, STRAND_FT_PER_ANCHOR,
    TREE_TRIMMING_RATIO,
};
pub use key::MetricKey;
pub use metrics::{DerivedMetrics, MetricValue};
