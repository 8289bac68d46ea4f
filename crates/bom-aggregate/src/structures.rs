//! Underground structure counts

use crate::context::AggregationContext;
use bom_model::category::StructureType;
use bom_model::{Category, CategoryTotals, FeatureRecord, LayerOutcome};
use bom_query::LayerKey;

/// Count of each structure type
pub type StructureCounts = CategoryTotals<StructureType, u64>;

/// Tally structures by `structuretype`; unknown types are dropped
#[must_use]
pub fn tally(features: &[FeatureRecord]) -> StructureCounts {
    let mut counts = StructureCounts::new();
    for feature in features {
        if let Some(kind) = StructureType::classify(&feature.text("structuretype")) {
            counts.add(kind, 1);
        }
    }
    counts
}

/// Aggregate structures contained by the boundary
pub async fn aggregate(ctx: &AggregationContext<'_>) -> LayerOutcome<StructureCounts> {
    let result = ctx.contained(LayerKey::Structures, "structuretype", false).await;
    let outcome = ctx.settle(LayerKey::Structures, result, tally);
    if let Some(counts) = outcome.data() {
        for (kind, count) in counts.iter() {
            tracing::info!(boundary = %ctx.boundary().id(), structure = %kind, count, "structure count");
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_codes_only() {
        let features: Vec<_> = ["FP", "FP", "XXL", "NID Box", "nid box", "Handhole"]
            .into_iter()
            .map(|code| FeatureRecord::new().with_attr("structuretype", code))
            .collect();
        let counts = tally(&features);
        assert_eq!(counts.get(StructureType::Fp), 2);
        assert_eq!(counts.get(StructureType::Xxl), 1);
        assert_eq!(counts.get(StructureType::NidBox), 1);
        assert_eq!(counts.sum(), 4);
    }
}
