//! Feature service port
//!
//! The only boundary between the roll-up engine and a GIS backend. Queries
//! are awaited one at a time by callers; implementations need not be
//! re-entrant beyond `Send + Sync`.

use crate::error::QueryResult;
use crate::filter::FeatureQuery;
use crate::layer::LayerId;
use async_trait::async_trait;
use bom_model::FeatureRecord;

/// Read-only access to thematic feature layers
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait FeatureService: Send + Sync {
    /// Run one query against a layer
    async fn query(&self, layer: &LayerId, query: &FeatureQuery) -> QueryResult<Vec<FeatureRecord>>;
}

#[async_trait]
impl<S: FeatureService + ?Sized> FeatureService for std::sync::Arc<S> {
    async fn query(&self, layer: &LayerId, query: &FeatureQuery) -> QueryResult<Vec<FeatureRecord>> {
        (**self).query(layer, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::filter::AttributeFilter;

    #[tokio::test]
    async fn mock_service_reports_backend_failure() {
        let mut service = MockFeatureService::new();
        service
            .expect_query()
            .returning(|_, _| Err(QueryError::backend("503")));

        let query = FeatureQuery::matching(AttributeFilter::eq("cab_id", "X"));
        let err = service.query(&LayerId::new("layer"), &query).await.unwrap_err();
        assert_eq!(err, QueryError::backend("503"));
    }
}
