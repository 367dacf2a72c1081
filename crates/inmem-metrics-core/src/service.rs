//! MetricsService: the four operations exposed to the boundary layer.
//!
//! Owns one explicitly constructed `MetricStore` and hands it by reference to
//! the ingest and query components.

use std::sync::Arc;

use crate::error::Result;
use crate::ingest::{IngestPipeline, StoreSummary};
use crate::model::{MetricsBatch, MultipleMetricsStoreRequest, MultipleMetricsTimeRangeQuery};
use crate::query::QueryEngine;
use crate::store::MetricStore;

pub struct MetricsService {
    store: Arc<MetricStore>,
    ingest: IngestPipeline,
    query: QueryEngine,
}

impl MetricsService {
    pub fn new(store: Arc<MetricStore>) -> Self {
        Self {
            ingest: IngestPipeline::new(Arc::clone(&store)),
            query: QueryEngine::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    pub fn project_names(&self) -> Vec<String> {
        self.store.list_projects().into_iter().collect()
    }

    /// Empty for an unknown project; not an error at this boundary.
    pub fn metric_names(&self, project: &str) -> Vec<String> {
        self.store.list_metric_names(project).into_iter().collect()
    }

    pub fn query(&self, q: &MultipleMetricsTimeRangeQuery) -> Result<MetricsBatch> {
        self.query.query(q)
    }

    pub fn store_metrics(&self, req: &MultipleMetricsStoreRequest) -> Result<StoreSummary> {
        self.ingest.store_metrics(req)
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new(Arc::new(MetricStore::new()))
    }
}
