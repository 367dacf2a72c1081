//! IngestPipeline: validate, reconcile metadata, aggregate.
//!
//! Every check that can fail runs before the first mutation. Once metadata is
//! reconciled the remaining work is infallible, so a store request either
//! commits metadata and values together or leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{MetricsError, Result};
use crate::model::{MetricType, MetricValue, MultipleMetricsStoreRequest, Tagset, Timestamp};
use crate::store::MetricStore;

/// Outcome of an accepted store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    /// Cells written (a cell written twice in one request counts twice).
    pub cells_written: usize,
    /// Metric names declared for the first time by this request.
    pub metadata_declared: usize,
}

/// A validated write waiting for commit.
struct StagedCell<'a> {
    tagset: &'a Tagset,
    metric: &'a str,
    ty: MetricType,
    value: MetricValue,
}

/// A request that passed validation.
struct StagedRequest<'a> {
    project: &'a str,
    timestamp: Timestamp,
    declarations: BTreeMap<String, MetricType>,
    cells: Vec<StagedCell<'a>>,
}

pub struct IngestPipeline {
    store: Arc<MetricStore>,
}

impl IngestPipeline {
    pub fn new(store: Arc<MetricStore>) -> Self {
        Self { store }
    }

    pub fn store_metrics(&self, req: &MultipleMetricsStoreRequest) -> Result<StoreSummary> {
        let staged = self.validate(req)?;

        // Re-checked under the catalog lock: a concurrent first writer may
        // have declared a different type since validation read the catalog.
        let metadata_declared = self
            .store
            .declare_all(staged.project, &staged.declarations)?;

        let cells_written = staged.cells.len();
        for cell in &staged.cells {
            self.aggregate(staged.project, staged.timestamp, cell);
        }

        tracing::debug!(
            project = %staged.project,
            timestamp = %staged.timestamp,
            cells_written,
            metadata_declared,
            "store request committed"
        );

        Ok(StoreSummary {
            cells_written,
            metadata_declared,
        })
    }

    fn validate<'a>(&self, req: &'a MultipleMetricsStoreRequest) -> Result<StagedRequest<'a>> {
        let project = req.project.as_str();
        if project.trim().is_empty() {
            return Err(MetricsError::validation("project must not be empty"));
        }

        let mut declarations = BTreeMap::new();
        for (metric, meta) in &req.metadata_map {
            if metric.trim().is_empty() {
                return Err(MetricsError::validation(
                    "metadata map must not contain blank metric names",
                ));
            }
            if let Some(existing) = self.store.get_metadata(project, metric) {
                if existing != meta.metric_type {
                    return Err(MetricsError::redeclared(metric, existing, meta.metric_type));
                }
            }
            declarations.insert(metric.clone(), meta.metric_type);
        }

        let mut cells = Vec::new();
        for entry in &req.metrics_values {
            for (metric, value) in &entry.values {
                if metric.trim().is_empty() {
                    return Err(MetricsError::validation(
                        "metric values must not contain blank metric names",
                    ));
                }
                let ty = declarations
                    .get(metric)
                    .copied()
                    .or_else(|| self.store.get_metadata(project, metric))
                    .ok_or_else(|| {
                        MetricsError::validation(format!(
                            "metric '{metric}' has no declared type"
                        ))
                    })?;
                cells.push(StagedCell {
                    tagset: &entry.tags,
                    metric,
                    ty,
                    value: ty.conform(metric, *value)?,
                });
            }
        }

        Ok(StagedRequest {
            project,
            timestamp: req.timestamp,
            declarations,
            cells,
        })
    }

    /// Apply one staged value.
    ///
    /// First write to a cell: counters chain onto the predecessor's cumulative
    /// value, gauges store the candidate. Repeat write to a cell: counters add
    /// the candidate in place, gauges overwrite.
    fn aggregate(&self, project: &str, ts: Timestamp, cell: &StagedCell<'_>) -> MetricValue {
        let store = &self.store;
        store.update(project, ts, cell.tagset, cell.metric, |existing| {
            match (existing, cell.ty.is_cumulative()) {
                (Some(current), true) => current.accumulate(cell.value),
                (None, true) => match store.predecessor_value(project, ts, cell.tagset, cell.metric) {
                    Some(previous) => previous.accumulate(cell.value),
                    None => cell.value,
                },
                (_, false) => cell.value,
            }
        })
    }
}
