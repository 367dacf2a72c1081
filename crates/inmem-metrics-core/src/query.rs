//! QueryEngine: inclusive time window, tag AND-match, metric projection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::{MetricsError, Result};
use crate::model::{
    MetricsBatch, MetricsMetadata, MetricsValuesGroup, MultipleMetricsTimeRangeQuery, ValueBag,
};
use crate::store::MetricStore;

pub struct QueryEngine {
    store: Arc<MetricStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<MetricStore>) -> Self {
        Self { store }
    }

    pub fn query(&self, q: &MultipleMetricsTimeRangeQuery) -> Result<MetricsBatch> {
        validate(q)?;

        let rows = self.store.range_scan(&q.project, q.time_from, q.time_to)?;
        let wanted: BTreeSet<&str> = q.metric_names.iter().map(String::as_str).collect();

        let mut metrics_values = Vec::new();
        for (time, series) in rows {
            for (tags, bag) in series {
                if !tags.matches(&q.query_tags) {
                    continue;
                }
                let values: ValueBag = bag
                    .into_iter()
                    .filter(|(name, _)| wanted.contains(name.as_str()))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                metrics_values.push(MetricsValuesGroup { tags, values, time });
            }
        }

        let mut metrics_metadata = BTreeMap::new();
        for name in metrics_values.iter().flat_map(|g| g.values.keys()) {
            if metrics_metadata.contains_key(name) {
                continue;
            }
            if let Some(ty) = self.store.get_metadata(&q.project, name) {
                metrics_metadata.insert(name.clone(), MetricsMetadata::from(ty));
            }
        }

        tracing::debug!(
            project = %q.project,
            groups = metrics_values.len(),
            "range query answered"
        );

        Ok(MetricsBatch {
            metrics_values,
            metrics_metadata,
        })
    }
}

fn validate(q: &MultipleMetricsTimeRangeQuery) -> Result<()> {
    if q.project.trim().is_empty() {
        return Err(MetricsError::validation("project must not be empty"));
    }
    if q.time_from > q.time_to {
        return Err(MetricsError::validation(format!(
            "timeFrom ({}) must not be after timeTo ({})",
            q.time_from, q.time_to
        )));
    }
    if q.metric_names.iter().any(|n| n.trim().is_empty()) {
        return Err(MetricsError::validation(
            "list of queried metrics must not contain blank names",
        ));
    }
    if q.query_tags.iter().any(|t| t.tag_name.trim().is_empty()) {
        return Err(MetricsError::validation("query tags must not have blank names"));
    }
    Ok(())
}
