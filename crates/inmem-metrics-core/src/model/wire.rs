//! Request and response shapes exchanged with the boundary layer.
//!
//! Field names follow the camelCase JSON layout of the public API, e.g.
//!
//! ```json
//! {
//!   "project": "project1",
//!   "timestamp": "2022-05-27T07:32:00Z",
//!   "metadataMap": { "cpu": { "metricType": "COUNTER" } },
//!   "metricsValues": [ { "tags": { "svc": "a" }, "values": { "cpu": 10 } } ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::types::{MetricType, Tagset, Timestamp, ValueBag};

/// Declared metadata of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetricsMetadata {
    pub metric_type: MetricType,
}

impl From<MetricType> for MetricsMetadata {
    fn from(metric_type: MetricType) -> Self {
        Self { metric_type }
    }
}

/// One series' values inside a store request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsEntry {
    #[serde(default)]
    pub tags: Tagset,
    pub values: ValueBag,
}

/// Store request: every entry shares the project and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultipleMetricsStoreRequest {
    pub project: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub metadata_map: BTreeMap<String, MetricsMetadata>,
    #[serde(default)]
    pub metrics_values: Vec<MetricsEntry>,
}

/// Required `(name, value)` label of a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetricsQueryTag {
    pub tag_name: String,
    pub tag_value: String,
}

impl MetricsQueryTag {
    pub fn new(tag_name: impl Into<String>, tag_value: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            tag_value: tag_value.into(),
        }
    }
}

/// Range query over one project. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultipleMetricsTimeRangeQuery {
    pub project: String,
    pub time_from: Timestamp,
    pub time_to: Timestamp,
    pub metric_names: Vec<String>,
    #[serde(default)]
    pub query_tags: Vec<MetricsQueryTag>,
}

/// One emitted (timestamp, tagset) group of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsValuesGroup {
    pub tags: Tagset,
    pub values: ValueBag,
    pub time: Timestamp,
}

/// Query result: groups ascending by timestamp plus metadata for every metric
/// name that appears in them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBatch {
    pub metrics_values: Vec<MetricsValuesGroup>,
    pub metrics_metadata: BTreeMap<String, MetricsMetadata>,
}
