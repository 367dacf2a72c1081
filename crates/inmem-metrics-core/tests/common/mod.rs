//! Fixture builders shared by the core integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::TimeZone;

use inmem_metrics_core::model::{
    MetricType, MetricValue, MetricsEntry, MetricsMetadata, MetricsQueryTag,
    MultipleMetricsStoreRequest, MultipleMetricsTimeRangeQuery, Tagset, Timestamp,
};

/// Seconds since the epoch as a timestamp.
pub fn ts(secs: i64) -> Timestamp {
    chrono::Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn tags(pairs: &[(&str, &str)]) -> Tagset {
    pairs.iter().copied().collect()
}

/// Store request with a single series.
pub fn store_one(
    project: &str,
    at: i64,
    metadata: &[(&str, MetricType)],
    series: Tagset,
    values: &[(&str, MetricValue)],
) -> MultipleMetricsStoreRequest {
    MultipleMetricsStoreRequest {
        project: project.to_string(),
        timestamp: ts(at),
        metadata_map: metadata
            .iter()
            .map(|(name, ty)| (name.to_string(), MetricsMetadata::from(*ty)))
            .collect(),
        metrics_values: vec![MetricsEntry {
            tags: series,
            values: values
                .iter()
                .map(|(name, v)| (name.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }],
    }
}

pub fn range(
    project: &str,
    from: i64,
    to: i64,
    metric_names: &[&str],
    query_tags: &[(&str, &str)],
) -> MultipleMetricsTimeRangeQuery {
    MultipleMetricsTimeRangeQuery {
        project: project.to_string(),
        time_from: ts(from),
        time_to: ts(to),
        metric_names: metric_names.iter().map(|s| s.to_string()).collect(),
        query_tags: query_tags
            .iter()
            .map(|(k, v)| MetricsQueryTag::new(*k, *v))
            .collect(),
    }
}
