//! Data model: typed values and tagsets, plus the request/response shapes
//! exchanged with the boundary layer.
//!
//! - `types`: index keys and values (`Timestamp`, `Tagset`, `MetricType`,
//!   `MetricValue`).
//! - `wire`: store requests, range queries and the `MetricsBatch` result, all
//!   serde-ready in the camelCase JSON layout clients already speak.

pub mod types;
pub mod wire;

pub use types::{MetricType, MetricValue, Tagset, Timestamp, ValueBag};
pub use wire::{
    MetricsBatch, MetricsEntry, MetricsMetadata, MetricsQueryTag, MetricsValuesGroup,
    MultipleMetricsStoreRequest, MultipleMetricsTimeRangeQuery,
};
