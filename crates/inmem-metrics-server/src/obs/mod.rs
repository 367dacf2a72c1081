//! Self-observability of the server process (dependency-free).
//!
//! Request counters and latency histograms are stored as atomics and rendered
//! in Prometheus text format by the `/metrics` handler. These describe the
//! server itself, not the metrics it stores.

pub mod metrics;

pub use metrics::ServerMetrics;
