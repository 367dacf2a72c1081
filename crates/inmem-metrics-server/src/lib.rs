//! inmem-metrics server library entry.
//!
//! Wires the YAML config, the shared `MetricsService`, the HTTP boundary and
//! the self-observability registry into one router. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod obs;
pub mod router;
