//! inmem-metrics core: the in-memory metrics store, its ingest pipeline and
//! range query engine.
//!
//! This crate owns the data model, the error surface and the concurrent index
//! shared by the server and any embedding process. It carries no transport or
//! runtime dependencies; callers hand it already-decoded requests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `MetricsError`/`Result`, so a malformed
//! request can never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod ingest;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

/// Shared result type.
pub use error::{ErrorCode, MetricsError, Result};
pub use ingest::{IngestPipeline, StoreSummary};
pub use query::QueryEngine;
pub use service::MetricsService;
pub use store::MetricStore;
