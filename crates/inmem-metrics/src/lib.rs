//! Top-level facade crate for inmem-metrics.
//!
//! Re-exports the core store and the server library so users can depend on a
//! single crate.

pub mod core {
    pub use inmem_metrics_core::*;
}

pub mod server {
    pub use inmem_metrics_server::*;
}
