//! Shared application state for the server.

use std::sync::Arc;

use inmem_metrics_core::{MetricStore, MetricsService};

use crate::config::ServerConfig;
use crate::obs::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ServerMetrics>,
}

struct AppStateInner {
    cfg: ServerConfig,
    service: MetricsService,
}

impl AppState {
    /// Build state around a fresh, empty store.
    pub fn new(cfg: ServerConfig) -> Self {
        Self::with_store(cfg, Arc::new(MetricStore::new()))
    }

    /// Build state around an existing store (shared with other components).
    pub fn with_store(cfg: ServerConfig, store: Arc<MetricStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                service: MetricsService::new(store),
            }),
            metrics: Arc::new(ServerMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn service(&self) -> &MetricsService {
        &self.inner.service
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }
}
