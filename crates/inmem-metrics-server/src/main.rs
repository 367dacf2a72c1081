//! inmem-metrics server binary.
//!
//! Loads `inmem-metrics.yaml` (or `$INMEM_METRICS_CONFIG`), builds the shared
//! store, and serves the HTTP API until the process is stopped. All data lives
//! in memory and is gone on restart.

use tracing_subscriber::{fmt, EnvFilter};

use inmem_metrics_core::error::{MetricsError, Result};
use inmem_metrics_server::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = config::config_path();
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "inmem-metrics server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MetricsError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| MetricsError::Internal(format!("server failed: {e}")))
}
