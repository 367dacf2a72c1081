//! Route handlers.
//!
//! Core operations are synchronous and never block on I/O, so handlers call
//! them inline instead of hopping to a blocking pool.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use inmem_metrics_core::error::Result;
use inmem_metrics_core::model::{
    MetricsBatch, MultipleMetricsStoreRequest, MultipleMetricsTimeRangeQuery,
};

use crate::app_state::AppState;
use crate::http::error::ApiError;
use crate::obs::metrics::CounterVec;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub cells_written: usize,
    pub metadata_declared: usize,
}

fn outcome<T>(res: &Result<T>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(e) => e.code().as_str(),
    }
}

/// Count and log a body that failed to decode.
fn reject(counter: &CounterVec, rejection: JsonRejection) -> ApiError {
    let err = ApiError::from(rejection);
    counter.inc(&[("outcome", err.error().code().as_str())]);
    tracing::warn!(error = %err.error(), status = %err.status(), "request body rejected");
    err
}

pub async fn project_names(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.service().project_names())
}

pub async fn metric_names(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Json<Vec<String>> {
    Json(state.service().metric_names(&project))
}

pub async fn query_metrics(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MultipleMetricsTimeRangeQuery>, JsonRejection>,
) -> std::result::Result<Json<MetricsBatch>, ApiError> {
    let started = Instant::now();
    let metrics = state.metrics();
    let Json(q) = payload.map_err(|rejection| reject(&metrics.query_requests, rejection))?;

    let res = state.service().query(&q);
    metrics.query_requests.inc(&[("outcome", outcome(&res))]);
    metrics
        .request_duration
        .observe(&[("op", "query")], started.elapsed());

    res.map(Json).map_err(|e| {
        tracing::warn!(project = %q.project, error = %e, "range query rejected");
        ApiError::from(e)
    })
}

pub async fn store_metrics(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MultipleMetricsStoreRequest>, JsonRejection>,
) -> std::result::Result<Json<StoreResponse>, ApiError> {
    let started = Instant::now();
    let metrics = state.metrics();
    let Json(req) = payload.map_err(|rejection| reject(&metrics.store_requests, rejection))?;

    let res = state.service().store_metrics(&req);
    metrics.store_requests.inc(&[("outcome", outcome(&res))]);
    metrics
        .request_duration
        .observe(&[("op", "store")], started.elapsed());

    match res {
        Ok(summary) => {
            metrics
                .cells_written
                .add(&[("project", req.project.as_str())], summary.cells_written as u64);
            Ok(Json(StoreResponse {
                cells_written: summary.cells_written,
                metadata_declared: summary.metadata_declared,
            }))
        }
        Err(e) => {
            tracing::warn!(project = %req.project, error = %e, "store request rejected");
            Err(ApiError::from(e))
        }
    }
}

pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let projects = state.service().project_names().len() as u64;
    let body = state
        .metrics()
        .render(&[("inmem_metrics_projects", projects)]);
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
