//! Map core errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use inmem_metrics_core::error::{ErrorCode, MetricsError};

/// Response-side wrapper around `MetricsError`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: MetricsError,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &MetricsError {
        &self.error
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MetricsError> for ApiError {
    fn from(error: MetricsError) -> Self {
        Self {
            status: status_for(error.code()),
            error,
        }
    }
}

/// Undecodable bodies (bad JSON, missing fields, unknown metric type) are
/// validation failures. Oversized bodies and a wrong content type keep the
/// rejection's own status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            s @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => s,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            error: MetricsError::Validation(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.error.code().as_str(),
            "message": self.error.to_string(),
        });
        (self.status, Json(body)).into_response()
    }
}
