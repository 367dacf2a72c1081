//! Error taxonomy shared by the core and the server.

use thiserror::Error;

use crate::model::MetricType;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or missing request fields.
    BadRequest,
    /// Metric metadata redeclared with a different type.
    Conflict,
    /// Query against a project that never stored anything.
    NotFound,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("metadata conflict for metric '{metric}': {detail}")]
    MetadataConflict { metric: String, detail: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricsError {
    /// Map an error to its stable client-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::Validation(_) => ErrorCode::BadRequest,
            MetricsError::MetadataConflict { .. } => ErrorCode::Conflict,
            MetricsError::NotFound(_) => ErrorCode::NotFound,
            MetricsError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        MetricsError::Validation(msg.into())
    }

    pub(crate) fn conflict(metric: &str, detail: impl Into<String>) -> Self {
        MetricsError::MetadataConflict {
            metric: metric.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn redeclared(metric: &str, existing: MetricType, requested: MetricType) -> Self {
        Self::conflict(
            metric,
            format!("already declared {existing}, cannot redeclare as {requested}"),
        )
    }
}
