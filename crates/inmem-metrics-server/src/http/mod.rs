//! HTTP boundary: JSON handlers and error mapping.

pub mod error;
pub mod handlers;

pub use error::ApiError;
