//! Error types for the statistics ledger

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// A stale transaction is deliberately absent here: it is a policy
/// outcome ([`crate::types::Admission::Stale`]), not a failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Request body could not be decoded
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Transaction timestamp is after the current instant
    #[error("Transaction timestamp is in the future")]
    FutureTimestamp,

    /// Claimed city does not match the authorized one
    #[error("Access denied for this location")]
    AccessDenied,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Stable machine-readable code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedBody(_) => "MALFORMED_BODY",
            Error::FutureTimestamp => "FUTURE_TIMESTAMP",
            Error::AccessDenied => "ACCESS_DENIED",
            Error::Config(_) => "CONFIGURATION_ERROR",
            Error::Metrics(_) => "METRICS_ERROR",
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Error::FutureTimestamp => StatusCode::UNPROCESSABLE_ENTITY,
            Error::AccessDenied => StatusCode::UNAUTHORIZED,
            Error::Config(_) | Error::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": self.to_string()
        }))
    }
}
