//! Error types.
//!
//! [`CalculationError`] is what a [`crate::tax::GrossToNet`]
//! implementation reports; [`ApiError`] is the handler taxonomy that
//! maps onto HTTP status codes and the fixed response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned with every 400 for a missing or empty list.
pub const MISSING_LIST_MESSAGE: &str = "bruttoListe (Array) fehlt oder ist leer.";

/// Message returned with every 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Interner Fehler";

/// Failure reported by the net-wage calculator for a single input.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("no tax parameters for accounting year {year} (supported: {supported})")]
    UnsupportedYear { year: String, supported: String },
    #[error("calculation failed: {0}")]
    Failed(String),
}

impl CalculationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalculationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Everything the `/brutto-netto` handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gross-wage list is absent, not an array or empty.
    #[error("{}", MISSING_LIST_MESSAGE)]
    Validation,
    /// The calculator rejected an entry; the whole batch fails.
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    /// Anything else, e.g. a body that is not valid JSON.
    #[error("{0}")]
    Unexpected(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": MISSING_LIST_MESSAGE })),
            )
                .into_response(),
            err => {
                tracing::error!("Fehler bei /brutto-netto: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": INTERNAL_ERROR_MESSAGE,
                        "details": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("invalid listen address {0:?}")]
    InvalidAddress(String),
}
