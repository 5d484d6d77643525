//! HTTP API for the Brutto-Netto service.
//!
//! This module exposes the batch calculator using the
//! [`axum`](https://crates.io/crates/axum) framework:
//!
//! * `GET /health` reports liveness with a timestamp;
//! * `POST /brutto-netto` normalises the request, runs one calculation
//!   per entry of `bruttoListe` and returns the shaped results.
//!
//! Every route sits behind a permissive CORS layer and request tracing.

use crate::config::Config;
use crate::engine::run_batch;
use crate::error::ApiError;
use crate::models::{BatchResponse, HealthResponse};
use crate::normalize::normalize;
use crate::rates;
use crate::tax::GrossToNet;
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Local, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Application state shared across requests.  Read-only.
pub struct AppState {
    pub calculator: Arc<dyn GrossToNet>,
}

/// Build the API router around the given calculator.
pub fn build_router(calculator: Arc<dyn GrossToNet>) -> Router {
    let state = Arc::new(AppState { calculator });
    Router::new()
        .route("/health", get(health_handler))
        .route("/brutto-netto", post(brutto_netto_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Handler for POST /brutto-netto
async fn brutto_netto_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let body = parse_body(&headers, &body)?;
    let calculator = app_state.calculator.clone();
    // the batch fans out on rayon; keep it off the async workers
    let response = tokio::task::spawn_blocking(move || {
        calculate(&body, calculator.as_ref(), Local::now().year())
    })
    .await
    .map_err(|err| ApiError::Unexpected(err.to_string()))??;
    Ok(Json(response))
}

/// Validate the gross-wage list, normalise the parameters and run the
/// batch.  The calculator is not touched when the list is invalid.
pub fn calculate(
    body: &Value,
    calculator: &dyn GrossToNet,
    current_year: i32,
) -> Result<BatchResponse, ApiError> {
    let gross_wages = body
        .get("bruttoListe")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .ok_or(ApiError::Validation)?;

    let template = normalize(body, current_year);
    let results = run_batch(&template, gross_wages, calculator)?;
    Ok(BatchResponse { results })
}

/// Decode the request body.  Only `application/json` is parsed; any
/// other body, or an empty one, reads as an empty object.
fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            let mime = v.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            mime == "application/json"
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Launch the API server on the configured address with the given
/// calculator.  Runs until interrupted with Ctrl-C.
pub async fn serve(config: Config, calculator: Arc<dyn GrossToNet>) -> Result<()> {
    let year = Local::now().year();
    if !rates::is_supported(year) {
        warn!(
            "no tax parameters for the current year {}; requests without `year` will fail",
            year
        );
    }
    let router = build_router(calculator);
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("Brutto-Netto-Rechner läuft auf Port {}", config.port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
