//! Axum route handlers for the conformance HTTP surface.
//!
//! # Routes
//!
//! - `GET /health`                  — Returns `{"status": "ok", ...}`
//! - `GET /metadata`                — The server's capability statement
//! - `GET /OperationDefinition/:id` — One synthesized operation definition

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::config::RequestContext;
use crate::errors::ConformanceError;
use crate::model::{CapabilityStatement, OperationDefinition};
use crate::provider::ConformanceProvider;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Conformance provider serving /metadata and /OperationDefinition.
    pub provider: Arc<ConformanceProvider>,
}

impl AppState {
    pub fn new(provider: ConformanceProvider) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metadata", get(metadata_handler))
        .route("/OperationDefinition/:id", get(operation_definition_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "fhir-conformance",
    }))
}

/// GET /metadata — the capability statement for this server.
///
/// The request's host header feeds address resolution; with the provider's
/// cache enabled the address is frozen into the first build.
async fn metadata_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CapabilityStatement>, (StatusCode, Json<Value>)> {
    let ctx = request_context(&headers);
    state
        .provider
        .capability_statement(&ctx)
        .map(|statement| Json((*statement).clone()))
        .map_err(internal_error)
}

/// GET /OperationDefinition/:id — one synthesized operation definition.
async fn operation_definition_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OperationDefinition>, (StatusCode, Json<Value>)> {
    state.provider.operation_definition(&id).map(Json).map_err(|err| {
        let status = match err {
            ConformanceError::OperationNotFound { .. } => StatusCode::NOT_FOUND,
            ConformanceError::UnknownResource { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": err.to_string() })))
    })
}

fn internal_error(err: ConformanceError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}

fn request_context(headers: &HeaderMap) -> RequestContext {
    RequestContext {
        scheme: headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        host: headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
