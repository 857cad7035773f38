//! HTTP surface for the conformance documents.
//!
//! Exposes the provider's two documents over axum, at the well-known FHIR
//! paths.
//!
//! # Endpoints
//!
//! - `GET /health`                  — Liveness probe
//! - `GET /metadata`                — Capability statement
//! - `GET /OperationDefinition/:id` — Operation definitions

pub mod routes;

pub use routes::{app_router, AppState};
