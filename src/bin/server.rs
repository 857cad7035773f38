//! fhir-conformance HTTP server binary.
//!
//! Starts an axum HTTP server exposing the capability statement and
//! operation definitions for a demo binding registry.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `CONFORMANCE_CONFIG` — Optional YAML file with server settings
//! - `RUST_LOG` — Tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use tower_http::trace::TraceLayer;

use fhir_conformance::config::{
    IncomingRequestAddressStrategy, ServerConfiguration, ServerSettings,
};
use fhir_conformance::model::SearchParamType;
use fhir_conformance::provider::ConformanceProvider;
use fhir_conformance::registry::{
    MethodBinding, OperationBinding, OperationParam, ResourceDefinition, SearchBinding,
    SearchParam,
};
use fhir_conformance::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fhir_conformance=debug".into()),
        )
        .init();

    let settings = match std::env::var("CONFORMANCE_CONFIG") {
        Ok(path) => ServerSettings::load(&path).context("loading CONFORMANCE_CONFIG")?,
        Err(_) => ServerSettings::default(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);
    let fallback_base = format!("http://localhost:{}", port);

    let configuration = demo_configuration(settings)
        .with_address_strategy(IncomingRequestAddressStrategy::new(fallback_base));
    // Address resolution should track the incoming host header, so the
    // whole-document cache stays off.
    let provider = ConformanceProvider::new(configuration.into_shared()).with_cache(false);

    let state = AppState::new(provider);
    let app = app_router(state).layer(TraceLayer::new_for_http());

    tracing::info!("fhir-conformance server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET /health                  — liveness probe");
    tracing::info!("  GET /metadata                — capability statement");
    tracing::info!("  GET /OperationDefinition/:id — operation definitions");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}

/// Wire a small but representative registry: Patient and Observation CRUD,
/// a default search with parameters and includes, a named query, an
/// overloaded `$everything` operation, and a system-level transaction.
fn demo_configuration(settings: ServerSettings) -> ServerConfiguration {
    let mut config = ServerConfiguration::new(settings);

    config.resources.register(
        ResourceDefinition::new("Patient")
            .with_search_description("name", "A portion of either family or given name")
            .with_search_description("identifier", "A patient identifier"),
    );
    config
        .resources
        .register(ResourceDefinition::new("Observation"));
    config
        .resources
        .register(ResourceDefinition::new("Organization"));

    for code in ["read", "vread", "update"] {
        config
            .registry
            .register("Patient", MethodBinding::interaction(code));
    }
    config.registry.register(
        "Patient",
        MethodBinding::interaction("create").conditional(false),
    );
    config.registry.register(
        "Patient",
        MethodBinding::interaction("delete").conditional(true),
    );
    config.registry.register(
        "Patient",
        MethodBinding::search(
            SearchBinding::default()
                .with_include("Patient:organization")
                .with_parameter(SearchParam::new("name", SearchParamType::String))
                .with_parameter(SearchParam::new("identifier", SearchParamType::Token))
                .with_parameter(
                    SearchParam::new("organization.name", SearchParamType::Reference)
                        .with_target("Organization"),
                ),
        ),
    );
    config.registry.register(
        "Patient",
        MethodBinding::search(SearchBinding::named("nearby").with_parameter(
            SearchParam::new("location", SearchParamType::Token).required(),
        ))
        .with_description("Find patients near a location"),
    );
    config.registry.register(
        "Patient",
        MethodBinding::operation(
            OperationBinding::new("$everything")
                .at_instance()
                .with_input(OperationParam::new("start").typed("date"))
                .with_output(
                    OperationParam::new("return")
                        .typed("Bundle")
                        .cardinality(0, None),
                ),
        )
        .with_description("Fetch all records related to a patient"),
    );
    config.registry.register(
        "Patient",
        MethodBinding::operation(
            OperationBinding::new("$everything")
                .at_instance()
                .with_input(OperationParam::new("count").typed("integer")),
        ),
    );

    config
        .registry
        .register("Observation", MethodBinding::interaction("read"));
    config.registry.register(
        "Observation",
        MethodBinding::search(
            SearchBinding::default()
                .with_parameter(SearchParam::new("code", SearchParamType::Token)),
        ),
    );

    config
        .registry
        .register_system(MethodBinding::interaction("transaction"));

    config
}
