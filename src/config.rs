//! Server configuration consumed by the conformance provider.
//!
//! Identity settings can come from a YAML file (see
//! [`ServerSettings::load`]), from environment variables in the server
//! binary, or be assembled in code. The registries and the address strategy
//! are always wired in code.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::registry::{BindingRegistry, ResourceRegistry};

/// Identity fields stamped into every generated capability statement.
///
/// Example YAML:
/// ```yaml
/// server_name: "acme-fhir"
/// server_version: "2.1.0"
/// implementation_description: "ACME patient record server"
/// conformance_date: "2024-06-01T00:00:00Z"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Reported in `software.name`.
    pub server_name: String,
    /// Reported in `software.version`.
    pub server_version: String,
    /// Reported in `implementation.description`.
    pub implementation_description: String,
    /// Build/conformance date. Absent or unparseable dates fall back to
    /// "now" at document-build time.
    pub conformance_date: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            server_name: "fhir-conformance".to_string(),
            server_version: crate::VERSION.to_string(),
            implementation_description: "FHIR REST server".to_string(),
            conformance_date: None,
        }
    }
}

impl ServerSettings {
    /// Parse settings from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }
}

/// The slice of an incoming request that address resolution looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Scheme the client used, when known (e.g. from `X-Forwarded-Proto`).
    pub scheme: Option<String>,
    /// Host (and optional port) the client addressed.
    pub host: Option<String>,
}

/// Strategy for resolving the server base address advertised in generated
/// documents.
pub trait AddressStrategy: Send + Sync {
    /// The server base URL for the given request, without a trailing slash.
    fn server_base(&self, ctx: &RequestContext) -> String;
}

/// Always advertises one configured base address.
#[derive(Debug, Clone)]
pub struct FixedAddressStrategy {
    base: String,
}

impl FixedAddressStrategy {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }
}

impl AddressStrategy for FixedAddressStrategy {
    fn server_base(&self, _ctx: &RequestContext) -> String {
        self.base.clone()
    }
}

/// Derives the base address from the incoming request's host, falling back
/// to a fixed address for non-HTTP callers.
#[derive(Debug, Clone)]
pub struct IncomingRequestAddressStrategy {
    fallback: String,
}

impl IncomingRequestAddressStrategy {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: FixedAddressStrategy::new(fallback).base,
        }
    }
}

impl AddressStrategy for IncomingRequestAddressStrategy {
    fn server_base(&self, ctx: &RequestContext) -> String {
        match &ctx.host {
            Some(host) => {
                let scheme = ctx.scheme.as_deref().unwrap_or("http");
                format!("{}://{}", scheme, host)
            }
            None => self.fallback.clone(),
        }
    }
}

/// Everything the conformance provider reads: the binding registry, the
/// resource metadata registry, identity settings, and the address strategy.
pub struct ServerConfiguration {
    pub registry: BindingRegistry,
    pub resources: ResourceRegistry,
    pub settings: ServerSettings,
    pub address_strategy: Box<dyn AddressStrategy>,
}

impl ServerConfiguration {
    pub fn new(settings: ServerSettings) -> Self {
        Self {
            registry: BindingRegistry::new(),
            resources: ResourceRegistry::new(),
            settings,
            address_strategy: Box::new(FixedAddressStrategy::new("http://localhost:8080")),
        }
    }

    pub fn with_address_strategy(mut self, strategy: impl AddressStrategy + 'static) -> Self {
        self.address_strategy = Box::new(strategy);
        self
    }

    /// Wrap for shared access. The provider reads the configuration at
    /// every build, so bindings registered through this handle after
    /// startup are visible to uncached document builds.
    pub fn into_shared(self) -> SharedConfiguration {
        Arc::new(RwLock::new(self))
    }
}

/// Shared, live-updatable configuration handle.
pub type SharedConfiguration = Arc<RwLock<ServerConfiguration>>;
