//! # fhir-conformance
//!
//! Capability statement and operation definition synthesis for
//! resource-oriented FHIR REST servers.
//!
//! The crate introspects the set of operation bindings a server has
//! registered (per-resource CRUD, named queries, custom operations) and
//! synthesizes, on demand:
//!
//! - one top-level [`CapabilityStatement`] describing the whole server, and
//! - individual [`OperationDefinition`] documents describing one named
//!   operation or named query in detail.
//!
//! It performs deterministic name assignment across overloaded bindings,
//! merges metadata contributed by bindings sharing one logical name, infers
//! implied capabilities (a versioned read implies a plain read), and
//! applies stable ordering and deduplication so repeated builds produce
//! identical documents. It describes the registered surface only: request
//! validation, execution, and routing live elsewhere.

pub mod config;
pub mod errors;
pub mod model;
pub mod provider;
pub mod registry;
pub mod server;

pub use config::{
    AddressStrategy, FixedAddressStrategy, IncomingRequestAddressStrategy, RequestContext,
    ServerConfiguration, ServerSettings, SharedConfiguration,
};
pub use errors::ConformanceError;
pub use model::{CapabilityStatement, OperationDefinition};
pub use provider::{ConformanceProvider, OperationNameTable};
pub use registry::{
    BindingRegistry, MethodBinding, OperationBinding, ResourceDefinition, ResourceRegistry,
    SearchBinding,
};

/// Library version.
pub const VERSION: &str = "0.3.0";
