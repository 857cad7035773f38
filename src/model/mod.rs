//! Document models for the synthesized conformance resources.
//!
//! Shapes follow the published FHIR (DSTU3) JSON schema: field names,
//! nesting, and code values must match it exactly for interoperability.
//! This module only defines the shapes; the construction rules live in
//! [`crate::provider`].

pub mod capability;
pub mod codes;
pub mod operation;

pub use capability::{
    CapabilityStatement, Implementation, Reference, ResourceInteractionEntry, Rest, RestOperation,
    RestResource, RestSearchParam, Software, SystemInteractionEntry,
};
pub use codes::{
    CapabilityStatementKind, ConditionalDeleteStatus, OperationKind, ParameterUse,
    PublicationStatus, RestfulCapabilityMode, SearchParamType, SystemInteraction, TypeInteraction,
    UnknownContentCode,
};
pub use operation::{OperationDefinition, OperationDefinitionParameter};

/// FHIR version advertised in `fhirVersion`.
pub const FHIR_VERSION: &str = "3.0.2";

/// XML content syntax advertised in `format`.
pub const FORMAT_XML: &str = "application/fhir+xml";

/// JSON content syntax advertised in `format`.
pub const FORMAT_JSON: &str = "application/fhir+json";
