//! The `CapabilityStatement` document model.
//!
//! One statement describes a server's entire supported surface: identity,
//! supported formats, per-resource interactions, conditional-operation
//! flags, declared search parameters, and references to the operation
//! definitions it publishes. Optional elements are omitted from the output
//! rather than serialized as null.

use serde::{Deserialize, Serialize};

use super::codes::{
    CapabilityStatementKind, ConditionalDeleteStatus, PublicationStatus, RestfulCapabilityMode,
    SearchParamType, SystemInteraction, TypeInteraction, UnknownContentCode,
};

/// Top-level capability document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    pub resource_type: String,
    pub status: PublicationStatus,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub kind: CapabilityStatementKind,
    pub software: Software,
    pub implementation: Implementation,
    pub fhir_version: String,
    pub accept_unknown: UnknownContentCode,
    pub format: Vec<String>,
    pub rest: Vec<Rest>,
}

/// `software` block: the serving software's name and version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    pub version: String,
}

/// `implementation` block: this deployment's description and base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub description: String,
    pub url: String,
}

/// One `rest` block. Servers emit exactly one, in `server` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rest {
    pub mode: RestfulCapabilityMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interaction: Vec<SystemInteractionEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<RestResource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operation: Vec<RestOperation>,
}

/// One `rest.interaction` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInteractionEntry {
    pub code: SystemInteraction,
}

/// One `rest.resource` component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestResource {
    #[serde(rename = "type")]
    pub type_name: String,
    pub profile: Reference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interaction: Vec<ResourceInteractionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_create: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_delete: Option<ConditionalDeleteStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_param: Vec<RestSearchParam>,
}

/// One `rest.resource.interaction` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInteractionEntry {
    pub code: TypeInteraction,
}

/// One `rest.resource.searchParam` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestSearchParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<SearchParamType>,
}

/// One `rest.operation` entry pointing at a published operation definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestOperation {
    pub name: String,
    pub definition: Reference,
}

/// A literal reference to another resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_statement() -> CapabilityStatement {
        CapabilityStatement {
            resource_type: "CapabilityStatement".to_string(),
            status: PublicationStatus::Active,
            date: "2024-01-01T00:00:00Z".to_string(),
            publisher: None,
            kind: CapabilityStatementKind::Instance,
            software: Software {
                name: "test".to_string(),
                version: "1.0".to_string(),
            },
            implementation: Implementation {
                description: "test server".to_string(),
                url: "http://example.com/fhir".to_string(),
            },
            fhir_version: crate::model::FHIR_VERSION.to_string(),
            accept_unknown: UnknownContentCode::Extensions,
            format: vec![crate::model::FORMAT_JSON.to_string()],
            rest: vec![Rest {
                mode: RestfulCapabilityMode::Server,
                interaction: Vec::new(),
                resource: Vec::new(),
                operation: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_schema_field_spellings() {
        let json = serde_json::to_value(minimal_statement()).unwrap();
        assert_eq!(json["resourceType"], "CapabilityStatement");
        assert_eq!(json["status"], "active");
        assert_eq!(json["kind"], "instance");
        assert_eq!(json["acceptUnknown"], "extensions");
        assert_eq!(json["fhirVersion"], crate::model::FHIR_VERSION);
        assert_eq!(json["rest"][0]["mode"], "server");
    }

    #[test]
    fn test_absent_publisher_is_omitted() {
        let json = serde_json::to_value(minimal_statement()).unwrap();
        assert!(json.get("publisher").is_none());

        let mut statement = minimal_statement();
        statement.publisher = Some("Example Org".to_string());
        let json = serde_json::to_value(statement).unwrap();
        assert_eq!(json["publisher"], "Example Org");
    }

    #[test]
    fn test_resource_component_optional_elements_omitted() {
        let resource = RestResource {
            type_name: "Patient".to_string(),
            profile: Reference::new("http://example.com/fhir/StructureDefinition/Patient"),
            interaction: vec![ResourceInteractionEntry {
                code: TypeInteraction::Read,
            }],
            conditional_create: None,
            conditional_update: None,
            conditional_delete: Some(ConditionalDeleteStatus::Single),
            search_include: Vec::new(),
            search_param: Vec::new(),
        };
        let json = serde_json::to_value(resource).unwrap();
        assert_eq!(json["type"], "Patient");
        assert_eq!(json["interaction"][0]["code"], "read");
        assert_eq!(json["conditionalDelete"], "single");
        assert!(json.get("conditionalCreate").is_none());
        assert!(json.get("searchInclude").is_none());
    }
}
