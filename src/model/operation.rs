//! The `OperationDefinition` document model.
//!
//! One definition formally describes a single named operation or named
//! query, merged from every binding that shares the name.

use serde::{Deserialize, Serialize};

use super::codes::{OperationKind, ParameterUse, PublicationStatus, SearchParamType};

/// Formal definition of one named operation or named query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: PublicationStatus,
    pub kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub idempotent: bool,
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<String>,
    pub system: bool,
    #[serde(rename = "type")]
    pub type_level: bool,
    pub instance: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<OperationDefinitionParameter>,
}

impl OperationDefinition {
    /// An empty definition of the given kind: status `active`, idempotent
    /// until a contributing binding clears it, applicable at no level until
    /// a contributing binding sets one.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            resource_type: "OperationDefinition".to_string(),
            name: None,
            status: PublicationStatus::Active,
            kind,
            description: None,
            idempotent: true,
            code: String::new(),
            resource: Vec::new(),
            system: false,
            type_level: false,
            instance: false,
            parameter: Vec::new(),
        }
    }
}

/// One `parameter` entry. `max` is a count rendered as a string, with `*`
/// standing for unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinitionParameter {
    pub name: String,
    #[serde(rename = "use")]
    pub use_: ParameterUse,
    pub min: u32,
    pub max: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchParamType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_definition_defaults() {
        let definition = OperationDefinition::new(OperationKind::Operation);
        assert_eq!(definition.resource_type, "OperationDefinition");
        assert_eq!(definition.status, PublicationStatus::Active);
        assert!(definition.idempotent);
        assert!(!definition.system);
        assert!(!definition.type_level);
        assert!(!definition.instance);
    }

    #[test]
    fn test_reserved_word_field_spellings() {
        let definition = OperationDefinition {
            parameter: vec![OperationDefinitionParameter {
                name: "start".to_string(),
                use_: ParameterUse::In,
                min: 0,
                max: "*".to_string(),
                param_type: Some("date".to_string()),
                search_type: None,
            }],
            ..OperationDefinition::new(OperationKind::Query)
        };
        let json = serde_json::to_value(definition).unwrap();
        assert_eq!(json["kind"], "query");
        assert_eq!(json["type"], false);
        assert_eq!(json["parameter"][0]["use"], "in");
        assert_eq!(json["parameter"][0]["type"], "date");
        assert_eq!(json["parameter"][0]["max"], "*");
    }
}
