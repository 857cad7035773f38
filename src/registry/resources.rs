//! Resource metadata: the lookup service the document builder consults for
//! a resource's canonical type name, profile URL, and declared
//! search-parameter descriptions.

use std::collections::HashMap;

use crate::errors::ConformanceError;

/// Metadata for one resource type.
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    pub name: String,
    /// Explicit canonical profile URL; when absent, one is derived from the
    /// server base address.
    pub profile: Option<String>,
    /// Declared descriptions per search parameter, used as documentation
    /// fallback when a binding declares a parameter without one.
    search_descriptions: HashMap<String, String>,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: None,
            search_descriptions: HashMap::new(),
        }
    }

    pub fn with_profile(mut self, url: impl Into<String>) -> Self {
        self.profile = Some(url.into());
        self
    }

    pub fn with_search_description(
        mut self,
        parameter: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.search_descriptions
            .insert(parameter.into(), description.into());
        self
    }

    /// Canonical profile reference for this resource.
    pub fn profile_url(&self, server_base: &str) -> String {
        match &self.profile {
            Some(profile) => profile.clone(),
            None => format!("{}/StructureDefinition/{}", server_base, self.name),
        }
    }

    pub fn search_description(&self, parameter: &str) -> Option<&str> {
        self.search_descriptions.get(parameter).map(String::as_str)
    }
}

/// Registry of resource definitions, keyed by resource name.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    definitions: HashMap<String, ResourceDefinition>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: ResourceDefinition) {
        self.definitions
            .insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.definitions.get(name)
    }

    /// Resolve a resource that the binding registry references. A miss here
    /// is a wiring mistake, surfaced as a fatal configuration error rather
    /// than swallowed.
    pub fn require(&self, name: &str) -> Result<&ResourceDefinition, ConformanceError> {
        self.get(name).ok_or_else(|| ConformanceError::UnknownResource {
            resource: name.to_string(),
        })
    }

    /// Resolve the subset of `names` that are known resource types.
    pub fn resolve_targets(&self, names: &[String]) -> Vec<&ResourceDefinition> {
        names.iter().filter_map(|name| self.get(name)).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_prefers_explicit_profile() {
        let definition = ResourceDefinition::new("Patient")
            .with_profile("http://example.com/profiles/MyPatient");
        assert_eq!(
            definition.profile_url("http://localhost/fhir"),
            "http://example.com/profiles/MyPatient"
        );
    }

    #[test]
    fn test_profile_url_derived_from_server_base() {
        let definition = ResourceDefinition::new("Patient");
        assert_eq!(
            definition.profile_url("http://localhost/fhir"),
            "http://localhost/fhir/StructureDefinition/Patient"
        );
    }

    #[test]
    fn test_require_unknown_resource_is_a_configuration_error() {
        let registry = ResourceRegistry::new();
        let err = registry.require("Patient").unwrap_err();
        assert!(matches!(
            err,
            ConformanceError::UnknownResource { ref resource } if resource == "Patient"
        ));
    }

    #[test]
    fn test_resolve_targets_filters_unknown_types() {
        let mut registry = ResourceRegistry::new();
        registry.register(ResourceDefinition::new("Organization"));
        let targets = registry.resolve_targets(&[
            "Organization".to_string(),
            "Practitioner".to_string(),
        ]);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "Organization");
    }
}
