//! Operation-definition synthesis.
//!
//! Definitions are synthesized lazily, keyed by the name the table assigned
//! at construction, and merged from every binding sharing that name. They
//! are never cached: each request reads the current binding set.

use std::collections::HashSet;

use crate::errors::ConformanceError;
use crate::model::{
    OperationDefinition, OperationDefinitionParameter, OperationKind, ParameterUse,
};
use crate::registry::{
    BindingDetail, BindingId, BindingRegistry, OperationBinding, OperationParam, SearchBinding,
};

use super::capability::ConformanceProvider;
use super::names::strip_sigil;

impl ConformanceProvider {
    /// Synthesize the formal definition for one assigned operation or named
    /// query name.
    pub fn operation_definition(
        &self,
        name: &str,
    ) -> Result<OperationDefinition, ConformanceError> {
        let config = self.config.read();
        if let Some(group) = self.names.operation_group(name) {
            let bindings = resolve_operations(&config.registry, group);
            if !bindings.is_empty() {
                return Ok(merge_operations(&bindings));
            }
        }
        if let Some(group) = self.names.query_group(name) {
            let bindings = resolve_searches(&config.registry, group);
            if !bindings.is_empty() {
                return Ok(merge_named_queries(&bindings));
            }
        }
        Err(ConformanceError::OperationNotFound {
            name: name.to_string(),
        })
    }
}

struct OperationView<'a> {
    resource: Option<&'a str>,
    description: Option<&'a str>,
    operation: &'a OperationBinding,
}

struct SearchView<'a> {
    resource: Option<&'a str>,
    description: Option<&'a str>,
    search: &'a SearchBinding,
}

fn resolve_operations<'a>(
    registry: &'a BindingRegistry,
    ids: &[BindingId],
) -> Vec<OperationView<'a>> {
    ids.iter()
        .filter_map(|id| registry.lookup(*id))
        .filter_map(|resolved| match &resolved.registered.binding.detail {
            BindingDetail::Operation(operation) => Some(OperationView {
                resource: resolved.resource_name,
                description: resolved.registered.binding.description.as_deref(),
                operation,
            }),
            _ => None,
        })
        .collect()
}

fn resolve_searches<'a>(registry: &'a BindingRegistry, ids: &[BindingId]) -> Vec<SearchView<'a>> {
    ids.iter()
        .filter_map(|id| registry.lookup(*id))
        .filter_map(|resolved| match &resolved.registered.binding.detail {
            BindingDetail::Search(search) => Some(SearchView {
                resource: resolved.resource_name,
                description: resolved.registered.binding.description.as_deref(),
                search,
            }),
            _ => None,
        })
        .collect()
}

/// Merge every overloaded binding of one custom operation into a single
/// definition: applicability is OR-reduced, idempotency AND-reduced, the
/// first non-blank description wins, and parameters are deduplicated by
/// name with the first occurrence keeping its cardinality.
fn merge_operations(bindings: &[OperationView<'_>]) -> OperationDefinition {
    let mut definition = OperationDefinition::new(OperationKind::Operation);
    let mut input_seen: HashSet<&str> = HashSet::new();
    let mut output_seen: HashSet<&str> = HashSet::new();

    for view in bindings {
        if definition.description.is_none() {
            if let Some(description) = non_blank(view.description) {
                definition.description = Some(description.to_string());
            }
        }

        let operation = view.operation;
        definition.instance |= operation.instance_level;
        definition.type_level |= operation.type_level;
        definition.system |= operation.server_level;
        definition.idempotent &= operation.idempotent;
        // Overloads sharing a name agree on the code; the last one wins.
        definition.code = strip_sigil(&operation.code).to_string();

        if let Some(resource) = non_blank(view.resource) {
            if !definition.resource.iter().any(|known| known == resource) {
                definition.resource.push(resource.to_string());
            }
        }

        for parameter in &operation.input {
            if input_seen.insert(parameter.name.as_str()) {
                definition
                    .parameter
                    .push(operation_parameter(ParameterUse::In, parameter));
            }
        }
        for parameter in &operation.output {
            if output_seen.insert(parameter.name.as_str()) {
                definition
                    .parameter
                    .push(operation_parameter(ParameterUse::Out, parameter));
            }
        }
    }

    definition.name = definition
        .description
        .clone()
        .or_else(|| Some(definition.code.clone()));
    definition
}

/// Merge the bindings of one named query. Queries are always idempotent and
/// never instance-level; each declared search parameter becomes a
/// string-typed input parameter.
fn merge_named_queries(bindings: &[SearchView<'_>]) -> OperationDefinition {
    let mut definition = OperationDefinition::new(OperationKind::Query);
    let mut seen: HashSet<&str> = HashSet::new();

    for view in bindings {
        if definition.description.is_none() {
            if let Some(description) = non_blank(view.description) {
                definition.description = Some(description.to_string());
            }
        }

        match non_blank(view.resource) {
            None => definition.system = true,
            Some(resource) => {
                definition.type_level = true;
                if !definition.resource.iter().any(|known| known == resource) {
                    definition.resource.push(resource.to_string());
                }
            }
        }

        if let Some(query_name) = &view.search.query_name {
            definition.code = query_name.clone();
        }

        for parameter in &view.search.parameters {
            if !seen.insert(parameter.name.as_str()) {
                continue;
            }
            definition.parameter.push(OperationDefinitionParameter {
                name: parameter.name.clone(),
                use_: ParameterUse::In,
                min: u32::from(parameter.required),
                max: "1".to_string(),
                param_type: Some("string".to_string()),
                search_type: parameter.param_type,
            });
        }
    }

    definition.name = definition
        .description
        .clone()
        .or_else(|| Some(definition.code.clone()));
    definition
}

fn operation_parameter(
    use_: ParameterUse,
    parameter: &OperationParam,
) -> OperationDefinitionParameter {
    OperationDefinitionParameter {
        name: parameter.name.clone(),
        use_,
        min: parameter.min,
        max: match parameter.max {
            Some(max) => max.to_string(),
            None => "*".to_string(),
        },
        param_type: parameter.param_type.clone(),
        search_type: parameter.search_type,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfiguration, ServerSettings};
    use crate::model::SearchParamType;
    use crate::registry::{MethodBinding, ResourceDefinition, SearchParam};

    fn provider(wire: impl FnOnce(&mut ServerConfiguration)) -> ConformanceProvider {
        let mut config = ServerConfiguration::new(ServerSettings::default());
        config.resources.register(ResourceDefinition::new("Patient"));
        wire(&mut config);
        ConformanceProvider::new(config.into_shared())
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let provider = provider(|_| {});
        let err = provider
            .operation_definition("nonexistent-name")
            .unwrap_err();
        assert!(matches!(
            err,
            ConformanceError::OperationNotFound { ref name } if name == "nonexistent-name"
        ));
    }

    #[test]
    fn test_idempotency_is_an_and_reduction() {
        let provider = provider(|config| {
            for idempotent in [true, false, true] {
                let mut operation = OperationBinding::new("$process").at_type();
                if !idempotent {
                    operation = operation.not_idempotent();
                }
                config
                    .registry
                    .register("Patient", MethodBinding::operation(operation));
            }
        });
        let definition = provider.operation_definition("Patient--process").unwrap();
        assert!(!definition.idempotent);
    }

    #[test]
    fn test_description_first_non_blank_wins() {
        let provider = provider(|config| {
            for description in ["", "A", "B"] {
                config.registry.register(
                    "Patient",
                    MethodBinding::operation(OperationBinding::new("$process").at_type())
                        .with_description(description),
                );
            }
        });
        let definition = provider.operation_definition("Patient--process").unwrap();
        assert_eq!(definition.description.as_deref(), Some("A"));
    }

    #[test]
    fn test_overloaded_everything_merge() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$everything")
                        .at_instance()
                        .with_input(OperationParam::new("start").typed("date")),
                )
                .with_description(""),
            );
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$everything")
                        .at_instance()
                        .with_input(OperationParam::new("count").typed("integer")),
                )
                .with_description("Fetch everything"),
            );
        });

        let definition = provider
            .operation_definition("Patient-i-everything")
            .unwrap();
        assert_eq!(definition.kind, OperationKind::Operation);
        assert_eq!(definition.description.as_deref(), Some("Fetch everything"));
        assert_eq!(definition.name.as_deref(), Some("Fetch everything"));
        assert_eq!(definition.code, "everything");
        assert!(definition.instance);
        assert!(!definition.system);
        assert_eq!(definition.resource, vec!["Patient"]);

        let names: Vec<&str> = definition
            .parameter
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        assert_eq!(names, vec!["start", "count"]);
    }

    #[test]
    fn test_applicability_is_an_or_reduction() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(OperationBinding::new("$everything").at_instance()),
            );
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$everything").at_instance().at_type(),
                ),
            );
        });
        let definition = provider
            .operation_definition("Patient-i-everything")
            .unwrap();
        assert!(definition.instance);
        assert!(definition.type_level);
        assert!(!definition.system);
    }

    #[test]
    fn test_duplicate_parameter_keeps_first_cardinality() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$process")
                        .at_type()
                        .with_input(OperationParam::new("source").cardinality(1, Some(1))),
                ),
            );
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$process")
                        .at_type()
                        .with_input(OperationParam::new("source").cardinality(0, None)),
                ),
            );
        });
        let definition = provider.operation_definition("Patient--process").unwrap();
        assert_eq!(definition.parameter.len(), 1);
        assert_eq!(definition.parameter[0].min, 1);
        assert_eq!(definition.parameter[0].max, "1");
    }

    #[test]
    fn test_unbounded_output_renders_wildcard_max() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$everything")
                        .at_instance()
                        .with_output(
                            OperationParam::new("return")
                                .typed("Bundle")
                                .cardinality(0, None),
                        ),
                ),
            );
        });
        let definition = provider
            .operation_definition("Patient-i-everything")
            .unwrap();
        let output = &definition.parameter[0];
        assert_eq!(output.use_, ParameterUse::Out);
        assert_eq!(output.max, "*");
    }

    #[test]
    fn test_input_and_output_deduplicate_independently() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(
                    OperationBinding::new("$process")
                        .at_type()
                        .with_input(OperationParam::new("resource"))
                        .with_output(OperationParam::new("resource")),
                ),
            );
        });
        let definition = provider.operation_definition("Patient--process").unwrap();
        assert_eq!(definition.parameter.len(), 2);
    }

    #[test]
    fn test_name_falls_back_to_code_without_description() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::operation(OperationBinding::new("$everything").at_instance()),
            );
        });
        let definition = provider
            .operation_definition("Patient-i-everything")
            .unwrap();
        assert_eq!(definition.name.as_deref(), Some("everything"));
    }

    #[test]
    fn test_named_query_synthesis() {
        let provider = provider(|config| {
            config.registry.register(
                "Patient",
                MethodBinding::search(
                    SearchBinding::named("nearby")
                        .with_parameter(
                            SearchParam::new("location", SearchParamType::Token).required(),
                        )
                        .with_parameter(SearchParam::new("radius", SearchParamType::Number)),
                )
                .with_description("Find patients near a location"),
            );
        });

        let definition = provider
            .operation_definition("Patient-query-nearby")
            .unwrap();
        assert_eq!(definition.kind, OperationKind::Query);
        assert!(definition.idempotent);
        assert_eq!(definition.code, "nearby");
        assert!(definition.type_level);
        assert!(!definition.system);
        assert!(!definition.instance);
        assert_eq!(definition.resource, vec!["Patient"]);
        assert_eq!(
            definition.description.as_deref(),
            Some("Find patients near a location")
        );

        assert_eq!(definition.parameter.len(), 2);
        let location = &definition.parameter[0];
        assert_eq!(location.name, "location");
        assert_eq!(location.use_, ParameterUse::In);
        assert_eq!(location.min, 1);
        assert_eq!(location.max, "1");
        assert_eq!(location.param_type.as_deref(), Some("string"));
        assert_eq!(location.search_type, Some(SearchParamType::Token));
        assert_eq!(definition.parameter[1].min, 0);
    }

    #[test]
    fn test_system_level_named_query_sets_system_flag() {
        let provider = provider(|config| {
            config.registry.register_system(MethodBinding::search(
                SearchBinding::named("audit")
                    .with_parameter(SearchParam::new("period", SearchParamType::Date)),
            ));
        });
        let definition = provider.operation_definition("-query-audit").unwrap();
        assert!(definition.system);
        assert!(!definition.type_level);
        assert!(definition.resource.is_empty());
        assert_eq!(definition.code, "audit");
    }

    #[test]
    fn test_named_query_parameters_deduplicated_across_bindings() {
        let provider = provider(|config| {
            for _ in 0..2 {
                config.registry.register(
                    "Patient",
                    MethodBinding::search(
                        SearchBinding::named("nearby")
                            .with_parameter(SearchParam::new("location", SearchParamType::Token)),
                    ),
                );
            }
        });
        let definition = provider
            .operation_definition("Patient-query-nearby")
            .unwrap();
        assert_eq!(definition.parameter.len(), 1);
    }
}
