//! The conformance provider and its capability-statement builder.
//!
//! The provider introspects the binding registry and synthesizes the
//! top-level capability statement on demand. Construction is a pure
//! function of the registry, so the whole document can be cached: the slot
//! holds an `Arc` that is swapped wholesale, never mutated, and concurrent
//! rebuilds are a benign last-writer-wins race.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use parking_lot::RwLock;

use crate::config::{RequestContext, SharedConfiguration};
use crate::errors::ConformanceError;
use crate::model::{
    CapabilityStatement, CapabilityStatementKind, ConditionalDeleteStatus, Implementation,
    PublicationStatus, Reference, ResourceInteractionEntry, Rest, RestOperation, RestResource,
    RestSearchParam, RestfulCapabilityMode, Software, SystemInteraction, SystemInteractionEntry,
    TypeInteraction, UnknownContentCode, FHIR_VERSION, FORMAT_JSON, FORMAT_XML,
};
use crate::registry::{
    BindingDetail, RegisteredBinding, ResourceDefinition, ResourceRegistry, SearchBinding,
    SearchParam,
};

use super::names::{strip_sigil, OperationNameTable};

/// Serves the capability statement and operation definitions for a server's
/// registered bindings.
///
/// The same `CapabilityStatement` instance is handed out for every request
/// until the cache is invalidated. Anything that must reflect per-request
/// state (notably a server base address resolved from the incoming
/// request) requires [`with_cache(false)`](Self::with_cache).
pub struct ConformanceProvider {
    pub(crate) config: SharedConfiguration,
    pub(crate) names: OperationNameTable,
    publisher: Option<String>,
    cache: bool,
    cached: RwLock<Option<Arc<CapabilityStatement>>>,
}

impl ConformanceProvider {
    /// Build a provider over a shared configuration. The name table is
    /// assigned here, before any document can be requested.
    pub fn new(config: SharedConfiguration) -> Self {
        let names = OperationNameTable::build(&config.read().registry);
        Self {
            config,
            names,
            publisher: Some("Not provided".to_string()),
            cache: true,
            cached: RwLock::new(None),
        }
    }

    /// Disable or re-enable the whole-document cache. Default: enabled.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Publisher recorded in the generated statement. `None` omits the
    /// field entirely.
    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Synthesize the capability statement describing the whole server.
    ///
    /// With caching enabled, the first build is returned unchanged for
    /// every subsequent request; otherwise each call re-reads the live
    /// registry.
    pub fn capability_statement(
        &self,
        ctx: &RequestContext,
    ) -> Result<Arc<CapabilityStatement>, ConformanceError> {
        if self.cache {
            if let Some(cached) = self.cached.read().clone() {
                return Ok(cached);
            }
        }

        let config = self.config.read();
        let server_base = config.address_strategy.server_base(ctx);

        let mut rest = Rest {
            mode: RestfulCapabilityMode::Server,
            interaction: Vec::new(),
            resource: Vec::new(),
            operation: Vec::new(),
        };

        let mut system_ops: HashSet<SystemInteraction> = HashSet::new();
        let mut emitted_operations: HashSet<String> = HashSet::new();

        for (resource_name, bindings) in config.registry.grouped() {
            if resource_name.is_empty() {
                for registered in bindings {
                    check_system_interaction(&mut rest, &mut system_ops, registered);
                    if let BindingDetail::Operation(operation) = &registered.binding.detail {
                        if let Some(name) = self.names.operation_name(registered.id) {
                            if emitted_operations.insert(name.to_string()) {
                                log::debug!("Found bound operation: {}", name);
                                rest.operation
                                    .push(operation_reference(strip_sigil(&operation.code), name));
                            }
                        }
                    }
                }
                continue;
            }

            let definition = config.resources.require(resource_name)?;
            let mut resource = RestResource {
                type_name: definition.name.clone(),
                profile: Reference::new(definition.profile_url(&server_base)),
                interaction: Vec::new(),
                conditional_create: None,
                conditional_update: None,
                conditional_delete: None,
                search_include: Vec::new(),
                search_param: Vec::new(),
            };
            let mut resource_ops: HashSet<TypeInteraction> = HashSet::new();
            let mut includes: BTreeSet<String> = BTreeSet::new();

            for registered in bindings {
                apply_interaction(&mut resource, &mut resource_ops, registered);
                // One binding can contribute to both the resource and the
                // system interaction lists.
                check_system_interaction(&mut rest, &mut system_ops, registered);

                match &registered.binding.detail {
                    BindingDetail::Search(search) => {
                        if let Some(query_name) = &search.query_name {
                            if let Some(name) = self.names.query_name(registered.id) {
                                if emitted_operations.insert(name.to_string()) {
                                    rest.operation.push(operation_reference(query_name, name));
                                }
                            }
                        } else {
                            apply_default_search(
                                &mut resource,
                                definition,
                                &config.resources,
                                &mut includes,
                                search,
                            );
                        }
                    }
                    BindingDetail::Operation(operation) => {
                        if let Some(name) = self.names.operation_name(registered.id) {
                            if emitted_operations.insert(name.to_string()) {
                                rest.operation
                                    .push(operation_reference(strip_sigil(&operation.code), name));
                            }
                        }
                    }
                    BindingDetail::Plain => {}
                }
            }

            resource.interaction.sort_by_key(|entry| entry.code.rank());
            resource.search_include = includes.into_iter().collect();
            rest.resource.push(resource);
        }

        let settings = &config.settings;
        let statement = Arc::new(CapabilityStatement {
            resource_type: "CapabilityStatement".to_string(),
            status: PublicationStatus::Active,
            date: conformance_date(settings.conformance_date.as_deref()),
            publisher: self.publisher.clone(),
            kind: CapabilityStatementKind::Instance,
            software: Software {
                name: settings.server_name.clone(),
                version: settings.server_version.clone(),
            },
            implementation: Implementation {
                description: settings.implementation_description.clone(),
                url: server_base,
            },
            fhir_version: FHIR_VERSION.to_string(),
            accept_unknown: UnknownContentCode::Extensions,
            format: vec![FORMAT_XML.to_string(), FORMAT_JSON.to_string()],
            rest: vec![rest],
        });

        if self.cache {
            *self.cached.write() = Some(statement.clone());
        }
        Ok(statement)
    }
}

/// Add the binding's resource-level interaction to the resource component,
/// once per kind, along with whatever it implies: a versioned read implies
/// the plain read, and conditional support sets the matching flag.
fn apply_interaction(
    resource: &mut RestResource,
    seen: &mut HashSet<TypeInteraction>,
    registered: &RegisteredBinding,
) {
    let binding = &registered.binding;
    let Some(code) = binding.interaction.as_deref() else {
        return;
    };
    let Some(interaction) = TypeInteraction::from_code(code) else {
        return;
    };
    if seen.insert(interaction) {
        resource
            .interaction
            .push(ResourceInteractionEntry { code: interaction });
    }
    if interaction == TypeInteraction::Vread && seen.insert(TypeInteraction::Read) {
        resource.interaction.push(ResourceInteractionEntry {
            code: TypeInteraction::Read,
        });
    }
    if binding.supports_conditional {
        match interaction {
            TypeInteraction::Create => resource.conditional_create = Some(true),
            TypeInteraction::Update => resource.conditional_update = Some(true),
            TypeInteraction::Delete => {
                resource.conditional_delete = Some(if binding.conditional_multiple {
                    ConditionalDeleteStatus::Multiple
                } else {
                    ConditionalDeleteStatus::Single
                });
            }
            _ => {}
        }
    }
}

/// Add the binding's system-wide interaction to the rest component, once
/// per kind. Codes that are not system interactions are skipped.
fn check_system_interaction(
    rest: &mut Rest,
    seen: &mut HashSet<SystemInteraction>,
    registered: &RegisteredBinding,
) {
    let Some(code) = registered.binding.interaction.as_deref() else {
        return;
    };
    let Some(interaction) = SystemInteraction::from_code(code) else {
        return;
    };
    if seen.insert(interaction) {
        rest.interaction
            .push(SystemInteractionEntry { code: interaction });
    }
}

/// Fold a default (nameless) search binding into the resource component:
/// merge its includes and emit one searchParam entry per declared
/// parameter.
fn apply_default_search(
    resource: &mut RestResource,
    definition: &ResourceDefinition,
    resources: &ResourceRegistry,
    includes: &mut BTreeSet<String>,
    search: &SearchBinding,
) {
    includes.extend(search.includes.iter().cloned());

    let mut parameters: Vec<&SearchParam> = search.parameters.iter().collect();
    parameters.sort_by(|a, b| b.required.cmp(&a.required).then_with(|| a.name.cmp(&b.name)));

    for parameter in parameters {
        let (name, _chain) = split_chain(&parameter.name);
        let documentation = parameter
            .description
            .clone()
            .filter(|description| !description.trim().is_empty())
            .or_else(|| definition.search_description(name).map(str::to_string));
        // Chain and target information is resolved but not yet emitted into
        // searchParam.chain / searchParam.target.
        let _targets = resources.resolve_targets(&parameter.target_types);

        resource.search_param.push(RestSearchParam {
            name: name.to_string(),
            documentation,
            param_type: parameter.param_type,
        });
    }
}

/// Split a dot-qualified search parameter into its base name and chain.
fn split_chain(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((base, chain)) => (base, Some(chain)),
        None => (name, None),
    }
}

fn operation_reference(name: &str, definition: &str) -> RestOperation {
    RestOperation {
        name: name.to_string(),
        definition: Reference::new(format!("OperationDefinition/{}", definition)),
    }
}

/// The statement's `date`: the configured build date when it parses, "now"
/// otherwise. A malformed date is logged and tolerated, never fatal.
fn conformance_date(configured: Option<&str>) -> String {
    if let Some(raw) = configured {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return date.to_rfc3339_opts(SecondsFormat::Secs, true);
        }
        if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() {
            return raw.to_string();
        }
        log::warn!("Ignoring unparseable conformance date {:?}", raw);
    }
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
