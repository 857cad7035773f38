//! Deterministic name assignment for operations and named queries.
//!
//! Every custom-operation binding and every named-search binding gets a
//! stable name derived from its owning resource, level capability, and
//! declared code. Names are assigned by binding identity, and the inverse
//! mapping groups all bindings that derived the *same* name: overloaded
//! bindings of one logical operation intentionally fold into one group.
//! That is how overload sets are detected, not a collision bug.

use std::collections::HashMap;

use crate::registry::{BindingDetail, BindingId, BindingRegistry};

/// Name assignments for the registry's operation and named-search bindings.
///
/// Built once at provider construction, before any document request is
/// served; read-only afterwards.
#[derive(Debug, Default)]
pub struct OperationNameTable {
    operation_names: HashMap<BindingId, String>,
    operation_groups: HashMap<String, Vec<BindingId>>,
    query_names: HashMap<BindingId, String>,
    query_groups: HashMap<String, Vec<BindingId>>,
}

impl OperationNameTable {
    pub fn build(registry: &BindingRegistry) -> Self {
        let mut table = Self::default();
        table.assign(registry);
        table
    }

    /// Walk the registry and assign names to bindings that do not have one
    /// yet. Safe to call again after new registrations: existing
    /// assignments are never reworked.
    pub fn assign(&mut self, registry: &BindingRegistry) {
        for (resource, bindings) in registry.grouped() {
            let resource = (!resource.is_empty()).then_some(resource);
            for registered in bindings {
                match &registered.binding.detail {
                    BindingDetail::Operation(operation) => {
                        if self.operation_names.contains_key(&registered.id) {
                            continue;
                        }
                        let name = derive_operation_name(
                            resource,
                            operation.instance_level,
                            operation.server_level,
                            &operation.code,
                        );
                        log::debug!("Detected operation: {}", name);
                        self.operation_names.insert(registered.id, name.clone());
                        self.operation_groups.entry(name).or_default().push(registered.id);
                    }
                    BindingDetail::Search(search) => {
                        let Some(query_name) = &search.query_name else {
                            continue;
                        };
                        if self.query_names.contains_key(&registered.id) {
                            continue;
                        }
                        let name = derive_query_name(resource, query_name);
                        log::debug!("Detected named query: {}", name);
                        self.query_names.insert(registered.id, name.clone());
                        self.query_groups.entry(name).or_default().push(registered.id);
                    }
                    BindingDetail::Plain => {}
                }
            }
        }
    }

    pub fn operation_name(&self, id: BindingId) -> Option<&str> {
        self.operation_names.get(&id).map(String::as_str)
    }

    pub fn query_name(&self, id: BindingId) -> Option<&str> {
        self.query_names.get(&id).map(String::as_str)
    }

    /// All operation bindings that were assigned `name`, in assignment order.
    pub fn operation_group(&self, name: &str) -> Option<&[BindingId]> {
        self.operation_groups.get(name).map(Vec::as_slice)
    }

    /// All named-search bindings that were assigned `name`, in assignment order.
    pub fn query_group(&self, name: &str) -> Option<&[BindingId]> {
        self.query_groups.get(name).map(Vec::as_slice)
    }
}

/// `{resource}-{i}{s}-{code}`: the owning resource (or nothing for
/// system-level), a marker letter per supported level, and the operation
/// code with its sigil stripped. `Patient` + instance + `$everything` →
/// `Patient-i-everything`.
pub fn derive_operation_name(
    resource: Option<&str>,
    instance: bool,
    server: bool,
    code: &str,
) -> String {
    let mut name = String::new();
    if let Some(resource) = resource {
        name.push_str(resource);
    }
    name.push('-');
    if instance {
        name.push('i');
    }
    if server {
        name.push('s');
    }
    name.push('-');
    name.push_str(strip_sigil(code));
    name
}

/// `{resource}-query-{queryName}`.
pub fn derive_query_name(resource: Option<&str>, query_name: &str) -> String {
    let mut name = String::new();
    if let Some(resource) = resource {
        name.push_str(resource);
    }
    name.push_str("-query-");
    name.push_str(query_name);
    name
}

/// Operation codes are declared with their `$` sigil; documents carry them
/// bare.
pub fn strip_sigil(code: &str) -> &str {
    code.strip_prefix('$').unwrap_or(code)
}
