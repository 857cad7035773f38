//! The binding registry: every operation the server has registered, grouped
//! by owning resource, plus the system-level bindings that have none.
//!
//! The registry is write-at-startup, read-at-request-time. The provider
//! only ever reads it; [`BindingRegistry::grouped`] is a live view, not a
//! snapshot, so bindings registered after startup show up in the next
//! uncached document build.

use std::collections::BTreeMap;

use super::binding::{BindingId, MethodBinding};

/// A binding together with the identity it was assigned at registration.
#[derive(Debug, Clone)]
pub struct RegisteredBinding {
    pub id: BindingId,
    pub binding: MethodBinding,
}

/// All registered bindings, keyed by owning resource name.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    next_id: u64,
    resources: BTreeMap<String, Vec<RegisteredBinding>>,
    system: Vec<RegisteredBinding>,
}

/// A binding resolved by id, with its owning resource.
#[derive(Debug, Clone, Copy)]
pub struct BindingRef<'a> {
    /// `None` for system-level bindings.
    pub resource_name: Option<&'a str>,
    pub registered: &'a RegisteredBinding,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under a resource. Resource names must be
    /// non-empty; the empty string is reserved as the system-level sentinel.
    pub fn register(&mut self, resource: impl Into<String>, binding: MethodBinding) -> BindingId {
        let resource = resource.into();
        debug_assert!(!resource.is_empty(), "resource names must be non-empty");
        let id = self.allocate_id();
        self.resources
            .entry(resource)
            .or_default()
            .push(RegisteredBinding { id, binding });
        id
    }

    /// Register a binding with no owning resource.
    pub fn register_system(&mut self, binding: MethodBinding) -> BindingId {
        let id = self.allocate_id();
        self.system.push(RegisteredBinding { id, binding });
        id
    }

    /// Group bindings by owning resource name. The system-level group, if
    /// any, appears under the empty-string sentinel, which sorts first.
    pub fn grouped(&self) -> BTreeMap<&str, &[RegisteredBinding]> {
        let mut groups: BTreeMap<&str, &[RegisteredBinding]> = BTreeMap::new();
        for (resource, bindings) in &self.resources {
            groups.insert(resource.as_str(), bindings.as_slice());
        }
        if !self.system.is_empty() {
            groups.insert("", self.system.as_slice());
        }
        groups
    }

    /// Resolve a binding id to the binding and its owning resource.
    pub fn lookup(&self, id: BindingId) -> Option<BindingRef<'_>> {
        for (resource, bindings) in &self.resources {
            if let Some(registered) = bindings.iter().find(|b| b.id == id) {
                return Some(BindingRef {
                    resource_name: Some(resource.as_str()),
                    registered,
                });
            }
        }
        self.system
            .iter()
            .find(|b| b.id == id)
            .map(|registered| BindingRef {
                resource_name: None,
                registered,
            })
    }

    pub fn len(&self) -> usize {
        self.resources.values().map(Vec::len).sum::<usize>() + self.system.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate_id(&mut self) -> BindingId {
        let id = BindingId::new(self.next_id);
        self.next_id += 1;
        id
    }
}
