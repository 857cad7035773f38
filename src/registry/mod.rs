//! Registries the provider introspects: the operation bindings registered
//! against each resource, and the resource metadata they resolve against.
//!
//! Both registries are populated at server wiring time and only read
//! afterwards. The provider never mutates them.

pub mod binding;
pub mod registry;
pub mod resources;

pub use binding::{
    BindingDetail, BindingId, MethodBinding, OperationBinding, OperationParam, SearchBinding,
    SearchParam,
};
pub use registry::{BindingRef, BindingRegistry, RegisteredBinding};
pub use resources::{ResourceDefinition, ResourceRegistry};
