//! Operation binding descriptors.
//!
//! A binding is an opaque descriptor of one registered server-side
//! operation: a CRUD interaction, a search (default or named), or a custom
//! operation. The registry hands them out for introspection only; the
//! provider never validates, executes, or routes anything through them.

use crate::model::SearchParamType;

/// Unique identity assigned to a binding at registration time.
///
/// Name assignment is keyed by this id rather than by structural equality:
/// two structurally identical bindings stay distinct, and overloads of one
/// logical operation are grouped by the name they *derive*, not by the shape
/// of the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One registered server-side operation.
#[derive(Debug, Clone)]
pub struct MethodBinding {
    /// Raw restful interaction code (`read`, `create`, `transaction`, ...).
    /// Parsed leniently at document-build time; an unrecognized code just
    /// skips the interaction checks.
    pub interaction: Option<String>,
    /// Human description, used in operation-definition merging.
    pub description: Option<String>,
    /// Whether the operation may be qualified by a search expression
    /// instead of an identifier.
    pub supports_conditional: bool,
    /// For conditional deletes: whether multiple matches may be deleted.
    pub conditional_multiple: bool,
    pub detail: BindingDetail,
}

/// What kind of binding this is, with kind-specific attributes.
#[derive(Debug, Clone)]
pub enum BindingDetail {
    /// Plain interaction binding, fully described by its interaction code.
    Plain,
    Search(SearchBinding),
    Operation(OperationBinding),
}

impl MethodBinding {
    /// Plain interaction binding (`read`, `vread`, `transaction`, ...).
    pub fn interaction(code: impl Into<String>) -> Self {
        Self {
            interaction: Some(code.into()),
            description: None,
            supports_conditional: false,
            conditional_multiple: false,
            detail: BindingDetail::Plain,
        }
    }

    /// Search binding. Searches always carry the `search-type` interaction.
    pub fn search(search: SearchBinding) -> Self {
        Self {
            interaction: Some("search-type".to_string()),
            description: None,
            supports_conditional: false,
            conditional_multiple: false,
            detail: BindingDetail::Search(search),
        }
    }

    /// Custom operation binding. Operations carry no restful interaction
    /// code of their own.
    pub fn operation(operation: OperationBinding) -> Self {
        Self {
            interaction: None,
            description: None,
            supports_conditional: false,
            conditional_multiple: false,
            detail: BindingDetail::Operation(operation),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the binding as supporting conditional execution.
    pub fn conditional(mut self, multiple: bool) -> Self {
        self.supports_conditional = true;
        self.conditional_multiple = multiple;
        self
    }
}

/// Search-specific attributes of a binding.
#[derive(Debug, Clone, Default)]
pub struct SearchBinding {
    /// Stable query name, when the search is exposed as a named query.
    /// `None` marks the resource's default/implicit search.
    pub query_name: Option<String>,
    /// Declared `_include` paths.
    pub includes: Vec<String>,
    /// Declared search parameters.
    pub parameters: Vec<SearchParam>,
}

impl SearchBinding {
    pub fn named(query_name: impl Into<String>) -> Self {
        Self {
            query_name: Some(query_name.into()),
            ..Self::default()
        }
    }

    pub fn with_include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    pub fn with_parameter(mut self, parameter: SearchParam) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// One declared search parameter.
#[derive(Debug, Clone)]
pub struct SearchParam {
    /// Parameter name; may be dot-qualified to express a chained reference
    /// traversal (`organization.name`).
    pub name: String,
    pub required: bool,
    pub param_type: Option<SearchParamType>,
    pub description: Option<String>,
    /// Declared target resource types for reference parameters.
    pub target_types: Vec<String>,
}

impl SearchParam {
    pub fn new(name: impl Into<String>, param_type: SearchParamType) -> Self {
        Self {
            name: name.into(),
            required: false,
            param_type: Some(param_type),
            description: None,
            target_types: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_target(mut self, resource: impl Into<String>) -> Self {
        self.target_types.push(resource.into());
        self
    }
}

/// Custom-operation attributes of a binding.
#[derive(Debug, Clone)]
pub struct OperationBinding {
    /// Declared code, with its leading `$` sigil (`$everything`).
    pub code: String,
    pub idempotent: bool,
    pub instance_level: bool,
    pub type_level: bool,
    pub server_level: bool,
    pub input: Vec<OperationParam>,
    pub output: Vec<OperationParam>,
}

impl OperationBinding {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            idempotent: true,
            instance_level: false,
            type_level: false,
            server_level: false,
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn at_instance(mut self) -> Self {
        self.instance_level = true;
        self
    }

    pub fn at_type(mut self) -> Self {
        self.type_level = true;
        self
    }

    pub fn at_server(mut self) -> Self {
        self.server_level = true;
        self
    }

    pub fn not_idempotent(mut self) -> Self {
        self.idempotent = false;
        self
    }

    pub fn with_input(mut self, parameter: OperationParam) -> Self {
        self.input.push(parameter);
        self
    }

    pub fn with_output(mut self, parameter: OperationParam) -> Self {
        self.output.push(parameter);
        self
    }
}

/// One declared input or output parameter of a custom operation.
#[derive(Debug, Clone)]
pub struct OperationParam {
    pub name: String,
    pub param_type: Option<String>,
    pub search_type: Option<SearchParamType>,
    /// Minimum occurrence count.
    pub min: u32,
    /// Maximum occurrence count; `None` means unbounded.
    pub max: Option<u32>,
}

impl OperationParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: None,
            search_type: None,
            min: 0,
            max: Some(1),
        }
    }

    pub fn typed(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = Some(param_type.into());
        self
    }

    pub fn cardinality(mut self, min: u32, max: Option<u32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}
