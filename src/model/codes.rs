//! Code vocabularies shared by the generated documents.
//!
//! Values follow the DSTU3 value sets (`type-restful-interaction`,
//! `system-restful-interaction`, `search-param-type`, ...). Interaction
//! parsing is deliberately lenient: an unknown code yields `None` and the
//! caller skips that check. A malformed code on one binding never aborts a
//! document build.

use serde::{Deserialize, Serialize};

/// Resource-level restful interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeInteraction {
    Read,
    Vread,
    Update,
    Patch,
    Delete,
    HistoryInstance,
    HistoryType,
    Create,
    SearchType,
}

impl TypeInteraction {
    /// Parse a resource-level interaction code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "read" => Self::Read,
            "vread" => Self::Vread,
            "update" => Self::Update,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "history-instance" => Self::HistoryInstance,
            "history-type" => Self::HistoryType,
            "create" => Self::Create,
            "search-type" => Self::SearchType,
            _ => return None,
        })
    }

    /// Canonical position of this interaction in a resource's interaction
    /// list. An explicit table rather than the enum's declaration order, so
    /// rearranging the enum cannot silently reshuffle generated documents.
    pub fn rank(self) -> u8 {
        match self {
            Self::Read => 0,
            Self::Vread => 1,
            Self::Update => 2,
            Self::Patch => 3,
            Self::Delete => 4,
            Self::HistoryInstance => 5,
            Self::HistoryType => 6,
            Self::Create => 7,
            Self::SearchType => 8,
        }
    }
}

/// System-level restful interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemInteraction {
    Transaction,
    Batch,
    SearchSystem,
    HistorySystem,
}

impl SystemInteraction {
    /// Parse a system-level interaction code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "transaction" => Self::Transaction,
            "batch" => Self::Batch,
            "search-system" => Self::SearchSystem,
            "history-system" => Self::HistorySystem,
            _ => return None,
        })
    }
}

/// Search parameter value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamType {
    Number,
    Date,
    String,
    Token,
    Reference,
    Composite,
    Quantity,
    Uri,
}

/// Publication status of a generated document. Synthesized documents are
/// always `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Active,
    Retired,
    Unknown,
}

/// `CapabilityStatement.kind`; a running server always reports `instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityStatementKind {
    Instance,
    Capability,
    Requirements,
}

/// `CapabilityStatement.rest.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestfulCapabilityMode {
    Client,
    Server,
}

/// `CapabilityStatement.acceptUnknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownContentCode {
    No,
    Extensions,
    Elements,
    Both,
}

/// Conditional-delete support level for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionalDeleteStatus {
    NotSupported,
    Single,
    Multiple,
}

/// `OperationDefinition.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Operation,
    Query,
}

/// `OperationDefinition.parameter.use`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterUse {
    In,
    Out,
}
