//! Error types for document synthesis.
//!
//! Only two conditions surface to callers: asking for an operation
//! definition under a name nothing was assigned, and a binding registry
//! that references a resource nobody defined. Tolerated-malformed inputs
//! (an interaction code or build date that fails to parse) are not errors:
//! they are logged, skipped, and the build continues.

use thiserror::Error;

/// Errors surfaced by the conformance provider.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// No operation or named query was assigned the requested name. The
    /// caller can correct this; it maps to a 404 on the HTTP surface.
    #[error("no operation or named query is published as \"{name}\"")]
    OperationNotFound { name: String },

    /// A resource present in the binding registry has no registered
    /// definition. This is a wiring mistake, not a per-request condition,
    /// and propagates as an internal error.
    #[error("resource \"{resource}\" has bindings but no registered definition")]
    UnknownResource { resource: String },
}
