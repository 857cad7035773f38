//! The capability-document synthesis engine.
//!
//! Three pieces, wired at provider construction:
//!
//! 1. The binding registry's grouped view feeds the
//!    [`OperationNameTable`](names::OperationNameTable) once, before any
//!    request is served, and the statement builder at each uncached build.
//! 2. [`ConformanceProvider::capability_statement`] synthesizes the single
//!    top-level document describing the whole server.
//! 3. [`ConformanceProvider::operation_definition`] synthesizes one formal
//!    definition per assigned name, on demand, merging every binding that
//!    shares the name.
//!
//! Nothing here validates, executes, or routes client requests; the
//! provider only *describes* the registered surface.

pub mod capability;
pub mod names;
pub mod operation;

pub use capability::ConformanceProvider;
pub use names::OperationNameTable;
