//! Error definitions for all `schema2class` generation stages.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum GenError {
    /// Malformed or unsupported schema shape.
    #[error("schema error: {0}")]
    SchemaError(String),
    /// Unresolvable `$ref` target or fragment pointer.
    #[error("ref error: {0}")]
    RefError(String),
    /// A `$ref` or `extends` chain that cycles or exceeds the depth bound.
    #[error("cycle error: {0}")]
    CycleError(String),
    /// Both `extends` and `extendsJavaClass` declared on the same node.
    #[error("conflicting inheritance: {0}")]
    ConflictingInheritance(String),
    /// A planned constructor property has no backing field on the class.
    #[error("missing field invariant: {0}")]
    MissingField(String),
    /// Invalid generation configuration.
    #[error("config error: {0}")]
    ConfigError(String),
    /// Remote schema fetching or caching failure.
    #[error("fetch error: {0}")]
    FetchError(String),
    /// Filesystem I/O error from the CLI or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
