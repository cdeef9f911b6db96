//! Unified error types for the kubegraph connector
//!
//! Subsystem errors (the Kubernetes API client in particular) convert into
//! this central type at the crate boundary so callers match on one enum.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the kubegraph connector
#[derive(Debug, Error)]
pub enum CoreError {
    /// A ServiceAccount subject carries no namespace and the referencing
    /// binding provides none to inherit
    #[error("service account subject {name:?} has no namespace to inherit")]
    UnresolvableSubject { name: String },

    /// A binding subject of a kind this connector does not model
    #[error("unsupported subject kind: {kind}")]
    UnsupportedSubjectKind { kind: String },

    /// An object identifier that does not follow the expected grammar
    #[error("invalid resource id {id:?}: {reason}")]
    InvalidResourceId { id: String, reason: String },

    /// An opaque pagination token that cannot be decoded
    #[error("invalid page token: {0}")]
    InvalidPageToken(String),

    /// Upstream Kubernetes API failure
    #[error("kubernetes api error: {0}")]
    Api(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}
