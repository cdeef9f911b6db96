//! Kubernetes API client errors

use kubegraph_core::CoreError;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the Kubernetes API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 from the API server
    #[error("unauthorized access to the kubernetes api")]
    Unauthorized,

    /// 403 from the API server
    #[error("forbidden access to the kubernetes api (check rbac permissions)")]
    Forbidden,

    /// Any other non-success status
    #[error("kubernetes api returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS, or body-decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid client configuration
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        CoreError::Api(err.to_string())
    }
}
