//! Cluster error types and ApiError mapping
//!
//! Maps kube-rs errors to onramp API errors so the HTTP layer can apply
//! the response taxonomy in one place.

use crate::error::ApiError;
use thiserror::Error;

/// Errors from cluster operations
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Error from the kube-rs client
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Invalid kubeconfig or in-cluster configuration
    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),

    /// Resource is known to be absent
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    /// Resource is known to exist already
    #[error("{kind} {name} already exists")]
    AlreadyExists { kind: &'static str, name: String },

    /// Object lacks the management label
    #[error("{kind} {name} is not managed by this service")]
    Unmanaged { kind: &'static str, name: String },
}

impl ClusterError {
    /// True when the error means the object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ClusterError::NotFound { .. } => true,
            ClusterError::Kube(kube::Error::Api(ae)) => ae.code == 404,
            _ => false,
        }
    }
}

impl From<ClusterError> for ApiError {
    fn from(err: ClusterError) -> Self {
        match err {
            ClusterError::Kube(kube::Error::Api(ae)) => match ae.code {
                403 => ApiError::Forbidden(ae.message),
                404 => ApiError::NotFound("object not found".to_string()),
                409 => ApiError::Conflict("object already exists".to_string()),
                422 => ApiError::BadRequest(format!("validation error: {}", ae.message)),
                // 401 here means our own service account is misconfigured,
                // not the caller
                _ => ApiError::Upstream(ae.message),
            },
            ClusterError::Kube(e) => ApiError::Upstream(e.to_string()),
            ClusterError::InvalidConfig(msg) => ApiError::Upstream(msg),
            ClusterError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ClusterError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            ClusterError::Unmanaged { .. } => ApiError::Forbidden(err.to_string()),
        }
    }
}

/// Result type alias for cluster operations
pub type ClusterResult<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn api_error(code: u16) -> ClusterError {
        ClusterError::Kube(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: format!("code {code}"),
            reason: String::new(),
            code,
        }))
    }

    #[test]
    fn test_kube_status_mapping() {
        assert_eq!(
            ApiError::from(api_error(404)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(api_error(409)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(api_error(403)).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(api_error(422)).status_code(),
            StatusCode::BAD_REQUEST
        );
        // Anything else is an unexpected upstream failure
        assert_eq!(
            ApiError::from(api_error(500)).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_explicit_variants() {
        let not_found = ClusterError::NotFound {
            kind: "user",
            name: "alice".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(
            ApiError::from(not_found).status_code(),
            StatusCode::NOT_FOUND
        );

        let conflict = ClusterError::AlreadyExists {
            kind: "project",
            name: "physics".to_string(),
        };
        assert_eq!(ApiError::from(conflict).status_code(), StatusCode::CONFLICT);

        let unmanaged = ClusterError::Unmanaged {
            kind: "project",
            name: "kube-system".to_string(),
        };
        assert_eq!(
            ApiError::from(unmanaged).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_is_not_found_on_kube_api_error() {
        assert!(api_error(404).is_not_found());
        assert!(!api_error(409).is_not_found());
    }
}
