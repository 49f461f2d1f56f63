pub mod fallback;
pub mod payment;
pub mod repository;
pub mod session;

use repository::ServiceError;

/// Page-level error taxonomy. Every variant resolves to a re-renderable state
/// with a next step for the user; none of them is fatal.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Authentication required: {0}")]
    AuthError(String),
    #[error("Failed to load {what}: {reason}")]
    FetchError { what: String, reason: String },
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Submission failed: {0}")]
    SubmissionError(String),
}

impl CoreError {
    /// Classify a failed data load. Unauthorized responses always become
    /// `AuthError` so callers can route them to sign-in.
    pub fn fetch(what: &str, err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(reason) => CoreError::AuthError(reason),
            other => CoreError::FetchError {
                what: what.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Classify a failed booking or payment POST.
    pub fn submission(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(reason) => CoreError::AuthError(reason),
            other => CoreError::SubmissionError(other.to_string()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::FetchError { .. } | CoreError::SubmissionError(_)
        )
    }
}

impl From<ServiceError> for CoreError {
    fn from(err: ServiceError) -> Self {
        CoreError::fetch("backend data", err)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_always_maps_to_auth_error() {
        let err = CoreError::fetch("route", ServiceError::Unauthorized("expired".into()));
        assert!(matches!(err, CoreError::AuthError(_)));

        let err = CoreError::submission(ServiceError::Unauthorized("expired".into()));
        assert!(matches!(err, CoreError::AuthError(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_fetch_and_submission_errors_are_retryable() {
        let err = CoreError::fetch(
            "route",
            ServiceError::Status {
                status: 503,
                message: "unavailable".into(),
            },
        );
        assert!(err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Failed to load route: backend returned 503: unavailable"
        );

        let err = CoreError::submission(ServiceError::Transport("connection reset".into()));
        assert!(err.is_retryable());
        assert!(!CoreError::validation("pick a seat").is_retryable());
    }
}
