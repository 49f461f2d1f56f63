use skyport_core::CoreError;
use skyport_shared::RouteId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Route {0} was not found.")]
    RouteMissing(RouteId),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Io(_) => 1,
            AppError::Core(CoreError::ValidationError(_)) => 2,
            AppError::Core(CoreError::AuthError(_)) => 3,
            AppError::RouteMissing(_) => 4,
            AppError::Core(CoreError::FetchError { .. } | CoreError::SubmissionError(_)) => 5,
        }
    }

    /// Next step to offer the user.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Core(CoreError::AuthError(_)) => Some(
                "Sign in again, then pass the new token with --token or SKYPORT__SESSION__TOKEN.",
            ),
            AppError::Core(err) if err.is_retryable() => Some("Please try again."),
            AppError::RouteMissing(_) => Some("Go back to the route list and pick another route."),
            _ => None,
        }
    }
}
