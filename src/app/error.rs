use crate::validation::ValidationError;

/// Failure of a flow, before it is turned into a notification.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Rejected client-side; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API call failed or returned an error status.
    #[error("Request error: {0}")]
    Request(#[from] crate::error::Error),

    /// The flow needs a signed-in user and there is none.
    #[error("Not authenticated")]
    Unauthenticated,

    /// LinkedIn refused or the user cancelled the consent screen.
    #[error("LinkedIn sign-in was cancelled: {0}")]
    Provider(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlowError {
    /// Text to show the user.
    ///
    /// Validation messages are shown as-is, API failures use the server's message
    /// when it sent one, anything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Request(e) => e.server_message().unwrap_or(fallback).to_string(),
            Self::Unauthenticated | Self::Provider(_) | Self::Config(_) => fallback.to_string(),
        }
    }

    /// `true` if the error was raised before anything was sent.
    #[must_use]
    pub fn is_client_side(&self) -> bool {
        !matches!(self, Self::Request(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn validation_message_shown_verbatim() {
        let err = FlowError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.user_message("Registration failed"), "Passwords do not match.");
        assert!(err.is_client_side());
    }

    #[test]
    fn server_message_preferred_over_fallback() {
        let err = FlowError::from(Error::Request {
            operation: "registration",
            status: 409,
            message: Some("Email already exists!".into()),
        });
        assert_eq!(err.user_message("Registration failed"), "Email already exists!");
        assert!(!err.is_client_side());
    }

    #[test]
    fn fallback_when_server_silent() {
        let err = FlowError::from(Error::Request {
            operation: "login",
            status: 502,
            message: None,
        });
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }
}
