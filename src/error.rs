/// Errors returned by the API gateway.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The API answered with a non-success status, or a 2xx whose body carries `error`.
    #[error("{operation} failed with status {status}")]
    Request {
        operation: &'static str,
        status: u16,
        /// `error` field of the response body, when the API sent one.
        message: Option<String>,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{operation} returned an unreadable body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation} response is missing `{field}`")]
    Incomplete {
        operation: &'static str,
        field: &'static str,
    },
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Request { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_request_errors() {
        let err = Error::Request {
            operation: "login",
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.server_message(), Some("Invalid credentials"));

        let err = Error::Incomplete {
            operation: "login",
            field: "token",
        };
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn request_error_display_names_operation() {
        let err = Error::Request {
            operation: "forgot password",
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "forgot password failed with status 500");
    }
}
