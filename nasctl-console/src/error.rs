//! Console error types

use thiserror::Error;

/// Everything that can go wrong between a panel or dialog and the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// Network failure, or an HTTP error whose body was not an envelope
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered `success: false`
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Draft failed a local presence check
    #[error("{0}")]
    Validation(String),

    /// The old record was removed but its replacement failed
    #[error("{0}")]
    Removed(Box<ConsoleError>),
}

impl ConsoleError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            code: None,
            message: message.into(),
        }
    }

    /// The text shown inline next to the panel or form.
    ///
    /// Rejections carry the server's message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Removed(inner) => inner.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<nasctl_common::Error> for ConsoleError {
    fn from(err: nasctl_common::Error) -> Self {
        match err {
            nasctl_common::Error::Validation(message) => Self::Validation(message),
            other => Self::Validation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_server_text() {
        let err = ConsoleError::Rejected {
            code: Some(409),
            message: "Path already exists".to_string(),
        };
        assert_eq!(err.user_message(), "Path already exists");
        assert_eq!(err.to_string(), "Path already exists");
    }

    #[test]
    fn test_user_message_for_transport_errors() {
        let err = ConsoleError::Request("502 Bad Gateway - upstream down".to_string());
        assert_eq!(err.user_message(), "Request failed: 502 Bad Gateway - upstream down");
    }

    #[test]
    fn test_removed_keeps_inner_message() {
        let err = ConsoleError::Removed(Box::new(ConsoleError::rejected("Failed to create export")));
        assert_eq!(err.user_message(), "Failed to create export");

        let err = ConsoleError::Removed(Box::new(ConsoleError::Request("timed out".to_string())));
        assert_eq!(err.user_message(), "Request failed: timed out");
    }

    #[test]
    fn test_from_common_error() {
        let err: ConsoleError = nasctl_common::Error::InvalidOption("rw ro".to_string()).into();
        assert_eq!(err.user_message(), "Invalid export option: \"rw ro\"");

        let err: ConsoleError = nasctl_common::Error::Validation("name is required".to_string()).into();
        assert_eq!(err, ConsoleError::Validation("name is required".to_string()));
    }
}
