use std::io;
use thiserror::Error;

/// Unified error type for gchat
#[derive(Error, Debug)]
pub enum ChatError {
    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success status whose body lacks the expected candidate shape
    #[error("{0}")]
    InvalidResponse(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// The user aborted an outstanding turn
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs may carry credentials
        let err = err.without_url();
        if err.is_timeout() {
            ChatError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Network(format!("Connection failed: {}", err))
        } else {
            ChatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_remote_message() {
        let err = ChatError::Api {
            status: 500,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): quota exceeded");
    }

    #[test]
    fn io_errors_convert() {
        let err: ChatError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ChatError::Io { .. }));
    }
}
