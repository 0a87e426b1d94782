//! Client error types

use thiserror::Error;

/// Failures of a single exchange with the compliance service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network I/O failure or deadline expiry
    #[error("transport failure: {0}")]
    Transport(String),

    /// Body could not be read as a validation response
    #[error("malformed response (HTTP {status}): {reason}")]
    MalformedResponse {
        /// HTTP status code of the exchange
        status: u16,
        /// Parser diagnostic
        reason: String,
    },

    /// The caller cancelled the wait
    #[error("interrupted: {0}")]
    Interrupted(String),

    /// The client could not be constructed
    #[error("client initialization failed: {0}")]
    Init(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport(format!("request timed out: {}", err))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
