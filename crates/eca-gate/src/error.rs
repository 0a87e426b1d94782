use eca_client::ClientError;
use eca_types::{TypeError, ValidationMessage};
use thiserror::Error;

/// Errors from the validation pipeline.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("invalid commit: {0}")]
    InvalidCommit(#[from] TypeError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl GateError {
    /// Text shown to the pushing user when validation could not complete.
    pub fn user_message(&self) -> String {
        match self {
            GateError::ProjectNotFound(project) => format!("Cannot find project {}", project),
            GateError::Client(ClientError::MalformedResponse { .. }) => {
                "An error happened while retrieving validation response, please contact the administrator if this error persists".to_string()
            }
            GateError::Client(ClientError::Interrupted(cause)) => {
                format!("Verification of commit has been interrupted: {}", cause)
            }
            GateError::Client(ClientError::Transport(cause))
            | GateError::Client(ClientError::Init(cause)) => {
                format!("An error happened while checking commit: {}", cause)
            }
            GateError::InvalidCommit(err) => {
                format!("An error happened while checking commit: {}", err)
            }
        }
    }
}

pub type GateResult<T> = Result<T, GateError>;

/// A rejected push: the headline error plus everything reported so far.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PushRejection {
    pub message: String,
    pub messages: Vec<ValidationMessage>,
}

/// The submit requirement could not be evaluated for a search predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("submit requirement evaluation failed: {0}")]
pub struct EvaluationError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_body_message_is_administrator_facing() {
        let err = GateError::Client(ClientError::MalformedResponse {
            status: 500,
            reason: "expected value".into(),
        });
        assert!(err.user_message().contains("please contact the administrator"));
    }

    #[test]
    fn transport_message_carries_cause() {
        let err = GateError::Client(ClientError::Transport("connection refused".into()));
        assert_eq!(
            err.user_message(),
            "An error happened while checking commit: connection refused"
        );
    }

    #[test]
    fn interrupted_message() {
        let err = GateError::Client(ClientError::Interrupted("shutdown".into()));
        assert_eq!(
            err.user_message(),
            "Verification of commit has been interrupted: shutdown"
        );
    }
}
