use thiserror::Error;

/// Errors raised while constructing wire values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("commit hash must not be empty")]
    EmptyHash,

    #[error("commit {0} is not marked as head")]
    NotHead(String),

    #[error("validation request must carry at least one commit")]
    NoCommits,
}
