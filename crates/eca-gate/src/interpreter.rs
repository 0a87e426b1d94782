use eca_types::{
    CommitDescriptor, CommitStatus, ValidationMessage, ValidationRequest, ValidationResponse,
    Verdict,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Trailer appended to the blocking errors of a rejected commit.
pub const ECA_REQUIRED: &str = "An Eclipse Contributor Agreement is required.";
/// Pointer appended to the transcript of a rejected commit.
pub const ECA_DOCUMENTATION: &str = "Please see http://wiki.eclipse.org/ECA";

const SEPARATOR: &str = "----------";

/// When a failing response actually blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementStrategy {
    /// Only projects the service tracks are enforced
    TrackedProject,
    /// Tracked projects, or any request sent in strict mode
    TrackedProjectOrStrictMode,
}

impl EnforcementStrategy {
    pub fn applies(self, response: &ValidationResponse, request: &ValidationRequest) -> bool {
        match self {
            EnforcementStrategy::TrackedProject => response.tracked_project,
            EnforcementStrategy::TrackedProjectOrStrictMode => {
                response.tracked_project || request.strict_mode()
            }
        }
    }
}

/// Turns a compliance response into a [`Verdict`].
///
/// Pure: the same response and request always produce the same verdict.
#[derive(Clone, Copy, Debug)]
pub struct ResponseInterpreter {
    strategy: EnforcementStrategy,
}

impl ResponseInterpreter {
    pub fn new(strategy: EnforcementStrategy) -> Self {
        Self { strategy }
    }

    /// Lines printed before any finding: separator, commit, author, blank.
    pub fn header(commit: &CommitDescriptor) -> Vec<ValidationMessage> {
        vec![
            ValidationMessage::info(SEPARATOR),
            ValidationMessage::info(format!("Reviewing commit: {}", commit.abbreviated_hash())),
            ValidationMessage::info(format!("Authored by: {}", commit.author())),
            ValidationMessage::info(""),
        ]
    }

    pub fn interpret(&self, response: &ValidationResponse, request: &ValidationRequest) -> Verdict {
        let commit = request.head_commit();
        let enforced = self.strategy.applies(response, request);

        let empty = CommitStatus::default();
        let status = match response.status_for(commit.hash()) {
            Some(status) => status,
            None => {
                warn!(
                    commit = %commit.hash(),
                    reported = response.commits.len(),
                    "Response has no entry for the submitted commit, treating as no findings"
                );
                &empty
            }
        };

        let mut messages = Self::header(commit);
        messages.extend(status.messages.iter().map(|m| {
            if m.is_error() && enforced {
                ValidationMessage::error(m.message.clone())
            } else {
                ValidationMessage::info(m.message.clone())
            }
        }));
        messages.push(ValidationMessage::info(""));

        let must_block = response.error_count > 0 && enforced;
        let mut blocking_errors = Vec::new();
        if must_block {
            blocking_errors.extend(status.errors.iter().map(|e| e.message.clone()));
            blocking_errors.push(ECA_REQUIRED.to_string());
            messages.push(ValidationMessage::info(ECA_DOCUMENTATION));
        }

        Verdict {
            must_block,
            messages,
            blocking_errors,
        }
    }
}
