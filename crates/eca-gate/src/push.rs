use std::sync::Arc;

use eca_types::ValidationMessage;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::descriptor::CommitDescriptorBuilder;
use crate::error::{GateError, PushRejection};
use crate::interpreter::{EnforcementStrategy, ResponseInterpreter};
use crate::pipeline::ValidationPipeline;
use crate::traits::CommitInfo;

/// Final line of the transcript of an accepted commit.
pub const PASS_MESSAGE: &str = "This commit passes Eclipse validation.";

/// Push-time settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PushConfig {
    /// Enforcement rule for push (default: tracked project or strict mode)
    #[serde(default = "default_push_enforcement")]
    pub enforcement: EnforcementStrategy,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enforcement: default_push_enforcement(),
        }
    }
}

fn default_push_enforcement() -> EnforcementStrategy {
    EnforcementStrategy::TrackedProjectOrStrictMode
}

/// Validates each commit of a push and produces the transcript shown to the
/// pushing user.
pub struct PushValidationOrchestrator {
    pipeline: Arc<ValidationPipeline>,
    interpreter: ResponseInterpreter,
}

impl PushValidationOrchestrator {
    pub fn new(pipeline: Arc<ValidationPipeline>, config: PushConfig) -> Self {
        Self {
            pipeline,
            interpreter: ResponseInterpreter::new(config.enforcement),
        }
    }

    /// Validate one received commit.
    ///
    /// Returns the transcript when the commit is accepted, an empty transcript
    /// when validation is off for the project, and a [`PushRejection`] when the
    /// commit fails policy or the service could not be consulted.
    pub async fn on_commit_received(
        &self,
        project: &str,
        commit: &dyn CommitInfo,
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidationMessage>, PushRejection> {
        let resolver = self.pipeline.resolver();
        if !resolver.is_enabled(project) {
            debug!(
                plugin = %resolver.plugin_name(),
                project = %project,
                "Plugin not enabled for project, skipping validation"
            );
            return Ok(Vec::new());
        }

        let mut messages = Vec::new();
        self.check(project, commit, &mut messages, cancel).await?;

        info!(project = %project, commit = %commit.hash(), "Commit passed validation");
        messages.push(ValidationMessage::info(PASS_MESSAGE));
        Ok(messages)
    }

    async fn check(
        &self,
        project: &str,
        commit: &dyn CommitInfo,
        messages: &mut Vec<ValidationMessage>,
        cancel: &CancellationToken,
    ) -> Result<(), PushRejection> {
        let reject = |err: GateError, messages: &mut Vec<ValidationMessage>| {
            warn!(project = %project, commit = %commit.hash(), error = %err, "Rejecting push");
            PushRejection {
                message: err.user_message(),
                messages: std::mem::take(messages),
            }
        };

        let descriptor = match CommitDescriptorBuilder::build(commit) {
            Ok(descriptor) => descriptor,
            Err(e) => return Err(reject(e.into(), messages)),
        };
        messages.extend(ResponseInterpreter::header(&descriptor));

        let (request, response) = match self.pipeline.validate(project, descriptor, cancel).await {
            Ok(exchange) => exchange,
            Err(e) => return Err(reject(e, messages)),
        };

        let verdict = self.interpreter.interpret(&response, &request);
        let rejection = verdict.primary_error().map(|first| {
            warn!(
                project = %project,
                commit = %request.head_commit().hash(),
                errors = verdict.blocking_errors.len(),
                "Commit failed ECA validation"
            );
            first.to_string()
        });
        *messages = verdict.messages;

        match rejection {
            Some(message) => Err(PushRejection {
                message,
                messages: std::mem::take(messages),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{PersonIdent, RawCommit};
    use crate::interpreter::{ECA_DOCUMENTATION, ECA_REQUIRED};
    use crate::mocks::{MockComplianceClient, MockOutcome};
    use crate::pipeline::PipelineConfig;
    use crate::policy::{HierarchicalPolicyStore, PluginConfig, ProjectPolicyResolver, ENABLED_KEY};
    use eca_types::{CommitStatus, CommitStatusMessage, ValidationResponse};

    fn orchestrator(client: Arc<MockComplianceClient>) -> PushValidationOrchestrator {
        let store = HierarchicalPolicyStore::new()
            .with_project("on", None, PluginConfig::new().with(ENABLED_KEY, "true"))
            .with_project("off", None, PluginConfig::new());
        let pipeline = ValidationPipeline::new(
            client,
            ProjectPolicyResolver::new(Arc::new(store), "eca-validation"),
            PipelineConfig::default(),
        );
        PushValidationOrchestrator::new(Arc::new(pipeline), PushConfig::default())
    }

    fn commit() -> RawCommit {
        RawCommit::new(
            "abc123",
            "Fix build",
            PersonIdent::new("Jane Doe", "jane@example.org"),
        )
    }

    fn response(error_count: u32) -> ValidationResponse {
        let mut response = ValidationResponse {
            error_count,
            tracked_project: true,
            ..Default::default()
        };
        let mut status = CommitStatus::default();
        if error_count > 0 {
            status.errors.push(CommitStatusMessage::new(-1, "Missing ECA"));
        }
        response.commits.insert("abc123".into(), status);
        response
    }

    #[tokio::test]
    async fn disabled_project_is_a_silent_pass() {
        let client = Arc::new(MockComplianceClient::responding(response(1)));
        let messages = orchestrator(client.clone())
            .on_commit_received("off", &commit(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(messages.is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_project_is_a_silent_pass() {
        let client = Arc::new(MockComplianceClient::responding(response(1)));
        let messages = orchestrator(client.clone())
            .on_commit_received("missing", &commit(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(messages.is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn passing_commit_ends_with_pass_message() {
        let client = Arc::new(MockComplianceClient::responding(response(0)));
        let messages = orchestrator(client)
            .on_commit_received("on", &commit(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(messages.first().unwrap().text, "----------");
        assert_eq!(messages.last().unwrap().text, PASS_MESSAGE);
    }

    #[tokio::test]
    async fn failing_commit_rejects_with_first_error() {
        let client = Arc::new(MockComplianceClient::responding(response(1)));
        let rejection = orchestrator(client)
            .on_commit_received("on", &commit(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(rejection.message, "Missing ECA");
        assert_eq!(rejection.messages.last().unwrap().text, ECA_DOCUMENTATION);
        assert!(rejection.messages.iter().all(|m| m.text != PASS_MESSAGE));
        assert!(rejection.messages.iter().all(|m| m.text != ECA_REQUIRED));
    }

    #[tokio::test]
    async fn transport_failure_rejects_with_header_transcript() {
        let client = Arc::new(MockComplianceClient::transport_failure("connection refused"));
        let rejection = orchestrator(client)
            .on_commit_received("on", &commit(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            rejection.message,
            "An error happened while checking commit: connection refused"
        );
        assert_eq!(rejection.messages.len(), 4);
        assert_eq!(rejection.messages[1].text, "Reviewing commit: abc123");
    }

    #[tokio::test]
    async fn header_and_request_describe_the_same_commit() {
        let client = Arc::new(MockComplianceClient::responding(response(1)));
        let commit = RawCommit::new(
            "0123456789abcdef",
            "Fix build",
            PersonIdent::new("Jane Doe", "jane@example.org"),
        )
        .with_parents(vec!["p1".into()]);

        let rejection = orchestrator(client.clone())
            .on_commit_received("on", &commit, &CancellationToken::new())
            .await
            .unwrap_err();

        let request = client.last_request().unwrap();
        let sent = request.head_commit();
        assert_eq!(sent.hash(), "0123456789abcdef");
        assert_eq!(
            rejection.messages[1].text,
            format!("Reviewing commit: {}", sent.abbreviated_hash())
        );
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn malformed_body_rejects_with_administrator_message() {
        let client = Arc::new(MockComplianceClient::new(MockOutcome::Malformed(500)));
        let rejection = orchestrator(client)
            .on_commit_received("on", &commit(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(rejection.message.contains("please contact the administrator"));
    }

    #[tokio::test]
    async fn cancelled_push_is_rejected_not_passed() {
        let client = Arc::new(MockComplianceClient::new(MockOutcome::Hang));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let rejection = orchestrator(client)
            .on_commit_received("on", &commit(), &cancel)
            .await
            .unwrap_err();

        assert!(rejection
            .message
            .starts_with("Verification of commit has been interrupted"));
        assert!(cancel.is_cancelled());
    }
}
