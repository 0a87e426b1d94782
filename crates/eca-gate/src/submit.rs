use std::sync::Arc;

use eca_types::SubmitVerdict;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::context::ChangeInfo;
use crate::error::GateError;
use crate::interpreter::{EnforcementStrategy, ResponseInterpreter, ECA_REQUIRED};
use crate::pipeline::ValidationPipeline;

/// Reported when the pipeline fails and failures map to NotReady.
pub const EVALUATION_FAILED: &str = "Could not evaluate submit requirement";

/// Verdict reported when the compliance service could not be consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitFailureMode {
    /// Block the change with a generic message
    #[default]
    NotReady,
    /// Surface the failure as a rule error carrying the diagnostic
    RuleError,
}

/// Submit requirement settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Enforcement rule for submit (default: tracked project only)
    #[serde(default = "default_submit_enforcement")]
    pub enforcement: EnforcementStrategy,

    /// How pipeline failures are reported (default: not ready)
    #[serde(default)]
    pub on_failure: SubmitFailureMode,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            enforcement: default_submit_enforcement(),
            on_failure: SubmitFailureMode::default(),
        }
    }
}

fn default_submit_enforcement() -> EnforcementStrategy {
    EnforcementStrategy::TrackedProject
}

/// "ECA signed" submit requirement.
///
/// Never fails: every outcome, including an unreachable service, is folded
/// into a [`SubmitVerdict`].
pub struct SubmitVerdictEvaluator {
    pipeline: Arc<ValidationPipeline>,
    interpreter: ResponseInterpreter,
    on_failure: SubmitFailureMode,
}

impl SubmitVerdictEvaluator {
    pub fn new(pipeline: Arc<ValidationPipeline>, config: SubmitConfig) -> Self {
        Self {
            pipeline,
            interpreter: ResponseInterpreter::new(config.enforcement),
            on_failure: config.on_failure,
        }
    }

    pub async fn evaluate(&self, change: &ChangeInfo, cancel: &CancellationToken) -> SubmitVerdict {
        info!(
            change = change.id,
            project = %change.project,
            "Evaluating ECA signed requirement"
        );

        if change.is_closed() {
            debug!(
                change = change.id,
                project = %change.project,
                "Change is closed, ECA requirement skipped"
            );
            return SubmitVerdict::Ready;
        }

        let policy = match self.pipeline.resolver().resolve(&change.project) {
            Ok(policy) => policy,
            Err(e) => {
                error!(change = change.id, project = %change.project, error = %e, "Cannot resolve project policy");
                return SubmitVerdict::rule_error(e.user_message());
            }
        };
        if !policy.enabled {
            debug!(project = %change.project, "Plugin not enabled for project, requirement satisfied");
            return SubmitVerdict::Ready;
        }

        let exchange = match self.pipeline.build_request(&change.project, change.commit.as_ref()) {
            Ok(request) => self
                .pipeline
                .call(&request, &policy, cancel)
                .await
                .map(|response| (request, response)),
            Err(e) => Err(e),
        };

        match exchange {
            Ok((request, response)) => {
                if self.interpreter.interpret(&response, &request).must_block {
                    SubmitVerdict::not_ready(ECA_REQUIRED)
                } else {
                    SubmitVerdict::Ready
                }
            }
            Err(e) => self.failure(change, e),
        }
    }

    fn failure(&self, change: &ChangeInfo, err: GateError) -> SubmitVerdict {
        error!(
            change = change.id,
            project = %change.project,
            error = %err,
            "Could not evaluate ECA signed submit requirement"
        );
        match self.on_failure {
            SubmitFailureMode::NotReady => SubmitVerdict::not_ready(EVALUATION_FAILED),
            SubmitFailureMode::RuleError => SubmitVerdict::rule_error(err.user_message()),
        }
    }
}
