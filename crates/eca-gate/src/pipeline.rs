use std::sync::Arc;

use eca_client::ComplianceClient;
use eca_types::{CommitDescriptor, ProjectPolicy, ValidationRequest, ValidationResponse};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::descriptor::CommitDescriptorBuilder;
use crate::error::{GateError, GateResult};
use crate::policy::ProjectPolicyResolver;
use crate::traits::CommitInfo;

/// Settings shared by every producer using the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Ask the service to enforce even for untracked projects (default: true)
    #[serde(default = "default_strict_mode")]
    pub strict_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strict_mode: default_strict_mode(),
        }
    }
}

fn default_strict_mode() -> bool {
    true
}

/// The validate-and-call step shared by push and submit.
///
/// Holds no per-call state; share it behind an `Arc`.
pub struct ValidationPipeline {
    client: Arc<dyn ComplianceClient>,
    resolver: ProjectPolicyResolver,
    config: PipelineConfig,
}

impl ValidationPipeline {
    pub fn new(
        client: Arc<dyn ComplianceClient>,
        resolver: ProjectPolicyResolver,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            resolver,
            config,
        }
    }

    pub fn resolver(&self) -> &ProjectPolicyResolver {
        &self.resolver
    }

    /// Build the single-commit request for `project`.
    pub fn build_request(
        &self,
        project: &str,
        commit: &dyn CommitInfo,
    ) -> GateResult<ValidationRequest> {
        self.request_for(project, CommitDescriptorBuilder::build(commit)?)
    }

    /// Wrap an already built descriptor into the single-commit request.
    pub fn request_for(
        &self,
        project: &str,
        descriptor: CommitDescriptor,
    ) -> GateResult<ValidationRequest> {
        let request = ValidationRequest::single(project, self.config.strict_mode, descriptor)?;
        debug!(request = ?request, "Built validation request");
        Ok(request)
    }

    /// Send `request` once, bounded by the project's timeout.
    pub async fn call(
        &self,
        request: &ValidationRequest,
        policy: &ProjectPolicy,
        cancel: &CancellationToken,
    ) -> GateResult<ValidationResponse> {
        let commit = request.head_commit().hash();
        info!(
            repo = %request.repo_url(),
            commit = %commit,
            timeout_secs = policy.api_timeout_secs,
            "Validating commit"
        );

        let response = self
            .client
            .validate(request, policy.timeout(), cancel)
            .await
            .map_err(|e| {
                error!(repo = %request.repo_url(), commit = %commit, error = %e, "Commit validation failed");
                GateError::from(e)
            })?;

        debug!(
            commit = %commit,
            passed = response.passed,
            error_count = response.error_count,
            tracked = response.tracked_project,
            "Validation response received"
        );
        Ok(response)
    }

    /// Resolve the project's policy, wrap `descriptor` and send it.
    pub async fn validate(
        &self,
        project: &str,
        descriptor: CommitDescriptor,
        cancel: &CancellationToken,
    ) -> GateResult<(ValidationRequest, ValidationResponse)> {
        let policy = self.resolver.resolve(project)?;
        let request = self.request_for(project, descriptor)?;
        let response = self.call(&request, &policy, cancel).await?;
        Ok((request, response))
    }
}
