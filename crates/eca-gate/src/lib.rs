//! ECA Gate: commit-to-compliance decision pipeline.
//!
//! A commit arriving at the host is turned into a wire request, sent once to the
//! remote compliance service under the project's timeout, and the answer is
//! folded with project and producer settings into a single verdict.
//!
//! ## Invariants
//!
//! - **Enforcement gates blocking**: a commit is blocked only when the service
//!   reports `errorCount > 0` *and* enforcement applies for the producer.
//! - **Fail closed**: transport failures, malformed bodies and interruptions never
//!   turn into a pass. Push rejects; submit reports NotReady or RuleError.
//! - **No state across calls**: every validation builds its own request and
//!   response; the only shared object is the HTTP connection pool.
//! - **One exchange per call**: the remote service is never retried here.
//!
//! ## Producers
//!
//! 1. [`PushValidationOrchestrator`]: transcript plus rejection at push time
//! 2. [`SubmitVerdictEvaluator`]: Ready / NotReady / RuleError for merges
//! 3. [`SignedPredicate`]: `has:signed_<plugin>` search predicate
//!
//! All three share one injected [`ValidationPipeline`].

pub mod commit;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod interpreter;
pub mod mocks;
pub mod pipeline;
pub mod policy;
pub mod predicate;
pub mod push;
pub mod submit;
pub mod traits;

pub use commit::{PersonIdent, RawCommit};
pub use context::{ChangeInfo, ChangeStatus};
pub use descriptor::CommitDescriptorBuilder;
pub use error::{EvaluationError, GateError, GateResult, PushRejection};
pub use interpreter::{
    EnforcementStrategy, ResponseInterpreter, ECA_DOCUMENTATION, ECA_REQUIRED,
};
pub use mocks::{MockComplianceClient, MockOutcome};
pub use pipeline::{PipelineConfig, ValidationPipeline};
pub use policy::{
    HierarchicalPolicyStore, PluginConfig, ProjectPolicyResolver, API_TIMEOUT_KEY, ENABLED_KEY,
};
pub use predicate::{SignedPredicate, OPERAND};
pub use push::{PushConfig, PushValidationOrchestrator, PASS_MESSAGE};
pub use submit::{SubmitConfig, SubmitFailureMode, SubmitVerdictEvaluator, EVALUATION_FAILED};
pub use traits::{CommitInfo, PolicyStore};
