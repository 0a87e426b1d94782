use std::sync::Arc;

use eca_types::SubmitVerdict;
use tokio_util::sync::CancellationToken;

use crate::context::ChangeInfo;
use crate::error::EvaluationError;
use crate::submit::SubmitVerdictEvaluator;

/// Operand of the `has:` search operator.
pub const OPERAND: &str = "signed";

/// Relative evaluation cost reported to the query planner.
const COST: u32 = 10;

/// `has:signed_<plugin>` search predicate over the submit requirement.
pub struct SignedPredicate {
    name: String,
    evaluator: Arc<SubmitVerdictEvaluator>,
}

impl SignedPredicate {
    pub fn new(plugin_name: &str, evaluator: Arc<SubmitVerdictEvaluator>) -> Self {
        Self {
            name: format!("{}_{}", OPERAND, plugin_name),
            evaluator,
        }
    }

    pub fn operator(&self) -> &str {
        "has"
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> u32 {
        COST
    }

    /// Whether `change` satisfies the requirement. A rule error is not an answer.
    pub async fn matches(
        &self,
        change: &ChangeInfo,
        cancel: &CancellationToken,
    ) -> Result<bool, EvaluationError> {
        match self.evaluator.evaluate(change, cancel).await {
            SubmitVerdict::Ready => Ok(true),
            SubmitVerdict::NotReady { .. } => Ok(false),
            SubmitVerdict::RuleError { message } => Err(EvaluationError(message)),
        }
    }
}

impl std::fmt::Display for SignedPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.operator(), self.name)
    }
}
