use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use eca_client::{ClientError, ClientResult, ComplianceClient};
use eca_types::{ValidationRequest, ValidationResponse};
use tokio_util::sync::CancellationToken;

/// Scripted answer of a [`MockComplianceClient`].
#[derive(Clone, Debug)]
pub enum MockOutcome {
    /// Answer with this response
    Respond(ValidationResponse),
    /// Fail as if the network call broke
    Transport(String),
    /// Fail as if the error body could not be parsed
    Malformed(u16),
    /// Never answer; only the deadline or cancellation ends the call
    Hang,
}

/// Mock compliance client for testing.
///
/// Counts calls and remembers the last request and timeout it was given.
pub struct MockComplianceClient {
    outcome: MockOutcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<ValidationRequest>>,
    last_timeout: Mutex<Option<Duration>>,
}

impl MockComplianceClient {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_timeout: Mutex::new(None),
        }
    }

    /// Create a client that answers every call with `response`.
    pub fn responding(response: ValidationResponse) -> Self {
        Self::new(MockOutcome::Respond(response))
    }

    /// Create a client whose every call fails in transport.
    pub fn transport_failure(cause: impl Into<String>) -> Self {
        Self::new(MockOutcome::Transport(cause.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ValidationRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last_timeout(&self) -> Option<Duration> {
        self.last_timeout
            .lock()
            .map(|guard| *guard)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComplianceClient for MockComplianceClient {
    async fn validate(
        &self,
        request: &ValidationRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<ValidationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        if let Ok(mut last) = self.last_timeout.lock() {
            *last = Some(timeout);
        }

        match &self.outcome {
            MockOutcome::Respond(response) => Ok(response.clone()),
            MockOutcome::Transport(cause) => Err(ClientError::Transport(cause.clone())),
            MockOutcome::Malformed(status) => Err(ClientError::MalformedResponse {
                status: *status,
                reason: "expected value at line 1 column 1".into(),
            }),
            MockOutcome::Hang => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(ClientError::Interrupted("cancelled".into())),
                    _ = tokio::time::sleep(timeout) => Err(ClientError::Transport(format!(
                        "no response within {}s",
                        timeout.as_secs()
                    ))),
                }
            }
        }
    }
}
