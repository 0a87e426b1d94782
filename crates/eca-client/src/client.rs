//! HTTP client for the ECA compliance service

use std::time::{Duration, Instant};

use async_trait::async_trait;
use eca_types::{ValidationRequest, ValidationResponse};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Default endpoint of the compliance service
pub const DEFAULT_BASE_URL: &str = "https://api.eclipse.org/git/eca";

/// Performs exactly one validation exchange per call. No retries.
#[async_trait]
pub trait ComplianceClient: Send + Sync {
    /// Validate `request`, giving up after `timeout` or when `cancel` fires.
    ///
    /// A fired token is never reset here; callers observe it still cancelled
    /// after an [`ClientError::Interrupted`] return.
    async fn validate(
        &self,
        request: &ValidationRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<ValidationResponse>;
}

/// Connection settings for [`HttpComplianceClient`]
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the compliance service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent sent with every call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional bearer token
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            api_token: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("eca-validation/{}", env!("CARGO_PKG_VERSION"))
}

/// reqwest-backed compliance client.
///
/// Build one per process and share it; the underlying connection pool is
/// reused across calls.
pub struct HttpComplianceClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl std::fmt::Debug for HttpComplianceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpComplianceClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpComplianceClient {
    /// Create a new compliance client
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base = config.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ClientError::Init("base URL must not be empty".into()));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/", base),
            api_token: config.api_token.clone(),
        })
    }

    /// URL every validation is posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exchange(
        &self,
        request: &ValidationRequest,
        timeout: Duration,
    ) -> ClientResult<ValidationResponse> {
        let started = Instant::now();

        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json")
            .json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(
            method = "POST",
            url = %self.endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Compliance service responded"
        );

        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl ComplianceClient for HttpComplianceClient {
    async fn validate(
        &self,
        request: &ValidationRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<ValidationResponse> {
        debug!(request = ?request, "Sending validation request");

        let exchange = tokio::time::timeout(timeout, self.exchange(request, timeout));

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ClientError::Interrupted(
                    "cancelled while awaiting the compliance service".into(),
                ));
            }
            outcome = exchange => match outcome {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ClientError::Transport(format!(
                        "no response within {}s",
                        timeout.as_secs()
                    )));
                }
            },
        };

        debug!(response = ?response, "Received validation response");
        Ok(response)
    }
}

/// Read a response body. Error statuses carry the same schema as successes.
fn decode_response(status: StatusCode, body: &[u8]) -> ClientResult<ValidationResponse> {
    match serde_json::from_slice::<ValidationResponse>(body) {
        Ok(response) => {
            if !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    error_count = response.error_count,
                    "Compliance service reported an error status"
                );
            }
            Ok(response)
        }
        Err(e) => Err(ClientError::MalformedResponse {
            status: status.as_u16(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalization() {
        let client = HttpComplianceClient::new(&ClientConfig {
            base_url: "http://localhost:8080/git/eca/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/git/eca/");
    }

    #[test]
    fn empty_base_url_fails_initialization() {
        let err = HttpComplianceClient::new(&ClientConfig {
            base_url: "/".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Init(_)));
    }

    #[test]
    fn config_debug_redacts_token() {
        let config = ClientConfig {
            api_token: Some("s3cret".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn error_status_with_structured_body_is_a_response() {
        let body = br#"{"errorCount":1,"trackedProject":true,"commits":{}}"#;
        let response = decode_response(StatusCode::FORBIDDEN, body).unwrap();
        assert_eq!(response.error_count, 1);
    }

    #[test]
    fn unparseable_error_body_is_malformed() {
        let err = decode_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { status: 502, .. }));
    }
}
