use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A message attached to a commit by the compliance service.
///
/// Negative codes are error severity; zero or positive codes are informational.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatusMessage {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl CommitStatusMessage {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.code < 0
    }
}

/// Findings for one commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    #[serde(default)]
    pub messages: Vec<CommitStatusMessage>,
    #[serde(default)]
    pub warnings: Vec<CommitStatusMessage>,
    #[serde(default)]
    pub errors: Vec<CommitStatusMessage>,
}

/// Answer of the compliance service, used for both success and error bodies.
///
/// `error_count` is the authoritative tally; per-commit `errors` are detail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub commits: BTreeMap<String, CommitStatus>,
    #[serde(default)]
    pub tracked_project: bool,
}

impl ValidationResponse {
    /// Findings for `hash`, if the service reported any.
    pub fn status_for(&self, hash: &str) -> Option<&CommitStatus> {
        self.commits.get(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_body() {
        let body = r#"{
            "passed": false,
            "errorCount": 1,
            "time": "2024-03-01T10:00:00Z",
            "trackedProject": true,
            "commits": {
                "abc123": {
                    "messages": [{"code": 200, "message": "The author is a committer"}],
                    "warnings": [],
                    "errors": [{"code": -405, "message": "No Eclipse Contributor Agreement signed"}]
                }
            }
        }"#;

        let response: ValidationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error_count, 1);
        assert!(response.tracked_project);

        let status = response.status_for("abc123").unwrap();
        assert_eq!(status.messages.len(), 1);
        assert!(!status.messages[0].is_error());
        assert!(status.errors[0].is_error());
    }

    #[test]
    fn sparse_body_uses_defaults() {
        let response: ValidationResponse =
            serde_json::from_str(r#"{"errorCount":0,"trackedProject":true,"commits":{"abc123":{}}}"#)
                .unwrap();

        assert!(!response.passed);
        assert_eq!(response.time, "");
        assert_eq!(response.status_for("abc123"), Some(&CommitStatus::default()));
        assert!(response.status_for("missing").is_none());
    }

    #[test]
    fn rejects_wrong_types() {
        let parsed = serde_json::from_str::<ValidationResponse>(r#"{"errorCount":"many"}"#);
        assert!(parsed.is_err());
    }
}
