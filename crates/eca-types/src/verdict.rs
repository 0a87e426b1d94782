use serde::{Deserialize, Serialize};

/// One line of the push transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub text: String,
    pub is_error: bool,
}

impl ValidationMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_error {
            write!(f, "ERROR: {}", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Outcome of interpreting one compliance response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub must_block: bool,
    pub messages: Vec<ValidationMessage>,
    pub blocking_errors: Vec<String>,
}

impl Verdict {
    /// Headline error shown when the commit is rejected.
    pub fn primary_error(&self) -> Option<&str> {
        self.blocking_errors.first().map(String::as_str)
    }
}

/// Merge-readiness answer for a change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitVerdict {
    /// Nothing prevents submission
    Ready,
    /// Submission is blocked until the requirement is met
    NotReady { message: String },
    /// The requirement could not be evaluated
    RuleError { message: String },
}

impl SubmitVerdict {
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    pub fn rule_error(message: impl Into<String>) -> Self {
        Self::RuleError {
            message: message.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ready => None,
            Self::NotReady { message } | Self::RuleError { message } => Some(message),
        }
    }
}
