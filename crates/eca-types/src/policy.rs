use serde::{Deserialize, Serialize};

/// Timeout applied to the compliance call when `apiTimeout` is unset.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 20;

/// Validation settings for one project, after inheritance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPolicy {
    /// Whether commits pushed to the project are validated (default: false)
    pub enabled: bool,
    /// Seconds to wait for the compliance service (default: 20)
    pub api_timeout_secs: u64,
}

impl Default for ProjectPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl ProjectPolicy {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api_timeout_secs)
    }
}
