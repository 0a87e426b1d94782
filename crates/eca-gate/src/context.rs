use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::CommitInfo;

/// Review state of a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Open,
    Merged,
    Abandoned,
}

impl ChangeStatus {
    /// Merged and abandoned changes are never re-validated.
    pub fn is_closed(self) -> bool {
        !matches!(self, ChangeStatus::Open)
    }
}

/// A change as seen by the submit requirement: its project, its state and the
/// commit of its current patch set.
#[derive(Clone)]
pub struct ChangeInfo {
    /// Numeric change id
    pub id: u64,
    /// Project the change targets
    pub project: String,
    /// Review state
    pub status: ChangeStatus,
    /// Commit of the current patch set
    pub commit: Arc<dyn CommitInfo>,
}

impl ChangeInfo {
    pub fn new(
        id: u64,
        project: impl Into<String>,
        status: ChangeStatus,
        commit: Arc<dyn CommitInfo>,
    ) -> Self {
        Self {
            id,
            project: project.into(),
            status,
            commit,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }
}

impl std::fmt::Debug for ChangeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeInfo")
            .field("id", &self.id)
            .field("project", &self.project)
            .field("status", &self.status)
            .field("commit", &self.commit.hash())
            .finish()
    }
}
