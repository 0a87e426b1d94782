use serde::Serialize;

use crate::commit::CommitDescriptor;
use crate::error::TypeError;

/// Provider identifier sent with every request.
pub const PROVIDER: &str = "gerrit";

/// Body of a validation call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    repo_url: String,
    provider: String,
    strict_mode: bool,
    commits: Vec<CommitDescriptor>,
}

impl ValidationRequest {
    /// Request validation of a single head commit.
    pub fn single(
        repo_url: impl Into<String>,
        strict_mode: bool,
        commit: CommitDescriptor,
    ) -> Result<Self, TypeError> {
        Self::new(repo_url, strict_mode, vec![commit])
    }

    /// The schema permits a batch; every entry must be a head commit with a hash.
    pub fn new(
        repo_url: impl Into<String>,
        strict_mode: bool,
        commits: Vec<CommitDescriptor>,
    ) -> Result<Self, TypeError> {
        if commits.is_empty() {
            return Err(TypeError::NoCommits);
        }
        for commit in &commits {
            if commit.hash().is_empty() {
                return Err(TypeError::EmptyHash);
            }
            if !commit.is_head() {
                return Err(TypeError::NotHead(commit.hash().to_string()));
            }
        }

        Ok(Self {
            repo_url: repo_url.into(),
            provider: PROVIDER.to_string(),
            strict_mode,
            commits,
        })
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn commits(&self) -> &[CommitDescriptor] {
        &self.commits
    }

    /// The commit under validation.
    pub fn head_commit(&self) -> &CommitDescriptor {
        // constructors guarantee at least one commit
        &self.commits[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::GitIdentity;

    fn commit(hash: &str) -> CommitDescriptor {
        let who = GitIdentity::new("Jane Doe", "jane@example.org");
        CommitDescriptor::new(hash, "subject", "body", vec![], who.clone(), who).unwrap()
    }

    #[test]
    fn serializes_camel_case_fields() {
        let req = ValidationRequest::single("proj/x", true, commit("abc123")).unwrap();
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["repoUrl"], "proj/x");
        assert_eq!(json["provider"], "gerrit");
        assert_eq!(json["strictMode"], true);
        assert_eq!(json["commits"][0]["hash"], "abc123");
        assert_eq!(json["commits"][0]["parents"], serde_json::json!([]));
    }

    #[test]
    fn rejects_empty_batch() {
        assert_eq!(
            ValidationRequest::new("proj/x", false, vec![]).unwrap_err(),
            TypeError::NoCommits
        );
    }

    #[test]
    fn structural_equality() {
        let a = ValidationRequest::single("proj/x", true, commit("abc123")).unwrap();
        let b = ValidationRequest::single("proj/x", true, commit("abc123")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.head_commit().hash(), "abc123");
    }
}
