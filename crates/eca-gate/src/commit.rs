use serde::{Deserialize, Serialize};

use crate::traits::CommitInfo;

/// Identity recorded on a commit. Either half may be missing in the repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdent {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl PersonIdent {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

/// Plain owned commit, for hosts that already extracted the metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    pub hash: String,
    pub short_message: Option<String>,
    pub full_message: Option<String>,
    pub parents: Vec<String>,
    pub author: PersonIdent,
    pub committer: PersonIdent,
}

impl RawCommit {
    /// Commit authored and committed by the same person, with subject and body
    /// taken from `message`.
    pub fn new(hash: impl Into<String>, message: impl Into<String>, who: PersonIdent) -> Self {
        let message = message.into();
        let subject = message.lines().next().unwrap_or_default().to_string();
        Self {
            hash: hash.into(),
            short_message: Some(subject),
            full_message: Some(message),
            parents: Vec::new(),
            author: who.clone(),
            committer: who,
        }
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_committer(mut self, committer: PersonIdent) -> Self {
        self.committer = committer;
        self
    }
}

impl CommitInfo for RawCommit {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn short_message(&self) -> Option<&str> {
        self.short_message.as_deref()
    }

    fn full_message(&self) -> Option<&str> {
        self.full_message.as_deref()
    }

    fn parent_hashes(&self) -> Vec<String> {
        self.parents.clone()
    }

    fn author(&self) -> &PersonIdent {
        &self.author
    }

    fn committer(&self) -> &PersonIdent {
        &self.committer
    }
}
