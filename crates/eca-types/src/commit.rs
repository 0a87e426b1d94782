use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of the abbreviated hash shown in push messages.
const ABBREV_LEN: usize = 8;

/// A git user as sent to the compliance service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitIdentity {
    pub name: String,
    #[serde(rename = "mail")]
    pub email: String,
}

impl GitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for GitIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Wire representation of the commit under validation.
///
/// `parents` keeps the order reported by the repository and is empty for a
/// root commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitDescriptor {
    hash: String,
    subject: String,
    body: String,
    parents: Vec<String>,
    author: GitIdentity,
    committer: GitIdentity,
    head: bool,
}

impl CommitDescriptor {
    /// Build a head commit descriptor. The hash must be non-empty.
    pub fn new(
        hash: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        parents: Vec<String>,
        author: GitIdentity,
        committer: GitIdentity,
    ) -> Result<Self, TypeError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(TypeError::EmptyHash);
        }

        Ok(Self {
            hash,
            subject: subject.into(),
            body: body.into(),
            parents,
            author,
            committer,
            head: true,
        })
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// First eight characters of the hash, or the whole hash if shorter.
    pub fn abbreviated_hash(&self) -> &str {
        match self.hash.char_indices().nth(ABBREV_LEN) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn author(&self) -> &GitIdentity {
        &self.author
    }

    pub fn committer(&self) -> &GitIdentity {
        &self.committer
    }

    pub fn is_head(&self) -> bool {
        self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> GitIdentity {
        GitIdentity::new("Jane Doe", "jane@example.org")
    }

    #[test]
    fn rejects_empty_hash() {
        let err = CommitDescriptor::new("  ", "s", "b", vec![], identity(), identity());
        assert_eq!(err.unwrap_err(), TypeError::EmptyHash);
    }

    #[test]
    fn abbreviates_to_eight_characters() {
        let commit = CommitDescriptor::new(
            "0123456789abcdef",
            "s",
            "b",
            vec![],
            identity(),
            identity(),
        )
        .unwrap();
        assert_eq!(commit.abbreviated_hash(), "01234567");

        let short =
            CommitDescriptor::new("abc123", "s", "b", vec![], identity(), identity()).unwrap();
        assert_eq!(short.abbreviated_hash(), "abc123");
    }

    #[test]
    fn identity_serializes_email_as_mail() {
        let json = serde_json::to_value(identity()).unwrap();
        assert_eq!(json["mail"], "jane@example.org");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn descriptor_wire_shape() {
        let commit = CommitDescriptor::new(
            "abc123",
            "Fix build",
            "Fix build\n\nSigned-off-by: Jane Doe",
            vec!["p1".into(), "p2".into()],
            identity(),
            identity(),
        )
        .unwrap();

        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["hash"], "abc123");
        assert_eq!(json["head"], true);
        assert_eq!(json["parents"], serde_json::json!(["p1", "p2"]));
        assert_eq!(json["committer"]["name"], "Jane Doe");
    }
}
