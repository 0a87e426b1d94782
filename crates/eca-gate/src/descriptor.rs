use eca_types::{CommitDescriptor, GitIdentity, TypeError};

use crate::commit::PersonIdent;
use crate::traits::CommitInfo;

/// Maps a host commit onto the wire descriptor.
///
/// Missing values become empty strings; nothing is substituted.
pub struct CommitDescriptorBuilder;

impl CommitDescriptorBuilder {
    pub fn build(commit: &dyn CommitInfo) -> Result<CommitDescriptor, TypeError> {
        CommitDescriptor::new(
            commit.hash(),
            commit.short_message().unwrap_or_default(),
            commit.full_message().unwrap_or_default(),
            commit.parent_hashes(),
            identity(commit.author()),
            identity(commit.committer()),
        )
    }
}

fn identity(ident: &PersonIdent) -> GitIdentity {
    GitIdentity::new(
        ident.name.clone().unwrap_or_default(),
        ident.email.clone().unwrap_or_default(),
    )
}
