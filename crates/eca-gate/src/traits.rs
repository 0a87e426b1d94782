use crate::commit::PersonIdent;
use crate::policy::PluginConfig;

/// Read-only view of a commit supplied by the host repository.
///
/// Walking history and resolving parents is the host's job; this trait only
/// exposes what a single validation needs.
pub trait CommitInfo: Send + Sync {
    /// Full content hash.
    fn hash(&self) -> &str;

    /// First line of the commit message.
    fn short_message(&self) -> Option<&str>;

    /// Complete commit message.
    fn full_message(&self) -> Option<&str>;

    /// Parent hashes in repository order.
    fn parent_hashes(&self) -> Vec<String>;

    fn author(&self) -> &PersonIdent;

    fn committer(&self) -> &PersonIdent;
}

/// Plugin configuration lookup with inheritance already applied.
pub trait PolicyStore: Send + Sync {
    /// Effective settings for `project`, or `None` if the project does not exist.
    fn resolve(&self, project: &str) -> Option<PluginConfig>;
}
