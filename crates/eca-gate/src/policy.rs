use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use eca_types::{ProjectPolicy, DEFAULT_API_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{GateError, GateResult};
use crate::traits::PolicyStore;

/// Key switching validation on for a project.
pub const ENABLED_KEY: &str = "enabled";
/// Key holding the compliance call timeout in seconds.
pub const API_TIMEOUT_KEY: &str = "apiTimeout";

/// String-valued plugin settings of one project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfig {
    values: BTreeMap<String, String>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Overlay `child` on top of `self`; child values win.
    pub fn merged_with(&self, child: &PluginConfig) -> PluginConfig {
        let mut values = self.values.clone();
        values.extend(child.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        PluginConfig { values }
    }
}

/// Resolves per-project validation settings from the policy store.
#[derive(Clone)]
pub struct ProjectPolicyResolver {
    store: Arc<dyn PolicyStore>,
    plugin_name: String,
}

impl ProjectPolicyResolver {
    pub fn new(store: Arc<dyn PolicyStore>, plugin_name: impl Into<String>) -> Self {
        Self {
            store,
            plugin_name: plugin_name.into(),
        }
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    /// Whether validation is on for `project`. Unknown projects are off.
    pub fn is_enabled(&self, project: &str) -> bool {
        match self.store.resolve(project) {
            Some(config) => parse_enabled(&config),
            None => {
                error!(
                    plugin = %self.plugin_name,
                    project = %project,
                    "Failed to check if plugin is enabled: project not found"
                );
                false
            }
        }
    }

    /// Inherited `apiTimeout`, or 20 seconds when unset.
    pub fn timeout_secs(&self, project: &str) -> GateResult<u64> {
        self.store
            .resolve(project)
            .map(|config| parse_timeout(project, &config))
            .ok_or_else(|| GateError::ProjectNotFound(project.to_string()))
    }

    pub fn resolve(&self, project: &str) -> GateResult<ProjectPolicy> {
        let config = self
            .store
            .resolve(project)
            .ok_or_else(|| GateError::ProjectNotFound(project.to_string()))?;

        let policy = ProjectPolicy {
            enabled: parse_enabled(&config),
            api_timeout_secs: parse_timeout(project, &config),
        };
        debug!(project = %project, ?policy, "Resolved project policy");
        Ok(policy)
    }
}

fn parse_enabled(config: &PluginConfig) -> bool {
    config.get_string(ENABLED_KEY, "false") == "true"
}

fn parse_timeout(project: &str, config: &PluginConfig) -> u64 {
    let Some(raw) = config.get(API_TIMEOUT_KEY) else {
        return DEFAULT_API_TIMEOUT_SECS;
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(
                project = %project,
                value = %raw,
                default = DEFAULT_API_TIMEOUT_SECS,
                "Invalid apiTimeout, using default"
            );
            DEFAULT_API_TIMEOUT_SECS
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ProjectNode {
    parent: Option<String>,
    settings: PluginConfig,
}

/// In-memory project tree. Children inherit every key they do not set.
#[derive(Clone, Debug, Default)]
pub struct HierarchicalPolicyStore {
    projects: HashMap<String, ProjectNode>,
}

impl HierarchicalPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project. A later call for the same name replaces it.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        parent: Option<String>,
        settings: PluginConfig,
    ) {
        self.projects
            .insert(name.into(), ProjectNode { parent, settings });
    }

    pub fn with_project(
        mut self,
        name: impl Into<String>,
        parent: Option<&str>,
        settings: PluginConfig,
    ) -> Self {
        self.insert(name, parent.map(str::to_string), settings);
        self
    }

    pub fn contains(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }

    /// Project followed by its ancestors, nearest first.
    fn lineage<'a>(&'a self, project: &'a str) -> Vec<&'a ProjectNode> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(project);

        while let Some(name) = current {
            if !seen.insert(name) {
                warn!(project = %project, at = %name, "Cycle in project hierarchy");
                break;
            }
            let Some(node) = self.projects.get(name) else {
                warn!(project = %project, parent = %name, "Parent project not found");
                break;
            };
            chain.push(node);
            current = node.parent.as_deref();
        }

        chain
    }
}

impl PolicyStore for HierarchicalPolicyStore {
    fn resolve(&self, project: &str) -> Option<PluginConfig> {
        if !self.contains(project) {
            return None;
        }

        let effective = self
            .lineage(project)
            .into_iter()
            .rev()
            .fold(PluginConfig::new(), |acc, node| acc.merged_with(&node.settings));
        Some(effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HierarchicalPolicyStore {
        HierarchicalPolicyStore::new()
            .with_project(
                "All-Projects",
                None,
                PluginConfig::new().with(API_TIMEOUT_KEY, "30"),
            )
            .with_project(
                "technology",
                Some("All-Projects"),
                PluginConfig::new().with(ENABLED_KEY, "true"),
            )
            .with_project("technology/jgit", Some("technology"), PluginConfig::new())
            .with_project(
                "technology/legacy",
                Some("technology"),
                PluginConfig::new()
                    .with(ENABLED_KEY, "false")
                    .with(API_TIMEOUT_KEY, "5"),
            )
    }

    fn resolver() -> ProjectPolicyResolver {
        ProjectPolicyResolver::new(Arc::new(store()), "eca-validation")
    }

    #[test]
    fn child_inherits_from_ancestors() {
        let policy = resolver().resolve("technology/jgit").unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.api_timeout_secs, 30);
    }

    #[test]
    fn child_overrides_parent() {
        let policy = resolver().resolve("technology/legacy").unwrap();
        assert!(!policy.enabled);
        assert_eq!(policy.api_timeout_secs, 5);
    }

    #[test]
    fn defaults_when_unset() {
        let store = HierarchicalPolicyStore::new().with_project("solo", None, PluginConfig::new());
        let resolver = ProjectPolicyResolver::new(Arc::new(store), "eca-validation");

        assert!(!resolver.is_enabled("solo"));
        assert_eq!(resolver.timeout_secs("solo").unwrap(), DEFAULT_API_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_project_is_disabled_but_not_resolvable() {
        let resolver = resolver();
        assert!(!resolver.is_enabled("nope"));
        assert!(matches!(
            resolver.resolve("nope"),
            Err(GateError::ProjectNotFound(p)) if p == "nope"
        ));
        assert!(resolver.timeout_secs("nope").is_err());
    }

    #[test]
    fn enabled_requires_exact_true() {
        let store = HierarchicalPolicyStore::new()
            .with_project("a", None, PluginConfig::new().with(ENABLED_KEY, "TRUE"))
            .with_project("b", None, PluginConfig::new().with(ENABLED_KEY, "yes"));
        let resolver = ProjectPolicyResolver::new(Arc::new(store), "eca-validation");

        assert!(!resolver.is_enabled("a"));
        assert!(!resolver.is_enabled("b"));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let store = HierarchicalPolicyStore::new()
            .with_project("a", None, PluginConfig::new().with(API_TIMEOUT_KEY, "soon"))
            .with_project("b", None, PluginConfig::new().with(API_TIMEOUT_KEY, "0"));
        let resolver = ProjectPolicyResolver::new(Arc::new(store), "eca-validation");

        assert_eq!(resolver.timeout_secs("a").unwrap(), DEFAULT_API_TIMEOUT_SECS);
        assert_eq!(resolver.timeout_secs("b").unwrap(), DEFAULT_API_TIMEOUT_SECS);
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let store = HierarchicalPolicyStore::new()
            .with_project("a", Some("b"), PluginConfig::new().with(ENABLED_KEY, "true"))
            .with_project("b", Some("a"), PluginConfig::new().with(API_TIMEOUT_KEY, "7"));

        let config = store.resolve("a").unwrap();
        assert_eq!(config.get(ENABLED_KEY), Some("true"));
        assert_eq!(config.get(API_TIMEOUT_KEY), Some("7"));
    }
}
