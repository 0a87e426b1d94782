//! Configuration for eca-check

use std::collections::BTreeMap;
use std::path::Path;

use eca_client::ClientConfig;
use eca_gate::{
    HierarchicalPolicyStore, PipelineConfig, PluginConfig, PushConfig, SubmitConfig,
    API_TIMEOUT_KEY, ENABLED_KEY,
};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Plugin name used for settings lookup and the search predicate
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,

    /// Compliance service connection
    #[serde(default)]
    pub service: ClientConfig,

    /// Request construction
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Push-time enforcement
    #[serde(default)]
    pub push: PushConfig,

    /// Submit requirement enforcement
    #[serde(default)]
    pub submit: SubmitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Project tree with per-project plugin settings.
    ///
    /// Read from the file by [`CheckConfig::load`] with key case preserved;
    /// project names are case sensitive.
    #[serde(default, skip_deserializing)]
    pub projects: BTreeMap<String, ProjectEntry>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            plugin_name: default_plugin_name(),
            service: ClientConfig::default(),
            pipeline: PipelineConfig::default(),
            push: PushConfig::default(),
            submit: SubmitConfig::default(),
            logging: LoggingConfig::default(),
            projects: BTreeMap::new(),
        }
    }
}

/// One project of the tree. Unset values are inherited from the parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Parent project
    #[serde(default)]
    pub parent: Option<String>,

    /// Only the literal "true" enables validation
    #[serde(default)]
    pub enabled: Option<toml::Value>,

    /// Compliance call timeout in seconds
    #[serde(default, rename = "apiTimeout")]
    pub api_timeout: Option<toml::Value>,
}

impl ProjectEntry {
    fn settings(&self) -> PluginConfig {
        let mut settings = PluginConfig::new();
        if let Some(enabled) = &self.enabled {
            settings.set(ENABLED_KEY, plugin_value(enabled));
        }
        if let Some(timeout) = &self.api_timeout {
            settings.set(API_TIMEOUT_KEY, plugin_value(timeout));
        }
        settings
    }
}

// Plugin settings are strings; `enabled = true` and `enabled = "true"` agree.
fn plugin_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The `[projects]` table of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct ProjectsFile {
    #[serde(default)]
    projects: BTreeMap<String, ProjectEntry>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_plugin_name() -> String {
    "eclipse-eca-validation".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CheckConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CheckConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::new(path, config::FileFormat::Toml).required(false),
            );
        }

        // ECA_SERVICE__BASE_URL, ECA_PIPELINE__STRICT_MODE, ...
        builder = builder.add_source(
            config::Environment::with_prefix("ECA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: CheckConfig = builder.build()?.try_deserialize()?;

        // The config crate lowercases keys, which would rename projects.
        if let Some(path) = path {
            config.projects = Self::load_projects(Path::new(path))?;
        }

        Ok(config)
    }

    fn load_projects(path: &Path) -> Result<BTreeMap<String, ProjectEntry>, config::ConfigError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        let file: ProjectsFile = toml::from_str(&contents)
            .map_err(|e| config::ConfigError::Message(format!("{}: {}", path.display(), e)))?;
        Ok(file.projects)
    }

    /// Build the policy store described by `projects`.
    pub fn policy_store(&self) -> HierarchicalPolicyStore {
        let mut store = HierarchicalPolicyStore::new();
        for (name, entry) in &self.projects {
            store.insert(name.clone(), entry.parent.clone(), entry.settings());
        }
        store
    }
}
