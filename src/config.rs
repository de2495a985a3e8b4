use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Project-level config file name, looked up at the repository root
pub const PROJECT_CONFIG_FILE: &str = ".skillcheck.toml";

fn default_categories() -> Vec<String> {
    ["core", "workflow", "research", "system"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_descriptor_file() -> String {
    "SKILL.md".to_string()
}

fn default_manifest_file() -> String {
    "skills.json".to_string()
}

fn default_max_depth() -> usize {
    2
}

fn default_required_fields() -> Vec<String> {
    vec!["name".to_string(), "description".to_string()]
}

fn default_min_description_len() -> usize {
    10
}

/// One config file layer. Every key is optional so that a layer only
/// overrides what it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub descriptor_file: Option<String>,
    #[serde(default)]
    pub manifest_file: Option<String>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub required_fields: Option<Vec<String>>,
    #[serde(default)]
    pub min_description_len: Option<usize>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Top-level category directories walked for skills, in order
    pub categories: Vec<String>,
    /// File whose presence marks a directory as a skill
    pub descriptor_file: String,
    /// Manifest file at the repository root
    pub manifest_file: String,
    /// Extra directory levels searched below each category root
    pub max_depth: usize,
    pub required_fields: Vec<String>,
    pub min_description_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            descriptor_file: default_descriptor_file(),
            manifest_file: default_manifest_file(),
            max_depth: default_max_depth(),
            required_fields: default_required_fields(),
            min_description_len: default_min_description_len(),
        }
    }
}

impl Config {
    /// Load configuration for a repository root.
    /// Priority: explicit path > project (<root>/.skillcheck.toml) > user (~/.skillcheck/config.toml)
    /// Starts with built-in defaults, then merges each layer that exists
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".skillcheck").join("config.toml");
            if user_config.exists() {
                tracing::debug!(path = %user_config.display(), "loading user config");
                config.merge(Self::load_from(&user_config)?);
            }
        }

        let project_config = root.join(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            tracing::debug!(path = %project_config.display(), "loading project config");
            config.merge(Self::load_from(&project_config)?);
        }

        // Explicit config must exist; a missing file is a usage error
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            config.merge(Self::load_from(path)?);
        }

        Ok(config)
    }

    /// Load a single config layer from a specific path
    pub fn load_from(path: &Path) -> Result<ConfigLayer> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let layer: ConfigLayer = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(layer)
    }

    /// Merge a layer into this config (layer takes priority where set)
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(categories) = layer.categories {
            self.categories = categories;
        }
        if let Some(descriptor_file) = layer.descriptor_file {
            self.descriptor_file = descriptor_file;
        }
        if let Some(manifest_file) = layer.manifest_file {
            self.manifest_file = manifest_file;
        }
        if let Some(max_depth) = layer.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(required_fields) = layer.required_fields {
            self.required_fields = required_fields;
        }
        if let Some(min_description_len) = layer.min_description_len {
            self.min_description_len = min_description_len;
        }
    }
}
