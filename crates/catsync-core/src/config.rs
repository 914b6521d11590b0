use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub descriptor: DescriptorConfig,
    #[serde(default)]
    pub policy: ReconciliationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// File basenames recognized as component descriptors.
    #[serde(default = "default_basenames")]
    pub basenames: Vec<String>,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            basenames: default_basenames(),
        }
    }
}

fn default_basenames() -> Vec<String> {
    vec!["compass.yml".to_string(), "compass.yaml".to_string()]
}

/// Feature switches for the reconciliation pipeline.
///
/// Read once per invocation and passed explicitly into every stage; no stage
/// performs an ambient flag lookup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    /// Detect identity-scheme changes on modified files and split them into
    /// unlink + create instead of a plain update.
    #[serde(default)]
    pub enable_identity_transition_detection: bool,
    /// Allow the replacement create after a transition even when the new
    /// descriptor carries no durable id.
    #[serde(default)]
    pub enable_create_from_descriptor_without_id: bool,
    /// Honor equal `name` fields as evidence of a file move; when off, name
    /// collisions are treated as coincidence, not identity.
    #[serde(default)]
    pub enable_name_based_move_detection: bool,
}

impl ReconciliationPolicy {
    pub fn all_enabled() -> Self {
        Self {
            enable_identity_transition_detection: true,
            enable_create_from_descriptor_without_id: true,
            enable_name_based_move_detection: true,
        }
    }
}

/// Recognizes descriptor files by basename, matched against either side of
/// a diff.
#[derive(Debug, Clone)]
pub struct DescriptorMatcher {
    basenames: Vec<String>,
}

impl DescriptorMatcher {
    pub fn new(basenames: Vec<String>) -> Self {
        Self { basenames }
    }

    pub fn from_config(config: &DescriptorConfig) -> Self {
        Self::new(config.basenames.clone())
    }

    pub fn matches(&self, path: &str) -> bool {
        let basename = path.rsplit('/').next().unwrap_or(path);
        self.basenames.iter().any(|b| b == basename)
    }
}

impl Default for DescriptorMatcher {
    fn default() -> Self {
        Self::new(default_basenames())
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), basenames = ?config.descriptor.basenames, "loaded config");
        Ok(config)
    }

    pub fn matcher(&self) -> DescriptorMatcher {
        DescriptorMatcher::from_config(&self.descriptor)
    }
}
