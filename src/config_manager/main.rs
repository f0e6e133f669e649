use serde::{Deserialize, Serialize};

use crate::config_manager::generation::GenerationConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translation::TranslationConfig;

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "translation_config")]
    #[serde(default)]
    pub translation_config: TranslationConfig,

    #[serde(rename = "generation_config")]
    #[serde(default)]
    pub generation_config: GenerationConfig,
}

impl Config {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config, validate_config};
        let value = read_config(path)?;
        validate_config(&value)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.system_config
            .validate()
            .and_then(|_| self.translation_config.validate())
            .and_then(|_| self.generation_config.validate())
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
    }
}
