use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inference::ModelId;

/// Configuration for the inference backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Fixed so identical requests decode identically
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(rename = "default_model")]
    #[serde(default = "default_model")]
    pub default_model: ModelId,

    /// Model id -> hub id
    #[serde(default = "default_models")]
    pub models: BTreeMap<ModelId, String>,
}

fn default_provider() -> String {
    "python_service".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_model() -> ModelId {
    ModelId::BioGpt
}

fn default_models() -> BTreeMap<ModelId, String> {
    ModelId::ALL
        .into_iter()
        .map(|model| (model, model.default_hub_id().to_string()))
        .collect()
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), String> {
        for model in ModelId::ALL {
            match self.models.get(&model) {
                Some(hub_id) if !hub_id.trim().is_empty() => {}
                _ => return Err(format!("Model {} has no hub id", model)),
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            seed: default_seed(),
            default_model: default_model(),
            models: default_models(),
        }
    }
}
