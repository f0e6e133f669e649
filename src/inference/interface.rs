use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Supported causal language models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "BioGPT")]
    BioGpt,
    #[serde(rename = "BioGPT-Large")]
    BioGptLarge,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::BioGpt, ModelId::BioGptLarge];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::BioGpt => "BioGPT",
            ModelId::BioGptLarge => "BioGPT-Large",
        }
    }

    /// Hub id used when the configuration does not override it
    pub fn default_hub_id(&self) -> &'static str {
        match self {
            ModelId::BioGpt => "microsoft/biogpt",
            ModelId::BioGptLarge => "microsoft/BioGPT-Large",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// A model loaded by the inference backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHandle {
    pub model_id: ModelId,
    pub handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub min_length: u32,
    pub max_length: u32,
    pub num_sequences: u32,
    pub seed: u64,
}

/// Interface for the model-inference collaborator.
///
/// Implementations are not assumed to be reentrant; the session serializes
/// calls to them.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn load(&self, model_id: ModelId) -> Result<ModelHandle, anyhow::Error>;

    /// Decode `num_sequences` continuations of the prompt, in order
    async fn generate(
        &self,
        handle: &ModelHandle,
        request: &GenerateRequest,
    ) -> Result<Vec<String>, anyhow::Error>;
}
