use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// HTTP client for the companion Python service hosting translators and models
#[derive(Debug, Clone)]
pub struct PythonServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub translator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translated_text: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelRequest {
    pub model_id: String,
    pub hub_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelResponse {
    #[serde(default)]
    pub handle: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub handle: String,
    pub prompt: String,
    pub min_length: u32,
    pub max_length: u32,
    pub num_return_sequences: u32,
    pub seed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub sequences: Vec<String>,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl PythonServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse> {
        let url = format!("{}/translate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: TranslateResponse = response.error_for_status()?.json().await?;
        if !result.success {
            anyhow::bail!(result.error.unwrap_or_else(|| "translation service reported failure".to_string()));
        }
        Ok(result)
    }

    pub async fn load_model(&self, request: LoadModelRequest) -> Result<LoadModelResponse> {
        let url = format!("{}/models/load", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: LoadModelResponse = response.error_for_status()?.json().await?;
        if !result.success {
            anyhow::bail!(result.error.unwrap_or_else(|| "model service could not load the model".to_string()));
        }
        Ok(result)
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/generate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: GenerateResponse = response.error_for_status()?.json().await?;
        if !result.success {
            anyhow::bail!(result.error.unwrap_or_else(|| "model service reported failure".to_string()));
        }
        Ok(result)
    }
}
