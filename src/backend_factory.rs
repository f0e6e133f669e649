use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config_manager::Config;
use crate::inference::{InferenceBackend, PythonModelBackend};
use crate::python_service::PythonServiceClient;
use crate::translate::{LanguageMap, PythonTranslator, TranslationBackend};

/// Factory for the translation and inference collaborators
pub struct BackendFactory;

impl BackendFactory {
    /// Create the translation provider named by `translation_config.provider`
    pub fn create_translator(config: &Config) -> Result<Arc<dyn TranslationBackend>> {
        let translation = &config.translation_config;
        info!("Initializing translation provider: {}", translation.provider);

        match translation.provider.as_str() {
            "python_service" => {
                let client = PythonServiceClient::new(
                    config.system_config.translation_service_url.clone(),
                    config.system_config.request_timeout(),
                )?;
                Ok(Arc::new(PythonTranslator::new(
                    LanguageMap::from_config(&translation.translators),
                    Arc::new(client),
                )))
            }
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }

    /// Create the inference provider named by `generation_config.provider`
    pub fn create_inference(config: &Config) -> Result<Arc<dyn InferenceBackend>> {
        let generation = &config.generation_config;
        info!("Initializing inference provider: {}", generation.provider);

        match generation.provider.as_str() {
            "python_service" => {
                let client = PythonServiceClient::new(
                    config.system_config.model_service_url.clone(),
                    config.system_config.request_timeout(),
                )?;
                Ok(Arc::new(PythonModelBackend::new(
                    generation.models.clone(),
                    Arc::new(client),
                )))
            }
            other => Err(anyhow::anyhow!("Unsupported inference provider: {}", other)),
        }
    }
}
