use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::interface::{GenerateRequest, InferenceBackend, ModelHandle, ModelId};
use crate::python_service::{self, PythonServiceClient};

/// Inference backend served by the Python model service
pub struct PythonModelBackend {
    hub_ids: BTreeMap<ModelId, String>,
    python_service: Arc<PythonServiceClient>,
}

impl PythonModelBackend {
    pub fn new(hub_ids: BTreeMap<ModelId, String>, python_service: Arc<PythonServiceClient>) -> Self {
        info!(
            "Initialized PythonModelBackend: base_url={}, models={:?}",
            python_service.base_url(),
            hub_ids.keys().collect::<Vec<_>>()
        );
        Self {
            hub_ids,
            python_service,
        }
    }

    fn hub_id(&self, model_id: ModelId) -> &str {
        self.hub_ids
            .get(&model_id)
            .map(String::as_str)
            .unwrap_or_else(|| model_id.default_hub_id())
    }
}

#[async_trait]
impl InferenceBackend for PythonModelBackend {
    async fn load(&self, model_id: ModelId) -> Result<ModelHandle, anyhow::Error> {
        let hub_id = self.hub_id(model_id).to_string();
        info!("Loading model {} ({})", model_id, hub_id);
        let response = self
            .python_service
            .load_model(python_service::LoadModelRequest {
                model_id: model_id.to_string(),
                hub_id,
            })
            .await?;
        Ok(ModelHandle {
            model_id,
            handle: response.handle,
        })
    }

    async fn generate(
        &self,
        handle: &ModelHandle,
        request: &GenerateRequest,
    ) -> Result<Vec<String>, anyhow::Error> {
        let response = self
            .python_service
            .generate(python_service::GenerateRequest {
                handle: handle.handle.clone(),
                prompt: request.prompt.clone(),
                min_length: request.min_length,
                max_length: request.max_length,
                num_return_sequences: request.num_sequences,
                seed: request.seed,
            })
            .await?;
        Ok(response.sequences)
    }
}
