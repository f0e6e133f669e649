use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::interface::TranslationBackend;
use super::languages::LanguageMap;
use crate::python_service::{PythonServiceClient, TranslateRequest};

/// Translation provider backed by the Python service.
/// Language sets come from configuration, never from the service.
pub struct PythonTranslator {
    languages: LanguageMap,
    python_service: Arc<PythonServiceClient>,
}

impl PythonTranslator {
    pub fn new(languages: LanguageMap, python_service: Arc<PythonServiceClient>) -> Self {
        info!(
            "Initialized PythonTranslator: base_url={}, translators={:?}",
            python_service.base_url(),
            languages.names()
        );
        Self {
            languages,
            python_service,
        }
    }
}

#[async_trait]
impl TranslationBackend for PythonTranslator {
    fn translators(&self) -> Vec<String> {
        self.languages.names()
    }

    fn supported_languages(&self, translator: &str) -> Option<Vec<String>> {
        self.languages.languages(translator).map(<[String]>::to_vec)
    }

    async fn translate(
        &self,
        text: &str,
        translator: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, anyhow::Error> {
        let response = self
            .python_service
            .translate(TranslateRequest {
                text: text.to_string(),
                // the service keys translators by lowercase name
                translator: translator.to_lowercase(),
                source_lang: source.map(str::to_string),
                target_lang: target.to_string(),
            })
            .await?;
        Ok(response.translated_text)
    }
}
