use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::backend_factory::BackendFactory;
use crate::config_manager::Config;
use crate::error::LanguageSelectionError;
use crate::inference::InferenceBackend;
use crate::session::translation::default_target_language;
use crate::session::{SessionContext, SessionDefaults, SessionHandle};
use crate::translate::TranslationBackend;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// client_uid -> session; one entry per open connection
    pub sessions: Arc<DashMap<String, SessionHandle>>,
    pub translator: Arc<dyn TranslationBackend>,
    pub inference: Arc<dyn InferenceBackend>,
    pub generation_tasks: Arc<DashMap<String, tokio::task::AbortHandle>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = BackendFactory::create_translator(&config)?;
        let inference = BackendFactory::create_inference(&config)?;
        Self::with_backends(config, translator, inference)
    }

    /// Build state around given collaborators; fails when a fresh session
    /// cannot be initialised from the configuration.
    pub fn with_backends(
        config: Config,
        translator: Arc<dyn TranslationBackend>,
        inference: Arc<dyn InferenceBackend>,
    ) -> anyhow::Result<Self> {
        let state = Self {
            config,
            sessions: Arc::new(DashMap::new()),
            translator,
            inference,
            generation_tasks: Arc::new(DashMap::new()),
        };
        state.session_defaults()?;
        Ok(state)
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn session_defaults(&self) -> Result<SessionDefaults, LanguageSelectionError> {
        let translator = self
            .config
            .translation_config
            .default_translator()
            .filter(|name| self.translator.supported_languages(name).is_some())
            .or_else(|| self.translator.translators().into_iter().next())
            .ok_or_else(|| LanguageSelectionError::UnknownTranslator(String::new()))?;
        let (_, target_language) = default_target_language(self.translator.as_ref(), &translator)?;
        Ok(SessionDefaults {
            translator,
            target_language,
            model: self.config.generation_config.default_model,
        })
    }

    pub fn create_session(&self, client_uid: &str) -> Result<SessionHandle, LanguageSelectionError> {
        let handle = SessionContext::new(&self.session_defaults()?).into_handle();
        self.sessions.insert(client_uid.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn session(&self, client_uid: &str) -> Option<SessionHandle> {
        self.sessions.get(client_uid).map(|e| e.value().clone())
    }

    /// Drop everything the connection owned
    pub fn remove_session(&self, client_uid: &str) {
        self.sessions.remove(client_uid);
        if let Some((_, handle)) = self.generation_tasks.remove(client_uid) {
            handle.abort();
        }
    }
}
