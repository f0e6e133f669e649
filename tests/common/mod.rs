#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use biogpt_helper::config_manager::Config;
use biogpt_helper::handlers::{handle_message, WebSocketSend};
use biogpt_helper::inference::{GenerateRequest, InferenceBackend, ModelHandle, ModelId};
use biogpt_helper::state::AppState;
use biogpt_helper::translate::{LanguageMap, TranslationBackend};

pub struct EnglishTranslator {
    languages: LanguageMap,
    pub calls: AtomicUsize,
}

impl EnglishTranslator {
    pub fn new() -> Self {
        let langs = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        Self {
            languages: LanguageMap::new(vec![
                ("DeepL".to_string(), langs(&["de", "en", "fr"])),
                ("Google".to_string(), langs(&["de", "en", "es", "fr"])),
            ]),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranslationBackend for EnglishTranslator {
    fn translators(&self) -> Vec<String> {
        self.languages.names()
    }

    fn supported_languages(&self, translator: &str) -> Option<Vec<String>> {
        self.languages.languages(translator).map(<[String]>::to_vec)
    }

    async fn translate(
        &self,
        text: &str,
        _translator: &str,
        _source: Option<&str>,
        _target: &str,
    ) -> Result<String, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match text {
            "Le cancer du sein" => Ok("Breast cancer".to_string()),
            other => Ok(format!("English: {}", other)),
        }
    }
}

pub struct EchoModel {
    pub loads: AtomicUsize,
    pub generations: AtomicUsize,
    failure: Option<String>,
}

impl EchoModel {
    pub fn new() -> Self {
        Self {
            loads: AtomicUsize::new(0),
            generations: AtomicUsize::new(0),
            failure: None,
        }
    }

    /// Loads fine, then every generation fails with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new()
        }
    }
}

#[async_trait]
impl InferenceBackend for EchoModel {
    async fn load(&self, model_id: ModelId) -> Result<ModelHandle, anyhow::Error> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(ModelHandle {
            model_id,
            handle: "h-1".to_string(),
        })
    }

    async fn generate(
        &self,
        _handle: &ModelHandle,
        request: &GenerateRequest,
    ) -> Result<Vec<String>, anyhow::Error> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            anyhow::bail!(reason.clone());
        }
        Ok((0..request.num_sequences)
            .map(|i| format!("{} is a disease #{}", request.prompt, i))
            .collect())
    }
}

pub struct Harness {
    pub state: AppState,
    pub translator: Arc<EnglishTranslator>,
    pub model: Arc<EchoModel>,
    pub sender: WebSocketSend,
    pub outbox: mpsc::UnboundedReceiver<String>,
    pub client_uid: String,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_model(EchoModel::new())
    }

    pub fn with_model(model: EchoModel) -> Self {
        let translator = Arc::new(EnglishTranslator::new());
        let model = Arc::new(model);
        let state = AppState::with_backends(Config::default(), translator.clone(), model.clone())
            .expect("state builds");
        let client_uid = "client-1".to_string();
        state.create_session(&client_uid).expect("session created");
        let (sender, outbox) = mpsc::unbounded_channel();
        Self {
            state,
            translator,
            model,
            sender,
            outbox,
            client_uid,
        }
    }

    pub async fn send(&self, msg: Value) {
        handle_message(&self.state, &self.client_uid, &msg.to_string(), &self.sender)
            .await
            .expect("handled");
    }

    pub async fn send_raw(&self, text: &str) {
        handle_message(&self.state, &self.client_uid, text, &self.sender)
            .await
            .expect("handled");
    }

    pub async fn recv(&mut self) -> Value {
        let text = self.outbox.recv().await.expect("message sent");
        serde_json::from_str(&text).expect("valid json")
    }

    /// Send and return the immediate answer
    pub async fn ask(&mut self, msg: Value) -> Value {
        self.send(msg).await;
        self.recv().await
    }

    pub fn nothing_pending(&mut self) -> bool {
        self.outbox.try_recv().is_err()
    }
}
