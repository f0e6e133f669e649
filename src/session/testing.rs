//! In-process backends for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::inference::{GenerateRequest, InferenceBackend, ModelHandle, ModelId};
use crate::session::context::SessionDefaults;
use crate::translate::{LanguageMap, TranslationBackend};

fn langs(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

pub fn defaults() -> SessionDefaults {
    SessionDefaults {
        translator: "Google".to_string(),
        target_language: "en".to_string(),
        model: ModelId::BioGpt,
    }
}

/// Echoes the text tagged with the language pair
pub struct FakeTranslator {
    languages: LanguageMap,
    calls: AtomicUsize,
    fail_next: Mutex<Option<String>>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self {
            languages: LanguageMap::new(vec![
                ("Google".to_string(), langs(&["de", "en", "es", "fr", "sw"])),
                ("DeepL".to_string(), langs(&["de", "en", "fr"])),
                ("NoEnglish".to_string(), langs(&["de", "fr"])),
            ]),
            calls: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self, reason: &str) {
        *self.fail_next.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl TranslationBackend for FakeTranslator {
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
        source: Option<&str>,
        target: &str,
    ) -> Result<String, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.fail_next.lock().unwrap().take() {
            anyhow::bail!(reason);
        }
        Ok(format!("[{}->{}] {}", source.unwrap_or("auto"), target, text))
    }
}

enum Mode {
    Normal,
    Failing(String),
    ShortByOne,
}

/// Deterministic model: continuations name their index and the seed
pub struct FakeModel {
    mode: Mode,
    gate: Option<Notify>,
    entered: Notify,
    loads: AtomicUsize,
    generations: AtomicUsize,
}

impl FakeModel {
    fn with_mode(mode: Mode, gated: bool) -> Self {
        Self {
            mode,
            gate: gated.then(Notify::new),
            entered: Notify::new(),
            loads: AtomicUsize::new(0),
            generations: AtomicUsize::new(0),
        }
    }

    pub fn new() -> Self {
        Self::with_mode(Mode::Normal, false)
    }

    /// Blocks inside `generate` until [`FakeModel::release`]
    pub fn gated() -> Self {
        Self::with_mode(Mode::Normal, true)
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_mode(Mode::Failing(reason.to_string()), false)
    }

    pub fn short_by_one() -> Self {
        Self::with_mode(Mode::ShortByOne, false)
    }

    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn generations(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for FakeModel {
    async fn load(&self, model_id: ModelId) -> Result<ModelHandle, anyhow::Error> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(ModelHandle {
            model_id,
            handle: format!("{}-handle", model_id),
        })
    }

    async fn generate(
        &self,
        _handle: &ModelHandle,
        request: &GenerateRequest,
    ) -> Result<Vec<String>, anyhow::Error> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let count = match self.mode {
            Mode::Failing(ref reason) => anyhow::bail!(reason.clone()),
            Mode::ShortByOne => request.num_sequences.saturating_sub(1),
            Mode::Normal => request.num_sequences,
        };
        Ok((0..count)
            .map(|i| format!("{} ... sequence {} (seed {})", request.prompt, i, request.seed))
            .collect())
    }
}
