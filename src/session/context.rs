use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::SessionError;
use crate::inference::ModelId;
use crate::session::types::{GenerationConstraints, GenerationRun, RunStatus, TranslationResult};

/// Shared handle to one user's session; the generation task holds a clone
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Values a fresh session starts from
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub translator: String,
    pub target_language: String,
    pub model: ModelId,
}

/// Translation parameter form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationForm {
    pub translator: String,
    pub auto_detect: bool,
    pub source_language: Option<String>,
    pub target_language: String,
    pub text: String,
}

/// Generation input and decoding parameter form.
/// `constraints` may be transiently invalid while the user adjusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationForm {
    pub use_translation: bool,
    pub manual_text: String,
    pub constraints: GenerationConstraints,
}

/// All state of one user session
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub session_uid: String,
    pub translation_form: TranslationForm,
    pub last_translation: Option<TranslationResult>,
    pub generation_form: GenerationForm,
    pub run: GenerationRun,
}

impl SessionContext {
    pub fn new(defaults: &SessionDefaults) -> Self {
        Self {
            session_uid: Uuid::new_v4().to_string(),
            translation_form: TranslationForm {
                translator: defaults.translator.clone(),
                auto_detect: false,
                source_language: None,
                target_language: defaults.target_language.clone(),
                text: String::new(),
            },
            last_translation: None,
            generation_form: GenerationForm {
                use_translation: false,
                manual_text: String::new(),
                constraints: GenerationConstraints::with_model(defaults.model),
            },
            run: GenerationRun::idle(),
        }
    }

    pub fn into_handle(self) -> SessionHandle {
        Arc::new(Mutex::new(self))
    }

    /// Replace the whole context with a fresh one. Refused while a run is in flight.
    pub fn restart(&mut self, defaults: &SessionDefaults) -> Result<(), SessionError> {
        if self.run.status == RunStatus::Running {
            return Err(SessionError::RunInProgress);
        }
        *self = SessionContext::new(defaults);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SessionDefaults {
        SessionDefaults {
            translator: "Google".to_string(),
            target_language: "en".to_string(),
            model: ModelId::BioGpt,
        }
    }

    #[test]
    fn fresh_session_is_idle_without_translation() {
        let ctx = SessionContext::new(&defaults());
        assert_eq!(ctx.run.status, RunStatus::Idle);
        assert!(ctx.last_translation.is_none());
        assert_eq!(ctx.translation_form.target_language, "en");
        assert_eq!(ctx.generation_form.constraints.min_length, 50);
        assert_eq!(ctx.generation_form.constraints.max_length, 250);
    }

    #[test]
    fn restart_issues_new_session_uid() {
        let mut ctx = SessionContext::new(&defaults());
        let old_uid = ctx.session_uid.clone();
        ctx.run.status = RunStatus::Completed;
        ctx.restart(&defaults()).unwrap();
        assert_ne!(ctx.session_uid, old_uid);
        assert_eq!(ctx.run.status, RunStatus::Idle);
    }

    #[test]
    fn restart_is_refused_while_running() {
        let mut ctx = SessionContext::new(&defaults());
        ctx.run.status = RunStatus::Running;
        assert_eq!(ctx.restart(&defaults()), Err(SessionError::RunInProgress));
        assert_eq!(ctx.run.status, RunStatus::Running);
    }
}
