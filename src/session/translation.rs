//! Translation stage
//!
//! Turns the translation form into a [`TranslationRequest`], calls the
//! backend and stores the result as the session's last translation. A failed
//! call leaves the previous result in place.

use tracing::{error, info};

use crate::error::{LanguageSelectionError, SessionError, TranslationBackendError};
use crate::session::context::{SessionContext, TranslationForm};
use crate::session::types::{TranslationRequest, TranslationResult};
use crate::session::validation::check_text;
use crate::translate::TranslationBackend;

pub const AWAITING_TRANSLATION: &str = "Awaiting translation...";

const DEFAULT_TARGET_LANGUAGE: &str = "en";

fn languages_of(
    backend: &dyn TranslationBackend,
    translator: &str,
) -> Result<Vec<String>, LanguageSelectionError> {
    backend
        .supported_languages(translator)
        .ok_or_else(|| LanguageSelectionError::UnknownTranslator(translator.to_string()))
}

/// Index and code of the preselected output language: English, or a
/// configuration error when the translator lacks it.
pub fn default_target_language(
    backend: &dyn TranslationBackend,
    translator: &str,
) -> Result<(usize, String), LanguageSelectionError> {
    languages_of(backend, translator)?
        .into_iter()
        .enumerate()
        .find(|(_, lang)| lang == DEFAULT_TARGET_LANGUAGE)
        .ok_or_else(|| LanguageSelectionError::NoDefaultTarget(translator.to_string()))
}

/// Language-pair rules for the current form
pub fn check_language_selection(
    form: &TranslationForm,
    backend: &dyn TranslationBackend,
) -> Result<(), LanguageSelectionError> {
    let languages = languages_of(backend, &form.translator)?;
    let supported = |lang: &str| -> Result<(), LanguageSelectionError> {
        if languages.iter().any(|l| l == lang) {
            Ok(())
        } else {
            Err(LanguageSelectionError::UnsupportedLanguage {
                translator: form.translator.clone(),
                language: lang.to_string(),
            })
        }
    };

    supported(&form.target_language)?;
    if form.auto_detect {
        return Ok(());
    }

    let source = form
        .source_language
        .as_deref()
        .ok_or(LanguageSelectionError::MissingSourceLanguage)?;
    supported(source)?;
    if source == form.target_language {
        return Err(LanguageSelectionError::SameLanguage);
    }
    Ok(())
}

/// Switch translator. The target falls back to the new translator's default
/// and a source it does not support is cleared. Naming the current translator
/// again leaves the form untouched.
pub fn select_translator(
    form: &mut TranslationForm,
    translator: &str,
    backend: &dyn TranslationBackend,
) -> Result<(), LanguageSelectionError> {
    let languages = languages_of(backend, translator)?;
    if form.translator.eq_ignore_ascii_case(translator) {
        return Ok(());
    }
    let (_, target) = default_target_language(backend, translator)?;

    form.translator = backend
        .translators()
        .into_iter()
        .find(|name| name.eq_ignore_ascii_case(translator))
        .unwrap_or_else(|| translator.to_string());
    form.target_language = target;
    if let Some(source) = &form.source_language {
        if !languages.contains(source) {
            form.source_language = None;
        }
    }
    Ok(())
}

/// Gate the Translate action and freeze the form into a request
pub fn build_request(
    form: &TranslationForm,
    backend: &dyn TranslationBackend,
) -> Result<TranslationRequest, SessionError> {
    check_text(&form.text)?;
    check_language_selection(form, backend)?;

    Ok(TranslationRequest {
        translator: form.translator.clone(),
        source_language: if form.auto_detect {
            None
        } else {
            form.source_language.clone()
        },
        target_language: form.target_language.clone(),
        auto_detect: form.auto_detect,
        text: form.text.clone(),
    })
}

pub async fn translate(
    request: TranslationRequest,
    backend: &dyn TranslationBackend,
) -> Result<TranslationResult, TranslationBackendError> {
    let text = backend
        .translate(
            &request.text,
            &request.translator,
            request.source_language.as_deref(),
            &request.target_language,
        )
        .await
        .map_err(|e| {
            error!("Translation with {} failed: {:#}", request.translator, e);
            TranslationBackendError(e.to_string())
        })?;

    Ok(TranslationResult {
        text,
        created_for: request,
    })
}

/// Update the source text; a changed text invalidates the last translation.
pub fn set_text(ctx: &mut SessionContext, text: String) {
    if ctx.translation_form.text != text {
        ctx.translation_form.text = text;
        ctx.last_translation = None;
    }
}

/// The "Reset input" action
pub fn reset_input(ctx: &mut SessionContext) {
    if !ctx.translation_form.text.is_empty() {
        set_text(ctx, String::new());
    }
}

/// Run the Translate action against the session and store the result
pub async fn run(
    ctx: &mut SessionContext,
    backend: &dyn TranslationBackend,
) -> Result<TranslationResult, SessionError> {
    let request = build_request(&ctx.translation_form, backend)?;
    info!(
        "Translating {} chars with {} ({} -> {})",
        request.text.chars().count(),
        request.translator,
        request.source_language.as_deref().unwrap_or("auto"),
        request.target_language
    );
    let result = translate(request, backend).await?;
    ctx.last_translation = Some(result.clone());
    Ok(result)
}
