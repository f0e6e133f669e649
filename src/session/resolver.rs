use crate::error::NoInputAvailable;
use crate::session::types::{GenerationInput, InputSource, TranslationResult};

/// Pick the prompt for the model.
///
/// With `use_translation` set the last translation is required; there is no
/// fallback to the manual text. Called afresh on every toggle or upstream
/// change, never cached.
pub fn resolve_generation_input(
    use_translation: bool,
    manual_text: Option<&str>,
    last_translation: Option<&TranslationResult>,
) -> Result<GenerationInput, NoInputAvailable> {
    if use_translation {
        return match last_translation {
            Some(result) if !result.text.is_empty() => Ok(GenerationInput {
                text: result.text.clone(),
                source: InputSource::Translation,
            }),
            _ => Err(NoInputAvailable::TranslationMissing),
        };
    }

    match manual_text {
        Some(text) if !text.is_empty() => Ok(GenerationInput {
            text: text.to_string(),
            source: InputSource::Manual,
        }),
        _ => Err(NoInputAvailable::ManualTextMissing),
    }
}
