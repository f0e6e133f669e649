use thiserror::Error;

use crate::session::validation::MAX_INPUT_CHARS;

/// Raw text rejected before it reaches a translator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter some text to translate")]
    Empty,

    #[error("Input text must be at most {} characters long (got {length})", MAX_INPUT_CHARS)]
    TooLong { length: usize },
}

/// Decoding parameters that cannot be dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Minimum length ({min}) must not exceed maximum length ({max})")]
    MinExceedsMax { min: u32, max: u32 },

    #[error("{field} must be between {lower} and {upper} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        lower: u32,
        upper: u32,
    },

    #[error("Unsupported model: {0}")]
    UnknownModel(String),
}

/// The resolver found no text to feed the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoInputAvailable {
    #[error("Please perform a translation first")]
    TranslationMissing,

    #[error("Please enter a prompt for the model")]
    ManualTextMissing,
}

/// Invalid translator or language pair selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageSelectionError {
    #[error("Unknown translator: {0}")]
    UnknownTranslator(String),

    #[error("Please select an input language or enable automatic detection")]
    MissingSourceLanguage,

    #[error("Language '{language}' is not supported by {translator}")]
    UnsupportedLanguage { translator: String, language: String },

    #[error("Please select two different languages for translation")]
    SameLanguage,

    #[error("Translator {0} has no English output language configured")]
    NoDefaultTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Translation failed: {0}")]
pub struct TranslationBackendError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Failed to load model {model}: {reason}")]
    Load { model: String, reason: String },

    #[error("Generation failed: {0}")]
    Generate(String),

    #[error("Model returned {got} sequences, expected {expected}")]
    SequenceCount { expected: usize, got: usize },
}

/// Why a generation submission was refused before any model call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    NoInput(#[from] NoInputAvailable),

    #[error("A generation run was already started in this session ({0}); restart the session to generate again")]
    RunAlreadyStarted(&'static str),
}

/// Everything a session action can surface to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    NoInput(#[from] NoInputAvailable),

    #[error(transparent)]
    Language(#[from] LanguageSelectionError),

    #[error(transparent)]
    Translation(#[from] TranslationBackendError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("A generation run was already started in this session ({0}); restart the session to generate again")]
    RunAlreadyStarted(&'static str),

    #[error("A generation run is in progress; wait for it to finish")]
    RunInProgress,

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl From<SubmitError> for SessionError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Constraint(e) => SessionError::Constraint(e),
            SubmitError::NoInput(e) => SessionError::NoInput(e),
            SubmitError::RunAlreadyStarted(status) => SessionError::RunAlreadyStarted(status),
        }
    }
}

impl SessionError {
    /// Wire `kind` of the error message sent to the client
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Input(_) => "input",
            SessionError::Constraint(_) => "constraint",
            SessionError::NoInput(_) => "no-input",
            SessionError::Language(_) => "language",
            SessionError::Translation(_) => "translation-backend",
            SessionError::Inference(_) => "inference",
            SessionError::RunAlreadyStarted(_) => "run-already-started",
            SessionError::RunInProgress => "run-in-progress",
            SessionError::InvalidMessage(_) => "invalid-message",
        }
    }
}
