use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inference::ModelId;

/// One translation call, as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub translator: String,
    /// Omitted when `auto_detect` is set
    pub source_language: Option<String>,
    pub target_language: String,
    pub auto_detect: bool,
    pub text: String,
}

/// Output of a successful translation. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub created_for: TranslationRequest,
}

impl TranslationResult {
    /// Heading shown above the translated text
    pub fn title(&self) -> String {
        let request = &self.created_for;
        match (&request.source_language, request.auto_detect) {
            (Some(source), false) => format!(
                "Translated output from {} to {}",
                source.to_uppercase(),
                request.target_language.to_uppercase()
            ),
            _ => format!(
                "Translated output to {} with automatic detection",
                request.target_language.to_uppercase()
            ),
        }
    }
}

/// Decoding constraints for one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    pub min_length: u32,
    pub max_length: u32,
    pub num_sequences: u32,
    pub model_id: ModelId,
}

impl GenerationConstraints {
    pub fn with_model(model_id: ModelId) -> Self {
        Self {
            min_length: 50,
            max_length: 250,
            num_sequences: 1,
            model_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Translation,
    Manual,
}

/// The prompt actually fed to the model. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInput {
    pub text: String,
    pub source: InputSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSequence {
    /// 0-based position in the collaborator's output
    pub index: usize,
    pub text: String,
}

/// One generation attempt and its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRun {
    pub status: RunStatus,
    pub constraints: Option<GenerationConstraints>,
    pub input: Option<GenerationInput>,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: Option<u64>,
    pub outputs: Vec<GeneratedSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl GenerationRun {
    pub fn idle() -> Self {
        Self {
            status: RunStatus::Idle,
            constraints: None,
            input: None,
            started_at: None,
            elapsed_seconds: None,
            outputs: Vec::new(),
            failure: None,
        }
    }
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::idle()
    }
}
