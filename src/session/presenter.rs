use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::types::{GenerationRun, RunStatus};

pub const AWAITING_GENERATION: &str = "Awaiting generation...";
pub const GENERATING: &str = "Generating...";

/// One line of the results view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    pub label: String,
    pub text: String,
}

impl DisplayLine {
    fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{}: {}", self.label, self.text)
        }
    }
}

/// Format a run for display. Completed outputs keep the collaborator's order.
pub fn present(run: &GenerationRun) -> Vec<DisplayLine> {
    match run.status {
        RunStatus::Idle => vec![DisplayLine::new(AWAITING_GENERATION, "")],
        RunStatus::Running => vec![DisplayLine::new(GENERATING, "")],
        RunStatus::Completed => run
            .outputs
            .iter()
            .map(|output| DisplayLine::new(format!("Answer #{}", output.index + 1), &output.text))
            .collect(),
        RunStatus::Failed => vec![DisplayLine::new(
            "Error",
            run.failure.as_deref().unwrap_or("generation failed"),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::GeneratedSequence;

    #[test]
    fn completed_outputs_are_labelled_in_order() {
        let run = GenerationRun {
            status: RunStatus::Completed,
            outputs: vec![
                GeneratedSequence { index: 0, text: "A".to_string() },
                GeneratedSequence { index: 1, text: "B".to_string() },
            ],
            ..GenerationRun::idle()
        };
        let lines: Vec<String> = present(&run).iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["Answer #1: A", "Answer #2: B"]);
    }

    #[test]
    fn idle_run_shows_placeholder() {
        let lines = present(&GenerationRun::idle());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), AWAITING_GENERATION);
    }

    #[test]
    fn failed_run_carries_reason() {
        let run = GenerationRun {
            status: RunStatus::Failed,
            failure: Some("Generation failed: out of memory".to_string()),
            ..GenerationRun::idle()
        };
        let lines = present(&run);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "Error: Generation failed: out of memory");
    }
}
