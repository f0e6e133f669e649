//! Single-flight generation run
//!
//! `Idle -> Running -> {Completed, Failed}`. A session runs the model at most
//! once: after the first accepted submission every further submission is
//! rejected until the whole session is restarted. The session lock is not
//! held while the model runs, so a concurrent submit observes `Running` and
//! is turned away instead of queueing.

use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{InferenceError, SubmitError};
use crate::inference::{GenerateRequest, InferenceBackend};
use crate::session::context::SessionHandle;
use crate::session::resolver::resolve_generation_input;
use crate::session::types::{
    GeneratedSequence, GenerationConstraints, GenerationInput, GenerationRun, RunStatus,
};
use crate::session::validation::check_constraints;

/// Immutable snapshot taken when a run starts
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub constraints: GenerationConstraints,
    pub input: GenerationInput,
    started: Instant,
}

/// A run that ended in `Failed`, with its typed cause
#[derive(Debug, Clone)]
pub struct FailedRun {
    pub run: GenerationRun,
    pub error: InferenceError,
}

impl GenerationRun {
    fn complete(&mut self, sequences: Vec<String>, elapsed_seconds: u64) {
        self.status = RunStatus::Completed;
        self.elapsed_seconds = Some(elapsed_seconds);
        self.outputs = sequences
            .into_iter()
            .enumerate()
            .map(|(index, text)| GeneratedSequence { index, text })
            .collect();
    }

    fn fail(&mut self, reason: String, elapsed_seconds: u64) {
        self.status = RunStatus::Failed;
        self.elapsed_seconds = Some(elapsed_seconds);
        self.outputs.clear();
        self.failure = Some(reason);
    }
}

/// `Idle -> Running`: validate, resolve the prompt and snapshot the run.
/// Nothing changes when this fails.
pub async fn begin(session: &SessionHandle) -> Result<RunTicket, SubmitError> {
    let mut ctx = session.lock().await;

    if ctx.run.status != RunStatus::Idle {
        warn!(
            "Session {}: generation rejected, run already {}",
            ctx.session_uid,
            ctx.run.status.as_str()
        );
        return Err(SubmitError::RunAlreadyStarted(ctx.run.status.as_str()));
    }

    let form = &ctx.generation_form;
    let constraints = form.constraints.clone();
    check_constraints(&constraints)?;
    let input = resolve_generation_input(
        form.use_translation,
        Some(form.manual_text.as_str()),
        ctx.last_translation.as_ref(),
    )?;

    ctx.run = GenerationRun {
        status: RunStatus::Running,
        constraints: Some(constraints.clone()),
        input: Some(input.clone()),
        started_at: Some(Utc::now()),
        ..GenerationRun::idle()
    };
    info!(
        "Session {}: generation started on {} (min={}, max={}, sequences={})",
        ctx.session_uid,
        constraints.model_id,
        constraints.min_length,
        constraints.max_length,
        constraints.num_sequences
    );

    Ok(RunTicket {
        constraints,
        input,
        started: Instant::now(),
    })
}

async fn invoke(
    ticket: &RunTicket,
    backend: &dyn InferenceBackend,
    seed: u64,
) -> Result<Vec<String>, InferenceError> {
    let model_id = ticket.constraints.model_id;
    let handle = backend
        .load(model_id)
        .await
        .map_err(|e| InferenceError::Load {
            model: model_id.to_string(),
            reason: e.to_string(),
        })?;

    let request = GenerateRequest {
        prompt: ticket.input.text.clone(),
        min_length: ticket.constraints.min_length,
        max_length: ticket.constraints.max_length,
        num_sequences: ticket.constraints.num_sequences,
        seed,
    };
    let sequences = backend
        .generate(&handle, &request)
        .await
        .map_err(|e| InferenceError::Generate(e.to_string()))?;

    let expected = ticket.constraints.num_sequences as usize;
    if sequences.len() != expected {
        return Err(InferenceError::SequenceCount {
            expected,
            got: sequences.len(),
        });
    }
    Ok(sequences)
}

/// `Running -> Completed | Failed`: load the model, call it once and record
/// the outcome. The failed run is stored in the session before it is returned.
pub async fn execute(
    session: &SessionHandle,
    ticket: RunTicket,
    backend: &dyn InferenceBackend,
    seed: u64,
) -> Result<GenerationRun, FailedRun> {
    let outcome = invoke(&ticket, backend, seed).await;
    let elapsed_seconds = ticket.started.elapsed().as_secs();

    let mut ctx = session.lock().await;
    match outcome {
        Ok(sequences) => {
            info!(
                "Session {}: generation completed in {}s ({} sequences)",
                ctx.session_uid,
                elapsed_seconds,
                sequences.len()
            );
            ctx.run.complete(sequences, elapsed_seconds);
            Ok(ctx.run.clone())
        }
        Err(error) => {
            error!("Session {}: generation failed: {}", ctx.session_uid, error);
            ctx.run.fail(error.to_string(), elapsed_seconds);
            Err(FailedRun {
                run: ctx.run.clone(),
                error,
            })
        }
    }
}

/// Begin and execute in one go; a failed run is returned like a completed one
pub async fn submit(
    session: &SessionHandle,
    backend: &dyn InferenceBackend,
    seed: u64,
) -> Result<GenerationRun, SubmitError> {
    let ticket = begin(session).await?;
    Ok(execute(session, ticket, backend, seed)
        .await
        .unwrap_or_else(|failed| failed.run))
}
