use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{ConstraintError, SessionError};
use crate::inference::ModelId;
use crate::routes::translator_catalog;
use crate::session::generation;
use crate::session::translation::{self, AWAITING_TRANSLATION};
use crate::session::validation::{check_constraints, validate_text_length, TextLengthCheck};
use crate::session::{present, resolve_generation_input, GenerationRun, SessionContext, SessionHandle};
use crate::state::AppState;

/// Outbound half of a client connection
pub type WebSocketSend = mpsc::UnboundedSender<String>;

#[derive(Debug, Deserialize)]
struct TranslationParams {
    translator: Option<String>,
    auto_detect: Option<bool>,
    /// `""` clears the selection
    source_language: Option<String>,
    target_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerationInputParams {
    use_translation: Option<bool>,
    manual_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationParams {
    model: Option<String>,
    min_length: Option<u32>,
    max_length: Option<u32>,
    num_sequences: Option<u32>,
}

fn send(sender: &WebSocketSend, msg: Value) {
    // a closed channel means the client is gone; cleanup happens on disconnect
    let _ = sender.send(msg.to_string());
}

fn send_error(sender: &WebSocketSend, err: &SessionError) {
    send(
        sender,
        json!({
            "type": "error",
            "kind": err.kind(),
            "message": err.to_string()
        }),
    );
}

fn payload<T: for<'de> Deserialize<'de>>(msg: &Value) -> Result<T, SessionError> {
    serde_json::from_value(msg.clone()).map_err(|e| SessionError::InvalidMessage(e.to_string()))
}

pub async fn handle_message(
    state: &AppState,
    client_uid: &str,
    text: &str,
    sender: &WebSocketSend,
) -> anyhow::Result<()> {
    let msg: Value = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            send_error(sender, &SessionError::InvalidMessage(e.to_string()));
            return Ok(());
        }
    };
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    let session = state
        .session(client_uid)
        .ok_or_else(|| anyhow::anyhow!("No session for client {}", client_uid))?;

    let outcome = match msg_type {
        Some("set-translation-params") => handle_translation_params(state, &session, &msg, sender).await,
        Some("set-translation-text") => handle_translation_text(&session, &msg, sender).await,
        Some("reset-translation-input") => handle_reset_input(&session, sender).await,
        Some("translate") => handle_translate(state, &session, sender).await,
        Some("set-generation-input") => handle_generation_input(&session, &msg, sender).await,
        Some("set-generation-params") => handle_generation_params(&session, &msg, sender).await,
        Some("submit-generation") => handle_submit(state, client_uid, &session, sender).await,
        Some("restart-session") => handle_restart(state, client_uid, &session, sender).await,
        Some("fetch-session-state") => handle_fetch_state(&session, sender).await,
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
            Ok(())
        }
    };

    if let Err(err) = outcome {
        warn!("Client {}: {} ({})", client_uid, err, err.kind());
        send_error(sender, &err);
    }
    Ok(())
}

fn language_status(state: &AppState, ctx: &SessionContext) -> Value {
    let form = &ctx.translation_form;
    let check = translation::check_language_selection(form, state.translator.as_ref());
    json!({
        "type": "language-status",
        "valid": check.is_ok(),
        "message": check.err().map(|e| e.to_string()),
        "translator": form.translator,
        "auto_detect": form.auto_detect,
        "source_language": form.source_language,
        "target_language": form.target_language,
        "languages": state.translator.supported_languages(&form.translator).unwrap_or_default(),
    })
}

async fn handle_translation_params(
    state: &AppState,
    session: &SessionHandle,
    msg: &Value,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let params: TranslationParams = payload(msg)?;
    let mut ctx = session.lock().await;

    if let Some(translator) = &params.translator {
        translation::select_translator(&mut ctx.translation_form, translator, state.translator.as_ref())?;
    }
    let form = &mut ctx.translation_form;
    if let Some(auto_detect) = params.auto_detect {
        form.auto_detect = auto_detect;
    }
    if let Some(source) = params.source_language {
        form.source_language = (!source.is_empty()).then_some(source);
    }
    if let Some(target) = params.target_language {
        form.target_language = target;
    }

    send(sender, language_status(state, &ctx));
    Ok(())
}

fn input_status(ctx: &SessionContext) -> Value {
    let text = &ctx.translation_form.text;
    let (status, message) = match validate_text_length(text) {
        TextLengthCheck::Ok => ("ok", None),
        TextLengthCheck::Empty => ("empty", translation_gate_message(text)),
        TextLengthCheck::TooLong => ("too-long", translation_gate_message(text)),
    };
    json!({
        "type": "input-status",
        "status": status,
        "message": message,
        "length": text.chars().count(),
        "has_translation": ctx.last_translation.is_some(),
    })
}

fn translation_gate_message(text: &str) -> Option<String> {
    crate::session::validation::check_text(text)
        .err()
        .map(|e| e.to_string())
}

async fn handle_translation_text(
    session: &SessionHandle,
    msg: &Value,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let TranslationText { text } = payload(msg)?;
    let mut ctx = session.lock().await;
    let had_translation = ctx.last_translation.is_some();
    translation::set_text(&mut ctx, text);
    send(sender, input_status(&ctx));
    if had_translation && ctx.last_translation.is_none() {
        send(sender, generation_input_status(&ctx));
    }
    Ok(())
}

async fn handle_reset_input(session: &SessionHandle, sender: &WebSocketSend) -> Result<(), SessionError> {
    let mut ctx = session.lock().await;
    let had_translation = ctx.last_translation.is_some();
    translation::reset_input(&mut ctx);
    send(sender, input_status(&ctx));
    if had_translation {
        send(sender, generation_input_status(&ctx));
    }
    Ok(())
}

async fn handle_translate(
    state: &AppState,
    session: &SessionHandle,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let mut ctx = session.lock().await;
    let result = translation::run(&mut ctx, state.translator.as_ref()).await?;
    send(
        sender,
        json!({
            "type": "translation-result",
            "title": result.title(),
            "text": result.text,
        }),
    );
    send(sender, generation_input_status(&ctx));
    Ok(())
}

/// Re-resolved generation input, sent whenever one of its upstream values changes
fn generation_input_status(ctx: &SessionContext) -> Value {
    let resolved = resolve_generation_input(
        ctx.generation_form.use_translation,
        Some(ctx.generation_form.manual_text.as_str()),
        ctx.last_translation.as_ref(),
    );
    json!({
        "type": "generation-input-status",
        "available": resolved.is_ok(),
        "use_translation": ctx.generation_form.use_translation,
        "source": resolved.as_ref().ok().map(|input| input.source),
        "message": resolved.err().map(|e| e.to_string()),
    })
}

async fn handle_generation_input(
    session: &SessionHandle,
    msg: &Value,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let params: GenerationInputParams = payload(msg)?;
    let mut ctx = session.lock().await;
    if let Some(use_translation) = params.use_translation {
        ctx.generation_form.use_translation = use_translation;
    }
    if let Some(manual_text) = params.manual_text {
        ctx.generation_form.manual_text = manual_text;
    }
    send(sender, generation_input_status(&ctx));
    Ok(())
}

async fn handle_generation_params(
    session: &SessionHandle,
    msg: &Value,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let params: GenerationParams = payload(msg)?;
    let model = params
        .model
        .map(|name| name.parse::<ModelId>().map_err(ConstraintError::UnknownModel))
        .transpose()?;

    let mut ctx = session.lock().await;
    let constraints = &mut ctx.generation_form.constraints;
    if let Some(model) = model {
        constraints.model_id = model;
    }
    if let Some(min_length) = params.min_length {
        constraints.min_length = min_length;
    }
    if let Some(max_length) = params.max_length {
        constraints.max_length = max_length;
    }
    if let Some(num_sequences) = params.num_sequences {
        constraints.num_sequences = num_sequences;
    }

    let check = check_constraints(constraints);
    send(
        sender,
        json!({
            "type": "constraint-status",
            "valid": check.is_ok(),
            "message": check.err().map(|e| e.to_string()),
            "constraints": constraints,
        }),
    );
    Ok(())
}

/// Summary sent when a run reaches a terminal state
pub fn generation_result(run: &GenerationRun) -> Value {
    let lines = present(run);
    json!({
        "type": "generation-result",
        "status": run.status,
        "model": run.constraints.as_ref().map(|c| c.model_id),
        "elapsed_seconds": run.elapsed_seconds,
        "display": lines.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "lines": lines,
        "failure": run.failure,
    })
}

async fn handle_submit(
    state: &AppState,
    client_uid: &str,
    session: &SessionHandle,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let ticket = generation::begin(session).await?;
    send(
        sender,
        json!({
            "type": "generation-started",
            "model": ticket.constraints.model_id,
            "input_source": ticket.input.source,
            "constraints": ticket.constraints,
        }),
    );

    let session = session.clone();
    let inference = state.inference.clone();
    let seed = state.config.generation_config.seed;
    let sender = sender.clone();
    let task = tokio::spawn(async move {
        match generation::execute(&session, ticket, inference.as_ref(), seed).await {
            Ok(run) => send(&sender, generation_result(&run)),
            Err(failed) => {
                send(&sender, generation_result(&failed.run));
                send_error(&sender, &SessionError::from(failed.error));
            }
        }
    });
    state
        .generation_tasks
        .insert(client_uid.to_string(), task.abort_handle());
    Ok(())
}

async fn handle_restart(
    state: &AppState,
    client_uid: &str,
    session: &SessionHandle,
    sender: &WebSocketSend,
) -> Result<(), SessionError> {
    let defaults = state.session_defaults()?;
    let mut ctx = session.lock().await;
    ctx.restart(&defaults)?;
    state.generation_tasks.remove(client_uid);
    info!("Client {} restarted session as {}", client_uid, ctx.session_uid);

    send(
        sender,
        json!({
            "type": "session-restarted",
            "session_uid": ctx.session_uid,
            "translators": translator_catalog(state),
        }),
    );
    Ok(())
}

async fn handle_fetch_state(session: &SessionHandle, sender: &WebSocketSend) -> Result<(), SessionError> {
    let ctx = session.lock().await;
    let translation_output = ctx
        .last_translation
        .as_ref()
        .map(|t| t.text.clone())
        .unwrap_or_else(|| AWAITING_TRANSLATION.to_string());
    send(
        sender,
        json!({
            "type": "session-state",
            "session": *ctx,
            "translation_output": translation_output,
            "lines": present(&ctx.run),
        }),
    );
    Ok(())
}
