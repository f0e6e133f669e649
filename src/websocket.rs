use axum::extract::ws::WebSocket;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::handlers;
use crate::routes::{model_catalog, translator_catalog};
use crate::state::AppState;

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    let (mut sink, mut receiver) = socket.split();

    let session = match state.create_session(&client_uid) {
        Ok(session) => session,
        Err(e) => {
            error!("Cannot initialise session for {}: {}", client_uid, e);
            let _ = sink
                .send(Message::Text(
                    json!({"type": "error", "kind": "language", "message": e.to_string()}).to_string(),
                ))
                .await;
            return;
        }
    };

    // Handlers and generation tasks write here; one task owns the socket sink
    let (sender, mut outbox) = mpsc::unbounded_channel::<String>();
    let forwarder = tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if let Err(e) = sink.send(Message::Text(text)).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    let session_uid = session.lock().await.session_uid.clone();
    let _ = sender.send(
        json!({
            "type": "session-created",
            "client_uid": client_uid,
            "session_uid": session_uid,
            "translators": translator_catalog(&state),
            "models": model_catalog(&state),
            "translation_output": crate::session::translation::AWAITING_TRANSLATION,
        })
        .to_string(),
    );

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&state, &client_uid, &text, &sender).await {
                    error!("Error handling message: {}", e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    state.remove_session(&client_uid);
    drop(sender);
    forwarder.abort();

    info!("Cleaned up client {}", client_uid);
}
