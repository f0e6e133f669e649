use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::inference::ModelId;
use crate::session::translation::default_target_language;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // WebSocket, one session per connection
        .route("/session-ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/translators", get(get_translators))
        .route("/api/models", get(get_models))
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    crate::websocket::websocket_handler(ws, State(state)).await
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Every translator with its ordered languages and preselected output language
pub fn translator_catalog(state: &AppState) -> Vec<Value> {
    let backend = state.translator.as_ref();
    backend
        .translators()
        .into_iter()
        .map(|name| {
            let languages = backend.supported_languages(&name).unwrap_or_default();
            let default_target = default_target_language(backend, &name).ok();
            json!({
                "name": name,
                "languages": languages,
                "default_target_index": default_target.as_ref().map(|(index, _)| index),
                "default_target": default_target.map(|(_, lang)| lang),
            })
        })
        .collect()
}

pub fn model_catalog(state: &AppState) -> Vec<Value> {
    let models = &state.config.generation_config.models;
    ModelId::ALL
        .into_iter()
        .map(|model| {
            json!({
                "id": model,
                "hub_id": models.get(&model).map(String::as_str).unwrap_or(model.default_hub_id()),
                "default": model == state.config.generation_config.default_model,
            })
        })
        .collect()
}

async fn get_translators(State(state): State<AppState>) -> Json<Value> {
    Json(json!(translator_catalog(&state)))
}

async fn get_models(State(state): State<AppState>) -> Json<Value> {
    Json(json!(model_catalog(&state)))
}
