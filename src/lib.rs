//! Biomedical literature helper backend.
//!
//! Translates free text through a pluggable translator and feeds it, or a
//! manually entered prompt, to a BioGPT model. Each WebSocket connection owns
//! one session; a session generates at most once until it is restarted.

pub mod backend_factory;
pub mod config_manager;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod python_service;
pub mod routes;
pub mod session;
pub mod state;
pub mod translate;
pub mod websocket;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router around a prepared [`AppState`]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
