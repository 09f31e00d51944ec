use axum::{extract::State, Json};
use serde_json::Value;

use crate::app_state::AppState;
use crate::protocol::SERVER_NAME;

/// Health check endpoint. Does not contact SD Elements.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_client_initialized": state.dispatcher.is_client_initialized(),
    }))
}
