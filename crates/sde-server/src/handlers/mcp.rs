use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app_state::AppState;
use crate::protocol;

/// Handle an MCP JSON-RPC message posted over HTTP.
///
/// Requests get their response in the body; notifications get 202 with no body.
/// A body that is not a JSON-RPC request gets a `-32700` parse error, as on stdio.
pub async fn mcp_request(State(state): State<AppState>, body: String) -> Response {
    match protocol::handle_message(&state.dispatcher, &body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
