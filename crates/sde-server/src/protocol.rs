//! JSON-RPC method routing shared by the HTTP and stdio transports.

use serde_json::Value;

use sde_mcp::jsonrpc::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use sde_mcp::{JsonRpcRequest, JsonRpcResponse, ToolDispatcher, ToolRegistry};

pub const SERVER_NAME: &str = "sde-mcp";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Handle one raw JSON-RPC message. Returns `None` when no reply is due.
pub async fn handle_message(dispatcher: &ToolDispatcher, raw: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<JsonRpcRequest>(raw) {
        Ok(req) => handle_request(dispatcher, req).await,
        Err(e) => {
            tracing::warn!("Failed to parse JSON-RPC message: {e}");
            Some(JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            ))
        }
    }
}

/// Handle one parsed JSON-RPC request. Notifications (no id member) get no reply.
pub async fn handle_request(
    dispatcher: &ToolDispatcher,
    req: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if req.is_notification() {
        tracing::info!("Received MCP notification: {}", req.method);
        return None;
    }

    if req.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            req.response_id(),
            INVALID_REQUEST,
            "Unsupported jsonrpc version",
        ));
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => JsonRpcResponse::success(req.response_id(), serde_json::json!({})),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tools_call(dispatcher, &req).await,
        _ => JsonRpcResponse::error(req.response_id(), METHOD_NOT_FOUND, "Method not found"),
    };
    Some(response)
}

fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(
        req.response_id(),
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_tools_list(req: &JsonRpcRequest) -> JsonRpcResponse {
    let tools = ToolRegistry::definitions();
    JsonRpcResponse::success(req.response_id(), serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call(dispatcher: &ToolDispatcher, req: &JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = &req.params else {
        return JsonRpcResponse::error(req.response_id(), INVALID_PARAMS, "Missing params");
    };

    let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(req.response_id(), INVALID_PARAMS, "Missing tool name");
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(Value::Object(serde_json::Map::new()));

    match dispatcher.call(tool_name, arguments).await {
        Ok(text) => JsonRpcResponse::success(
            req.response_id(),
            serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
        ),
        Err(err) => JsonRpcResponse::from_error(req.response_id(), &err),
    }
}
