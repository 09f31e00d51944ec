use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use sde_core::{Error, SdeApi};
use sde_mcp::{ApiHandle, ToolDispatcher};
use sde_server::app_state::AppState;

use mock_api::MockSdeApi;

fn build_test_app() -> (TestServer, Arc<MockSdeApi>) {
    let api = Arc::new(MockSdeApi::new());
    let handle = ApiHandle::ready(Arc::clone(&api) as Arc<dyn SdeApi>);
    let state = AppState::new(ToolDispatcher::new(handle));

    let app = sde_server::router::create_router(state);
    (TestServer::new(app).unwrap(), api)
}

async fn call_tool(server: &TestServer, name: &str, arguments: Value) -> Value {
    let resp = server
        .post("/mcp")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {
                "name": name,
                "arguments": arguments
            }
        }))
        .await;
    resp.assert_status_ok();
    resp.json()
}

fn tool_text(body: &Value) -> &str {
    body["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn health_check() {
    let (server, _) = build_test_app();
    let resp = server.get("/health").await;
    resp.assert_status_ok();

    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["server"], "sde-mcp");
    assert_eq!(body["api_client_initialized"], true);
}

#[tokio::test]
async fn health_does_not_build_lazy_client() {
    let handle = ApiHandle::lazy(|| Err(Error::Config("SDE_HOST is not set".to_string())));
    let app = sde_server::router::create_router(AppState::new(ToolDispatcher::new(handle)));
    let server = TestServer::new(app).unwrap();

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["api_client_initialized"], false);
}

#[tokio::test]
async fn mcp_initialize() {
    let (server, _) = build_test_app();

    let resp = server
        .post("/mcp")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {}
        }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["serverInfo"]["name"], "sde-mcp");
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    assert!(body["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn mcp_ping() {
    let (server, _) = build_test_app();

    let body: Value = server
        .post("/mcp")
        .json(&json!({"jsonrpc": "2.0", "id": "p", "method": "ping"}))
        .await
        .json();
    assert_eq!(body["id"], "p");
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn mcp_tools_list() {
    let (server, _) = build_test_app();

    let resp = server
        .post("/mcp")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": {}
        }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 7);
    assert!(tools
        .iter()
        .any(|t| t["name"] == "add_countermeasure_note" && t.get("inputSchema").is_some()));
}

#[tokio::test]
async fn mcp_unknown_method() {
    let (server, _) = build_test_app();

    let resp = server
        .post("/mcp")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "nonexistent/method",
            "params": {}
        }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert!(body.get("error").is_some());
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn mcp_notification_returns_accepted() {
    let (server, _) = build_test_app();

    // Notifications have no id and get no response body
    let resp = server
        .post("/mcp")
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .await;

    resp.assert_status(axum::http::StatusCode::ACCEPTED);
}

#[tokio::test]
async fn malformed_body_gets_parse_error() {
    let (server, _) = build_test_app();

    let resp = server
        .post("/mcp")
        .text("{\"jsonrpc\": \"2.0\", \"id\": 1,")
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn explicit_null_id_gets_a_reply() {
    let (server, _) = build_test_app();

    let resp = server
        .post("/mcp")
        .json(&json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert!(body["id"].is_null());
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn get_countermeasure_returns_pretty_json_text() {
    let (server, _) = build_test_app();

    let body = call_tool(
        &server,
        "get_countermeasure",
        json!({"project_id": 5, "countermeasure_id": "42"}),
    )
    .await;

    assert_eq!(body["id"], 7);
    assert_eq!(
        tool_text(&body),
        "{\n  \"id\": \"5-42\",\n  \"status\": \"open\"\n}"
    );
}

#[tokio::test]
async fn list_countermeasures_forwards_filter() {
    let (server, _) = build_test_app();

    let body = call_tool(
        &server,
        "list_countermeasures",
        json!({"project_id": 5, "status": "open", "risk_relevant": false}),
    )
    .await;

    let listed: Value = serde_json::from_str(tool_text(&body)).unwrap();
    assert_eq!(listed["project"], 5);
    assert_eq!(listed["filter"], json!({"status": "open", "risk_relevant": "false"}));
    assert_eq!(listed["results"][1]["id"], "5-T21");
}

#[tokio::test]
async fn update_and_note_hit_different_backend_methods() {
    let (server, api) = build_test_app();

    call_tool(
        &server,
        "update_countermeasure",
        json!({"project_id": 5, "countermeasure_id": "5-T21", "status": "DONE", "notes": "shipped"}),
    )
    .await;
    call_tool(
        &server,
        "add_countermeasure_note",
        json!({"project_id": 5, "countermeasure_id": "T21", "note": "record that QA signed off"}),
    )
    .await;

    assert_eq!(
        api.writes(),
        vec![
            (
                "update_countermeasure".to_string(),
                "5-T21".to_string(),
                json!({"status": "DONE", "status_note": "shipped"})
            ),
            (
                "add_task_note".to_string(),
                "5-T21".to_string(),
                json!("record that QA signed off")
            ),
        ]
    );
}

#[tokio::test]
async fn backend_error_becomes_internal_error() {
    let (server, _) = build_test_app();

    let body = call_tool(
        &server,
        "get_countermeasure",
        json!({"project_id": 5, "countermeasure_id": "999"}),
    )
    .await;

    assert!(body.get("result").is_none());
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(
        body["error"]["message"],
        r#"API error (404): {"detail":"Not found."}"#
    );
}

#[tokio::test]
async fn bad_arguments_become_invalid_params() {
    let (server, _) = build_test_app();

    let body = call_tool(&server, "get_countermeasure", json!({"project_id": 5})).await;
    assert_eq!(body["error"]["code"], -32602);

    let body = call_tool(&server, "delete_everything", json!({})).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["message"], "unknown tool: delete_everything");
}

#[tokio::test]
async fn tools_call_without_params() {
    let (server, _) = build_test_app();

    let body: Value = server
        .post("/mcp")
        .json(&json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call"}))
        .await
        .json();
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["message"], "Missing params");
}

#[tokio::test]
async fn missing_configuration_is_reported_per_call() {
    let handle = ApiHandle::lazy(|| Err(Error::Config("SDE_HOST is not set".to_string())));
    let app = sde_server::router::create_router(AppState::new(ToolDispatcher::new(handle)));
    let server = TestServer::new(app).unwrap();

    let body = call_tool(&server, "test_connection", json!({})).await;
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(body["error"]["message"], "configuration error: SDE_HOST is not set");

    // Protocol methods keep working without a client.
    let body: Value = server
        .post("/mcp")
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .await
        .json();
    assert!(body["result"]["tools"].is_array());
}
