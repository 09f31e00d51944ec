use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::BufReader;

use sde_core::SdeApi;
use sde_mcp::{ApiHandle, ToolDispatcher};
use sde_server::stdio;

use mock_api::MockSdeApi;

async fn run_session(input: &str) -> Vec<Value> {
    let api: Arc<dyn SdeApi> = Arc::new(MockSdeApi::new());
    let dispatcher = Arc::new(ToolDispatcher::new(ApiHandle::ready(api)));

    let mut output = Vec::new();
    stdio::serve(dispatcher, BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn by_id(responses: &[Value], id: i64) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no response with id {id}: {responses:?}"))
}

#[tokio::test]
async fn handshake_and_tool_call() {
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "get_countermeasure",
                "arguments": {"project_id": 5, "countermeasure_id": "42"}
            }
        }),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let responses = run_session(&input).await;

    // The notification gets no reply.
    assert_eq!(responses.len(), 3);
    assert_eq!(by_id(&responses, 1)["result"]["serverInfo"]["name"], "sde-mcp");
    assert_eq!(
        by_id(&responses, 2)["result"]["tools"].as_array().unwrap().len(),
        7
    );
    assert_eq!(
        by_id(&responses, 3)["result"]["content"][0]["text"],
        "{\n  \"id\": \"5-42\",\n  \"status\": \"open\"\n}"
    );
}

#[tokio::test]
async fn malformed_line_gets_parse_error() {
    let input = "not json\n\n{\"jsonrpc\": \"2.0\", \"id\": 4, \"method\": \"ping\"}\n";

    let responses = run_session(input).await;

    assert_eq!(responses.len(), 2);
    let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
    assert_eq!(parse_error["error"]["code"], -32700);
    assert_eq!(by_id(&responses, 4)["result"], json!({}));
}

#[tokio::test]
async fn null_id_is_answered_but_missing_id_is_not() {
    let input = concat!(
        "{\"jsonrpc\": \"2.0\", \"id\": null, \"method\": \"ping\"}\n",
        "{\"jsonrpc\": \"2.0\", \"method\": \"ping\"}\n",
    );

    let responses = run_session(input).await;

    assert_eq!(responses.len(), 1);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[0]["result"], json!({}));
}

#[tokio::test]
async fn empty_input_ends_cleanly() {
    assert!(run_session("").await.is_empty());
}
