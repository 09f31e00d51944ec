use serde_json::Value;

use crate::rpc::McpClient;

/// Parse `--args`; a missing value means no arguments.
fn parse_arguments(args: Option<&str>) -> anyhow::Result<Value> {
    let arguments: Value = match args {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("--args is not valid JSON: {e}"))?,
        None => serde_json::json!({}),
    };
    if !arguments.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }
    Ok(arguments)
}

/// Call a tool and print the text it returns.
pub async fn run(server_url: &str, tool: &str, args: Option<&str>) -> anyhow::Result<()> {
    let arguments = parse_arguments(args)?;

    let result = McpClient::new(server_url)
        .request(
            "tools/call",
            serde_json::json!({
                "name": tool,
                "arguments": arguments
            }),
        )
        .await?;

    let content = result["content"].as_array().cloned().unwrap_or_default();
    for item in content {
        if let Some(text) = item["text"].as_str() {
            println!("{text}");
        }
    }

    Ok(())
}

/// List the tools the server exposes.
pub async fn list(server_url: &str) -> anyhow::Result<()> {
    let result = McpClient::new(server_url)
        .request("tools/list", serde_json::json!({}))
        .await?;

    for tool in result["tools"].as_array().into_iter().flatten() {
        println!(
            "{}\n    {}",
            tool["name"].as_str().unwrap_or_default(),
            tool["description"].as_str().unwrap_or_default()
        );
    }

    Ok(())
}
