use reqwest::Client;
use serde_json::Value;

/// Minimal JSON-RPC client for a running `sde-mcp-server --transport http`.
pub struct McpClient {
    client: Client,
    endpoint: String,
}

impl McpClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/mcp", server_url.trim_end_matches('/')),
        }
    }

    /// Send a request and return its `result`, or fail with the server's error.
    pub async fn request(&self, method: &str, params: Value) -> anyhow::Result<Value> {
        tracing::debug!("POST {} {method}", self.endpoint);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await?;
            anyhow::bail!("MCP request failed: {status} - {body}");
        }

        let mut body: Value = resp.json().await?;
        if let Some(error) = body.get("error") {
            anyhow::bail!(
                "{} (code {})",
                error["message"].as_str().unwrap_or("unknown error"),
                error["code"]
            );
        }
        Ok(body["result"].take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_ignores_trailing_slash() {
        assert_eq!(McpClient::new("http://localhost:3000").endpoint, "http://localhost:3000/mcp");
        assert_eq!(McpClient::new("http://localhost:3000/").endpoint, "http://localhost:3000/mcp");
    }
}
