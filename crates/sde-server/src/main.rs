use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use sde_client::SdeClient;
use sde_core::SdeApi;
use sde_mcp::{ApiHandle, ToolDispatcher};
use sde_server::app_state::AppState;
use sde_server::{router, stdio};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST /mcp
    Http,
}

#[derive(Parser)]
#[command(
    name = "sde-mcp-server",
    about = "MCP server exposing SD Elements projects and countermeasures as tools"
)]
struct Cli {
    #[arg(long, env = "SDE_MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Address to bind when serving HTTP
    #[arg(long, env = "SDE_MCP_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "SDE_MCP_PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the stdio transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // SDE_HOST / SDE_API_KEY are read on the first tool call, not at startup.
    let api = ApiHandle::lazy(|| Ok(Arc::new(SdeClient::from_env()?) as Arc<dyn SdeApi>));
    let dispatcher = ToolDispatcher::new(api);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("SD Elements MCP server on stdio");
            stdio::run(Arc::new(dispatcher)).await?;
        }
        Transport::Http => {
            let app = router::create_router(AppState::new(dispatcher));

            let addr = format!("{}:{}", cli.host, cli.port);
            tracing::info!("SD Elements MCP server listening on {addr}");

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
