use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod call_cmd;
mod rpc;

#[derive(Parser)]
#[command(name = "sde", about = "Call SD Elements MCP tools from the command line")]
struct Cli {
    /// SD Elements MCP server URL (HTTP transport)
    #[arg(long, env = "SDE_MCP_URL", default_value = "http://localhost:3000")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available tools
    Tools,

    /// Call a tool and print its JSON output
    Call {
        /// Tool name, e.g. `get_countermeasure`
        tool: String,

        /// Tool arguments as a JSON object, e.g. '{"project_id": 5, "countermeasure_id": "42"}'
        #[arg(long)]
        args: Option<String>,
    },

    /// Check that the server is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => call_cmd::list(&cli.server_url).await?,
        Commands::Call { tool, args } => {
            call_cmd::run(&cli.server_url, &tool, args.as_deref()).await?;
        }
        Commands::Health => {
            let resp = reqwest::Client::new()
                .get(format!("{}/health", cli.server_url.trim_end_matches('/')))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    }

    Ok(())
}
