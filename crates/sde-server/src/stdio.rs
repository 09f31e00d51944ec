//! Newline-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use sde_mcp::{JsonRpcResponse, ToolDispatcher};

use crate::protocol;

/// Serve MCP on the process's stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns an error if reading stdin or writing stdout fails.
pub async fn run(dispatcher: Arc<ToolDispatcher>) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    serve(dispatcher, BufReader::new(tokio::io::stdin()), &mut stdout).await
}

/// Read one JSON-RPC message per line from `reader` and write one response
/// per line to `writer`.
///
/// Messages are handled concurrently, so responses may be written in a
/// different order than the requests arrived. Returns once the input is
/// exhausted and every in-flight response has been written.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub async fn serve<R, W>(
    dispatcher: Arc<ToolDispatcher>,
    reader: R,
    writer: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    let read_loop = async move {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let dispatcher = Arc::clone(&dispatcher);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = protocol::handle_message(&dispatcher, &line).await {
                    let _ = tx.send(response);
                }
            });
        }
        tracing::info!("MCP input closed");
        Ok::<_, std::io::Error>(())
    };

    let write_loop = async move {
        while let Some(response) = rx.recv().await {
            let mut out = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    };

    tokio::try_join!(read_loop, write_loop)?;
    Ok(())
}
