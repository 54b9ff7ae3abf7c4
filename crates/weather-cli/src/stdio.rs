use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use weather_server::mcp::{self, JsonRpcResponse};
use weather_server::tools::{ToolContext, WeatherTool};

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Serve newline-delimited JSON-RPC until `reader` reaches EOF.
pub async fn serve<R, W>(
    mut reader: R,
    mut writer: W,
    tools: &[Box<dyn WeatherTool>],
    ctx: &ToolContext,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match mcp::handle_message(line, tools, ctx).await {
                Some(response) => response,
                None => continue,
            },
            Err(e) => {
                tracing::warn!(error = %e, "discarding line that is not valid UTF-8");
                JsonRpcResponse::err(None, -32700, format!("parse error: {e}"))
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    tracing::info!("stdin closed, stopping");
    Ok(())
}

pub async fn run(tools: &[Box<dyn WeatherTool>], ctx: &ToolContext) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    tracing::info!("MCP weather server (stdio) ready");
    serve(stdin, stdout, tools, ctx).await
}
