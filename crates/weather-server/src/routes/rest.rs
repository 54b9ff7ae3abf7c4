use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::mcp;
use crate::state::AppState;

/// GET /health: liveness probe.
pub async fn health(State(app): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": mcp::SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": app.sessions.len(),
    }))
}

/// GET /list_tools: the same tool descriptions `tools/list` returns.
pub async fn list_tools(State(app): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({ "tools": mcp::tool_descriptions(&app.tools) }))
}

#[derive(Debug, Deserialize)]
pub struct CallToolBody {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// POST /call_tool: run a tool without an MCP session.
pub async fn call_tool(State(app): State<AppState>, Json(body): Json<CallToolBody>) -> Json<Value> {
    let result = mcp::call_tool(&app.tools, &body.name, body.arguments, &app.ctx).await;
    Json(serde_json::json!({
        "result": result.content,
        "isError": result.is_error,
    }))
}
