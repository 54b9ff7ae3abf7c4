use crate::tools::{ToolContext, WeatherTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "mcp-weather-server";
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    pub r#type: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Message entry points
// ---------------------------------------------------------------------------

/// Handle one raw JSON-RPC message. Returns `None` for notifications.
pub async fn handle_message(
    raw: &str,
    tools: &[Box<dyn WeatherTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<Value>(raw) {
        Ok(v) => handle_value(v, tools, ctx).await,
        Err(e) => Some(JsonRpcResponse::err(None, -32700, format!("parse error: {e}"))),
    }
}

pub async fn handle_value(
    raw: Value,
    tools: &[Box<dyn WeatherTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    let Some(obj) = raw.as_object() else {
        return Some(JsonRpcResponse::err(
            None,
            -32600,
            "invalid request: expected a JSON object",
        ));
    };

    // Notifications have no "id" key; no response
    if !obj.contains_key("id") {
        if let Some(method) = obj.get("method").and_then(Value::as_str) {
            info!(method, "notification received");
        }
        return None;
    }

    let id = obj.get("id").filter(|v| !v.is_null()).cloned();
    match serde_json::from_value::<JsonRpcRequest>(raw) {
        Ok(request) if request.jsonrpc != JSONRPC_VERSION => Some(JsonRpcResponse::err(
            request.id,
            -32600,
            format!("invalid request: unsupported jsonrpc version '{}'", request.jsonrpc),
        )),
        Ok(request) => Some(handle_request(&request, tools, ctx).await),
        Err(e) => Some(JsonRpcResponse::err(
            id,
            -32600,
            format!("invalid request: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

pub async fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn WeatherTool>],
    ctx: &ToolContext,
) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            req.id.clone(),
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
        ),

        "ping" => JsonRpcResponse::ok(req.id.clone(), serde_json::json!({})),

        "tools/list" => JsonRpcResponse::ok(
            req.id.clone(),
            serde_json::json!({ "tools": tool_descriptions(tools) }),
        ),

        "tools/call" => {
            let params = match &req.params {
                Some(p) => p,
                None => return JsonRpcResponse::err(req.id.clone(), -32602, "missing params"),
            };

            let tool_name = match params["name"].as_str() {
                Some(n) => n,
                None => {
                    return JsonRpcResponse::err(
                        req.id.clone(),
                        -32602,
                        "missing tool name in params",
                    )
                }
            };

            let args = params.get("arguments").cloned().unwrap_or(Value::Null);
            let call_result = call_tool(tools, tool_name, args, ctx).await;

            JsonRpcResponse::ok(
                req.id.clone(),
                serde_json::to_value(&call_result)
                    .unwrap_or_else(|e| serde_json::json!({"error": e.to_string()})),
            )
        }

        other => JsonRpcResponse::err(req.id.clone(), -32601, format!("method not found: {other}")),
    }
}

pub fn tool_descriptions(tools: &[Box<dyn WeatherTool>]) -> Vec<Value> {
    tools
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name(),
                "description": t.description(),
                "inputSchema": t.schema()
            })
        })
        .collect()
}

/// Run a tool by name. Failures are reported in-band as `isError` content
/// rather than as JSON-RPC errors, so the model can see what went wrong.
pub async fn call_tool(
    tools: &[Box<dyn WeatherTool>],
    name: &str,
    args: Value,
    ctx: &ToolContext,
) -> ToolCallResult {
    let outcome = match run_tool(tools, name, args, ctx).await {
        Ok(v) => {
            info!(tool = name, "tool executed successfully");
            let text = match v {
                Value::String(s) => s,
                other => serde_json::to_string_pretty(&other)
                    .unwrap_or_else(|e| format!("serialization error: {e}")),
            };
            (text, false)
        }
        Err(e) => {
            error!(tool = name, error = %e, "tool execution failed");
            (format!("Error executing tool '{name}': {e}"), true)
        }
    };

    ToolCallResult {
        content: vec![ToolContent {
            r#type: "text",
            text: outcome.0,
        }],
        is_error: outcome.1,
    }
}

async fn run_tool(
    tools: &[Box<dyn WeatherTool>],
    name: &str,
    args: Value,
    ctx: &ToolContext,
) -> Result<Value, String> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        obj @ Value::Object(_) => obj,
        _ => return Err("arguments must be an object".to_string()),
    };

    let tool = tools
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| format!("unknown tool: {name}"))?;

    let keys: Vec<String> = args
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    info!(tool = name, arguments = ?keys, "executing tool");

    tool.call(args, ctx).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
