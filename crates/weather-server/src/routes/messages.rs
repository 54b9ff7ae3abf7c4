use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::mcp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub session_id: Option<String>,
}

/// POST /messages/?session_id=…: accept a client JSON-RPC message.
///
/// Returns 202 once the message is queued; the response (if any) is pushed
/// on the session's SSE stream.
///
/// Returns 400 if the session id is missing or malformed or the body is not JSON.
/// Returns 404 if no SSE session with that id is open.
pub async fn post_message(
    State(app): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Result<(StatusCode, &'static str), AppError> {
    let raw_id = query
        .session_id
        .ok_or_else(|| AppError::bad_request("session_id is required"))?;
    let id = Uuid::parse_str(&raw_id).map_err(|_| AppError::bad_request("invalid session ID"))?;
    let tx = app
        .sessions
        .sender(&id)
        .ok_or_else(|| AppError::not_found("could not find session"))?;

    let message: Value = serde_json::from_str(&body)
        .map_err(|e| AppError::bad_request(format!("could not parse message: {e}")))?;
    debug!(session = %id, "message received");

    tokio::spawn(async move {
        let Some(response) = mcp::handle_value(message, &app.tools, &app.ctx).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(json) => {
                if tx.send(json).await.is_err() {
                    warn!(session = %id, "session closed before response was delivered");
                }
            }
            Err(e) => warn!(session = %id, error = %e, "failed to serialize response"),
        }
    });

    Ok((StatusCode::ACCEPTED, "Accepted"))
}
