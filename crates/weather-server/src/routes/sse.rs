use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt as _;
use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, SessionRegistry};
use crate::MESSAGES_PATH;

/// Removes the session from the registry when the SSE stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: SessionRegistry,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.close(&self.id) {
            info!(session = %self.id, "SSE client disconnected");
        }
    }
}

/// GET /sse: open an MCP session.
///
/// The first event is `endpoint`, whose data is the URL the client must POST
/// its JSON-RPC messages to. Responses then arrive as `message` events.
pub async fn sse_connect(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let (id, rx) = app.sessions.open();
    info!(session = %id, "SSE client connected");

    let guard = SessionGuard {
        id,
        sessions: app.sessions.clone(),
    };

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{MESSAGES_PATH}?session_id={}", id.simple()));

    let messages = ReceiverStream::new(rx).map(move |msg| {
        let _held = &guard;
        Ok::<Event, Infallible>(Event::default().event("message").data(msg))
    });

    let stream = tokio_stream::once(Ok::<Event, Infallible>(endpoint)).chain(messages);
    Sse::new(stream).keep_alive(KeepAlive::default())
}
