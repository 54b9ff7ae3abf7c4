pub mod error;
pub mod mcp;
pub mod routes;
pub mod state;
pub mod tools;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;
pub use tools::ToolContext;

/// Path advertised to SSE clients for posting JSON-RPC messages.
pub const MESSAGES_PATH: &str = "/messages/";

/// Build the axum Router with the SSE transport and the REST test surface.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // MCP over SSE
        .route("/sse", get(routes::sse::sse_connect))
        .route(MESSAGES_PATH, post(routes::messages::post_message))
        .route("/messages", post(routes::messages::post_message))
        // REST
        .route("/health", get(routes::rest::health))
        .route("/list_tools", get(routes::rest::list_tools))
        .route("/call_tool", post(routes::rest::call_tool))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(state, listener).await
}

/// Serve on a pre-bound listener.
///
/// Useful when `port = 0` and the caller needs the OS-assigned port.
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    let app = build_router(state);

    tracing::info!("MCP weather server (SSE) listening on http://{local}/sse");

    tokio::select! {
        result = async { axum::serve(listener, app).await } => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown requested"),
    }
    Ok(())
}
