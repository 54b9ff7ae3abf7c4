use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use std::time::Duration;
use tower::ServiceExt;
use weather_core::{Clock, Config};
use weather_server::{build_router, AppState, ToolContext};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// State whose upstream URLs point at `base_url` and whose clock is frozen
/// at 2024-01-01T12:00Z.
fn state_for(base_url: &str) -> AppState {
    let ctx = ToolContext::new(Config {
        geocoding_url: format!("{base_url}/v1/search"),
        forecast_url: format!("{base_url}/v1/forecast"),
        ..Config::default()
    })
    .unwrap()
    .with_clock(Clock::Fixed(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    AppState::new(ctx)
}

fn offline_state() -> AppState {
    state_for("http://127.0.0.1:1")
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a raw body via `oneshot` and return (status, body text).
async fn post_raw(app: axum::Router, uri: &str, body: &str) -> (StatusCode, String) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, text) = post_raw(app, uri, &body.to_string()).await;
    let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// REST surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(offline_state());
    let (status, json) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["server"], "mcp-weather-server");
}

#[tokio::test]
async fn list_tools_returns_six_tools() {
    let app = build_router(offline_state());
    let (status, json) = get(app, "/list_tools").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tools"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn call_tool_runs_time_conversion() {
    let app = build_router(offline_state());
    let (status, json) = post_json(
        app,
        "/call_tool",
        serde_json::json!({
            "name": "convert_time",
            "arguments": {
                "datetime_str": "2024-01-01T09:00:00",
                "from_timezone": "Asia/Tokyo",
                "to_timezone": "UTC"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isError"], false);
    let text = json["result"][0]["text"].as_str().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(parsed["converted_datetime"], "2024-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn call_tool_unknown_name_is_in_band_error() {
    let app = build_router(offline_state());
    let (status, json) = post_json(
        app,
        "/call_tool",
        serde_json::json!({"name": "get_forecast_for_mars", "arguments": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isError"], true);
    assert!(json["result"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error executing tool 'get_forecast_for_mars'"));
}

#[tokio::test]
async fn call_tool_weather_against_mock_upstream() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/search")
        .match_query(mockito::Matcher::UrlEncoded("name".into(), "Taipei".into()))
        .with_status(200)
        .with_body(r#"{"results":[{"latitude":25.05,"longitude":121.53}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/v1/forecast")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            serde_json::json!({
                "hourly": {
                    "time": ["2024-01-01T11:00", "2024-01-01T12:00"],
                    "temperature_2m": [17.0, 18.5],
                    "weather_code": [3, 61]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = build_router(state_for(&server.url()));
    let (status, json) = post_json(
        app,
        "/call_tool",
        serde_json::json!({"name": "get_current_weather", "arguments": {"city": "Taipei"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isError"], false);
    let text = json["result"][0]["text"].as_str().unwrap();
    assert!(text.contains("Conditions: Slight rain"));
    assert!(text.contains("Temperature: 18.5°C"));
}

#[tokio::test]
async fn call_tool_with_upstream_outage_is_in_band_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/search")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let app = build_router(state_for(&server.url()));
    let (_, json) = post_json(
        app,
        "/call_tool",
        serde_json::json!({"name": "get_weather_details", "arguments": {"city": "Oslo"}}),
    )
    .await;

    assert_eq!(json["isError"], true);
    assert!(json["result"][0]["text"]
        .as_str()
        .unwrap()
        .contains("status 503"));
}

// ---------------------------------------------------------------------------
// SSE transport
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sse_first_event_advertises_message_endpoint() {
    let state = offline_state();
    let app = build_router(state.clone());

    let req = axum::http::Request::builder()
        .uri("/sse")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    assert_eq!(state.sessions.len(), 1);

    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let data = frame.into_data().unwrap();
    let text = String::from_utf8_lossy(&data);
    assert!(text.contains("event: endpoint"));
    assert!(text.contains("data: /messages/?session_id="));

    drop(body);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn message_without_session_id_is_400() {
    let app = build_router(offline_state());
    let body = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
    let (status, _) = post_raw(app, "/messages/", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_with_malformed_session_id_is_400() {
    let app = build_router(offline_state());
    let (status, _) = post_raw(
        app,
        "/messages/?session_id=not-a-uuid",
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_for_unknown_session_is_404() {
    let app = build_router(offline_state());
    let uri = format!("/messages/?session_id={}", uuid::Uuid::new_v4().simple());
    let (status, body) = post_raw(app, &uri, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("could not find session"));
}

#[tokio::test]
async fn unparsable_message_is_400() {
    let state = offline_state();
    let (id, _rx) = state.sessions.open();
    let app = build_router(state);
    let uri = format!("/messages/?session_id={}", id.simple());
    let (status, _) = post_raw(app, &uri, "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn posted_request_is_answered_on_session_stream() {
    let state = offline_state();
    let (id, mut rx) = state.sessions.open();
    let app = build_router(state);

    let uri = format!("/messages/?session_id={}", id.simple());
    let (status, _) = post_raw(
        app,
        &uri,
        r#"{"jsonrpc":"2.0","id":7,"method":"tools/list","params":{}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&msg).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["result"]["tools"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn notification_is_accepted_without_reply() {
    let state = offline_state();
    let (id, mut rx) = state.sessions.open();
    let app = build_router(state.clone());

    let uri = format!("/messages/?session_id={}", id.simple());
    let (status, _) = post_raw(
        app,
        &uri,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let waited = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(waited.is_err(), "notification must not produce a response");
}

#[tokio::test]
async fn batch_message_gets_invalid_request_on_session_stream() {
    let state = offline_state();
    let (id, mut rx) = state.sessions.open();
    let app = build_router(state);

    let uri = format!("/messages/?session_id={}", id.simple());
    let (status, _) = post_raw(app, &uri, "[1,2]").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&msg).unwrap();
    assert_eq!(json["error"]["code"], -32600);
    assert!(json["id"].is_null());
}
