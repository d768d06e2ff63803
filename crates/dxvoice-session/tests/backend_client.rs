use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use dxvoice_session::{BackendClient, SessionError, CONNECTION_DETAILS_MESSAGE};
use dxvoice_types::{Language, StructuredPayload, VoiceBase};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> BackendClient {
    BackendClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

// ── Connection details ──

#[tokio::test]
async fn test_connection_details_sends_selectors() {
    let router = Router::new().route(
        "/api/connection-details",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({
                "serverUrl": "wss://media.example",
                "roomName": format!("room-{}", params["language"]),
                "participantName": params["voiceBase"],
                "participantToken": "tok",
            }))
        }),
    );
    let addr = serve(router).await;

    let details = client(addr)
        .connection_details(Language::Ta, VoiceBase::LiveAssistant)
        .await
        .unwrap();

    assert_eq!(details.server_url, "wss://media.example");
    assert_eq!(details.room_name, "room-ta");
    assert_eq!(details.participant_name, "Live Assistant");
    assert_eq!(details.participant_token, "tok");
}

#[tokio::test]
async fn test_connection_details_rejection_is_generic() {
    let router = Router::new().route(
        "/api/connection-details",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "agent pool exhausted") }),
    );
    let addr = serve(router).await;

    let err = client(addr)
        .connection_details(Language::En, VoiceBase::VoiceAssistant)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::ConnectionDetailsStatus(500)));
    assert_eq!(err.to_string(), CONNECTION_DETAILS_MESSAGE);
}

#[tokio::test]
async fn test_connection_details_malformed_body_is_generic() {
    let router = Router::new().route(
        "/api/connection-details",
        get(|| async { Json(json!({"roomName": "r"})) }),
    );
    let addr = serve(router).await;

    let err = client(addr)
        .connection_details(Language::En, VoiceBase::VoiceAssistant)
        .await
        .unwrap_err();

    assert!(err.is_connection_details());
    assert_eq!(err.to_string(), CONNECTION_DETAILS_MESSAGE);
}

#[tokio::test]
async fn test_connection_details_unreachable_is_generic() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = client(addr)
        .connection_details(Language::En, VoiceBase::VoiceAssistant)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::ConnectionDetailsRequest(_)));
    assert_eq!(err.to_string(), CONNECTION_DETAILS_MESSAGE);
}

// ── Diagnostic data ──

async fn diagnostic_client(body: Value) -> BackendClient {
    let router = Router::new().route(
        "/api/diagnostic-data",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    client(serve(router).await)
}

#[tokio::test]
async fn test_diagnostic_data_returns_report() {
    let client = diagnostic_client(json!({
        "data": {
            "content": "**Category:** Hardware",
            "web_sources": [{"title": "Manual", "url": "https://example.com/manual"}],
        }
    }))
    .await;

    let payload = client.diagnostic_data().await.unwrap().unwrap();
    assert_eq!(payload.main_content, "**Category:** Hardware");
    assert_eq!(payload.web_sources.len(), 1);
    assert!(payload.youtube_videos.is_empty());
}

#[tokio::test]
async fn test_diagnostic_data_without_report() {
    for body in [json!({}), json!({"data": null}), json!({"data": {}})] {
        let client = diagnostic_client(body.clone()).await;
        assert_eq!(
            client.diagnostic_data().await.unwrap(),
            None::<StructuredPayload>,
            "body {}",
            body
        );
    }
}

#[tokio::test]
async fn test_diagnostic_data_error_status() {
    let router = Router::new().route(
        "/api/diagnostic-data",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let client = client(serve(router).await);

    let err = client.diagnostic_data().await.unwrap_err();
    assert!(matches!(err, SessionError::DiagnosticStatus(503)));
    assert!(!err.is_connection_details());
}
