//! End-to-end HTTP tests for the gateway routes.
//!
//! Each test builds the full router over an [`AppState`] whose Azure
//! endpoint points at a wiremock server, then drives it with
//! `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::util::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use tts_gateway::{ServerConfig, routes, state::AppState};

fn test_config(azure_endpoint: Option<String>, cost_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        azure_key: "test-key".to_string(),
        azure_region: "eastus".to_string(),
        azure_endpoint,
        default_voice: "zh-CN-XiaoxiaoNeural".to_string(),
        default_style: "general".to_string(),
        default_rate: "+0%".to_string(),
        default_pitch: "+0%".to_string(),
        output_format: "audio-24khz-160kbitrate-mono-mp3".to_string(),
        max_text_length: 50,
        segment_length: 10,
        enable_streaming: false,
        cost_output_dir: cost_dir,
        price_per_million_chars: 15.0,
    }
}

fn app(config: ServerConfig) -> axum::Router {
    let state = AppState::new(config).unwrap();
    routes::api::create_api_router().with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(None, dir.path().to_path_buf()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn config_endpoint_exposes_defaults_without_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(None, dir.path().to_path_buf()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["default_voice"], "zh-CN-XiaoxiaoNeural");
    assert_eq!(json["max_text_length"], 50);
    assert_eq!(json["region"], "eastus");
    assert!(json.get("azure_key").is_none());
}

#[tokio::test]
async fn missing_text_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(None, dir.path().to_path_buf()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tts?voice=en-US-JennyNeural")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "text is required");
}

#[tokio::test]
async fn oversized_text_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(None, dir.path().to_path_buf()));

    let long_text = "a".repeat(51);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/tts?text={long_text}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_returns_buffered_audio_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(
        Some(format!("{}/cognitiveservices/v1", server.uri())),
        dir.path().to_path_buf(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tts?text=hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/mpeg"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.as_ref(), b"mp3");
}

#[tokio::test]
async fn get_short_aliases_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(wiremock::matchers::body_string_contains(
            "<voice name='en-US-JennyNeural'>",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(
        Some(format!("{}/cognitiveservices/v1", server.uri())),
        dir.path().to_path_buf(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tts?t=hi&v=en-US-JennyNeural")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn post_synthesizes_multiple_segments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"seg".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(
        Some(format!("{}/cognitiveservices/v1", server.uri())),
        dir.path().to_path_buf(),
    ));

    // Two sentences, each under the segment budget but together over it.
    let body = json!({ "text": "first bit! second go!" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/tts")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let audio = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(audio.as_ref(), b"segseg");
}

#[tokio::test]
async fn stream_flag_switches_to_chunked_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"streamed".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(
        Some(format!("{}/cognitiveservices/v1", server.uri())),
        dir.path().to_path_buf(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tts?text=hello&stream=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/mpeg"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.as_ref(), b"streamed");
}

#[tokio::test]
async fn upstream_failure_maps_to_its_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid subscription key"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(
        Some(format!("{}/cognitiveservices/v1", server.uri())),
        dir.path().to_path_buf(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tts?text=hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], 401);
}
