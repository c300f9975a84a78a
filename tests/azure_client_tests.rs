//! Azure Speech client tests against a wiremock server.
//!
//! The client takes an endpoint override, so every test points it at a
//! local mock and asserts on the exact request the Speech API would see:
//! headers, SSML body, and the error mapping for non-success statuses.

use futures::StreamExt;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tts_gateway::core::tts::{
    AzureSpeechClient, AzureTtsConfig, SpeechClient, SynthesisRequest, TtsError,
};

fn client_for(server: &MockServer) -> AzureSpeechClient {
    AzureSpeechClient::new(AzureTtsConfig {
        subscription_key: "test-key".to_string(),
        region: "eastus".to_string(),
        endpoint: Some(format!("{}/cognitiveservices/v1", server.uri())),
    })
    .unwrap()
}

fn request(text: &str) -> SynthesisRequest {
    SynthesisRequest {
        text: text.to_string(),
        voice: "zh-CN-XiaoxiaoNeural".to_string(),
        rate: "+0%".to_string(),
        pitch: "+0%".to_string(),
        style: "general".to_string(),
        output_format: "audio-24khz-160kbitrate-mono-mp3".to_string(),
    }
}

#[tokio::test]
async fn synthesize_sends_credentials_and_ssml() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cognitiveservices/v1"))
        .and(header("Ocp-Apim-Subscription-Key", "test-key"))
        .and(header("Ocp-Apim-Subscription-Region", "eastus"))
        .and(header("Content-Type", "application/ssml+xml"))
        .and(header(
            "X-Microsoft-OutputFormat",
            "audio-24khz-160kbitrate-mono-mp3",
        ))
        .and(body_string_contains("<voice name='zh-CN-XiaoxiaoNeural'>"))
        .and(body_string_contains("<prosody rate='+0%' pitch='+0%'>"))
        .and(body_string_contains("你好"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let audio = client.synthesize(&request("你好")).await.unwrap();

    assert_eq!(audio.as_ref(), b"mp3-bytes");
}

#[tokio::test]
async fn text_is_escaped_inside_the_ssml_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("a &lt; b &amp; c"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.synthesize(&request("a < b & c")).await.unwrap();
}

#[tokio::test]
async fn upstream_error_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid subscription key"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.synthesize(&request("hello")).await.unwrap_err();

    match error {
        TtsError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid subscription key");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn streaming_delivers_the_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"chunked audio".to_vec()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.synthesize_stream(&request("hello")).await.unwrap();

    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, b"chunked audio");
}

#[tokio::test]
async fn streaming_fails_fast_on_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.synthesize_stream(&request("hello")).await.err().unwrap();

    assert!(matches!(error, TtsError::Upstream { status: 503, .. }));
}
