//! Azure Speech REST client implementing the [`SpeechClient`] capability.
//!
//! One HTTP POST per segment: SSML in, audio bytes out. The buffered path
//! reads the whole response body; the streaming path forwards body chunks as
//! they arrive. Errors are mapped onto the gateway taxonomy: upstream HTTP
//! failures keep their status code, timeouts become a distinguished timeout
//! error, and everything else is a transport failure.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::debug;

use super::config::{
    AZURE_OUTPUT_FORMAT_HEADER, AZURE_SUBSCRIPTION_KEY_HEADER, AZURE_SUBSCRIPTION_REGION_HEADER,
    AzureTtsConfig, USER_AGENT, build_ssml,
};
use crate::core::tts::client::{AudioStream, SpeechClient, SynthesisRequest, TtsError, TtsResult};

/// Request timeout for a single synthesis call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Azure Speech synthesis endpoint.
pub struct AzureSpeechClient {
    http: reqwest::Client,
    config: AzureTtsConfig,
}

impl AzureSpeechClient {
    /// Creates a client with a connection pool and request timeout.
    pub fn new(config: AzureTtsConfig) -> TtsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TtsError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Sends one synthesis request and returns the response once status and
    /// headers are available. The body has not been consumed yet, so both
    /// the buffered and streaming paths start here.
    async fn send_request(&self, request: &SynthesisRequest) -> TtsResult<reqwest::Response> {
        let ssml = build_ssml(
            &request.text,
            &request.voice,
            &request.rate,
            &request.pitch,
            &request.style,
        );
        debug!(
            url = %self.config.tts_url(),
            voice = %request.voice,
            chars = request.text.chars().count(),
            "Sending Azure TTS request"
        );

        let response = self
            .http
            .post(self.config.tts_url())
            .header(AZURE_SUBSCRIPTION_KEY_HEADER, &self.config.subscription_key)
            .header(AZURE_SUBSCRIPTION_REGION_HEADER, &self.config.region)
            .header("Content-Type", "application/ssml+xml")
            .header(AZURE_OUTPUT_FORMAT_HEADER, &request.output_format)
            .header("User-Agent", USER_AGENT)
            .body(ssml)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TtsError::Upstream {
                status: status.as_u16(),
                message: detail,
            });
        }

        Ok(response)
    }
}

/// Maps reqwest transport failures onto the gateway taxonomy.
fn map_transport_error(error: reqwest::Error) -> TtsError {
    if error.is_timeout() {
        TtsError::Timeout(error.to_string())
    } else {
        TtsError::Network(error.to_string())
    }
}

#[async_trait]
impl SpeechClient for AzureSpeechClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> TtsResult<Bytes> {
        let response = self.send_request(request).await?;
        response.bytes().await.map_err(map_transport_error)
    }

    async fn synthesize_stream(&self, request: &SynthesisRequest) -> TtsResult<AudioStream> {
        let response = self.send_request(request).await?;
        let chunks = response
            .bytes_stream()
            .filter_map(|item| async move {
                match item {
                    Ok(chunk) if chunk.is_empty() => None,
                    Ok(chunk) => Some(Ok(chunk)),
                    Err(e) => Some(Err(map_transport_error(e))),
                }
            })
            .boxed();
        Ok(chunks)
    }
}
