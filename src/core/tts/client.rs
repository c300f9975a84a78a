//! Speech synthesis capability boundary.
//!
//! The pipeline drives an upstream synthesis engine through the
//! [`SpeechClient`] trait: one call per segment, either buffered (the whole
//! audio payload at once) or streaming (a lazy sequence of byte chunks).
//! The Azure implementation lives in [`crate::core::tts::azure`]; tests
//! substitute their own implementations.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Lazy, single-pass sequence of audio byte chunks from one upstream call.
pub type AudioStream = BoxStream<'static, Result<Bytes, TtsError>>;

/// Synthesis error taxonomy.
///
/// `TextTooLong` is the caller's fault and surfaces as a 4xx; the remaining
/// variants describe upstream failures and surface as 5xx. There is no
/// partial-success variant: buffered synthesis is all-or-nothing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TtsError {
    #[error("text length {length} exceeds limit of {limit} characters")]
    TextTooLong { length: usize, limit: usize },

    /// The engine rejected or failed a call; carries the upstream HTTP
    /// status when known.
    #[error("upstream TTS error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Result type for synthesis operations.
pub type TtsResult<T> = Result<T, TtsError>;

/// A fully resolved synthesis request for one segment.
///
/// All parameters have been resolved against configured defaults and rate
/// and pitch are already in canonical signed-percent form; nothing here is
/// optional by the time a network call is made.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Segment text (bounded by the configured segment length).
    pub text: String,
    /// Voice name, e.g. `zh-CN-XiaoxiaoNeural`.
    pub voice: String,
    /// Canonical rate, e.g. `+0%`.
    pub rate: String,
    /// Canonical pitch, e.g. `-5%`.
    pub pitch: String,
    /// Expression style tag, e.g. `general`.
    pub style: String,
    /// Upstream output format identifier,
    /// e.g. `audio-24khz-160kbitrate-mono-mp3`.
    pub output_format: String,
}

/// Capability interface to the remote synthesis engine.
///
/// Implementations own transport concerns (connection reuse, TLS,
/// connection-level timeouts). The pipeline treats every call as either
/// "succeeded with a result" or "failed with a [`TtsError`]"; there is no
/// retry at this layer.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Synthesizes one segment and returns the complete audio payload.
    async fn synthesize(&self, request: &SynthesisRequest) -> TtsResult<Bytes>;

    /// Synthesizes one segment, returning audio chunks as they arrive.
    ///
    /// The returned stream yields only non-empty chunks, in upstream order,
    /// and is not restartable. Dropping it releases the underlying
    /// connection.
    async fn synthesize_stream(&self, request: &SynthesisRequest) -> TtsResult<AudioStream>;
}
