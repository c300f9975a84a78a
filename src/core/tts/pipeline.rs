//! Ordered synthesis pipeline.
//!
//! Turns one caller request into a sequence of bounded upstream calls:
//! resolve parameters against configured defaults, validate the overall
//! length, segment the text, then drive the [`SpeechClient`] once per
//! segment strictly in order. Output ordering is preserved by construction:
//! segment calls are never issued concurrently, so no reordering buffer is
//! needed.
//!
//! Usage accounting differs between the two modes and the asymmetry is
//! deliberate. The buffered path records characters only after every
//! segment succeeded; the streaming path records unconditionally when the
//! stream terminates, including after a mid-stream failure or consumer
//! abandonment, because audio bytes may already have left the gateway.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::cost::CostTracker;
use crate::core::text::split_text;
use crate::core::tts::client::{AudioStream, SpeechClient, SynthesisRequest, TtsError, TtsResult};
use crate::core::tts::prosody::normalize_prosody;

/// Buffered chunks between the producer task and the response stream.
const STREAM_CHANNEL_CAPACITY: usize = 8;

/// Synthesis defaults and limits, fixed at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_voice: String,
    pub default_rate: String,
    pub default_pitch: String,
    pub default_style: String,
    pub output_format: String,
    /// Hard ceiling on caller-supplied text, checked before segmentation.
    pub max_text_length: usize,
    /// Per-segment character budget for upstream calls.
    pub segment_length: usize,
}

/// Caller-supplied overrides; `None` means "use the configured default".
#[derive(Debug, Clone, Default)]
pub struct SpeakParams {
    pub voice: Option<String>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub style: Option<String>,
    pub output_format: Option<String>,
}

/// One fully resolved request, ready to fan out into per-segment calls.
struct SynthesisPlan {
    requests: Vec<SynthesisRequest>,
    /// Sum of segment character counts, reported to the cost tracker.
    total_chars: u64,
}

/// Drives segmentation, ordered upstream synthesis, and usage reporting.
pub struct SynthesisPipeline {
    client: Arc<dyn SpeechClient>,
    cost_tracker: Arc<CostTracker>,
    config: PipelineConfig,
}

impl SynthesisPipeline {
    pub fn new(
        client: Arc<dyn SpeechClient>,
        cost_tracker: Arc<CostTracker>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            cost_tracker,
            config,
        }
    }

    /// Synthesizes `text` and returns the complete audio payload.
    ///
    /// Segment results are concatenated byte-for-byte with no added
    /// framing, which the configured output format must tolerate (true for
    /// the MP3 formats this gateway defaults to). Any segment failure
    /// aborts the whole operation; usage is recorded only after full
    /// success.
    pub async fn synthesize(&self, text: &str, params: SpeakParams) -> TtsResult<Bytes> {
        let plan = self.plan(text, params)?;

        let mut buffers: Vec<Bytes> = Vec::with_capacity(plan.requests.len());
        let total = plan.requests.len();
        for (index, request) in plan.requests.iter().enumerate() {
            debug!(
                segment = index + 1,
                total,
                chars = request.text.chars().count(),
                "Synthesizing segment"
            );
            buffers.push(self.client.synthesize(request).await?);
        }

        let audio = if buffers.len() == 1 {
            buffers.pop().unwrap_or_default()
        } else {
            let mut combined = BytesMut::with_capacity(buffers.iter().map(Bytes::len).sum());
            for buffer in &buffers {
                combined.extend_from_slice(buffer);
            }
            combined.freeze()
        };

        record_usage(&self.cost_tracker, plan.total_chars).await;
        Ok(audio)
    }

    /// Synthesizes `text` as an ordered stream of audio chunks.
    ///
    /// Segments are streamed strictly in sequence: all of segment N's
    /// chunks are emitted before segment N+1 opens. The producer reports
    /// usage for the full character total on every exit path — exhaustion,
    /// failure, or the consumer dropping the stream early — and dropping
    /// the stream tears down any open upstream connection.
    pub async fn synthesize_stream(
        &self,
        text: &str,
        params: SpeakParams,
    ) -> TtsResult<AudioStream> {
        let plan = self.plan(text, params)?;
        let (tx, rx) = mpsc::channel::<TtsResult<Bytes>>(STREAM_CHANNEL_CAPACITY);

        let client = Arc::clone(&self.client);
        let cost_tracker = Arc::clone(&self.cost_tracker);
        let total_chars = plan.total_chars;

        tokio::spawn(async move {
            if let Err(error) = pump_segments(client, plan.requests, &tx).await {
                let _ = tx.send(Err(error)).await;
            }
            // Runs on every exit path, including consumer abandonment.
            record_usage(&cost_tracker, total_chars).await;
        });

        let chunks = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        Ok(chunks.boxed())
    }

    /// Resolves parameters, validates the text length, and segments the
    /// text into per-segment requests.
    fn plan(&self, text: &str, params: SpeakParams) -> TtsResult<SynthesisPlan> {
        let voice = params
            .voice
            .unwrap_or_else(|| self.config.default_voice.clone());
        let style = params
            .style
            .unwrap_or_else(|| self.config.default_style.clone());
        let output_format = params
            .output_format
            .unwrap_or_else(|| self.config.output_format.clone());
        let rate = self.resolve_prosody("rate", params.rate.as_deref(), &self.config.default_rate);
        let pitch =
            self.resolve_prosody("pitch", params.pitch.as_deref(), &self.config.default_pitch);

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(TtsError::TextTooLong {
                length,
                limit: self.config.max_text_length,
            });
        }

        let segments = split_text(text, self.config.segment_length);
        info!(segments = segments.len(), chars = length, "Split text for synthesis");

        let total_chars = segments
            .iter()
            .map(|s| s.chars().count() as u64)
            .sum();
        let requests = segments
            .into_iter()
            .map(|segment| SynthesisRequest {
                text: segment,
                voice: voice.clone(),
                rate: rate.clone(),
                pitch: pitch.clone(),
                style: style.clone(),
                output_format: output_format.clone(),
            })
            .collect();

        Ok(SynthesisPlan {
            requests,
            total_chars,
        })
    }

    fn resolve_prosody(&self, field: &str, value: Option<&str>, default: &str) -> String {
        let (resolved, fell_back) = normalize_prosody(value, default);
        if fell_back {
            warn!(
                field,
                value = value.unwrap_or_default(),
                default,
                "Invalid prosody value; using default"
            );
        }
        resolved
    }
}

/// Streams every segment's chunks into `tx`, strictly in segment order.
///
/// A closed receiver means the consumer went away; that is a normal exit,
/// not an error.
async fn pump_segments(
    client: Arc<dyn SpeechClient>,
    requests: Vec<SynthesisRequest>,
    tx: &mpsc::Sender<TtsResult<Bytes>>,
) -> TtsResult<()> {
    let total = requests.len();
    for (index, request) in requests.iter().enumerate() {
        debug!(
            segment = index + 1,
            total,
            chars = request.text.chars().count(),
            "Streaming segment"
        );
        let mut chunks = client.synthesize_stream(request).await?;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            if tx.send(Ok(chunk)).await.is_err() {
                return Ok(());
            }
        }
    }
    Ok(())
}

/// Billing must never fail or delay a synthesis response: storage errors
/// are logged and swallowed.
async fn record_usage(cost_tracker: &CostTracker, total_chars: u64) {
    if let Err(error) = cost_tracker.record(total_chars).await {
        warn!(error = %error, "Failed to record usage");
    }
}
