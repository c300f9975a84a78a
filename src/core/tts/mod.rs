//! Text-to-speech core: capability boundary, prosody canonicalization,
//! the ordered synthesis pipeline, and the Azure backend.

pub mod azure;
pub mod client;
pub mod pipeline;
pub mod prosody;

pub use azure::{AzureSpeechClient, AzureTtsConfig, content_type_for_format};
pub use client::{AudioStream, SpeechClient, SynthesisRequest, TtsError, TtsResult};
pub use pipeline::{PipelineConfig, SpeakParams, SynthesisPipeline};
pub use prosody::normalize_prosody;
