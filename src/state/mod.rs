use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::cost::CostTracker;
use crate::core::tts::{AzureSpeechClient, AzureTtsConfig, PipelineConfig, SynthesisPipeline};
use crate::errors::AppError;

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Shared synthesis pipeline wired to the Azure client and cost tracker
    pub pipeline: SynthesisPipeline,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Arc<Self>, AppError> {
        let client = AzureSpeechClient::new(AzureTtsConfig {
            subscription_key: config.azure_key.clone(),
            region: config.azure_region.clone(),
            endpoint: config.azure_endpoint.clone(),
        })
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let cost_tracker = CostTracker::new(
            config.cost_output_dir.clone(),
            config.price_per_million_chars,
        );

        let pipeline = SynthesisPipeline::new(
            Arc::new(client),
            Arc::new(cost_tracker),
            PipelineConfig {
                default_voice: config.default_voice.clone(),
                default_rate: config.default_rate.clone(),
                default_pitch: config.default_pitch.clone(),
                default_style: config.default_style.clone(),
                output_format: config.output_format.clone(),
                max_text_length: config.max_text_length,
                segment_length: config.segment_length,
            },
        );

        Ok(Arc::new(Self { config, pipeline }))
    }
}
