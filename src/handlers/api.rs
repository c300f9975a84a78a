use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::state::AppState;

/// Health check handler
/// Returns a simple JSON response indicating the server is running
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// Returns the effective non-secret synthesis defaults.
pub async fn config_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "default_voice": config.default_voice,
        "default_style": config.default_style,
        "default_rate": config.default_rate,
        "default_pitch": config.default_pitch,
        "output_format": config.output_format,
        "max_text_length": config.max_text_length,
        "segment_length": config.segment_length,
        "enable_streaming": config.enable_streaming,
        "region": config.azure_region,
    }))
}
