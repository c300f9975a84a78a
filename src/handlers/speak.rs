//! Handlers for the `/api/v1/tts` endpoint.
//!
//! GET takes query parameters, POST takes a JSON body; both accept the
//! single-letter aliases (`t`, `v`, `r`, `p`, `s`, `f`) alongside the full
//! names, with the full name winning when both are present. The `stream`
//! flag selects streaming delivery per request; when absent, the configured
//! default applies.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::config::utils::parse_bool;
use crate::core::tts::{SpeakParams, content_type_for_format};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /api/v1/tts`.
#[derive(Debug, Default, Deserialize)]
pub struct TtsQuery {
    pub text: Option<String>,
    pub t: Option<String>,
    pub voice: Option<String>,
    pub v: Option<String>,
    pub rate: Option<String>,
    pub r: Option<String>,
    pub pitch: Option<String>,
    pub p: Option<String>,
    pub style: Option<String>,
    pub s: Option<String>,
    pub format: Option<String>,
    pub f: Option<String>,
    /// Whether to stream audio chunks back to the client.
    /// Accepts the usual boolean spellings (`true`, `1`, `yes`, ...).
    pub stream: Option<String>,
}

/// Request body for `POST /api/v1/tts`.
#[derive(Debug, Default, Deserialize)]
pub struct TtsBody {
    pub text: Option<String>,
    pub t: Option<String>,
    pub voice: Option<String>,
    pub v: Option<String>,
    pub rate: Option<String>,
    pub r: Option<String>,
    pub pitch: Option<String>,
    pub p: Option<String>,
    pub style: Option<String>,
    pub s: Option<String>,
    pub format: Option<String>,
    pub f: Option<String>,
    pub stream: Option<bool>,
}

/// Handler for `GET /api/v1/tts`.
pub async fn tts_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TtsQuery>,
) -> AppResult<Response> {
    let text = query
        .text
        .or(query.t)
        .ok_or_else(|| AppError::BadRequest("text is required".to_string()))?;
    let params = SpeakParams {
        voice: query.voice.or(query.v),
        rate: query.rate.or(query.r),
        pitch: query.pitch.or(query.p),
        style: query.style.or(query.s),
        output_format: query.format.or(query.f),
    };
    let stream = query.stream.as_deref().and_then(parse_bool);
    speak(&state, &text, params, stream).await
}

/// Handler for `POST /api/v1/tts`.
pub async fn tts_post(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TtsBody>,
) -> AppResult<Response> {
    let text = body
        .text
        .or(body.t)
        .ok_or_else(|| AppError::BadRequest("text is required".to_string()))?;
    let params = SpeakParams {
        voice: body.voice.or(body.v),
        rate: body.rate.or(body.r),
        pitch: body.pitch.or(body.p),
        style: body.style.or(body.s),
        output_format: body.format.or(body.f),
    };
    speak(&state, &text, params, body.stream).await
}

/// Runs one synthesis request in the selected delivery mode.
async fn speak(
    state: &AppState,
    text: &str,
    params: SpeakParams,
    stream: Option<bool>,
) -> AppResult<Response> {
    let use_streaming = stream.unwrap_or(state.config.enable_streaming);
    let content_type = content_type_for_format(
        params
            .output_format
            .as_deref()
            .unwrap_or(&state.config.output_format),
    );
    info!(
        chars = text.chars().count(),
        streaming = use_streaming,
        "TTS request received"
    );

    if use_streaming {
        let chunks = state.pipeline.synthesize_stream(text, params).await?;
        let response = Response::builder()
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from_stream(chunks))
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        Ok(response)
    } else {
        let audio = state.pipeline.synthesize(text, params).await?;
        Ok(([(header::CONTENT_TYPE, content_type)], audio).into_response())
    }
}
