use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::core::tts::TtsError;

/// Application error type
///
/// Maps the synthesis error taxonomy onto HTTP: validation failures are the
/// caller's fault (400), upstream rejections keep the upstream status when
/// it is a valid HTTP code (else 502), and upstream timeouts surface as
/// 504.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Upstream engine failure with the upstream status when known.
    UpstreamError { status: u16, message: String },
    UpstreamTimeout(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::UpstreamError { status, message } => {
                tracing::error!("Upstream TTS error {}: {}", status, message);
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                // Do not forward upstream 2xx/3xx as a gateway failure status.
                let status = if status.is_client_error() || status.is_server_error() {
                    status
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, message)
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::error!("Upstream TTS timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<TtsError> for AppError {
    fn from(error: TtsError) -> Self {
        match error {
            TtsError::TextTooLong { .. } => AppError::BadRequest(error.to_string()),
            TtsError::Upstream { status, message } => {
                AppError::UpstreamError { status, message }
            }
            TtsError::Timeout(msg) => AppError::UpstreamTimeout(msg),
            TtsError::Network(msg) => AppError::UpstreamError {
                status: 502,
                message: msg,
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::UpstreamError { status, message } => {
                write!(f, "Upstream error {status}: {message}")
            }
            AppError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {msg}"),
            AppError::InternalServerError(msg) => write!(f, "Internal server error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
