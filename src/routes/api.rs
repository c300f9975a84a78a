use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, speak};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/health", get(api::health_check))
        .route("/api/v1/config", get(api::config_info))
        .route("/api/v1/tts", get(speak::tts_get).post(speak::tts_post))
        .layer(TraceLayer::new_for_http())
}
