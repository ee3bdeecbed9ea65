use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, stt, tts};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// CORS, rate limiting and security headers are applied in main.rs.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/health", get(api::health_check))
        .route("/tts", post(tts::tts_handler))
        .route("/stt", post(stt::stt_handler))
        .layer(TraceLayer::new_for_http())
}

/// Router with state attached, ready to serve.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_api_router().with_state(state)
}
