pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::credentials::handlers as key_handlers;
use crate::interview::handlers as interview_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/status", get(key_handlers::status_handler))
        .route(
            "/api/key",
            post(key_handlers::set_key_handler).delete(key_handlers::clear_key_handler),
        )
        .route("/api/interview", post(interview_handlers::handle_interview))
        .with_state(state)
}
