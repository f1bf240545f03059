pub mod health;
pub mod quiz;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware::from_fn_with_state,
    routing::{any, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::cors::{cors_gate, CorsGate},
    AppState,
};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Every method reaches the gate, which answers preflight and 405 itself.
fn gated(
    route: MethodRouter<AppState>,
    origins: &Arc<Vec<String>>,
    method: Method,
) -> MethodRouter<AppState> {
    route.layer(from_fn_with_state(
        CorsGate::new(origins.clone(), method),
        cors_gate,
    ))
}

pub fn router(state: AppState) -> Router {
    let origins = state.allowed_origins.clone();

    Router::new()
        .route("/health", gated(any(health::health), &origins, Method::GET))
        .route(
            "/extract-text",
            gated(any(quiz::extract_text), &origins, Method::POST),
        )
        .route("/quiz", gated(any(quiz::generate_quiz), &origins, Method::POST))
        .route("/chat", gated(any(quiz::chat), &origins, Method::POST))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
