// src/routes/mod.rs
pub mod diagnose;

use crate::{message::ErrorBody, state::SharedState};
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use diagnose::{diagnose_handler, method_not_allowed};
use tower_http::trace::TraceLayer;

pub const RELAY_PATH: &str = "/api/diagnose-ac";

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route(
            RELAY_PATH,
            post(diagnose_handler).fallback(method_not_allowed),
        )
        .route("/health", get(|| async { "OK" }))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}
