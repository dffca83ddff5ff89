pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;

use state::SharedState;

/// Full relay application: routes, shared state and the CORS layer the
/// widget needs when it is served from another origin.
pub fn build_app(state: SharedState) -> Router {
    routes::create_router()
        .with_state(state)
        .layer(CorsLayer::very_permissive())
}
