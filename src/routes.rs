use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Banner and health check
        .route("/", get(handlers::root))
        .route("/api/v1/health", get(handlers::health_check))

        // Audio from the device. Ingress enforces its own ceiling.
        .route(
            "/api/v1/stt",
            post(handlers::speech_to_text).layer(DefaultBodyLimit::disable()),
        )
}

/// Full application with middleware, ready to serve
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
