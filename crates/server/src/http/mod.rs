use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, routes};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::tasks::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
