use axum::{routing::post, Router};

use crate::features::events::handlers;

/// Create routes for the event status feature
///
/// Note: stateless, classification is computed from the request alone
pub fn routes() -> Router {
    Router::new()
        .route("/api/events/status", post(handlers::classify_event))
        .route(
            "/api/events/status/batch",
            post(handlers::classify_events_batch),
        )
}
