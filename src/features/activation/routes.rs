use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::activation::handlers::{self, ScanState};
use crate::features::activation::services::{ActivationService, ScanViewCache};

/// Create routes for the ticket activation feature
///
/// `/activate/{sno}` is the link printed on tickets and encoded in QR codes.
pub fn routes(activation_service: Arc<ActivationService>, scan_cache: Arc<ScanViewCache>) -> Router {
    let state = ScanState {
        activation_service,
        scan_cache,
    };

    Router::new()
        .route("/activate/{sno}", get(handlers::activate_link))
        .route("/api/scans", post(handlers::scan_payload))
        .route("/api/scans/parse", get(handlers::parse_scan_payload))
        .route(
            "/api/scans/recent",
            get(handlers::list_recent).delete(handlers::clear_recent),
        )
        .route(
            "/api/scans/recent/{sno}",
            get(handlers::get_recent).delete(handlers::invalidate_recent),
        )
        .route("/api/tickets/{sno}", get(handlers::get_ticket))
        .with_state(state)
}
