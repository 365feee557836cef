//! HTTP endpoint handlers for the exporter.
//!
//! - `/metrics`: Prometheus metrics endpoint
//! - anything else: 404

pub mod metrics;
pub mod not_found;

use axum::{routing::get, Router};

use crate::state::SharedState;

// Re-export handlers
pub use metrics::metrics_handler;
pub use not_found::not_found_handler;

/// Path served by [`metrics_handler`].
pub const METRICS_PATH: &str = "/metrics";

/// Builds the exporter router with its shared state.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics_handler))
        .fallback(not_found_handler)
        .with_state(state)
}
