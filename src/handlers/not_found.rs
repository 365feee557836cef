//! Fallback handler for unknown paths.

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use tracing::debug;

/// Responds 404 to every path other than `/metrics`.
pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        [("Content-Type", "text/plain; charset=utf-8")],
        "Not Found",
    )
}
