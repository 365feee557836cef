//! Metrics endpoint handler for Prometheus scraping.
//!
//! Every request runs nvme-cli once per configured device, in configured
//! order, and concatenates the device documents. Nothing is cached between
//! requests. Devices that cannot be read are skipped.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::collector::Collection;
use crate::exposition::write_device;
use crate::state::SharedState;

/// Initial buffer capacity per device document.
const DEVICE_BUFFER_CAP: usize = 4 * 1024;

/// Handler for the /metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let start = Instant::now();
    debug!("Processing /metrics request");

    let devices = &state.settings.devices;
    let mut body = String::with_capacity(devices.len() * DEVICE_BUFFER_CAP);
    let mut exported = 0usize;

    for device in devices {
        match state.settings.command.collect(device, &state.catalog).await {
            Collection::Collected(snapshot) if !snapshot.is_empty() => {
                write_device(&mut body, &snapshot, device);
                exported += 1;
            }
            Collection::Collected(_) => {
                debug!("Device {} returned no recognised SMART fields", device);
            }
            Collection::Unavailable(e) => {
                debug!("Skipping device {}: {}", device, e);
            }
        }
    }

    debug!(
        "Metrics request completed: {}/{} devices, {} bytes, {:.3}ms",
        exported,
        devices.len(),
        body.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    (
        StatusCode::OK,
        [("Content-Type", prometheus::TEXT_FORMAT)],
        body,
    )
}
