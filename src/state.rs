//! Application state shared by the HTTP handlers.
//!
//! Everything here is built once at startup and only read afterwards, so
//! concurrent scrapes share it without locking.

use std::sync::Arc;

use crate::collector::SmartCommand;
use crate::rules::RuleCatalog;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Immutable exporter settings resolved from CLI and config file.
#[derive(Debug, Clone)]
pub struct ExporterSettings {
    /// Devices scraped on every request, in export order.
    pub devices: Vec<String>,
    pub command: SmartCommand,
}

/// State handed to every request handler.
pub struct AppState {
    pub settings: ExporterSettings,
    pub catalog: RuleCatalog,
}

impl AppState {
    pub fn new(settings: ExporterSettings, catalog: RuleCatalog) -> SharedState {
        Arc::new(Self { settings, catalog })
    }
}
