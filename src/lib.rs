//! NVMe SMART Prometheus Exporter Library
//!
//! This library turns the text printed by `nvme smart-log` into Prometheus
//! metrics. It is split so the extraction engine can be used and tested
//! without running nvme-cli or an HTTP server.
//!
//! # Pipeline
//!
//! - **Rule catalog** ([`rules`]): declarative label/capture rules compiled once
//! - **Extraction** ([`extract`]): case-insensitive matching against raw text
//! - **Normalization** ([`normalize`]): Fahrenheit/Kelvin to whole Celsius
//! - **Derived metrics** ([`derived`]): terabytes written from data units
//! - **Exposition** ([`exposition`]): Prometheus text lines per device
//!
//! # Usage
//!
//! ```rust
//! use nvme_smart_exporter::{build_snapshot, render_device, RuleCatalog};
//!
//! let catalog = RuleCatalog::smart_log().unwrap();
//! let snapshot = build_snapshot("temperature : 95 F\npower_cycles : 12", &catalog);
//!
//! let doc = render_device(&snapshot, "nvme0n1");
//! assert!(doc.contains("nvme_temperature{device=\"nvme0n1\"} 35"));
//! ```

pub mod collector;
pub mod derived;
pub mod discovery;
pub mod exposition;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod snapshot;
pub mod state;

// Re-export main types for convenience
pub use collector::{CollectError, Collection, SmartCommand};
pub use exposition::render_device;
pub use handlers::build_router;
pub use pipeline::build_snapshot;
pub use rules::{ExtractionRule, RuleCatalog, SMART_LOG_RULES};
pub use snapshot::{MetricValue, Snapshot};
pub use state::{AppState, ExporterSettings, SharedState};
