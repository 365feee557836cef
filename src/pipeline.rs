//! Extractor -> normalizer -> calculator pipeline.

use crate::derived::derive_metrics;
use crate::extract::extract_fields;
use crate::normalize::normalize_temperatures;
use crate::rules::RuleCatalog;
use crate::snapshot::Snapshot;

/// Builds a snapshot from raw `nvme smart-log` output.
///
/// Pure: the same text and catalog always give the same snapshot.
pub fn build_snapshot(text: &str, catalog: &RuleCatalog) -> Snapshot {
    let mut fields = extract_fields(text, catalog);
    normalize_temperatures(&mut fields);

    let mut snapshot = Snapshot::new();
    for field in &fields {
        snapshot.insert(field.name, field.value);
    }

    derive_metrics(&mut snapshot);
    snapshot
}
