//! Metrics computed from other extracted metrics.

use crate::snapshot::{MetricValue, Snapshot};

/// Bytes per NVMe data unit: the counter is in thousands of 512-byte units.
pub const BYTES_PER_DATA_UNIT: f64 = 512_000.0;

pub const DATA_UNITS_WRITTEN: &str = "data_units_written";
pub const TBW_TERABYTES: &str = "tbw_terabytes";

/// Adds `tbw_terabytes` when `data_units_written` is present.
pub fn derive_metrics(snapshot: &mut Snapshot) {
    let units = match snapshot.get(DATA_UNITS_WRITTEN) {
        Some(MetricValue::Integer(v)) => v as f64,
        Some(MetricValue::Decimal(v)) => v,
        None => return,
    };
    snapshot.insert(TBW_TERABYTES, terabytes_written(units));
}

/// `units * 512000 / 1e12`, rounded to three decimals.
pub fn terabytes_written(units: f64) -> f64 {
    let tb = units * BYTES_PER_DATA_UNIT / 1e12;
    (tb * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terabytes_written() {
        assert_eq!(terabytes_written(1_000_000.0), 0.512);
        assert_eq!(terabytes_written(0.0), 0.0);
        // 123456789 * 512000 / 1e12 = 63.209875968
        assert_eq!(terabytes_written(123_456_789.0), 63.21);
    }

    #[test]
    fn test_derived_metric_added_last() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(DATA_UNITS_WRITTEN, 1_000_000_i128);
        derive_metrics(&mut snapshot);

        assert_eq!(snapshot.get(TBW_TERABYTES), Some(MetricValue::Decimal(0.512)));
        assert_eq!(snapshot.iter().last().map(|(n, _)| n), Some(TBW_TERABYTES));
    }

    #[test]
    fn test_no_prerequisite_no_derived_metric() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("data_units_read", 10_i128);
        derive_metrics(&mut snapshot);
        assert!(!snapshot.contains(TBW_TERABYTES));
        assert_eq!(snapshot.len(), 1);
    }
}
