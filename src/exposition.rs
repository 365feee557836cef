//! Prometheus text exposition for device snapshots.

use std::fmt::Write as FmtWrite;

use crate::snapshot::Snapshot;

/// Prefix of every exported metric name.
pub const METRIC_PREFIX: &str = "nvme_";

/// Header written at the top of each device document.
pub const DOCUMENT_HEADER: &str = "# HELP nvme_metrics NVMe SMART data\n# TYPE nvme_metrics gauge\n";

/// Renders one device document: header plus one line per metric.
pub fn render_device(snapshot: &Snapshot, device: &str) -> String {
    let mut out = String::with_capacity(DOCUMENT_HEADER.len() + snapshot.len() * 64);
    write_device(&mut out, snapshot, device);
    out
}

/// Appends one device document to `out`.
pub fn write_device(out: &mut String, snapshot: &Snapshot, device: &str) {
    let device = escape_label_value(device);
    out.push_str(DOCUMENT_HEADER);
    for (name, value) in snapshot.iter() {
        writeln!(out, "{METRIC_PREFIX}{name}{{device=\"{device}\"}} {value}").ok();
    }
}

/// Escapes `\`, `"` and newlines in a label value.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str(r"\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_device_lines() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("temperature", 35_i128);
        snapshot.insert("power_cycles", 12_i128);

        let doc = render_device(&snapshot, "nvme0n1");
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(
            lines,
            [
                "# HELP nvme_metrics NVMe SMART data",
                "# TYPE nvme_metrics gauge",
                "nvme_temperature{device=\"nvme0n1\"} 35",
                "nvme_power_cycles{device=\"nvme0n1\"} 12",
            ]
        );
        assert!(doc.ends_with('\n'));
    }

    #[test]
    fn test_decimal_rendering() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("tbw_terabytes", 0.512_f64);
        let doc = render_device(&snapshot, "nvme1n1");
        assert!(doc.contains("nvme_tbw_terabytes{device=\"nvme1n1\"} 0.512\n"));
    }

    #[test]
    fn test_label_value_escaped() {
        assert_eq!(escape_label_value(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_label_value("nvme0n1"), "nvme0n1");
    }
}
