//! NVMe namespace discovery for `--device-all`.
//!
//! Finds the first namespace of every controller (`nvme<N>n1`) under the
//! device directory, the same set a `/dev/nvme*n1` glob would return.

use std::fs;
use std::path::Path;

use tracing::debug;

/// Errors raised while discovering devices.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to read {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No NVMe devices found under {0}/nvme*n1")]
    NoDevices(String),
}

/// Returns sorted device names such as `nvme0n1`, `nvme1n1`.
pub fn discover_devices(device_dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    let dir_name = device_dir.display().to_string();
    let entries = fs::read_dir(device_dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir_name.clone(),
        source,
    })?;

    let mut devices: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| is_first_namespace(name))
        .collect();
    devices.sort();

    if devices.is_empty() {
        return Err(DiscoveryError::NoDevices(dir_name));
    }

    debug!("Discovered {} NVMe devices under {}", devices.len(), dir_name);
    Ok(devices)
}

/// Shell glob `nvme*n1`.
fn is_first_namespace(name: &str) -> bool {
    name.len() >= "nvmen1".len() && name.starts_with("nvme") && name.ends_with("n1")
}
