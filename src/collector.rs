//! Per-device SMART log collection through nvme-cli.
//!
//! Each device is read by running `[sudo] nvme smart-log <device_dir>/<device>`.
//! A device that cannot be read yields [`Collection::Unavailable`]; it never
//! affects the other devices of the same scrape.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::pipeline::build_snapshot;
use crate::rules::RuleCatalog;
use crate::snapshot::Snapshot;

/// Default nvme-cli executable.
pub const DEFAULT_NVME_BINARY: &str = "nvme";

/// Default directory holding NVMe device nodes.
pub const DEFAULT_DEVICE_DIR: &str = "/dev";

/// Why a device produced no data.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with {0}")]
    Exit(ExitStatus),

    #[error("Command timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Command output is not valid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

/// Result of reading one device: data, or the reason there is none.
#[derive(Debug)]
pub enum Collection {
    Collected(Snapshot),
    Unavailable(CollectError),
}

impl Collection {
    /// The snapshot, or an empty one for an unavailable device.
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            Collection::Collected(snapshot) => snapshot,
            Collection::Unavailable(_) => Snapshot::new(),
        }
    }
}

/// How to invoke the diagnostic command.
#[derive(Debug, Clone)]
pub struct SmartCommand {
    pub nvme_binary: String,
    pub device_dir: PathBuf,
    pub sudo: bool,
    /// No timeout when unset.
    pub timeout: Option<Duration>,
}

impl Default for SmartCommand {
    fn default() -> Self {
        Self {
            nvme_binary: DEFAULT_NVME_BINARY.to_string(),
            device_dir: PathBuf::from(DEFAULT_DEVICE_DIR),
            sudo: false,
            timeout: None,
        }
    }
}

impl SmartCommand {
    /// Program and arguments for one device.
    pub fn argv(&self, device: &str) -> Vec<String> {
        let device_path = self.device_dir.join(device);
        let mut argv = Vec::with_capacity(4);
        if self.sudo {
            argv.push("sudo".to_string());
        }
        argv.push(self.nvme_binary.clone());
        argv.push("smart-log".to_string());
        argv.push(device_path.to_string_lossy().into_owned());
        argv
    }

    /// Runs the command for `device` and returns its stdout.
    pub async fn read_smart_log(&self, device: &str) -> Result<String, CollectError> {
        let argv = self.argv(device);
        let (program, args) = argv.split_first().ok_or_else(|| CollectError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output)
                .await
                .map_err(|_| CollectError::TimedOut(limit))?,
            None => output.await,
        }
        .map_err(|source| CollectError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CollectError::Exit(output.status));
        }

        Ok(String::from_utf8(output.stdout)?)
    }

    /// Reads `device` and runs the extraction pipeline on its output.
    #[instrument(skip(self, catalog))]
    pub async fn collect(&self, device: &str, catalog: &RuleCatalog) -> Collection {
        match self.read_smart_log(device).await {
            Ok(text) => {
                let snapshot = build_snapshot(&text, catalog);
                debug!("Collected {} metrics", snapshot.len());
                Collection::Collected(snapshot)
            }
            Err(e) => {
                debug!("No SMART data: {}", e);
                Collection::Unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_plain() {
        let command = SmartCommand::default();
        assert_eq!(command.argv("nvme0n1"), ["nvme", "smart-log", "/dev/nvme0n1"]);
    }

    #[test]
    fn test_argv_with_sudo() {
        let command = SmartCommand {
            sudo: true,
            nvme_binary: "/usr/sbin/nvme".to_string(),
            ..SmartCommand::default()
        };
        assert_eq!(
            command.argv("nvme1n1"),
            ["sudo", "/usr/sbin/nvme", "smart-log", "/dev/nvme1n1"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let command = SmartCommand {
            nvme_binary: "/nonexistent/nvme-smart-exporter-test-binary".to_string(),
            ..SmartCommand::default()
        };
        let catalog = RuleCatalog::smart_log().unwrap();

        let collection = command.collect("nvme0n1", &catalog).await;
        assert!(matches!(
            collection,
            Collection::Unavailable(CollectError::Spawn { .. })
        ));
        assert!(collection.into_snapshot().is_empty());
    }
}
