//! Startup requirement validation for nvme-smart-exporter.
//!
//! This module validates that nvme-cli can be found and that the exporter has
//! the privileges `nvme smart-log` needs before serving.

use nix::unistd::geteuid;
use nvme_smart_exporter::SmartCommand;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(command: &SmartCommand) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges(command.sudo);
    let nvme = check_nvme_binary(&command.nvme_binary)?;
    info!("✅ Using nvme-cli at {}", nvme.display());

    if command.sudo {
        check_sudo_binary()?;
    }

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges(sudo: bool) {
    if geteuid().is_root() {
        info!("✅ Running as root (uid=0)");
    } else if sudo {
        info!("Not running as root - nvme-cli will be invoked through sudo");
    } else {
        warn!("⚠️  Not running as root and --sudo not set");
        warn!("   nvme smart-log usually needs root to read the SMART log page");
        warn!("   Recommendation: run as root or pass --sudo");
    }
}

/// Locate the nvme-cli executable on PATH (or at the given path)
fn check_nvme_binary(binary: &str) -> Result<PathBuf, ValidationError> {
    which::which(binary).map_err(|e| {
        error!("❌ nvme-cli not found: {} ({})", binary, e);
        error!("   Solution: install the nvme-cli package or pass --nvme-binary");
        ValidationError::NvmeNotFound(binary.to_string())
    })
}

fn check_sudo_binary() -> Result<(), ValidationError> {
    which::which("sudo").map(|_| ()).map_err(|_| {
        error!("❌ --sudo given but sudo is not installed");
        ValidationError::SudoNotFound
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("nvme-cli executable not found: {0}")]
    NvmeNotFound(String),

    #[error("sudo requested but not found on PATH")]
    SudoNotFound,
}
