//! Configuration management for nvme-smart-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use anyhow::Context;
use clap::ValueEnum;
use nvme_smart_exporter::collector::{DEFAULT_DEVICE_DIR, DEFAULT_NVME_BINARY};
use nvme_smart_exporter::discovery::discover_devices;
use nvme_smart_exporter::{ExporterSettings, SmartCommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9900;

/// Configuration problems detected before serving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("You must specify devices or use --device-all")]
    NoDevices,

    #[error("Device name must not be empty: {0:?}")]
    InvalidDevice(String),

    #[error("nvme_binary must not be empty")]
    EmptyBinary,

    #[error("command_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Invalid log_level '{0}', expected off/error/warn/info/debug/trace")]
    InvalidLogLevel(String),
}

/// Exporter configuration as read from file and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Devices
    pub devices: Option<Vec<String>>,
    #[serde(alias = "device-all")]
    pub device_all: Option<bool>,
    #[serde(alias = "device-dir")]
    pub device_dir: Option<PathBuf>,

    // nvme-cli invocation
    #[serde(alias = "nvme-binary")]
    pub nvme_binary: Option<String>,
    pub sudo: Option<bool>,
    #[serde(alias = "command-timeout-secs")]
    pub command_timeout_secs: Option<u64>,

    // Logging
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            devices: None,
            device_all: Some(false),
            device_dir: Some(PathBuf::from(DEFAULT_DEVICE_DIR)),
            nvme_binary: Some(DEFAULT_NVME_BINARY.to_string()),
            sudo: Some(false),
            command_timeout_secs: None,
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    /// Effective log level; unknown names fall back to `info`.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|name| LogLevel::from_str(name, true).ok())
            .unwrap_or(LogLevel::Info)
    }

    fn device_dir(&self) -> PathBuf {
        self.device_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE_DIR))
    }

    /// Builds the nvme-cli invocation settings.
    pub fn smart_command(&self) -> SmartCommand {
        SmartCommand {
            nvme_binary: self
                .nvme_binary
                .clone()
                .unwrap_or_else(|| DEFAULT_NVME_BINARY.to_string()),
            device_dir: self.device_dir(),
            sudo: self.sudo.unwrap_or(false),
            timeout: self.command_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Resolves the device list: discovery wins over an explicit list.
    pub fn resolve_devices(&self) -> anyhow::Result<Vec<String>> {
        if self.device_all.unwrap_or(false) {
            let dir = self.device_dir();
            let devices = discover_devices(&dir)
                .with_context(|| format!("Device discovery under {} failed", dir.display()))?;
            info!("Auto-discovered NVMe devices: {:?}", devices);
            return Ok(devices);
        }

        match self.devices.as_ref() {
            Some(devices) if !devices.is_empty() => Ok(devices.clone()),
            _ => Err(ConfigError::NoDevices.into()),
        }
    }

    /// Resolves devices and command into the immutable settings object.
    pub fn exporter_settings(&self) -> anyhow::Result<ExporterSettings> {
        Ok(ExporterSettings {
            devices: self.resolve_devices()?,
            command: self.smart_command(),
        })
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    let device_all = cfg.device_all.unwrap_or(false);
    let devices = cfg.devices.as_deref().unwrap_or_default();

    if !device_all && devices.is_empty() {
        return Err(ConfigError::NoDevices);
    }

    if let Some(bad) = devices.iter().find(|d| d.trim().is_empty()) {
        return Err(ConfigError::InvalidDevice(bad.clone()));
    }

    if cfg.nvme_binary.as_deref().is_some_and(|b| b.trim().is_empty()) {
        return Err(ConfigError::EmptyBinary);
    }

    if cfg.command_timeout_secs == Some(0) {
        return Err(ConfigError::ZeroTimeout);
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(ConfigError::InvalidLogLevel(level.to_string()));
        }
    }

    if let Some(bind) = cfg.bind.as_deref() {
        if bind.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::InvalidBind(bind.to_string()));
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if !args.devices.is_empty() {
        config.devices = Some(args.devices.clone());
    }
    if args.device_all {
        config.device_all = Some(true);
    }
    if let Some(dir) = &args.device_dir {
        config.device_dir = Some(dir.clone());
    }

    if let Some(binary) = &args.nvme_binary {
        config.nvme_binary = Some(binary.clone());
    }
    if args.sudo {
        config.sudo = Some(true);
    }
    if let Some(secs) = args.command_timeout {
        config.command_timeout_secs = Some(secs);
    }

    if let Some(level) = args
        .log_level
        .as_ref()
        .and_then(|l| l.to_possible_value())
    {
        config.log_level = Some(level.get_name().to_string());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/nvme-smart-exporter/config.yaml",
            "/etc/nvme-smart-exporter/config.yml",
            "/etc/nvme-smart-exporter/config.json",
            "./nvme-smart-exporter.yaml",
            "./nvme-smart-exporter.yml",
            "./nvme-smart-exporter.json",
        ];

        match defaults.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&content, &path)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config text, choosing the format from the file extension.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        // Default to YAML
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
