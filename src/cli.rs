//! CLI arguments and subcommands for nvme-smart-exporter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for the `test` subcommand
#[derive(Debug, Clone, ValueEnum)]
pub enum TestFormat {
    /// Same text the /metrics endpoint serves
    Exposition,
    /// Aligned name/value table per device
    Table,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "nvme-smart-exporter",
    about = "Prometheus exporter for NVMe SMART data read through nvme-cli",
    long_about = "Prometheus exporter for NVMe SMART data read through nvme-cli.\n\n\
                  Runs `nvme smart-log` for every configured device on each scrape and \
                  serves temperatures, spare capacity, wear and error counters on /metrics.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// NVMe device(s), e.g. nvme0n1 nvme1n1
    pub devices: Vec<String>,

    /// Monitor all NVMe devices (nvme*n1) automatically
    #[arg(long)]
    pub device_all: bool,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Use sudo for nvme-cli
    #[arg(long)]
    pub sudo: bool,

    /// Path or name of the nvme-cli executable
    #[arg(long)]
    pub nvme_binary: Option<String>,

    /// Directory holding NVMe device nodes
    #[arg(long)]
    pub device_dir: Option<PathBuf>,

    /// Kill nvme-cli after N seconds (default: no timeout)
    #[arg(long)]
    pub command_timeout: Option<u64>,

    /// Log level [default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read every configured device once, print the result and exit
    Test {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: TestFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_devices_and_flags() {
        let args = Args::try_parse_from([
            "nvme-smart-exporter",
            "nvme0n1",
            "nvme1n1",
            "--port",
            "9901",
            "--sudo",
        ])
        .unwrap();

        assert_eq!(args.devices, ["nvme0n1", "nvme1n1"]);
        assert_eq!(args.port, Some(9901));
        assert!(args.sudo);
        assert!(!args.device_all);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_test_subcommand() {
        let args =
            Args::try_parse_from(["nvme-smart-exporter", "--device-all", "test", "--format", "exposition"])
                .unwrap();
        assert!(args.device_all);
        assert!(matches!(
            args.command,
            Some(Commands::Test {
                format: TestFormat::Exposition
            })
        ));
    }
}
