//! nvme-smart-exporter - version 0.1.0
//!
//! Prometheus exporter for NVMe SMART data with tracing logging.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod startup_checks;

use anyhow::Context;
use clap::Parser;
use nvme_smart_exporter::{
    build_router, AppState, Collection, ExporterSettings, RuleCatalog, SmartCommand,
};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, warn, Level};

use cli::{Args, Commands, LogLevel};
use commands::command_test;
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR,
    DEFAULT_PORT,
};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) {
    let level = config.log_level();
    let log_level = match level {
        LogLevel::Off => None,
        LogLevel::Error => Some(Level::ERROR),
        LogLevel::Warn => Some(Level::WARN),
        LogLevel::Info => Some(Level::INFO),
        LogLevel::Debug => Some(Level::DEBUG),
        LogLevel::Trace => Some(Level::TRACE),
    };

    let Some(log_level) = log_level else {
        return;
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> anyhow::Result<Config> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Logs one initial snapshot per device so operators see what will be exported.
async fn report_initial_snapshots(settings: &ExporterSettings, catalog: &RuleCatalog) {
    for device in &settings.devices {
        match settings.command.collect(device, catalog).await {
            Collection::Collected(snapshot) if !snapshot.is_empty() => {
                info!("=== Initial SMART Data for {} ===", device_path(&settings.command, device));
                for (name, value) in snapshot.iter() {
                    info!("{:25}: {}", name, value);
                }
            }
            Collection::Collected(_) => {
                warn!("⚠️  No SMART fields recognised for {}", device);
            }
            Collection::Unavailable(e) => {
                warn!("⚠️  Failed to get SMART data for {}: {}", device, e);
            }
        }
    }
}

fn device_path(command: &SmartCommand, device: &str) -> String {
    command.device_dir.join(device).display().to_string()
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config);

    let catalog = RuleCatalog::smart_log().context("Failed to compile SMART rule catalog")?;
    debug!("Rule catalog compiled with {} rules", catalog.len());

    let settings = match config.exporter_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    if let Some(Commands::Test { format }) = &args.command {
        return command_test(&settings, &catalog, format.clone()).await;
    }

    info!("Starting nvme-smart-exporter");

    if let Err(e) = startup_checks::validate_requirements(&settings.command) {
        error!("❌ Startup validation failed: {}", e);
        error!("   The exporter will start but devices will report no data!");
        // Continue anyway - don't fail hard
    }

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);

    let device_paths: Vec<String> = settings
        .devices
        .iter()
        .map(|d| device_path(&settings.command, d))
        .collect();
    info!("Serving NVMe metrics for {:?} on port {}", device_paths, port);

    report_initial_snapshots(&settings, &catalog).await;

    let state = AppState::new(settings, catalog);

    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", bind_ip_str, port))?;

    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "nvme-smart-exporter listening on http://{}:{}/metrics",
        bind_ip_str, port
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("nvme-smart-exporter stopped gracefully");
    Ok(())
}
