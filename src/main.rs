//! InfluxDB exporter for Zenoh telemetry.

use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use zenoh_exporter_influxdb::{
    DeviceLabelTable, ExporterConfig, InfluxWriter, Pipeline, TelemetrySubscriber,
    config::LogFormat,
};

/// InfluxDB exporter for Zenoh telemetry.
#[derive(Parser, Debug)]
#[command(name = "zenoh-exporter-influxdb")]
#[command(about = "Export Zenoh pub/sub telemetry to an InfluxDB write endpoint")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// InfluxDB write URL (overrides config).
    #[arg(long)]
    write_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    // Override write URL from CLI
    if let Some(write_url) = args.write_url {
        config.influxdb.write_url = write_url;
    }
    config.validate()?;

    // Initialize logging
    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("zenoh_exporter_influxdb={}", log_level).parse()?)
        .add_directive(format!("zenoh={}", Level::WARN).parse()?);

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    info!("Starting Zenoh InfluxDB exporter");

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Build the per-message pipeline
    let labels = DeviceLabelTable::with_entries(&config.devices.labels);
    info!(device_labels = labels.len(), "Device label table loaded");

    let writer = InfluxWriter::new(&config.influxdb)?;
    info!(write_url = %writer.write_url(), "InfluxDB write endpoint configured");

    let pipeline = Pipeline::new(labels, writer);
    let subscriber = TelemetrySubscriber::new(pipeline, config.zenoh.clone());

    // Start subscriber
    let subscriber_shutdown = shutdown_rx.clone();
    let subscriber_task = tokio::spawn(async move {
        if let Err(e) = subscriber.run(subscriber_shutdown).await {
            error!("Subscriber error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = tokio::signal::unix::signal(
                    tokio::signal::unix::SignalKind::terminate()
                ).unwrap();
                sigterm.recv().await;
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    // Signal shutdown
    shutdown_tx.send(true)?;

    // Wait for the subscriber to drain; an in-flight write may be abandoned.
    let _ = tokio::time::timeout(Duration::from_secs(5), subscriber_task).await;

    info!("Exporter stopped");
    Ok(())
}
