//! Despacho Worker - dispatch and routing backend for field operations
//!
//! This worker connects to NATS and handles dispatch computation and
//! simulation messages from the dashboard frontend.

mod cli;
mod config;
mod handlers;
mod services;
mod types;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::services::routing::RoutingGateway;
use crate::types::Coordinates;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,despacho_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    info!("Starting Despacho Worker...");

    // Load configuration
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    let args = cli::Cli::parse();
    if let Some(cli::Command::Probe) = args.command {
        return probe_backends(&config).await;
    }

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    // Start message handlers
    let handler_result = handlers::start_handlers(nats_client, &config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Call each configured routing backend once with a known city pair and
/// report reachability.
async fn probe_backends(config: &config::Config) -> Result<()> {
    let gateway = RoutingGateway::from_config(config);
    if gateway.provider_names().is_empty() {
        info!("No routing backends configured (live routing disabled?)");
        return Ok(());
    }

    // Plaza Mayor to Callao - short enough for every backend
    let start = Coordinates::new(-12.0464, -77.0428);
    let end = Coordinates::new(-12.0566, -77.1181);

    for (name, outcome) in gateway.probe(&start, &end).await {
        match outcome {
            Ok(route) => info!(
                "{}: ok ({:.2} km, {:.1} min, {} points)",
                name,
                route.distance_km,
                route.duration_minutes,
                route.path.len()
            ),
            Err(e) => error!("{}: failed - {}", name, e),
        }
    }

    Ok(())
}
