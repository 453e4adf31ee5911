//! AVMET Daemon - scheduled METAR decode cycles plus the REST facade
//!
//! This binary coordinates:
//! - Raw report retrieval (aviationweather.gov or the canned source)
//! - Decoding into typed reports
//! - Publication to the API state and the configured sinks

mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use avmet_config::AppConfig;
use avmet_core::{ReportSink, ReportSource};
use avmet_ingest::{AwcSource, CannedSource};
use avmet_store::{FsSink, InfluxStore};

use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AVMET daemon");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let airports = config.airports();

    let source: Box<dyn ReportSource> = match config.fetch_source().as_str() {
        "canned" => Box::new(CannedSource::new()),
        _ => Box::new(AwcSource::new(config.fetch_base_url())),
    };
    info!(source = source.name(), "report source selected");

    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    match &config.influx {
        Some(influx) => match InfluxStore::new(
            influx.url.clone(),
            influx.org.clone(),
            influx.bucket.clone(),
            influx.token.clone(),
        ) {
            Ok(store) => {
                info!(url = %influx.url, "InfluxDB store enabled");
                sinks.push(Box::new(store));
            }
            Err(e) => warn!(error = %e, "InfluxDB store disabled"),
        },
        None => warn!("no [influx] configuration, reports are not persisted"),
    }
    if let Some(dir) = config.fs_dir() {
        match FsSink::new(&dir) {
            Ok(sink) => sinks.push(Box::new(sink)),
            Err(e) => warn!(error = %e, "fs sink disabled"),
        }
    }

    let (app, state) = avmet_api::build_app(airports.clone());

    let period = Duration::from_secs(config.fetch_interval_secs());
    let mut scheduler = Scheduler::new(source, sinks, Arc::clone(&state), airports, period);

    let addr: SocketAddr = config
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind HTTP listener")?;

    avmet_api::set_ready(&state, true);
    info!(%addr, "HTTP server listening");

    tokio::select! {
        result = scheduler.run() => {
            if let Err(e) = result {
                error!("Scheduler error: {}", e);
                return Err(e);
            }
        }
        result = axum::serve(listener, app) => {
            result.context("server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("AVMET daemon stopped");
    Ok(())
}
