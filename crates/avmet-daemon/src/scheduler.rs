//! Periodic fetch/decode/publish scheduler

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use avmet_api::AppState;
use avmet_config::Airport;
use avmet_core::{decode, ReportSink, ReportSource};

/// Scheduler coordinates the fetch/decode/publish cycle for every
/// configured station.
pub struct Scheduler {
    source: Box<dyn ReportSource>,
    sinks: Vec<Box<dyn ReportSink>>,
    state: Arc<AppState>,
    airports: Vec<Airport>,
    period: Duration,
}

impl Scheduler {
    pub fn new(
        source: Box<dyn ReportSource>,
        sinks: Vec<Box<dyn ReportSink>>,
        state: Arc<AppState>,
        airports: Vec<Airport>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            sinks,
            state,
            airports,
            period,
        }
    }

    /// Run decode cycles until the surrounding task is dropped. A failing
    /// station or sink is logged and skipped; one bad cycle never stops
    /// the next one.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            period_secs = self.period.as_secs(),
            source = self.source.name(),
            stations = self.airports.len(),
            "scheduler started"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// One pass over all configured stations.
    async fn run_cycle(&mut self) {
        let stations: Vec<String> = self
            .airports
            .iter()
            .map(|airport| airport.icao.clone())
            .collect();
        for station in stations {
            match self.process_station(&station).await {
                Ok(()) => info!(station = %station, "decoded and published METAR"),
                Err(e) => error!(station = %station, error = %e, "decode cycle failed"),
            }
        }
    }

    async fn process_station(&mut self, station: &str) -> Result<()> {
        let raw = self
            .source
            .fetch(station)
            .await
            .context("failed to fetch report")?;
        let report = decode(&raw).context("failed to decode report")?;

        avmet_api::inject_report(&self.state, report.clone()).await;

        for sink in &mut self.sinks {
            if let Err(e) = sink.emit(&report).await {
                warn!(station, error = %e, "sink emit failed");
            }
        }
        Ok(())
    }
}
