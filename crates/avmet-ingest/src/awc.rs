//! aviationweather.gov METAR source

use crate::{IngestError, IngestResult};
use avmet_core::ReportSource;

pub const DEFAULT_BASE_URL: &str = "https://aviationweather.gov";

/// HTTP source backed by the aviationweather.gov data API.
pub struct AwcSource {
    client: reqwest::Client,
    base_url: String,
}

impl AwcSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the current METAR for a station. The API may return several
    /// lines; only the first non-empty one is the current report.
    async fn fetch_metar(&self, station: &str) -> IngestResult<String> {
        let url = format!("{}/api/data/metar?ids={}", self.base_url, station);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::Status {
                station: station.to_string(),
                status: response.status().as_u16(),
            });
        }
        let body = response.text().await?;
        let report = body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| IngestError::EmptyReport(station.to_string()))?;
        tracing::debug!(station, "fetched METAR");
        Ok(report.to_string())
    }
}

impl Default for AwcSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl ReportSource for AwcSource {
    fn name(&self) -> &str {
        "aviationweather.gov"
    }

    async fn fetch(&self, station: &str) -> anyhow::Result<String> {
        Ok(self.fetch_metar(station).await?)
    }
}
