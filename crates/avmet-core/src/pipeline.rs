use anyhow::Result;

use crate::Report;

/// Supplies raw METAR text for a station identifier.
///
/// Sources do not retry; skipping or repeating a failed fetch is the
/// caller's policy.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Fetch the raw report text for a station
    async fn fetch(&self, station: &str) -> Result<String>;
}

/// Accepts decoded reports for storage or forwarding.
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn emit(&mut self, report: &Report) -> Result<()>;
}
