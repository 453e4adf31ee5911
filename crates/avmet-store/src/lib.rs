//! Report sinks
//!
//! The InfluxDB 2.x store is the production persistence path; the
//! filesystem sink keeps decoded reports on disk for runs without a
//! configured InfluxDB.

pub mod influx;

pub use influx::InfluxStore;

use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use avmet_core::{Report, ReportSink};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid influx configuration")]
    InvalidConfig,

    #[error("influx request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("influx write failed: {status} {body}")]
    WriteRejected { status: u16, body: String },

    #[error("influx query failed: {status} {body}")]
    QueryRejected { status: u16, body: String },
}

/// Appends each report as one JSON line to `reports.jsonl`.
pub struct FsSink {
    file: PathBuf,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir)?;
        let file = dir.join("reports.jsonl");
        Ok(Self { file })
    }
}

#[async_trait::async_trait]
impl ReportSink for FsSink {
    async fn emit(&mut self, report: &Report) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)?;
        let line = serde_json::to_string(report)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(dir.path()).unwrap();

        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let report = avmet_core::decode_with_date(
            "LOWW 191820Z 15010KT CAVOK 06/M05 Q1029",
            reference,
        )
        .unwrap();
        sink.emit(&report).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("reports.jsonl")).unwrap();
        assert!(content.contains("\"station\":\"LOWW\""));
        assert!(content.ends_with('\n'));
    }
}
