//! Canned METAR source for development and tests

use std::sync::atomic::{AtomicUsize, Ordering};

use avmet_core::ReportSource;

/// Sample reports, station identifier prepended on fetch. Day 25 keeps
/// the timestamps valid in every month.
const SAMPLES: &[&str] = &[
    "251950Z 24004KT 10SM FEW050 28/22 A2992",
    "251950Z VRB03KT 9999 SCT020 BKN100 17/12 Q1018",
    "251950Z 35018G29KT 9999 -RA OVC008 06/M02 Q1007",
];

/// Cycles deterministically through a fixed set of sample reports.
pub struct CannedSource {
    next: AtomicUsize,
}

impl CannedSource {
    pub fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for CannedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReportSource for CannedSource {
    fn name(&self) -> &str {
        "canned"
    }

    async fn fetch(&self, station: &str) -> anyhow::Result<String> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % SAMPLES.len();
        Ok(format!("{} {}", station, SAMPLES[index]))
    }
}
