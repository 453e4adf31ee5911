//! Report sources
//!
//! This crate provides the [`avmet_core::ReportSource`] implementations:
//! the aviationweather.gov HTTP client used in production and a canned
//! source for development runs without network access.

pub mod awc;
pub mod canned;

pub use awc::*;
pub use canned::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("report source returned status {status} for station {station}")]
    Status { station: String, status: u16 },

    #[error("report source returned no data for station {0}")]
    EmptyReport(String),
}

pub type IngestResult<T> = Result<T, IngestError>;
