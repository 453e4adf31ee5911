//! Core data types for decoded METAR observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::SpeedUnit;

/// A fully decoded METAR observation.
///
/// Constructed exclusively by [`crate::decode`] and never mutated
/// afterwards. Required fields are plain values; groups the wire format
/// treats as optional are `Option`s or vectors that default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// 4-character station identifier (e.g. "LOWW")
    pub station: String,

    /// Observation timestamp; day/hour/minute from the report, year/month
    /// from the reference date supplied to the decoder
    pub observation_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_flag: Option<UpdateFlag>,

    pub wind: Wind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_variation: Option<WindVariation>,

    /// Meters; 10000 is the "10 km or more" ceiling
    pub visibility: u32,

    /// One entry per runway group; a group that matched the runway shape
    /// but not the full pattern is kept as `None`
    #[serde(default)]
    pub runway_visual_range: Vec<Option<RunwayVisualRange>>,

    /// Space-joined description; empty when no phenomena were reported
    #[serde(default)]
    pub present_weather: String,

    #[serde(default)]
    pub clouds: Vec<CloudLayer>,

    pub temperatures: Temperatures,

    /// Hectopascals
    pub qnh: u32,
}

/// Report qualifier following the observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateFlag {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "COR")]
    Corrected,
}

/// Wind direction in whole degrees, or the variable-direction sentinel.
///
/// Serializes as a bare number or the `"VRB"` string; the untagged
/// variant has to stay last for serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDirection {
    #[serde(rename = "VRB")]
    Variable,
    #[serde(untagged)]
    Degrees(u16),
}

/// Surface wind group.
///
/// Speeds are knots after decode regardless of the reported unit. A
/// variable-direction group with an unreadable speed part keeps the
/// direction and leaves the rest unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    pub direction: WindDirection,
    pub speed: Option<u32>,
    pub unit: Option<SpeedUnit>,
    pub gust: Option<u32>,
}

/// Reported direction envelope for variable winds, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindVariation {
    pub min_direction: u16,
    pub max_direction: u16,
}

/// Runway visual range group; ranges are meters after decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayVisualRange {
    /// Runway designator, two digits plus an optional L/C/R suffix
    pub runway: String,
    pub min_range: u32,
    pub max_range: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<RvrTrend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RvrTrend {
    Improving,
    Deteriorating,
    NoChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloudCover {
    /// "Clear below 12000 ft"; never carries a height
    Clear,
    SkyClear,
    Few,
    Scattered,
    Broken,
    Overcast,
    VerticalVisibility,
    /// Placeholder for a recognized group with an unreadable payload
    Unknown,
}

/// One cloud layer; heights are feet above ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: CloudCover,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_ft: Option<u32>,
}

impl fmt::Display for CloudLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.cover, self.height_ft) {
            (CloudCover::Clear, _) => write!(f, "clear of clouds below 12000ft"),
            (CloudCover::SkyClear, Some(height)) => write!(f, "sky clear {height}ft"),
            (CloudCover::SkyClear, None) => write!(f, "sky clear"),
            (CloudCover::Few, Some(height)) => write!(f, "few clouds at {height}ft"),
            (CloudCover::Scattered, Some(height)) => write!(f, "scattered clouds at {height}ft"),
            (CloudCover::Broken, Some(height)) => write!(f, "broken clouds at {height}ft"),
            (CloudCover::Overcast, Some(height)) => write!(f, "overcast at {height}ft"),
            (CloudCover::VerticalVisibility, Some(height)) => {
                write!(f, "vertical visibility {height}ft")
            }
            _ => write!(f, "unknown cloud condition"),
        }
    }
}

/// Temperature and dew point, degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperatures {
    pub temperature: i32,
    pub dew_point: i32,
}
