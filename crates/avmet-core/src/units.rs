//! Unit conversion utilities
//!
//! Shared by the field decoders. Everything leaving the decoder is
//! normalized to knots, meters, and hectopascals; the wire-format units
//! only exist inside this crate.

use serde::{Deserialize, Serialize};

/// Wind speed unit suffix accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "KT")]
    Knots,
    #[serde(rename = "MPS")]
    MetersPerSecond,
    #[serde(rename = "KMH")]
    KilometersPerHour,
}

impl SpeedUnit {
    /// Match a trailing unit suffix, returning the unit and the token body
    /// in front of it.
    pub fn strip_suffix(token: &str) -> Option<(SpeedUnit, &str)> {
        const SUFFIXES: [(&str, SpeedUnit); 3] = [
            ("KT", SpeedUnit::Knots),
            ("MPS", SpeedUnit::MetersPerSecond),
            ("KMH", SpeedUnit::KilometersPerHour),
        ];
        SUFFIXES
            .iter()
            .find_map(|(suffix, unit)| token.strip_suffix(suffix).map(|body| (*unit, body)))
    }
}

pub const KNOTS_PER_METER_PER_SECOND: f64 = 1.94384;
pub const KNOTS_PER_KILOMETER_PER_HOUR: f64 = 0.539957;
pub const METERS_PER_STATUTE_MILE: f64 = 1609.34;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const HECTOPASCALS_PER_CENTI_INCH_HG: f64 = 0.338639;

/// Convert a reported speed to whole knots, truncating like the wire
/// format does.
pub fn to_knots(value: u32, unit: SpeedUnit) -> u32 {
    match unit {
        SpeedUnit::Knots => value,
        SpeedUnit::MetersPerSecond => (value as f64 * KNOTS_PER_METER_PER_SECOND) as u32,
        SpeedUnit::KilometersPerHour => (value as f64 * KNOTS_PER_KILOMETER_PER_HOUR) as u32,
    }
}

/// Statute miles to whole meters, rounded.
pub fn statute_miles_to_meters(miles: f64) -> u32 {
    (miles * METERS_PER_STATUTE_MILE).round() as u32
}

/// Feet to whole meters, rounded.
pub fn feet_to_meters(feet: u32) -> u32 {
    (feet as f64 * METERS_PER_FOOT).round() as u32
}

/// Altimeter setting to hectopascals. `centi_inches` is the 4-digit wire
/// value, hundredths of an inch of mercury (2992 is 29.92 inHg).
pub fn centi_inches_hg_to_hectopascals(centi_inches: u32) -> u32 {
    (centi_inches as f64 * HECTOPASCALS_PER_CENTI_INCH_HG).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_conversions_truncate() {
        assert_eq!(to_knots(4, SpeedUnit::Knots), 4);
        // 10 m/s is 19.4384 kt
        assert_eq!(to_knots(10, SpeedUnit::MetersPerSecond), 19);
        // 18 km/h is 9.719 kt
        assert_eq!(to_knots(18, SpeedUnit::KilometersPerHour), 9);
    }

    #[test]
    fn distance_conversions_round() {
        assert_eq!(statute_miles_to_meters(10.0), 16093);
        assert_eq!(statute_miles_to_meters(0.5), 805);
        assert_eq!(feet_to_meters(2600), 792);
        assert_eq!(feet_to_meters(2000), 610);
    }

    #[test]
    fn altimeter_to_hectopascals() {
        assert_eq!(centi_inches_hg_to_hectopascals(2992), 1013);
        assert_eq!(centi_inches_hg_to_hectopascals(3015), 1021);
    }

    #[test]
    fn unit_suffix_matching() {
        assert_eq!(
            SpeedUnit::strip_suffix("04KT"),
            Some((SpeedUnit::Knots, "04"))
        );
        assert_eq!(
            SpeedUnit::strip_suffix("05MPS"),
            Some((SpeedUnit::MetersPerSecond, "05"))
        );
        assert_eq!(SpeedUnit::strip_suffix("0400"), None);
    }
}
