//! Visibility and runway visual range decoders

use crate::decode::{DecodeError, Field};
use crate::types::{RunwayVisualRange, RvrTrend};
use crate::units;

/// Decode the required visibility group, normalized to meters.
///
/// Accepted shapes, in priority order: the `9999`/`CAVOK` ceiling, a bare
/// 4-digit meter value, whole statute miles (`10SM`), and fractional
/// statute miles (`1/2SM`).
pub fn decode_visibility(token: &str) -> Result<u32, DecodeError> {
    if token == "9999" || token == "CAVOK" {
        return Ok(10_000);
    }
    if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
        return token
            .parse()
            .map_err(|_| DecodeError::numeric(Field::Visibility, token));
    }
    if let Some(miles) = token.strip_suffix("SM") {
        return decode_statute_miles(miles, token);
    }
    Err(DecodeError::mismatch(Field::Visibility, token))
}

fn decode_statute_miles(miles: &str, token: &str) -> Result<u32, DecodeError> {
    let value = match miles.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = parse_miles_digits(numerator, token)?;
            let denominator = parse_miles_digits(denominator, token)?;
            if denominator == 0.0 {
                return Err(DecodeError::numeric(Field::Visibility, token));
            }
            numerator / denominator
        }
        None => parse_miles_digits(miles, token)?,
    };
    Ok(units::statute_miles_to_meters(value))
}

fn parse_miles_digits(digits: &str, token: &str) -> Result<f64, DecodeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::mismatch(Field::Visibility, token));
    }
    digits
        .parse()
        .map_err(|_| DecodeError::numeric(Field::Visibility, token))
}

/// RVR groups repeat while tokens carry `R` plus a 2-digit runway number.
pub fn is_rvr_group(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'R' && bytes[1].is_ascii_digit() && bytes[2].is_ascii_digit()
}

/// Extract a recognized RVR group (`R04R/2600FT/D`, `R28R/2000V3000FT`).
///
/// Ranges may carry a `P` ("greater than") prefix and default to feet;
/// they are always meters after decode. A group that passed the runway
/// recognizer but fails the full shape yields `None`, and the repeat loop
/// keeps going either way.
pub fn decode_rvr(token: &str) -> Option<RunwayVisualRange> {
    let rest = token.strip_prefix('R')?;
    let bytes = rest.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return None;
    }
    let designator_len = match bytes.get(2) {
        Some(b'L' | b'C' | b'R') => 3,
        _ => 2,
    };
    let runway = &rest[..designator_len];
    let rest = rest[designator_len..].strip_prefix('/')?;

    let (min_range, rest) = take_range(rest)?;
    let (max_range, rest) = match rest.strip_prefix('V') {
        Some(after) => take_range(after)?,
        None => (min_range, rest),
    };

    let (in_feet, rest) = if let Some(after) = rest.strip_prefix("FT") {
        (true, after)
    } else if let Some(after) = rest.strip_prefix('M') {
        (false, after)
    } else {
        // unit defaults to feet when absent
        (true, rest)
    };

    let trend = match rest {
        "/U" => Some(RvrTrend::Improving),
        "/D" => Some(RvrTrend::Deteriorating),
        "/N" => Some(RvrTrend::NoChange),
        _ => None,
    };

    let (min_range, max_range) = if in_feet {
        (
            units::feet_to_meters(min_range),
            units::feet_to_meters(max_range),
        )
    } else {
        (min_range, max_range)
    };

    Some(RunwayVisualRange {
        runway: runway.to_string(),
        min_range,
        max_range,
        trend,
    })
}

/// Ranges are 4 digits, optionally prefixed `P`.
fn take_range(s: &str) -> Option<(u32, &str)> {
    let s = s.strip_prefix('P').unwrap_or(s);
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, &s[4..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_sentinels() {
        assert_eq!(decode_visibility("9999").unwrap(), 10_000);
        assert_eq!(decode_visibility("CAVOK").unwrap(), 10_000);
    }

    #[test]
    fn bare_meters_pass_through() {
        assert_eq!(decode_visibility("1600").unwrap(), 1600);
        assert_eq!(decode_visibility("0400").unwrap(), 400);
    }

    #[test]
    fn statute_miles_convert() {
        assert_eq!(decode_visibility("10SM").unwrap(), 16093);
        assert_eq!(decode_visibility("1/2SM").unwrap(), 805);
        assert_eq!(decode_visibility("3/4SM").unwrap(), 1207);
    }

    #[test]
    fn unmatched_shapes_fail() {
        assert!(matches!(
            decode_visibility("FOG"),
            Err(DecodeError::PatternMismatch { .. })
        ));
        assert!(decode_visibility("123").is_err());
        assert!(decode_visibility("ABSM").is_err());
        assert!(matches!(
            decode_visibility("1/0SM"),
            Err(DecodeError::NumericConversion { .. })
        ));
    }

    #[test]
    fn rvr_recognizer() {
        assert!(is_rvr_group("R04R/2600FT"));
        assert!(is_rvr_group("R22/0800M"));
        // rain, not a runway group
        assert!(!is_rvr_group("RA"));
        assert!(!is_rvr_group("RED"));
    }

    #[test]
    fn rvr_feet_with_trend() {
        let rvr = decode_rvr("R04R/2600FT/D").unwrap();
        assert_eq!(rvr.runway, "04R");
        assert_eq!(rvr.min_range, 792);
        assert_eq!(rvr.max_range, 792);
        assert_eq!(rvr.trend, Some(RvrTrend::Deteriorating));
    }

    #[test]
    fn rvr_variable_range() {
        let rvr = decode_rvr("R28R/2000V3000FT").unwrap();
        assert_eq!(rvr.runway, "28R");
        assert_eq!(rvr.min_range, 610);
        assert_eq!(rvr.max_range, 914);
        assert_eq!(rvr.trend, None);
    }

    #[test]
    fn rvr_meters_and_greater_than_prefix() {
        let rvr = decode_rvr("R22/P1500M/N").unwrap();
        assert_eq!(rvr.runway, "22");
        assert_eq!(rvr.min_range, 1500);
        assert_eq!(rvr.max_range, 1500);
        assert_eq!(rvr.trend, Some(RvrTrend::NoChange));
    }

    #[test]
    fn rvr_unit_defaults_to_feet() {
        let rvr = decode_rvr("R06/0600").unwrap();
        assert_eq!(rvr.min_range, 183);
        assert_eq!(rvr.max_range, 183);
    }

    #[test]
    fn malformed_rvr_degrades_to_none() {
        assert_eq!(decode_rvr("R04/26A0FT"), None);
        assert_eq!(decode_rvr("R04R2600FT"), None);
        assert_eq!(decode_rvr("R04R/"), None);
    }
}
