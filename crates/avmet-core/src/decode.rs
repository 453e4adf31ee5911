//! Token cursor and decode driver for METAR reports
//!
//! The driver walks the whitespace-split report exactly once.
//! Deterministic steps consume their token unconditionally; optional and
//! repeatable steps peek first and only consume on a recognizer match.
//! Decoding is all-or-nothing: a failure in any required step returns a
//! single error and no partial report.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::sky::{decode_cloud_layer, decode_present_weather, is_cloud_group};
use crate::types::{Report, Temperatures, UpdateFlag};
use crate::units;
use crate::visibility::{decode_rvr, decode_visibility, is_rvr_group};
use crate::wind::{decode_wind, decode_wind_variation};

/// Required decode step, named in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Station,
    Time,
    Wind,
    Visibility,
    Temperatures,
    Qnh,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Station => "station",
            Field::Time => "observation time",
            Field::Wind => "wind",
            Field::Visibility => "visibility",
            Field::Temperatures => "temperature",
            Field::Qnh => "QNH",
        };
        f.write_str(name)
    }
}

/// Decode failure for a required field step.
///
/// Optional and repeatable groups never surface here; they skip or
/// degrade instead (see the per-field decoders).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("report ended before the required {0} field")]
    OutOfTokens(Field),

    #[error("token {token:?} does not match the {field} field shape")]
    PatternMismatch { field: Field, token: String },

    #[error("token {token:?} has an invalid numeric payload for the {field} field")]
    NumericConversion { field: Field, token: String },
}

impl DecodeError {
    pub(crate) fn mismatch(field: Field, token: &str) -> Self {
        DecodeError::PatternMismatch {
            field,
            token: token.to_string(),
        }
    }

    pub(crate) fn numeric(field: Field, token: &str) -> Self {
        DecodeError::NumericConversion {
            field,
            token: token.to_string(),
        }
    }
}

/// Read position over the token sequence. Advances monotonically, never
/// backtracks.
struct Cursor {
    tokens: Vec<String>,
    pos: usize,
}

impl Cursor {
    fn new(raw: &str) -> Self {
        Self {
            tokens: raw
                .split_whitespace()
                .map(|token| token.to_ascii_uppercase())
                .collect(),
            pos: 0,
        }
    }

    /// Current token without consuming it.
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// Consume and return the current token; exhaustion at a required
    /// step is a hard failure.
    fn next(&mut self, field: Field) -> Result<&str, DecodeError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(DecodeError::OutOfTokens(field))?;
        self.pos += 1;
        Ok(token.as_str())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Decode a raw METAR string against the current UTC date.
pub fn decode(raw: &str) -> Result<Report, DecodeError> {
    decode_with_date(raw, Utc::now().date_naive())
}

/// Decode a raw METAR string. `reference` supplies the year and month the
/// report's day-of-month is resolved against; passing it explicitly keeps
/// the decoder pure and testable.
pub fn decode_with_date(raw: &str, reference: NaiveDate) -> Result<Report, DecodeError> {
    let mut cursor = Cursor::new(raw);

    let station = decode_station(cursor.next(Field::Station)?)?;
    let observation_time = decode_time(cursor.next(Field::Time)?, reference)?;

    let update_flag = match cursor.peek().and_then(decode_update_flag) {
        Some(flag) => {
            cursor.advance();
            Some(flag)
        }
        None => None,
    };

    let wind = decode_wind(cursor.next(Field::Wind)?)?;

    let wind_variation = match cursor.peek().and_then(decode_wind_variation) {
        Some(variation) => {
            cursor.advance();
            Some(variation)
        }
        None => None,
    };

    let visibility = decode_visibility(cursor.next(Field::Visibility)?)?;

    let mut runway_visual_range = Vec::new();
    while let Some(token) = cursor.peek() {
        if !is_rvr_group(token) {
            break;
        }
        let entry = decode_rvr(token);
        cursor.advance();
        runway_visual_range.push(entry);
    }

    // OVC embeds the VC vicinity code, so cloud groups are ruled out
    // before the weather table gets a chance to misread them.
    let present_weather = match cursor.peek() {
        Some(token) if !is_cloud_group(token) => {
            let description = decode_present_weather(token);
            if !description.is_empty() {
                cursor.advance();
            }
            description
        }
        _ => String::new(),
    };

    let mut clouds = Vec::new();
    while let Some(token) = cursor.peek() {
        if !is_cloud_group(token) {
            break;
        }
        let layer = decode_cloud_layer(token);
        cursor.advance();
        clouds.push(layer);
    }

    let temperatures = decode_temperatures(cursor.next(Field::Temperatures)?)?;
    let qnh = decode_qnh(cursor.next(Field::Qnh)?)?;

    Ok(Report {
        station,
        observation_time,
        update_flag,
        wind,
        wind_variation,
        visibility,
        runway_visual_range,
        present_weather,
        clouds,
        temperatures,
        qnh,
    })
}

fn decode_station(token: &str) -> Result<String, DecodeError> {
    if token.len() == 4 && token.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(token.to_string())
    } else {
        Err(DecodeError::mismatch(Field::Station, token))
    }
}

/// `DDHHMM` plus a literal `Z`; year and month come from the reference
/// date.
fn decode_time(token: &str, reference: NaiveDate) -> Result<DateTime<Utc>, DecodeError> {
    let digits = token
        .strip_suffix('Z')
        .ok_or_else(|| DecodeError::mismatch(Field::Time, token))?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::mismatch(Field::Time, token));
    }

    let numeric = |s: &str| -> Result<u32, DecodeError> {
        s.parse().map_err(|_| DecodeError::numeric(Field::Time, token))
    };
    let day = numeric(&digits[0..2])?;
    let hour = numeric(&digits[2..4])?;
    let minute = numeric(&digits[4..6])?;

    Utc.with_ymd_and_hms(reference.year(), reference.month(), day, hour, minute, 0)
        .single()
        .ok_or_else(|| DecodeError::numeric(Field::Time, token))
}

fn decode_update_flag(token: &str) -> Option<UpdateFlag> {
    match token {
        "AUTO" => Some(UpdateFlag::Auto),
        "COR" => Some(UpdateFlag::Corrected),
        _ => None,
    }
}

/// Split on `/`; both halves are required.
fn decode_temperatures(token: &str) -> Result<Temperatures, DecodeError> {
    let (temperature, dew_point) = token
        .split_once('/')
        .ok_or_else(|| DecodeError::mismatch(Field::Temperatures, token))?;
    Ok(Temperatures {
        temperature: decode_celsius(temperature, token)?,
        dew_point: decode_celsius(dew_point, token)?,
    })
}

/// `M`-prefixed values are negative; a minus sign never appears on the
/// wire.
fn decode_celsius(half: &str, token: &str) -> Result<i32, DecodeError> {
    let (negative, digits) = match half.strip_prefix('M') {
        Some(rest) => (true, rest),
        None => (false, half),
    };
    let value: i32 = digits
        .parse()
        .map_err(|_| DecodeError::numeric(Field::Temperatures, token))?;
    Ok(if negative { -value } else { value })
}

/// `A`-prefixed altimeter settings are hundredths of an inch of mercury
/// and convert to hectopascals; `Q`-prefixed values are hectopascals
/// already.
fn decode_qnh(token: &str) -> Result<u32, DecodeError> {
    let digits = token
        .strip_prefix('A')
        .or_else(|| token.strip_prefix('Q'))
        .ok_or_else(|| DecodeError::mismatch(Field::Qnh, token))?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::mismatch(Field::Qnh, token));
    }
    let value: u32 = digits
        .parse()
        .map_err(|_| DecodeError::numeric(Field::Qnh, token))?;
    if token.starts_with('A') {
        Ok(units::centi_inches_hg_to_hectopascals(value))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CloudCover, RvrTrend, WindDirection};
    use crate::units::SpeedUnit;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    #[test]
    fn decodes_a_plain_us_report() {
        let report =
            decode_with_date("KJFK 202300Z 24004KT 10SM CLR 28/22 A2992", reference()).unwrap();

        assert_eq!(report.station, "KJFK");
        assert_eq!(
            report.observation_time,
            Utc.with_ymd_and_hms(2026, 8, 20, 23, 0, 0).unwrap()
        );
        assert_eq!(report.update_flag, None);
        assert_eq!(report.wind.direction, WindDirection::Degrees(240));
        assert_eq!(report.wind.speed, Some(4));
        assert_eq!(report.wind.unit, Some(SpeedUnit::Knots));
        assert_eq!(report.wind.gust, None);
        assert_eq!(report.visibility, 16093);
        assert!(report.runway_visual_range.is_empty());
        assert_eq!(report.present_weather, "");
        assert_eq!(report.clouds.len(), 1);
        assert_eq!(
            report.clouds[0].to_string(),
            "clear of clouds below 12000ft"
        );
        assert_eq!(report.temperatures.temperature, 28);
        assert_eq!(report.temperatures.dew_point, 22);
        assert_eq!(report.qnh, 1013);
    }

    #[test]
    fn decodes_a_cavok_report_with_trailing_nosig() {
        let report = decode_with_date(
            "LOWW 191820Z 15010KT CAVOK 06/M05 Q1029 NOSIG",
            reference(),
        )
        .unwrap();

        assert_eq!(report.visibility, 10_000);
        assert_eq!(report.temperatures.temperature, 6);
        assert_eq!(report.temperatures.dew_point, -5);
        assert_eq!(report.qnh, 1029);
        assert!(report.clouds.is_empty());
    }

    #[test]
    fn decodes_gusts() {
        let report = decode_with_date(
            "LOWW 051420Z 35018G29KT 9999 FEW050 17/05 Q1007 NOSIG",
            reference(),
        )
        .unwrap();

        assert_eq!(report.wind.gust, Some(29));
        assert_eq!(report.visibility, 10_000);
        assert_eq!(report.clouds[0].cover, CloudCover::Few);
        assert_eq!(report.clouds[0].height_ft, Some(5000));
    }

    #[test]
    fn input_is_case_normalized() {
        let report =
            decode_with_date("kjfk 202300z 24004kt 10sm clr 28/22 a2992", reference()).unwrap();
        assert_eq!(report.station, "KJFK");
        assert_eq!(report.qnh, 1013);
    }

    #[test]
    fn consumes_optional_update_flag_and_wind_variation() {
        let report = decode_with_date(
            "LOWW 191820Z AUTO 25012KT 200V280 9999 SCT020 17/12 Q1018",
            reference(),
        )
        .unwrap();

        assert_eq!(report.update_flag, Some(UpdateFlag::Auto));
        let variation = report.wind_variation.unwrap();
        assert_eq!(variation.min_direction, 200);
        assert_eq!(variation.max_direction, 280);
    }

    #[test]
    fn collects_rvr_weather_and_cloud_groups() {
        let report = decode_with_date(
            "KJFK 202300Z 24004KT 1/2SM R04R/2600FT/D R28R/2000V3000FT -RA BKN030 28/22 A2992",
            reference(),
        )
        .unwrap();

        assert_eq!(report.visibility, 805);
        assert_eq!(report.runway_visual_range.len(), 2);
        let first = report.runway_visual_range[0].as_ref().unwrap();
        assert_eq!(first.runway, "04R");
        assert_eq!(first.min_range, 792);
        assert_eq!(first.trend, Some(RvrTrend::Deteriorating));
        let second = report.runway_visual_range[1].as_ref().unwrap();
        assert_eq!(second.min_range, 610);
        assert_eq!(second.max_range, 914);
        assert_eq!(report.present_weather, "light rain");
        assert_eq!(report.clouds[0].cover, CloudCover::Broken);
    }

    #[test]
    fn malformed_rvr_group_degrades_to_a_null_entry() {
        let report = decode_with_date(
            "KJFK 202300Z 24004KT 10SM R04/26A0FT 28/22 A2992",
            reference(),
        )
        .unwrap();
        assert_eq!(report.runway_visual_range, vec![None]);
    }

    #[test]
    fn overcast_is_a_cloud_layer_not_vicinity_weather() {
        let report = decode_with_date(
            "LOWW 191820Z 15010KT 9999 OVC008 06/M05 Q1029",
            reference(),
        )
        .unwrap();
        assert_eq!(report.present_weather, "");
        assert_eq!(report.clouds[0].cover, CloudCover::Overcast);
        assert_eq!(report.clouds[0].height_ft, Some(800));
    }

    #[test]
    fn vertical_visibility_group_is_collected() {
        let report = decode_with_date(
            "LOWW 191820Z 15010KT 0200 FZFG VV002 M02/M03 Q1021",
            reference(),
        )
        .unwrap();
        assert_eq!(report.present_weather, "freezing fog");
        assert_eq!(report.clouds[0].cover, CloudCover::VerticalVisibility);
        assert_eq!(report.clouds[0].height_ft, Some(200));
    }

    #[test]
    fn truncated_report_fails_without_a_partial_result() {
        let error =
            decode_with_date("KJFK 202300Z 24004KT 10SM CLR 28/22", reference()).unwrap_err();
        assert_eq!(error, DecodeError::OutOfTokens(Field::Qnh));
    }

    #[test]
    fn empty_input_fails_at_the_station_step() {
        assert_eq!(
            decode_with_date("", reference()).unwrap_err(),
            DecodeError::OutOfTokens(Field::Station)
        );
    }

    #[test]
    fn bad_wind_token_names_the_wind_step() {
        let error = decode_with_date(
            "KJFK 202300Z NOWIND 10SM CLR 28/22 A2992",
            reference(),
        )
        .unwrap_err();
        assert!(matches!(
            error,
            DecodeError::PatternMismatch {
                field: Field::Wind,
                ..
            }
        ));
    }

    #[test]
    fn impossible_day_of_month_is_a_numeric_failure() {
        let february = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let error = decode_with_date(
            "KJFK 312300Z 24004KT 10SM CLR 28/22 A2992",
            february,
        )
        .unwrap_err();
        assert!(matches!(
            error,
            DecodeError::NumericConversion {
                field: Field::Time,
                ..
            }
        ));
    }

    #[test]
    fn decoding_is_deterministic_for_a_fixed_reference_date() {
        let raw = "LOWW 191820Z 15010KT CAVOK 06/M05 Q1029";
        let first = decode_with_date(raw, reference()).unwrap();
        let second = decode_with_date(raw, reference()).unwrap();
        assert_eq!(first, second);
    }
}
