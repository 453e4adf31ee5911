//! Wind group and wind variation decoders

use crate::decode::{DecodeError, Field};
use crate::types::{Wind, WindDirection, WindVariation};
use crate::units::{self, SpeedUnit};

/// Decode the required wind group.
///
/// Two shapes are accepted: a variable-direction wind (`VRB05KT`) and a
/// directional wind (`24004KT`, `35018G29KT`), each with a KT, MPS, or
/// KMH suffix. Speeds convert to knots on the way out.
pub fn decode_wind(token: &str) -> Result<Wind, DecodeError> {
    if let Some(body) = token.strip_prefix("VRB") {
        return Ok(decode_variable_wind(body));
    }
    decode_directional_wind(token)
}

/// A `VRB` group with an unreadable speed part degrades to a
/// direction-only record instead of failing the report.
fn decode_variable_wind(body: &str) -> Wind {
    match split_speed(body) {
        Some((speed, gust, unit)) => Wind {
            direction: WindDirection::Variable,
            speed: Some(units::to_knots(speed, unit)),
            unit: Some(SpeedUnit::Knots),
            gust: gust.map(|gust| units::to_knots(gust, unit)),
        },
        None => Wind {
            direction: WindDirection::Variable,
            speed: None,
            unit: None,
            gust: None,
        },
    }
}

fn decode_directional_wind(token: &str) -> Result<Wind, DecodeError> {
    if token.len() < 3 || !token.as_bytes()[..3].iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::mismatch(Field::Wind, token));
    }
    let direction: u16 = token[..3]
        .parse()
        .map_err(|_| DecodeError::numeric(Field::Wind, token))?;
    let (speed, gust, unit) =
        split_speed(&token[3..]).ok_or_else(|| DecodeError::mismatch(Field::Wind, token))?;

    Ok(Wind {
        direction: WindDirection::Degrees(direction),
        speed: Some(units::to_knots(speed, unit)),
        unit: Some(SpeedUnit::Knots),
        gust: gust.map(|gust| units::to_knots(gust, unit)),
    })
}

/// Split `DD[D][GDD[D]]<unit>` into speed, optional gust, and unit.
fn split_speed(body: &str) -> Option<(u32, Option<u32>, SpeedUnit)> {
    let (unit, body) = SpeedUnit::strip_suffix(body)?;
    let (speed, gust) = match body.split_once('G') {
        Some((speed, gust)) => (speed, Some(gust)),
        None => (body, None),
    };
    let speed = parse_speed_digits(speed)?;
    let gust = match gust {
        Some(digits) => Some(parse_speed_digits(digits)?),
        None => None,
    };
    Some((speed, gust, unit))
}

/// Speeds and gusts are 2 or 3 digits on the wire.
fn parse_speed_digits(digits: &str) -> Option<u32> {
    if !(2..=3).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Recognize and extract a `DDDVDDD` wind variation group. Returns `None`
/// for anything else; the group is optional and absence is not an error.
pub fn decode_wind_variation(token: &str) -> Option<WindVariation> {
    let (min, max) = token.split_once('V')?;
    if min.len() != 3
        || max.len() != 3
        || !min.bytes().chain(max.bytes()).all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some(WindVariation {
        min_direction: min.parse().ok()?,
        max_direction: max.parse().ok()?,
    })
}
