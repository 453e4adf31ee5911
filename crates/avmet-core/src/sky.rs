//! Present weather and cloud layer decoders

use crate::types::{CloudCover, CloudLayer};

/// Weather code table: intensity/proximity/descriptor qualifiers first,
/// then phenomena. Two-character codes win over one-character codes at
/// each position.
const WEATHER_CODES: &[(&str, &str)] = &[
    ("-", "light"),
    ("+", "heavy"),
    ("VC", "vicinity"),
    ("MI", "shallow"),
    ("BC", "patches of"),
    ("DR", "low drifting"),
    ("BL", "blowing"),
    ("SH", "showers"),
    ("TS", "thunderstorm"),
    ("FZ", "freezing"),
    ("DZ", "drizzle"),
    ("RA", "rain"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("IC", "ice crystals"),
    ("PL", "ice pellets"),
    ("GR", "hail"),
    ("GS", "small hail/snow pellets"),
    ("UP", "unknown precipitation"),
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PO", "dust/sand whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud/tornado/waterspout"),
    ("SS", "sandstorm"),
    ("DS", "duststorm"),
];

fn lookup(code: &str) -> Option<&'static str> {
    WEATHER_CODES
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, phrase)| *phrase)
}

/// Greedily translate a weather token into a space-joined description.
///
/// Unrecognized characters are skipped. An empty result means the token
/// carries no weather codes at all; the driver leaves such tokens
/// unconsumed so they can be tried as cloud groups instead.
pub fn decode_present_weather(token: &str) -> String {
    let mut phrases = Vec::new();
    let mut rest = token;
    while !rest.is_empty() {
        if let Some(phrase) = rest.get(..2).and_then(lookup) {
            phrases.push(phrase);
            rest = &rest[2..];
            continue;
        }
        if let Some(phrase) = rest.get(..1).and_then(lookup) {
            phrases.push(phrase);
        }
        let skip = rest.chars().next().map_or(0, char::len_utf8);
        rest = &rest[skip..];
    }
    phrases.join(" ")
}

/// Cloud groups repeat while tokens match a coverage code with an
/// optional 3-digit height, or a `VV` vertical visibility group.
pub fn is_cloud_group(token: &str) -> bool {
    if let Some(digits) = token.strip_prefix("VV") {
        return is_height(digits);
    }
    match token.get(..3) {
        Some("SKC" | "CLR" | "FEW" | "SCT" | "BKN" | "OVC") => {
            let rest = &token[3..];
            rest.is_empty() || is_height(rest)
        }
        _ => false,
    }
}

fn is_height(digits: &str) -> bool {
    digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Decode a recognized cloud group.
///
/// `CLR` is the fixed clear-below-12000ft layer and `SKC` needs no
/// height; a coverage code missing its height digits degrades to the
/// Unknown placeholder instead of failing the report.
pub fn decode_cloud_layer(token: &str) -> CloudLayer {
    const UNKNOWN: CloudLayer = CloudLayer {
        cover: CloudCover::Unknown,
        height_ft: None,
    };

    if let Some(digits) = token.strip_prefix("VV") {
        return match parse_height(digits) {
            Some(feet) => CloudLayer {
                cover: CloudCover::VerticalVisibility,
                height_ft: Some(feet),
            },
            None => UNKNOWN,
        };
    }

    let Some(code) = token.get(..3) else {
        return UNKNOWN;
    };
    let rest = &token[3..];
    match code {
        "CLR" => CloudLayer {
            cover: CloudCover::Clear,
            height_ft: None,
        },
        "SKC" => CloudLayer {
            cover: CloudCover::SkyClear,
            height_ft: parse_height(rest),
        },
        "FEW" | "SCT" | "BKN" | "OVC" => {
            let cover = match code {
                "FEW" => CloudCover::Few,
                "SCT" => CloudCover::Scattered,
                "BKN" => CloudCover::Broken,
                _ => CloudCover::Overcast,
            };
            match parse_height(rest) {
                Some(feet) => CloudLayer {
                    cover,
                    height_ft: Some(feet),
                },
                None => UNKNOWN,
            }
        }
        _ => UNKNOWN,
    }
}

/// Heights are reported in hundreds of feet.
fn parse_height(digits: &str) -> Option<u32> {
    if !is_height(digits) {
        return None;
    }
    digits.parse::<u32>().ok().map(|height| height * 100)
}
