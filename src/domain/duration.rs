//! Duration parsing and humanizing
//!
//! Lookbacks are written as unit-suffixed strings ("18h", "1h30m", "90s").
//! Ages are rendered with their largest non-zero unit only ("8 weeks").

use chrono::TimeDelta;
use std::fmt;

/// Ages at or above this are emphasized in review messages
pub const EMPHASIS_THRESHOLD_HOURS: i64 = 48;

/// Error from [`parse_duration`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParseError(String);

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DurationParseError {}

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

fn unit_nanos(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60.0 * NANOS_PER_SECOND),
        "h" => Some(3600.0 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Parse a signed sequence of decimal numbers with unit suffixes.
///
/// Valid units are "ns", "us" (or "µs"), "ms", "s", "m", "h". A bare "0" is
/// accepted.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationParseError> {
    let err = |msg: &str| DurationParseError(format!("{}: '{}'", msg, input));

    let mut rest = input.trim();
    let mut negative = false;
    if let Some(r) = rest.strip_prefix('-') {
        negative = true;
        rest = r;
    } else if let Some(r) = rest.strip_prefix('+') {
        rest = r;
    }

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(err("empty duration"));
    }

    let mut total = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(err("expected a number"));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| err("invalid number"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(err("missing unit"));
        }
        let nanos = unit_nanos(&rest[..unit_len]).ok_or_else(|| err("unknown unit"))?;
        rest = &rest[unit_len..];

        total += value * nanos;
    }

    if total > i64::MAX as f64 {
        return Err(err("duration out of range"));
    }

    let delta = TimeDelta::nanoseconds(total.round() as i64);
    Ok(if negative { -delta } else { delta })
}

const UNITS: [(&str, i64); 7] = [
    ("year", 365 * 24 * 3600 * 1000),
    ("week", 7 * 24 * 3600 * 1000),
    ("day", 24 * 3600 * 1000),
    ("hour", 3600 * 1000),
    ("minute", 60 * 1000),
    ("second", 1000),
    ("millisecond", 1),
];

/// Render a duration using only its largest non-zero unit
pub fn humanize(duration: TimeDelta) -> String {
    let millis = duration.num_milliseconds().max(0);

    for (name, size) in UNITS {
        let count = millis / size;
        if count > 0 {
            return if count == 1 {
                format!("1 {}", name)
            } else {
                format!("{} {}s", count, name)
            };
        }
    }

    "0 seconds".to_string()
}

/// Like [`humanize`], wrapped in `*...*` once the age reaches two days
pub fn humanize_emphasized(duration: TimeDelta) -> String {
    let text = humanize(duration);
    if duration.num_hours() >= EMPHASIS_THRESHOLD_HOURS {
        format!("*{}*", text)
    } else {
        text
    }
}
