//! `HH:MM:SS` time formatting and parsing
//!
//! Schedule offsets are displayed and exported as `HH:MM:SS`. Formatting
//! truncates (never rounds) to whole seconds and does not wrap hours at 24,
//! so a 30-hour playlist ends at `30:00:00`.

use crate::{Error, Result};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Format seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated. Hours are zero-padded to two digits
/// but unbounded. Negative values get a leading minus sign; non-finite
/// values format as `00:00:00`.
///
/// # Examples
///
/// ```
/// use playout_common::human_time::format_hms;
///
/// assert_eq!(format_hms(0.0), "00:00:00");
/// assert_eq!(format_hms(74.999), "00:01:14");
/// assert_eq!(format_hms(3661.0), "01:01:01");
/// assert_eq!(format_hms(108_000.0), "30:00:00");
/// ```
pub fn format_hms(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "00:00:00".to_string();
    }

    let total = seconds.abs().trunc() as u64;
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;

    let formatted = format!("{:02}:{:02}:{:02}", hours, minutes, secs);
    if seconds < 0.0 && total > 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Parse an operator-entered time into seconds.
///
/// Accepted forms, each with an optional leading `-`:
/// - `HH:MM:SS` (hours unbounded, seconds may be fractional)
/// - `MM:SS`
/// - plain seconds (`90`, `12.5`)
///
/// Minutes and seconds must be below 60 whenever a larger unit is present.
///
/// # Examples
///
/// ```
/// use playout_common::human_time::parse_hms;
///
/// assert_eq!(parse_hms("01:00:00").unwrap(), 3600.0);
/// assert_eq!(parse_hms("-01:30").unwrap(), -90.0);
/// assert_eq!(parse_hms("12.5").unwrap(), 12.5);
/// ```
pub fn parse_hms(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    if body.is_empty() {
        return Err(Error::InvalidInput(format!("Empty time value: {:?}", input)));
    }

    let parts: Vec<&str> = body.split(':').collect();
    let seconds = match parts.as_slice() {
        [secs] => parse_seconds(secs, input, false)?,
        [mins, secs] => {
            parse_whole(mins, input)? as f64 * SECONDS_PER_MINUTE as f64
                + parse_seconds(secs, input, true)?
        }
        [hours, mins, secs] => {
            let minutes = parse_whole(mins, input)?;
            if minutes >= SECONDS_PER_MINUTE {
                return Err(Error::InvalidInput(format!(
                    "Minutes out of range in {:?}",
                    input
                )));
            }
            parse_whole(hours, input)? as f64 * SECONDS_PER_HOUR as f64
                + minutes as f64 * SECONDS_PER_MINUTE as f64
                + parse_seconds(secs, input, true)?
        }
        _ => {
            return Err(Error::InvalidInput(format!(
                "Expected HH:MM:SS, MM:SS or seconds, got {:?}",
                input
            )))
        }
    };

    Ok(if negative { -seconds } else { seconds })
}

fn parse_whole(part: &str, input: &str) -> Result<u64> {
    part.trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidInput(format!("Invalid time component {:?} in {:?}", part, input)))
}

fn parse_seconds(part: &str, input: &str, bounded: bool) -> Result<f64> {
    let value = part
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("Invalid seconds {:?} in {:?}", part, input)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!("Invalid seconds {:?} in {:?}", part, input)));
    }
    if bounded && value >= SECONDS_PER_MINUTE as f64 {
        return Err(Error::InvalidInput(format!("Seconds out of range in {:?}", input)));
    }
    Ok(value)
}
