//! Lap times as real durations.
//!
//! The race CSV stores lap times as text such as `1:27.452`. Comparing that text directly breaks
//! as soon as minute fields differ in width (`10:02.000` sorts before `9:59.000`), so lap times
//! are parsed into milliseconds at ingestion and ordered by duration.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PitstopError, Result};

/// A parsed lap time, ordered by duration and displayed in its source form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LapTime {
    millis: u64,
    text: String,
}

impl LapTime {
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// The text this lap time was parsed from
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for LapTime {
    type Err = PitstopError;

    /// Parse `SS.fff`, `M:SS.fff` or `H:MM:SS.fff` (the fraction is optional)
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |reason: &str| PitstopError::InvalidLapTime {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("empty value"));
        }

        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid("too many ':' separated fields"));
        }

        let (leading, seconds_part) = parts.split_at(parts.len() - 1);
        let seconds_millis = match parse_seconds(seconds_part[0]) {
            Some(Some(millis)) => millis,
            Some(None) => return Err(invalid("value out of range")),
            None => return Err(invalid("bad seconds")),
        };
        if !leading.is_empty() && seconds_millis >= 60_000 {
            return Err(invalid("seconds field must be below 60"));
        }

        let mut millis = seconds_millis;
        let mut unit = 60_000u64;
        for (idx, field) in leading.iter().rev().enumerate() {
            let value: u64 = parse_digits(field).ok_or_else(|| invalid("bad minutes/hours"))?;
            if idx == 0 && leading.len() == 2 && value >= 60 {
                return Err(invalid("minutes field must be below 60"));
            }
            millis = value
                .checked_mul(unit)
                .and_then(|field_millis| millis.checked_add(field_millis))
                .ok_or_else(|| invalid("value out of range"))?;
            unit *= 60;
        }

        Ok(Self {
            millis,
            text: text.to_string(),
        })
    }
}

fn parse_digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Seconds with an optional fraction, truncated to millisecond precision.
/// `Some(None)` is a well-formed field too large to represent.
fn parse_seconds(field: &str) -> Option<Option<u64>> {
    let (whole, fraction) = match field.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (field, ""),
    };

    let whole = parse_digits(whole)?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut millis = 0u64;
    for (idx, digit) in fraction.bytes().take(3).enumerate() {
        millis += u64::from(digit - b'0') * 10u64.pow(2 - idx as u32);
    }

    Some(whole.checked_mul(1000).and_then(|whole| whole.checked_add(millis)))
}

impl TryFrom<String> for LapTime {
    type Error = PitstopError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LapTime> for String {
    fn from(value: LapTime) -> Self {
        value.text
    }
}

impl fmt::Display for LapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for LapTime {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for LapTime {}

impl PartialOrd for LapTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LapTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_seconds() {
        let lap: LapTime = "1:27.452".parse().unwrap();
        assert_eq!(lap.as_millis(), 87_452);
        assert_eq!(lap.to_string(), "1:27.452");
    }

    #[test]
    fn test_parse_short_fraction() {
        let lap: LapTime = "3:14.2".parse().unwrap();
        assert_eq!(lap.as_millis(), 194_200);
    }

    #[test]
    fn test_parse_seconds_only() {
        let lap: LapTime = "83.5".parse().unwrap();
        assert_eq!(lap.as_millis(), 83_500);
    }

    #[test]
    fn test_parse_hours() {
        let lap: LapTime = "1:02:03.004".parse().unwrap();
        assert_eq!(lap.as_millis(), 3_723_004);
    }

    #[test]
    fn test_duration_ordering_beats_text_ordering() {
        let slow: LapTime = "10:02.000".parse().unwrap();
        let fast: LapTime = "9:59.000".parse().unwrap();

        assert!("10:02.000" < "9:59.000");
        assert!(fast < slow);
    }

    #[test]
    fn test_equal_durations_compare_equal() {
        let a: LapTime = "1:23.000".parse().unwrap();
        let b: LapTime = "83".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<LapTime>().is_err());
        assert!("\\N".parse::<LapTime>().is_err());
        assert!("1:75.000".parse::<LapTime>().is_err());
        assert!("a:12.000".parse::<LapTime>().is_err());
        assert!("1:2:3:4".parse::<LapTime>().is_err());
        assert!("1:12.0x".parse::<LapTime>().is_err());
    }

    #[test]
    fn test_oversized_fields_are_out_of_range() {
        for value in ["999999999999999999:00.000", "18446744073709552.000"] {
            match value.parse::<LapTime>() {
                Err(PitstopError::InvalidLapTime { reason, .. }) => {
                    assert_eq!(reason, "value out of range", "{}", value)
                }
                other => panic!("expected out of range for {}: {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_serde_uses_text_form() {
        let lap: LapTime = "1:27.452".parse().unwrap();
        let json = serde_json::to_string(&lap).unwrap();
        assert_eq!(json, "\"1:27.452\"");

        let back: LapTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lap);
    }
}
