//! Lenient timestamp parsing for backend payloads.
//!
//! The backend emits RFC 3339 timestamps in some places and naive local-style
//! values (`2025-03-01T06:30:00`, `2025-03-01T06:30`) in others. Naive values
//! are read as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `deserialize_with` helper for optional timestamps; `null`, missing and
/// blank values all become `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{}`", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse("2025-03-01T06:30:00+05:30").unwrap();
        assert_eq!(dt.hour(), 1);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_naive_variants_as_utc() {
        let full = parse("2025-03-01T06:30:15.250").unwrap();
        assert_eq!(full.second(), 15);

        let no_seconds = parse("2025-03-01T06:30").unwrap();
        assert_eq!(no_seconds.day(), 1);
        assert_eq!(no_seconds.hour(), 6);

        assert!(parse("tomorrow morning").is_none());
    }
}
