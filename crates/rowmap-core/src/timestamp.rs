//! Timestamp marshalling.
//!
//! Timestamps are stored as text with second precision and an explicit UTC
//! offset, e.g. `2024-03-01T18:04:05+0100`. Sub-second parts are dropped on
//! encode.

use crate::error::{Error, TypeError};
use crate::value::{Value, unexpected};
use chrono::{DateTime, FixedOffset, Utc};

/// `strftime` pattern used both to encode and to decode timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

fn malformed(text: &str, reason: &str) -> Error {
    Error::Type(TypeError {
        expected: "timestamp (YYYY-MM-DDTHH:MM:SS+HHMM)",
        actual: format!("'{}' ({})", text, reason),
        column: None,
    })
}

/// The offset must be `+HHMM`/`-HHMM` exactly; `%z` alone would also
/// accept `+HH:MM`.
fn has_compact_offset(text: &str) -> bool {
    let bytes = text.as_bytes();
    let Some(offset) = bytes.len().checked_sub(5).map(|at| &bytes[at..]) else {
        return false;
    };
    matches!(offset[0], b'+' | b'-') && offset[1..].iter().all(u8::is_ascii_digit)
}

fn parse(text: &str) -> Result<DateTime<FixedOffset>, Error> {
    if !has_compact_offset(text) {
        return Err(malformed(text, "offset must be +HHMM or -HHMM"));
    }
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|e| malformed(text, &e.to_string()))
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Text(ts.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Text(ts.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl TryFrom<Value> for DateTime<FixedOffset> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => parse(&s),
            other => Err(unexpected("DateTime<FixedOffset>", &other)),
        }
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => parse(&s).map(|ts| ts.with_timezone(&Utc)),
            other => Err(unexpected("DateTime<Utc>", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_keeps_offset() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let ts = tz.with_ymd_and_hms(2024, 3, 1, 18, 4, 5).unwrap();
        assert_eq!(
            Value::from(ts),
            Value::Text("2024-03-01T18:04:05+0100".to_string())
        );
    }

    #[test]
    fn test_utc_encodes_zero_offset() {
        let ts = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            Value::from(ts),
            Value::Text("2023-12-31T23:59:59+0000".to_string())
        );
    }

    #[test]
    fn test_decode_same_pattern() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = tz.with_ymd_and_hms(2022, 7, 4, 9, 30, 0).unwrap();
        let decoded = DateTime::<FixedOffset>::try_from(Value::from(ts)).unwrap();
        assert_eq!(decoded, ts);
        assert_eq!(decoded.offset(), ts.offset());
    }

    #[test]
    fn test_mismatched_format_is_decode_error() {
        let err = DateTime::<Utc>::try_from(Value::Text("2022-07-04 09:30:00".into()))
            .unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn test_colon_offset_is_decode_error() {
        let err = DateTime::<FixedOffset>::try_from(Value::Text(
            "2024-05-17T08:30:00+02:00".into(),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Type(ref e) if e.actual.contains("+HHMM")));

        assert!(DateTime::<Utc>::try_from(Value::Text("2024-05-17T08:30:00Z".into())).is_err());
        assert!(DateTime::<Utc>::try_from(Value::Text("+0200".into())).is_err());
    }
}
