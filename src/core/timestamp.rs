//! Serde adapter for persisted timestamps.
//!
//! Always writes ISO-8601 with millisecond precision. Reads either an
//! ISO-8601 string or a number of epoch milliseconds, since older manual
//! snapshots stored `Date.now()` directly.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Millis(i64),
    Text(String),
}

/// Serialize as ISO-8601.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

/// Deserialize from ISO-8601 or epoch milliseconds.
///
/// # Errors
///
/// Fails on unparseable strings or out-of-range numbers.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {ms}"))),
        Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
    }
}

/// The persisted textual form.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        at: chrono::DateTime<chrono::Utc>,
    }

    #[test]
    fn reads_iso_string() {
        let w: Wrapper = serde_json::from_str(r#"{"at": "2024-05-01T10:00:00.250Z"}"#).unwrap();
        assert_eq!(w.at.timestamp_millis(), 1_714_557_600_250);
    }

    #[test]
    fn reads_epoch_millis() {
        let w: Wrapper = serde_json::from_str(r#"{"at": 1714557600250}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"at":"2024-05-01T10:00:00.250Z"}"#
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"at": "yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"at": true}"#).is_err());
    }
}
