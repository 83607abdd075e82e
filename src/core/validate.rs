//! Input validation applied before anything is persisted.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use url::Url;

use crate::error::{Error, Result};

/// Whether `s` parses as an absolute URL.
#[must_use]
pub fn is_valid_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Trim, drop blanks and require at least one URL, all valid.
///
/// # Errors
///
/// Returns `Validation` when no URL remains or any URL fails to parse.
pub fn validate_urls<S: AsRef<str>>(urls: &[S]) -> Result<Vec<String>> {
    let urls: Vec<String> = urls
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect();

    if urls.is_empty() {
        return Err(Error::Validation("enter at least one link".to_string()));
    }

    let invalid: Vec<&str> = urls
        .iter()
        .map(String::as_str)
        .filter(|u| !is_valid_url(u))
        .collect();
    if !invalid.is_empty() {
        return Err(Error::Validation(format!(
            "invalid links: {}",
            invalid.join(", ")
        )));
    }

    Ok(urls)
}

/// Require `time` to be strictly after `now`.
///
/// # Errors
///
/// Returns `Validation` for present or past times.
pub fn ensure_future(time: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if time <= now {
        return Err(Error::Validation(format!(
            "scheduled time {} is not in the future",
            time.to_rfc3339()
        )));
    }
    Ok(())
}

/// Require a non-blank name and return it trimmed.
///
/// # Errors
///
/// Returns `Validation` for blank names.
pub fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("enter a name".to_string()));
    }
    Ok(name.to_string())
}

/// Parse a schedule time.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) or a local
/// `YYYY-MM-DDTHH:MM` / `YYYY-MM-DD HH:MM` as typed into a date picker.
///
/// # Errors
///
/// Returns `Validation` if the input matches none of the formats.
pub fn parse_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::Validation("set a date and time".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    Err(Error::Validation(format!("invalid date and time: {input}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn urls_are_trimmed_and_blanks_dropped() {
        let urls = validate_urls(&[" https://a.test ", "", "https://b.test"]).unwrap();
        assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn empty_url_list_rejected() {
        let err = validate_urls(&["  ", ""]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn invalid_urls_are_listed() {
        let err = validate_urls(&["https://ok.test", "not a url", "also bad"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not a url"));
        assert!(msg.contains("also bad"));
        assert!(!msg.contains("ok.test"));
    }

    #[test]
    fn now_is_not_future() {
        let now = Utc::now();
        assert!(ensure_future(now, now).is_err());
        assert!(ensure_future(now - Duration::seconds(1), now).is_err());
        assert!(ensure_future(now + Duration::milliseconds(1), now).is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(require_name("  ").is_err());
        assert_eq!(require_name(" Work ").unwrap(), "Work");
    }

    #[test]
    fn parse_rfc3339_and_picker_formats() {
        let t = parse_time("2030-01-02T03:04:05Z").unwrap();
        assert_eq!(t.to_rfc3339(), "2030-01-02T03:04:05+00:00");

        assert!(parse_time("2030-01-02T03:04").is_ok());
        assert!(parse_time("2030-01-02 03:04").is_ok());
        assert!(parse_time("").is_err());
        assert!(parse_time("tomorrow").is_err());
    }
}
