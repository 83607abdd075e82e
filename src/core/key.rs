//! Composite session keys.
//!
//! A key names a session as `(category, locator)`. Two textual forms exist:
//!
//! - `autoSessions_3`: index 3 into the current `autoSessions` list.
//! - `auto_1714557600250`: the record id, stable across captures.
//!
//! Keys are always resolved against the live list when used. Index keys go
//! stale whenever a capture, eviction or deletion shifts the list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::session::{Category, SessionRecord};
use crate::error::Error;

/// Where in a category list a session lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Position in the list at the time of use.
    Index(usize),
    /// Full record id.
    Id(String),
}

/// A `(category, locator)` reference to a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionKey {
    pub category: Category,
    pub locator: Locator,
}

impl SessionKey {
    /// Key for a list position.
    #[must_use]
    pub fn index(category: Category, index: usize) -> Self {
        Self {
            category,
            locator: Locator::Index(index),
        }
    }

    /// Key for a record id.
    #[must_use]
    pub fn id(category: Category, id: impl Into<String>) -> Self {
        Self {
            category,
            locator: Locator::Id(id.into()),
        }
    }

    /// Position of the referenced session in `list`, if present.
    #[must_use]
    pub fn position(&self, list: &[SessionRecord]) -> Option<usize> {
        match &self.locator {
            Locator::Index(i) => (*i < list.len()).then_some(*i),
            Locator::Id(id) => list.iter().position(|r| &r.id == id),
        }
    }

    /// The referenced session in `list`, if present.
    #[must_use]
    pub fn resolve<'a>(&self, list: &'a [SessionRecord]) -> Option<&'a SessionRecord> {
        self.position(list).map(|i| &list[i])
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Locator::Index(i) => write!(f, "{}_{i}", self.category.storage_key()),
            Locator::Id(id) => f.write_str(id),
        }
    }
}

impl FromStr for SessionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, rest) = s
            .rsplit_once('_')
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;

        if let Some(category) = Category::from_storage_key(prefix) {
            let index = rest
                .parse::<usize>()
                .map_err(|_| Error::InvalidKey(s.to_string()))?;
            return Ok(Self::index(category, index));
        }

        if let Some(category) = Category::from_short(prefix) {
            if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidKey(s.to_string()));
            }
            return Ok(Self::id(category, s));
        }

        Err(Error::InvalidKey(s.to_string()))
    }
}

impl TryFrom<String> for SessionKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionKey> for String {
    fn from(key: SessionKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str) -> SessionRecord {
        SessionRecord::new(id.to_string(), Utc::now(), vec![])
    }

    #[test]
    fn parse_index_key() {
        let key: SessionKey = "autoSessions_3".parse().unwrap();
        assert_eq!(key, SessionKey::index(Category::Auto, 3));
        assert_eq!(key.to_string(), "autoSessions_3");
    }

    #[test]
    fn parse_id_key() {
        let key: SessionKey = "manual_1714557600250".parse().unwrap();
        assert_eq!(key.category, Category::Manual);
        assert_eq!(key.locator, Locator::Id("manual_1714557600250".to_string()));
        assert_eq!(key.to_string(), "manual_1714557600250");
    }

    #[test]
    fn reject_malformed_keys() {
        for bad in [
            "",
            "autoSessions",
            "autoSessions_",
            "autoSessions_x",
            "auto_",
            "auto_12a",
            "groups_1",
            "schedule_1714557600250",
        ] {
            assert!(bad.parse::<SessionKey>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn resolve_by_index_and_id() {
        let list = vec![record("auto_1"), record("auto_2")];

        assert_eq!(
            SessionKey::index(Category::Auto, 1).resolve(&list).unwrap().id,
            "auto_2"
        );
        assert!(SessionKey::index(Category::Auto, 2).resolve(&list).is_none());
        assert_eq!(
            SessionKey::id(Category::Auto, "auto_1").position(&list),
            Some(0)
        );
        assert!(SessionKey::id(Category::Auto, "auto_9").resolve(&list).is_none());
    }

    #[test]
    fn index_key_goes_stale_after_eviction() {
        let mut list = vec![record("auto_1"), record("auto_2")];
        let key = SessionKey::index(Category::Auto, 0);
        assert_eq!(key.resolve(&list).unwrap().id, "auto_1");

        list.remove(0);
        assert_eq!(key.resolve(&list).unwrap().id, "auto_2");
    }

    #[test]
    fn serde_as_string() {
        let key = SessionKey::index(Category::Change, 0);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""changeSessions_0""#);

        let back: SessionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);

        assert!(serde_json::from_str::<SessionKey>(r#""nope""#).is_err());
    }
}
