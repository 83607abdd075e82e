//! Millisecond-based identifiers.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::core::session::Category;

/// Hands out strictly increasing epoch-millisecond stamps.
///
/// Two captures in the same millisecond get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp, at least `now` and greater than every earlier stamp.
    pub fn next_millis(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let next = candidate.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// `{category}_{millis}`
    pub fn session_id(&self, category: Category, now: DateTime<Utc>) -> String {
        format!("{}_{}", category.as_str(), self.next_millis(now))
    }

    /// `schedule_{millis}`
    pub fn schedule_id(&self, now: DateTime<Utc>) -> String {
        format!("schedule_{}", self.next_millis(now))
    }

    /// `group_{millis}`
    pub fn group_id(&self, now: DateTime<Utc>) -> String {
        format!("group_{}", self.next_millis(now))
    }
}
