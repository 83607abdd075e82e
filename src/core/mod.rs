//! Core types and rules.

pub mod capacity;
pub mod group;
pub mod ids;
pub mod key;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod stats;
pub mod timestamp;
pub mod validate;

pub use group::{Group, GroupKind};
pub use ids::IdGenerator;
pub use key::{Locator, SessionKey};
pub use schedule::{ScheduleKind, ScheduledEntry};
pub use session::{Category, SessionRecord, TabSnapshot, WindowSnapshot};
pub use settings::{CategorySettings, Settings, Theme};
pub use stats::SessionStats;
