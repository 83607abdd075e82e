//! tabkeep - browser session snapshot manager.
//!
//! Captures the set of open windows and tabs into capped categories,
//! restores them on demand or at a scheduled time, and keeps user-managed
//! groups of sessions and links.

pub mod background;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod platform;
pub mod storage;

pub use background::Background;
pub use config::Config;
pub use error::{Error, Result};
