//! Host capabilities: browser windows, alarms and notifications.

pub mod alarms;
pub mod browser;
pub mod notify;
pub mod recording;
pub mod traits;

pub use alarms::{AlarmReceiver, TokioAlarms};
pub use browser::CommandBrowser;
pub use notify::LogNotifier;
pub use recording::{ManualAlarms, MemoryNotifier, RecordingBrowser};
pub use traits::{
    AlarmSchedule, Alarms, Browser, NewTab, NewWindow, Notifier, OpenTab, OpenWindow, TabId,
    WindowId,
};
