//! Integration tests for the background service against real timers and
//! the file store.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tabkeep::background::{Background, BrowserEvent, Capabilities, Request, Response};
use tabkeep::config::Options;
use tabkeep::core::schedule::ScheduleKind;
use tabkeep::core::{Category, SessionKey};
use tabkeep::platform::recording::{BrowserCall, open_window};
use tabkeep::platform::{
    AlarmReceiver, ManualAlarms, MemoryNotifier, RecordingBrowser, TokioAlarms,
};
use tabkeep::storage::{FileStore, KeyValueStore, MemoryStore, write_value};
use tempfile::TempDir;

struct Service {
    background: Background,
    browser: Arc<RecordingBrowser>,
    alarms: Arc<TokioAlarms>,
}

fn service(store: Arc<dyn KeyValueStore>, browser: RecordingBrowser) -> (Service, AlarmReceiver) {
    let browser = Arc::new(browser);
    let (alarms, fired) = TokioAlarms::new();
    let alarms = Arc::new(alarms);
    let background = Background::new(
        Capabilities {
            store,
            browser: browser.clone(),
            alarms: alarms.clone(),
            notifier: Arc::new(MemoryNotifier::new()),
        },
        Options::default(),
    );
    (
        Service {
            background,
            browser,
            alarms,
        },
        fired,
    )
}

#[tokio::test(start_paused = true)]
async fn scheduled_custom_links_open_once_and_are_consumed() {
    let (svc, fired) = service(Arc::new(MemoryStore::new()), RecordingBrowser::new());
    tokio::spawn({
        let background = svc.background.clone();
        async move { background.run(fired).await }
    });

    let entry = svc
        .background
        .schedule(
            ScheduleKind::Custom {
                urls: vec!["https://a.test".to_string(), "https://b.test".to_string()],
            },
            Utc::now() + ChronoDuration::milliseconds(1000),
        )
        .await
        .unwrap();
    assert!(svc.alarms.names().contains(&entry.id));

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(svc.browser.window_urls(), vec!["https://a.test"]);
    assert_eq!(svc.browser.tab_urls(), vec!["https://b.test"]);
    assert!(svc.background.scheduled_entries().await.unwrap().is_empty());
    assert!(svc.alarms.names().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_entry_never_fires() {
    let (svc, fired) = service(Arc::new(MemoryStore::new()), RecordingBrowser::new());
    tokio::spawn({
        let background = svc.background.clone();
        async move { background.run(fired).await }
    });

    let entry = svc
        .background
        .schedule(
            ScheduleKind::Custom {
                urls: vec!["https://a.test".to_string()],
            },
            Utc::now() + ChronoDuration::seconds(5),
        )
        .await
        .unwrap();
    let response = svc
        .background
        .handle(Request::CancelScheduledSession {
            schedule_id: entry.id.clone(),
        })
        .await;
    assert_eq!(response, Response::success());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(svc.browser.calls().is_empty());
}

#[tokio::test]
async fn eviction_keeps_newest_two() {
    let store = Arc::new(MemoryStore::new());
    write_value(store.as_ref(), "autoSessionsMax", serde_json::Value::from(2))
        .await
        .unwrap();
    let browser = RecordingBrowser::new();
    let (svc, _fired) = service(store, browser);

    let mut ids = Vec::new();
    for url in ["https://a.test", "https://b.test", "https://c.test"] {
        svc.browser.set_windows(vec![open_window(1, &[url])]);
        let record = svc
            .background
            .capture_session(Category::Auto)
            .await
            .unwrap()
            .unwrap();
        ids.push(record.id);
    }

    let stored = svc.background.list_sessions(Category::Auto).await.unwrap();
    let urls: Vec<_> = stored
        .iter()
        .map(|r| r.windows[0].tabs[0].url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://b.test", "https://c.test"]);
    assert_eq!(stored[0].id, ids[1]);
}

#[tokio::test(start_paused = true)]
async fn change_events_debounce_into_one_capture() {
    let (svc, _fired) = service(
        Arc::new(MemoryStore::new()),
        RecordingBrowser::with_windows(vec![open_window(1, &["https://a.test"])]),
    );

    for id in 0..4 {
        svc.background
            .on_browser_event(&BrowserEvent::TabCreated { tab_id: Some(id) });
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    let stored = svc.background.list_sessions(Category::Change).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn file_store_survives_restart() {
    let temp = TempDir::new().unwrap();
    let browser = || RecordingBrowser::with_windows(vec![open_window(1, &["https://a.test", "https://b.test"])]);

    let (first, _fired) = service(Arc::new(FileStore::new(temp.path()).unwrap()), browser());
    let record = first
        .background
        .capture_session(Category::Auto)
        .await
        .unwrap()
        .unwrap();
    drop(first);

    let (second, _fired) = service(Arc::new(FileStore::new(temp.path()).unwrap()), browser());
    let stored = second.background.list_sessions(Category::Auto).await.unwrap();
    assert_eq!(stored, vec![record]);
}

#[tokio::test(start_paused = true)]
async fn restore_by_id_key_issues_every_tab() {
    let (svc, _fired) = service(
        Arc::new(MemoryStore::new()),
        RecordingBrowser::with_windows(vec![
            open_window(1, &["https://a.test", "https://b.test"]),
            open_window(2, &["https://c.test"]),
        ]),
    );
    let record = svc
        .background
        .capture_session(Category::Manual)
        .await
        .unwrap()
        .unwrap();

    let key: SessionKey = record.id.parse().unwrap();
    let summary = svc.background.restore_session(&key).await.unwrap();
    assert_eq!(summary.windows_created, 2);
    assert_eq!(summary.tabs_created, 3);

    let calls = svc.browser.calls();
    assert_eq!(
        calls,
        vec![
            BrowserCall::CreateWindow {
                url: "https://a.test".to_string()
            },
            BrowserCall::CreateTab {
                window_id: Some(1000),
                url: "https://b.test".to_string(),
                index: Some(1)
            },
            BrowserCall::CreateWindow {
                url: "https://c.test".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn restart_rearms_pending_entries() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let time = Utc::now() + ChronoDuration::hours(1);

    let manual = Background::new(
        Capabilities {
            store: store.clone(),
            browser: Arc::new(RecordingBrowser::new()),
            alarms: Arc::new(ManualAlarms::new()),
            notifier: Arc::new(MemoryNotifier::new()),
        },
        Options::default(),
    );
    let entry = manual
        .schedule(
            ScheduleKind::Custom {
                urls: vec!["https://a.test".to_string()],
            },
            time,
        )
        .await
        .unwrap();

    let (svc, _fired) = service(store, RecordingBrowser::new());
    svc.background.start().await.unwrap();
    let names = svc.alarms.names();
    assert!(names.contains(&entry.id));
    assert!(names.contains(&"autoBackup".to_string()));
}
