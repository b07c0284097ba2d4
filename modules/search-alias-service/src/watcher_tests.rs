//! Integration tests for hot reload of the bookmarks file.
//!
//! Each test gets its own temp directory and registry, starts a watcher with
//! a reload signal, and waits on that signal instead of polling.

use crate::registry::{Registry, RegistryError};
use crate::watcher::{ReloadEvent, ReloadWatcher};
use search_alias_types::Bookmark;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

const WAIT: Duration = Duration::from_secs(5);

struct TestHarness {
    _dir: TempDir,
    path: PathBuf,
    registry: Arc<Registry>,
    watcher: ReloadWatcher,
    events: mpsc::UnboundedReceiver<ReloadEvent>,
}

impl TestHarness {
    /// Empty bookmarks file, registry opened on it, watcher running.
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookmarks.toml");
        std::fs::write(&path, "").expect("create bookmarks file");

        let registry = Arc::new(Registry::open(&path).expect("open registry"));
        let (tx, events) = mpsc::unbounded_channel();
        let watcher =
            ReloadWatcher::start_with_signal(registry.clone(), tx).expect("start watcher");

        Self {
            _dir: dir,
            path,
            registry,
            watcher,
            events,
        }
    }

    async fn next_event(&mut self) -> ReloadEvent {
        timeout(WAIT, self.events.recv())
            .await
            .expect("timed out waiting for reload")
            .expect("watcher signal closed")
    }
}

fn write_bookmarks(path: &Path, pairs: &[(&str, &str)]) {
    let map: BTreeMap<&str, &str> = pairs.iter().copied().collect();
    std::fs::write(path, toml::to_string(&map).unwrap()).unwrap();
}

#[tokio::test]
async fn test_external_edit_reloads() {
    let mut h = TestHarness::new();
    assert!(h.registry.is_empty());

    write_bookmarks(&h.path, &[("a", "http://a"), ("b", "http://b")]);
    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 2 });
    assert_eq!(
        h.registry.all(),
        vec![Bookmark::new("a", "http://a"), Bookmark::new("b", "http://b")]
    );

    // Keys missing from the file are dropped, not retained.
    write_bookmarks(&h.path, &[("a", "http://a")]);
    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 1 });
    assert_eq!(h.registry.all(), vec![Bookmark::new("a", "http://a")]);

    h.watcher.stop().await;
}

#[tokio::test]
async fn test_own_write_is_not_reloaded() {
    let mut h = TestHarness::new();

    h.registry.add("k", "https://k/?q=%s").unwrap();
    assert_eq!(h.next_event().await, ReloadEvent::SelfWriteIgnored);
    assert_eq!(h.registry.get("k").unwrap().url, "https://k/?q=%s");

    // The next outside write is reloaded again.
    write_bookmarks(&h.path, &[("k", "https://k/?q=%s"), ("x", "https://x")]);
    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 2 });

    h.registry.delete("x").unwrap();
    assert_eq!(h.next_event().await, ReloadEvent::SelfWriteIgnored);
    assert_eq!(h.registry.len(), 1);

    h.watcher.stop().await;
}

// One close-after-write per save, so every save cancels exactly one event.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_back_to_back_own_writes_are_not_reloaded() {
    let mut h = TestHarness::new();

    h.registry.add("a", "https://a").unwrap();
    h.registry.add("b", "https://b").unwrap();
    assert_eq!(h.next_event().await, ReloadEvent::SelfWriteIgnored);
    assert_eq!(h.next_event().await, ReloadEvent::SelfWriteIgnored);
    assert_eq!(h.registry.len(), 2);

    write_bookmarks(&h.path, &[("c", "https://c")]);
    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 1 });

    h.watcher.stop().await;
}

#[tokio::test]
async fn test_malformed_edit_keeps_previous_state() {
    let mut h = TestHarness::new();

    write_bookmarks(&h.path, &[("a", "http://a")]);
    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 1 });

    std::fs::write(&h.path, "a = { nested = true }\n").unwrap();
    match h.next_event().await {
        ReloadEvent::Failed(msg) => assert!(msg.contains("Malformed"), "{}", msg),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert_eq!(h.registry.all(), vec![Bookmark::new("a", "http://a")]);
    assert!(h.watcher.is_active());

    h.watcher.stop().await;
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_rename_into_place_reloads() {
    let mut h = TestHarness::new();

    let tmp = h.path.with_file_name("bookmarks.toml.swp");
    write_bookmarks(&tmp, &[("r", "https://r")]);
    std::fs::rename(&tmp, &h.path).unwrap();

    assert_eq!(h.next_event().await, ReloadEvent::Reloaded { entries: 1 });
    assert_eq!(h.registry.get("r").unwrap().url, "https://r");

    h.watcher.stop().await;
}

#[tokio::test]
async fn test_stop_ends_loop() {
    let h = TestHarness::new();
    let active = h.watcher.active_flag();
    assert!(active.load(std::sync::atomic::Ordering::SeqCst));

    timeout(WAIT, h.watcher.stop())
        .await
        .expect("stop should return promptly");
    assert!(!active.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_subscribe_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(Registry::open(dir.path().join("absent.toml")).unwrap());

    match ReloadWatcher::start(registry) {
        Err(RegistryError::WatchSubscribe(_)) => {}
        Err(e) => panic!("Expected WatchSubscribe, got {}", e),
        Ok(_) => panic!("Watcher should not start on a missing file"),
    }
}

#[tokio::test]
async fn test_subscribe_in_memory_fails() {
    let registry = Arc::new(Registry::in_memory());
    assert!(matches!(
        ReloadWatcher::start(registry),
        Err(RegistryError::WatchSubscribe(_))
    ));
}
