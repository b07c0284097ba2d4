//! Hot reload of the bookmarks file.
//!
//! Watches the backing file's directory and reloads the registry whenever the
//! file is written by someone else. Writes the registry performs itself are
//! recognised through its pending self-write count and skipped, one
//! notification per save.

use crate::registry::{Registry, RegistryError};
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What the watcher did with one write notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// The registry's own save; nothing reloaded
    SelfWriteIgnored,
    /// The file was reloaded and now holds `entries` bookmarks
    Reloaded { entries: usize },
    /// Reload failed; the previous bookmarks stay in place
    Failed(String),
}

/// Background task keeping a [`Registry`] in sync with its file.
pub struct ReloadWatcher {
    watcher: RecommendedWatcher,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    active: Arc<AtomicBool>,
}

impl ReloadWatcher {
    /// Start watching the registry's backing file.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(registry: Arc<Registry>) -> Result<Self, RegistryError> {
        Self::spawn(registry, None)
    }

    /// Like [`ReloadWatcher::start`], reporting every processed notification on `signal`.
    pub fn start_with_signal(
        registry: Arc<Registry>,
        signal: mpsc::UnboundedSender<ReloadEvent>,
    ) -> Result<Self, RegistryError> {
        Self::spawn(registry, Some(signal))
    }

    fn spawn(
        registry: Arc<Registry>,
        signal: Option<mpsc::UnboundedSender<ReloadEvent>>,
    ) -> Result<Self, RegistryError> {
        let path = registry
            .path()
            .ok_or_else(|| RegistryError::WatchSubscribe("registry has no backing file".into()))?
            .to_path_buf();

        std::fs::metadata(&path).map_err(|e| {
            RegistryError::WatchSubscribe(format!("{}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                RegistryError::WatchSubscribe(format!("{}: not a file path", path.display()))
            })?;

        // Watch the directory so a file replaced by rename is still seen.
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(|e| RegistryError::WatchSubscribe(e.to_string()))?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| RegistryError::WatchSubscribe(format!("{}: {}", dir.display(), e)))?;

        // A save made before subscribing produced no event we will see.
        registry.clear_self_write();

        let cancel = CancellationToken::new();
        let active = Arc::new(AtomicBool::new(true));

        log::info!("[SEARCH_ALIAS] Watching {} for changes", path.display());

        let task = tokio::spawn(run_watcher(
            registry,
            file_name,
            rx,
            cancel.clone(),
            active.clone(),
            signal,
        ));

        Ok(Self {
            watcher,
            cancel,
            task,
            active,
        })
    }

    /// Whether the watch loop is still running.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Shared view of [`ReloadWatcher::is_active`] for status reporting.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    /// Close the notification source and wait for the loop to exit.
    pub async fn stop(self) {
        let ReloadWatcher {
            watcher,
            cancel,
            task,
            active: _,
        } = self;

        cancel.cancel();
        drop(watcher);

        if let Err(e) = task.await {
            log::error!("[SEARCH_ALIAS] Watcher task failed: {}", e);
        }
    }
}

async fn run_watcher(
    registry: Arc<Registry>,
    file_name: OsString,
    mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    cancel: CancellationToken,
    active: Arc<AtomicBool>,
    signal: Option<mpsc::UnboundedSender<ReloadEvent>>,
) {
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => received,
        };

        let event = match received {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                log::error!("[SEARCH_ALIAS] Watch error, reload disabled: {}", e);
                break;
            }
            None => break,
        };

        if !is_write(&event.kind) || !touches(&event, &file_name) {
            continue;
        }

        let outcome = if registry.take_self_write() {
            log::debug!("[SEARCH_ALIAS] Ignoring our own write");
            ReloadEvent::SelfWriteIgnored
        } else {
            reload(&registry).await
        };

        if let Some(tx) = &signal {
            let _ = tx.send(outcome);
        }
    }

    active.store(false, Ordering::SeqCst);
    log::info!("[SEARCH_ALIAS] Watcher stopped");
}

async fn reload(registry: &Arc<Registry>) -> ReloadEvent {
    let registry = registry.clone();
    let path = registry
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    match tokio::task::spawn_blocking(move || registry.load()).await {
        Ok(Ok(entries)) => {
            log::info!("[SEARCH_ALIAS] Reloaded {} ({} bookmarks)", path, entries);
            ReloadEvent::Reloaded { entries }
        }
        Ok(Err(e)) => {
            log::error!("[SEARCH_ALIAS] Error reloading {}: {}", path, e);
            ReloadEvent::Failed(e.to_string())
        }
        Err(e) => {
            log::error!("[SEARCH_ALIAS] Reload task failed for {}: {}", path, e);
            ReloadEvent::Failed(e.to_string())
        }
    }
}

/// A finished write to a file: close-after-write or a rename into place.
#[cfg(target_os = "linux")]
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Access(AccessKind::Close(AccessMode::Write))
            | EventKind::Modify(ModifyKind::Name(RenameMode::To))
    )
}

/// Backends without close events report the modification itself.
#[cfg(not(target_os = "linux"))]
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Name(_))
            | EventKind::Create(_)
    )
}

fn touches(event: &Event, file_name: &OsString) -> bool {
    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
