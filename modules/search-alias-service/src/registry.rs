//! File-backed bookmark registry.
//!
//! Holds the authoritative name → URL template map behind a single RwLock.
//! The backing file is a flat TOML table (`name = "url"`), rewritten in full
//! on every mutation. A reload replaces the map wholesale: keys missing from
//! the file are dropped, never merged back in.

use parking_lot::RwLock;
use search_alias_types::Bookmark;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Error type for registry and persistence operations.
#[derive(Debug)]
pub enum RegistryError {
    /// The backing file does not exist
    NotFound(PathBuf),
    /// No bookmark with this name
    UnknownBookmark(String),
    /// The backing file is not a flat table of strings
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The map could not be rendered as TOML
    Serialize(toml::ser::Error),
    /// Reading or writing the backing file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The reload watcher could not subscribe to the backing file
    WatchSubscribe(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(path) => {
                write!(f, "Bookmarks file not found: {}", path.display())
            }
            RegistryError::UnknownBookmark(name) => write!(f, "Unknown bookmark: {}", name),
            RegistryError::Malformed { path, source } => {
                write!(f, "Malformed bookmarks file {}: {}", path.display(), source)
            }
            RegistryError::Serialize(e) => write!(f, "Failed to serialize bookmarks: {}", e),
            RegistryError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            RegistryError::WatchSubscribe(msg) => write!(f, "Failed to watch bookmarks: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Malformed { source, .. } => Some(source),
            RegistryError::Serialize(e) => Some(e),
            RegistryError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Thread-safe bookmark store with optional file persistence.
pub struct Registry {
    /// `None` keeps the registry in memory only
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
    /// Own writes whose filesystem event the watcher has not consumed yet
    pending_self_writes: AtomicUsize,
}

impl Registry {
    /// Open a registry backed by `path`. An empty path disables persistence.
    ///
    /// A missing file yields an empty registry; any other read or parse
    /// failure is returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let registry = Self {
            path: (!path.as_os_str().is_empty()).then(|| path.to_path_buf()),
            entries: RwLock::new(BTreeMap::new()),
            pending_self_writes: AtomicUsize::new(0),
        };

        match registry.load() {
            Ok(_) | Err(RegistryError::NotFound(_)) => Ok(registry),
            Err(e) => Err(e),
        }
    }

    /// A registry that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
            pending_self_writes: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or overwrite a bookmark, then persist the whole map.
    ///
    /// The in-memory entry stays applied even when persisting fails.
    pub fn add(&self, name: &str, url: &str) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        entries.insert(name.to_string(), url.to_string());
        self.write_file(&entries)
    }

    pub fn get(&self, name: &str) -> Option<Bookmark> {
        self.entries
            .read()
            .get(name)
            .map(|url| Bookmark::new(name, url.as_str()))
    }

    /// Remove a bookmark, then persist the whole map.
    pub fn delete(&self, name: &str) -> Result<(), RegistryError> {
        // Check and removal share one write guard.
        let mut entries = self.entries.write();
        if entries.remove(name).is_none() {
            return Err(RegistryError::UnknownBookmark(name.to_string()));
        }
        self.write_file(&entries)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every bookmark, sorted by name.
    pub fn all(&self) -> Vec<Bookmark> {
        self.entries
            .read()
            .iter()
            .map(|(name, url)| Bookmark::new(name.as_str(), url.as_str()))
            .collect()
    }

    /// Replace the in-memory map with the contents of the backing file.
    ///
    /// Returns the number of bookmarks now held. On error the previous map
    /// is left untouched.
    pub fn load(&self) -> Result<usize, RegistryError> {
        let Some(path) = &self.path else {
            return Ok(self.len());
        };

        let mut entries = self.entries.write();

        let data = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RegistryError::NotFound(path.clone())
            } else {
                RegistryError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let parsed: BTreeMap<String, String> =
            toml::from_str(&data).map_err(|source| RegistryError::Malformed {
                path: path.clone(),
                source,
            })?;

        *entries = parsed;
        Ok(entries.len())
    }

    /// Write the full map to the backing file.
    pub fn save(&self) -> Result<(), RegistryError> {
        let entries = self.entries.write();
        self.write_file(&entries)
    }

    /// Merge `defaults` into the registry (defaults win) and persist.
    pub fn seed_defaults(&self, defaults: &[(&str, &str)]) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        for (name, url) in defaults {
            entries.insert(name.to_string(), url.to_string());
        }
        self.write_file(&entries)
    }

    /// Consume one pending self-write, returning whether there was one.
    pub fn take_self_write(&self) -> bool {
        self.pending_self_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Forget every pending self-write.
    pub fn clear_self_write(&self) {
        self.pending_self_writes.store(0, Ordering::SeqCst);
    }

    /// Caller must hold the write guard for `entries`.
    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), RegistryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let data = toml::to_string(entries).map_err(RegistryError::Serialize)?;

        self.pending_self_writes.fetch_add(1, Ordering::SeqCst);
        if let Err(source) = std::fs::write(path, data) {
            // No filesystem event will follow a failed write.
            self.take_self_write();
            return Err(RegistryError::Io {
                path: path.clone(),
                source,
            });
        }

        log::debug!(
            "[SEARCH_ALIAS] Saved {} bookmarks to {}",
            entries.len(),
            path.display()
        );
        Ok(())
    }
}
