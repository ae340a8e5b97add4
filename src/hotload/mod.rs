//! Utilities for loading RON files and watching directories for changes.
//!
//! Provides a small helper for reading every RON file in a directory and a
//! filesystem watcher that raises a shared flag when one of them is
//! modified. Used to hot-reload the controller settings while tuning.

use bevy::log::warn;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-watcher handle for RON hot-reload.
pub struct RonWatcher {
    changed: Arc<AtomicBool>, // Set when a watched file is modified.
    _watcher: Option<RecommendedWatcher>, // kept alive for the lifetime of the handle
}

impl RonWatcher {
    /// Create a `RonWatcher` with no OS watcher behind it.
    ///
    /// Its flag is never raised by the filesystem. Used as a fallback when
    /// the watcher cannot be created.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher { changed: Arc::new(AtomicBool::new(false)), _watcher: None }
    }

    /// Return whether a change was seen since the last call, clearing the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Raise the flag by hand (e.g. a "reload" key).
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

/// Parse one RON document.
///
/// # Errors
/// Returns the `ron` error if `content` does not deserialize into `T`.
pub fn parse_ron<T: DeserializeOwned>(content: &str) -> Result<T, ron::error::SpannedError> {
    ron::from_str::<T>(content)
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in file-name order. Files that fail to parse are
/// skipped with a warning. A missing directory yields an empty list.
///
/// # Arguments
/// * `path` - Directory path to scan for `.ron` files.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    let mut items = Vec::new();
    for file in files {
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read {}: {e}", file.display());
                continue;
            }
        };
        match parse_ron::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Arguments
/// * `path` - Directory path to watch for `.ron` file changes.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(AtomicBool::new(false));
    let flag = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    let p = std::fs::canonicalize(p).unwrap_or_else(|_| p.clone());
                    p.starts_with(&watched_path)
                });
                if relevant {
                    flag.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
