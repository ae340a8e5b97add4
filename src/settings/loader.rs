//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in a settings directory (by default
//! `data/settings`). If several RON files are present, the first one (by file
//! name) that parses wins. If none parse, defaults are used.
use crate::hotload::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;
use bevy::prelude::*;

/// Default directory the game reads settings from.
pub const SETTINGS_DIR: &str = "data/settings";

/// Watches the settings directory so edits apply without a restart.
#[derive(Resource)]
pub struct SettingsWatcher {
    watcher: RonWatcher,
    dir: String,
}

impl SettingsWatcher {
    /// A watcher that never fires, reloading from `dir` only if marked by hand.
    #[must_use]
    pub fn stub(dir: &str) -> Self {
        SettingsWatcher { watcher: RonWatcher::stub(), dir: dir.to_string() }
    }

    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn mark_changed(&self) {
        self.watcher.mark_changed();
    }
}

/// Load settings from `path` (directory).
///
/// # Arguments
/// * `path` - The directory path where settings RON files are located (e.g., "data/settings").
///
/// # Returns
/// The first successfully parsed `Settings`, or defaults.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        info!("loaded settings from {path}");
        first
    } else {
        info!("no settings found in {path}, using defaults");
        Settings::defaults()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns a `notify::Error` if the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher { watcher, dir: path.to_string() })
}

/// Watch `path`, falling back to a stub watcher when that fails.
#[must_use]
pub fn settings_watcher_or_stub(path: &str) -> SettingsWatcher {
    setup_settings_watcher(path).unwrap_or_else(|e| {
        warn!("settings hot-reload disabled: {e}");
        SettingsWatcher::stub(path)
    })
}

/// Reload the `Settings` resource when the watched files change.
///
/// Only replaces the resource when the reloaded value differs, so systems
/// keyed on `Res<Settings>::is_changed` don't rerun on no-op saves.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }
    info!("settings changed, reloading");
    let reloaded = load_settings_from_dir(watcher.dir());
    settings.set_if_neq(reloaded);
}
