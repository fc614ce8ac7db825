//! Configuration module for hierscope
//!
//! This module handles configuration including:
//! - View configurations (filter + visual mapping) saved as JSON or TOML
//! - Application state persistence (recent data files, last view config)
//!
//! # App Data Location
//!
//! Application state is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hierscope/`
//! - **macOS**: `~/Library/Application Support/dev.hierscope/`
//! - **Windows**: `%APPDATA%\dev.hierscope\`
//!
//! # Files
//!
//! - `app_state.json` - Recent data files and the last view config
//! - View configs (`.json` / `.toml`) - Saved wherever the user chooses
//!
//! # Example
//!
//! ```ignore
//! use hierscope::config::{AppState, ViewConfig};
//!
//! let mut state = AppState::load_or_default();
//! let view = match state.last_view_config() {
//!     Some(path) => ViewConfig::load(path)?,
//!     None => ViewConfig::default(),
//! };
//!
//! state.add_recent_file("timing.csv", 1200);
//! state.save()?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{HierScopeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hierscope";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Maximum number of recent data files to remember
pub const MAX_RECENT_FILES: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        HierScopeError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            HierScopeError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Recent File Entry ====================

/// A recently opened timing export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFile {
    /// Path to the data file
    pub path: PathBuf,

    /// When the file was last opened
    pub last_opened: DateTime<Utc>,

    /// Records loaded at that time
    #[serde(default)]
    pub record_count: usize,
}

impl RecentFile {
    pub fn new(path: impl Into<PathBuf>, record_count: usize) -> Self {
        Self {
            path: path.into(),
            last_opened: Utc::now(),
            record_count,
        }
    }

    /// Update the last opened timestamp
    pub fn touch(&mut self) {
        self.last_opened = Utc::now();
    }

    /// Check if the data file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// Persistent application state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Recently opened data files, most recent first
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,

    /// Path of the last view config that was loaded or saved
    #[serde(default)]
    pub last_view_config: Option<PathBuf>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_files: Vec::new(),
            last_view_config: None,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            HierScopeError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load app state from `path`; a missing file yields defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| HierScopeError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| HierScopeError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Save app state to `path`
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| HierScopeError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| HierScopeError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Add or refresh a recent data file
    pub fn add_recent_file(&mut self, path: impl AsRef<Path>, record_count: usize) {
        let path = path.as_ref().to_path_buf();

        self.recent_files.retain(|f| f.path != path);
        self.recent_files.insert(0, RecentFile::new(path, record_count));
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Remove a data file from recents
    pub fn remove_recent_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_files.retain(|f| f.path != path);
    }

    /// Drop recent files that no longer exist
    pub fn cleanup_missing_files(&mut self) {
        self.recent_files.retain(RecentFile::exists);

        if let Some(ref last) = self.last_view_config {
            if !last.exists() {
                self.last_view_config = None;
            }
        }
    }

    pub fn set_last_view_config(&mut self, path: impl Into<PathBuf>) {
        self.last_view_config = Some(path.into());
    }

    /// The last view config, if it still exists
    pub fn last_view_config(&self) -> Option<&Path> {
        self.last_view_config
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| p.as_path())
    }

    /// The most recently opened data file, if it still exists
    pub fn last_file(&self) -> Option<&Path> {
        self.recent_files
            .iter()
            .find(|f| f.exists())
            .map(|f| f.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_files_order_and_dedup() {
        let mut state = AppState::default();
        state.add_recent_file("a.csv", 1);
        state.add_recent_file("b.csv", 2);
        state.add_recent_file("a.csv", 3);

        let paths: Vec<_> = state.recent_files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(state.recent_files[0].record_count, 3);

        state.remove_recent_file("b.csv");
        assert_eq!(state.recent_files.len(), 1);
    }

    #[test]
    fn test_recent_files_truncated() {
        let mut state = AppState::default();
        for i in 0..(MAX_RECENT_FILES + 5) {
            state.add_recent_file(format!("f{}.csv", i), i);
        }
        assert_eq!(state.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(
            state.recent_files[0].path,
            PathBuf::from(format!("f{}.csv", MAX_RECENT_FILES + 4))
        );
    }

    #[test]
    fn test_save_and_load_state() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("timing.csv");
        std::fs::write(&data, "hier,connnecting_hier\n").unwrap();

        let mut state = AppState::default();
        state.add_recent_file(&data, 42);
        state.add_recent_file(dir.path().join("gone.csv"), 1);
        state.set_last_view_config(dir.path().join("missing.toml"));

        let path = dir.path().join(APP_STATE_FILE);
        state.save_to(&path).unwrap();
        let mut loaded = AppState::load_from(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.last_file(), Some(data.as_path()));
        assert!(loaded.last_view_config().is_none());

        loaded.cleanup_missing_files();
        assert_eq!(loaded.recent_files.len(), 1);
        assert!(loaded.last_view_config.is_none());
    }

    #[test]
    fn test_missing_state_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::load_from(dir.path().join("nope.json")).unwrap();
        assert_eq!(state, AppState::default());
    }
}
