//! Constants for asset-explorer data paths and defaults

use std::path::{Path, PathBuf};

/// Data directory name inside the platform configuration directory
pub const DATA_DIR_NAME: &str = "asset-explorer";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "ASSET_EXPLORER_DATA";

pub const SETTINGS_FILE: &str = "settings.json";
pub const RECENT_FILES_FILE: &str = "recent_files.json";
pub const BLACKLIST_FILE: &str = "selector_word_black_list.json";
pub const PROFILES_DIR: &str = "hierarchy_profiles";

/// Extension of scene files written by save-as
pub const SCENE_EXTENSION: &str = "ma";

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_RECENT_FILES_AMOUNT: usize = 10;

/// Get the default data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Locations of every document kept in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn recent_files(&self) -> PathBuf {
        self.root.join(RECENT_FILES_FILE)
    }

    pub fn blacklist_file(&self) -> PathBuf {
        self.root.join(BLACKLIST_FILE)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(PROFILES_DIR)
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(get_data_dir())
    }
}
