//! Scene files of the current task folder

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::recent::RecentFileEntry;

/// Format used to show file modification times
pub const DATE_FORMAT: &str = "%m/%d/%Y  | %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Modification time, formatted for display
    pub modified: String,
}

impl SceneFile {
    pub fn to_recent_entry(&self, env: &Environment) -> RecentFileEntry {
        RecentFileEntry::new(&self.path, env)
    }
}

/// Visible files of `dir`, sorted by name
pub fn list_scene_files(dir: &Path) -> Result<Vec<SceneFile>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') || !entry.file_type()?.is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .map(format_modified)
            .unwrap_or_default();

        files.push(SceneFile {
            path: entry.path(),
            file_name,
            modified,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

fn format_modified(time: std::time::SystemTime) -> String {
    DateTime::<Local>::from(time).format(DATE_FORMAT).to_string()
}
