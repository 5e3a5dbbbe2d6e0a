//! Recently opened and saved scene files, most recent first

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::log_debug;
use crate::utils::fs::{read_json_document, write_json_document};

/// Snapshot of the environment at the time a file was opened or saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFileEntry {
    pub path: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub task: String,
}

impl RecentFileEntry {
    pub fn new(path: &Path, env: &Environment) -> Self {
        Self {
            path: path.display().to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            client: env.client.clone(),
            project: env.project.clone(),
            asset: env.asset.clone(),
            task: env.task.clone(),
        }
    }

    pub fn environment(&self) -> Environment {
        Environment::new(
            self.client.clone(),
            self.project.clone(),
            self.asset.clone(),
            self.task.clone(),
        )
    }
}

/// The recent-files document, rewritten in full on every change
pub struct RecentFiles {
    path: PathBuf,
    entries: Vec<RecentFileEntry>,
}

impl RecentFiles {
    /// Missing file means no recent files yet
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_json_document(&path)?.unwrap_or_default();
        Ok(Self { path, entries })
    }

    pub fn list(&self) -> &[RecentFileEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RecentFileEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `entry` to the front, dropping any older entry with the same
    /// path, then keep at most `cap` entries
    pub fn record(&mut self, entry: RecentFileEntry, cap: usize) -> Result<()> {
        self.entries.retain(|e| e.path != entry.path);
        self.entries.insert(0, entry);
        self.entries.truncate(cap);
        log_debug!("Recent files now hold {} entries", self.entries.len());
        self.save()
    }

    /// Returns whether an entry was removed
    pub fn remove(&mut self, path: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        let removed = self.entries.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        write_json_document(&self.path, &self.entries)
    }
}
