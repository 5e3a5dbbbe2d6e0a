use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::constants::{DataPaths, DEFAULT_PROFILE, DEFAULT_RECENT_FILES_AMOUNT};
use crate::environment::Environment;
use crate::utils::fs::{expand_tilde, read_json_document, write_json_document};

/// The settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root folder that holds every client
    #[serde(default)]
    pub project_path: String,
    #[serde(default = "default_profile")]
    pub current_hierarchy_profile: String,
    /// Task picked when an asset is selected and the task exists
    #[serde(default)]
    pub default_task: String,
    /// Older documents store the cap as text
    #[serde(
        default = "default_recent_files_amount",
        deserialize_with = "deserialize_amount"
    )]
    pub recent_files_amount: usize,
    #[serde(default)]
    pub current_environment: Environment,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_recent_files_amount() -> usize {
    DEFAULT_RECENT_FILES_AMOUNT
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(usize),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(amount) => Ok(amount),
        Amount::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid recent_files_amount '{text}'"))
        }),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_path: String::new(),
            current_hierarchy_profile: default_profile(),
            default_task: String::new(),
            recent_files_amount: default_recent_files_amount(),
            current_environment: Environment::default(),
        }
    }
}

impl Settings {
    /// Missing file means first run: defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Ok(read_json_document(path)?.unwrap_or_default())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        write_json_document(path, self)
    }

    pub fn project_root(&self) -> PathBuf {
        expand_tilde(&self.project_path)
    }
}

/// Owns the settings document and its load/save boundary.
///
/// Every setter persists the whole document right away.
pub struct SettingsRepository {
    path: PathBuf,
    settings: Settings,
}

impl SettingsRepository {
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let path = paths.settings_file();
        let settings = Settings::load_from_file(&path)?;
        debug!("Loaded settings from {}", path.display());
        Ok(Self { path, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        self.settings.save_to_file(&self.path)
    }

    pub fn project_root(&self) -> PathBuf {
        self.settings.project_root()
    }

    pub fn environment(&self) -> &Environment {
        &self.settings.current_environment
    }

    /// Recent-files cap as currently stored on disk, never cached
    pub fn recent_files_amount_on_disk(&self) -> Result<usize> {
        Ok(Settings::load_from_file(&self.path)?.recent_files_amount)
    }

    pub fn set_project_path(&mut self, path: impl Into<String>) -> Result<()> {
        self.settings.project_path = path.into();
        self.save()
    }

    pub fn set_current_profile(&mut self, name: impl Into<String>) -> Result<()> {
        self.settings.current_hierarchy_profile = name.into();
        self.save()
    }

    pub fn set_default_task(&mut self, task: impl Into<String>) -> Result<()> {
        self.settings.default_task = task.into();
        self.save()
    }

    pub fn set_recent_files_amount(&mut self, amount: usize) -> Result<()> {
        self.settings.recent_files_amount = amount;
        self.save()
    }

    pub fn set_environment(&mut self, env: Environment) -> Result<()> {
        self.settings.current_environment = env;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let repo = SettingsRepository::open(&DataPaths::new(temp.path())).unwrap();

        assert_eq!(repo.settings(), &Settings::default());
        assert_eq!(repo.settings().recent_files_amount, 10);
        assert!(!repo.path().exists());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"project_path": "/prod", "current_environment": {"client": "acme"}}"#,
        )
        .unwrap();

        let repo = SettingsRepository::open(&DataPaths::new(temp.path())).unwrap();
        assert_eq!(repo.project_root(), PathBuf::from("/prod"));
        assert_eq!(repo.environment().client, "acme");
        assert_eq!(repo.settings().current_hierarchy_profile, "default");
    }

    #[test]
    fn test_recent_amount_accepts_text() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"project_path": "/prod", "recent_files_amount": "7"}"#,
        )
        .unwrap();

        let repo = SettingsRepository::open(&DataPaths::new(temp.path())).unwrap();
        assert_eq!(repo.settings().recent_files_amount, 7);
        assert_eq!(repo.settings().project_path, "/prod");
    }

    #[test]
    fn test_recent_amount_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"recent_files_amount": "ten"}"#,
        )
        .unwrap();

        assert!(SettingsRepository::open(&DataPaths::new(temp.path())).is_err());
    }

    #[test]
    fn test_setters_persist() {
        let temp = TempDir::new().unwrap();
        let paths = DataPaths::new(temp.path());
        let mut repo = SettingsRepository::open(&paths).unwrap();

        repo.set_project_path("/prod").unwrap();
        repo.set_default_task("rig").unwrap();
        repo.set_environment(Environment::new("acme", "spot", "", ""))
            .unwrap();

        let reopened = SettingsRepository::open(&paths).unwrap();
        assert_eq!(reopened.settings().project_path, "/prod");
        assert_eq!(reopened.settings().default_task, "rig");
        assert_eq!(reopened.environment().project, "spot");
    }

    #[test]
    fn test_recent_amount_is_read_from_disk() {
        let temp = TempDir::new().unwrap();
        let paths = DataPaths::new(temp.path());
        let repo = SettingsRepository::open(&paths).unwrap();

        let mut other = SettingsRepository::open(&paths).unwrap();
        other.set_recent_files_amount(3).unwrap();

        assert_eq!(repo.settings().recent_files_amount, 10);
        assert_eq!(repo.recent_files_amount_on_disk().unwrap(), 3);
    }
}
