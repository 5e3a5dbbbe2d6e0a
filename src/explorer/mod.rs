//! Orchestration of settings, environment, profiles and recent files

mod manager;

pub use manager::ExplorerManager;

use std::path::PathBuf;

use crate::environment::Role;

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("Project path is not set, use `assetx settings set-project-path <dir>`")]
    ProjectPathNotSet,

    #[error("Select a {needed} first")]
    IncompleteEnvironment { needed: Role },

    #[error("'{name}' is not an available {role}")]
    UnknownOption { role: Role, name: String },

    #[error("Cannot find file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Save target {} already exists", path.display())]
    TargetExists { path: PathBuf },

    #[error("No recent file at position {index} ({len} recorded)")]
    RecentIndexOutOfRange { index: usize, len: usize },

    #[error("Cancelled")]
    Cancelled,
}

impl ExplorerError {
    /// Errors reported as warnings rather than failures
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ExplorerError::FileNotFound { .. })
    }
}
