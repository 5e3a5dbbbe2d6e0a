//! Folder-hierarchy templates ("profiles") and everything built on them:
//! scaffolding folders on disk, editing the template tree and deriving the
//! selector blacklist.

mod blacklist;
mod capture;
mod defaults;
mod editing;
mod materialize;
mod profiles;

pub use blacklist::{collect_names, write_blacklist, Blacklist};
pub use capture::capture_tree;
pub use defaults::{BUILTIN_TEMPLATE, DEFAULT_PROFILE_NAME, RESERVED_PREFIX};
pub use editing::TemplateTree;
pub use materialize::{create_role_folder, find_branch_by_role, materialize, RoleFolderOutcome};
pub use profiles::ProfileStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::environment::Role;

/// Name of the folder whose descendants belong to the host application
pub const HOST_FOLDER: &str = "maya";

/// One folder of a hierarchy template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNode {
    #[serde(default)]
    pub name: String,
    /// Marks the folder whose name is supplied by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            children: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_children(mut self, children: Vec<TemplateNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("Please input a name")]
    EmptyName,

    #[error("'{name}' is not a valid folder name")]
    InvalidName { name: String },

    #[error("{role} folder '{}' already exists", path.display())]
    RoleFolderExists { role: Role, path: PathBuf },

    #[error("Target folder '{}' already exists, '{placeholder}' was left untouched", path.display())]
    PlaceholderTargetExists { placeholder: String, path: PathBuf },

    #[error("No template folder at '{path}'")]
    NodeNotFound { path: String },

    #[error("Top-level folder '{name}' is structural and cannot be deleted")]
    TopLevelDelete { name: String },

    #[error("Folder '{name}' carries the {role} role and cannot be renamed or deleted")]
    RoleNodeLocked { name: String, role: Role },

    #[error("A folder named '{name}' already exists under '{parent}'")]
    DuplicateSibling { name: String, parent: String },

    #[error("Hierarchy profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Hierarchy profile '{name}' already exists")]
    ProfileExists { name: String },

    #[error("Profile names starting with '_' are reserved: '{name}'")]
    ReservedProfile { name: String },
}

impl HierarchyError {
    /// Errors the user can recover from by picking another name
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HierarchyError::EmptyName
                | HierarchyError::RoleFolderExists { .. }
                | HierarchyError::PlaceholderTargetExists { .. }
                | HierarchyError::ProfileExists { .. }
                | HierarchyError::DuplicateSibling { .. }
        )
    }
}

/// Reject names that cannot be used as a single folder name
pub fn validate_folder_name(name: &str) -> Result<(), HierarchyError> {
    if name.trim().is_empty() {
        return Err(HierarchyError::EmptyName);
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(HierarchyError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Task folders the template scaffolds under `maya/scenes`, sorted
pub fn default_task_candidates(forest: &[TemplateNode]) -> Vec<String> {
    fn find_host(nodes: &[TemplateNode]) -> Option<&TemplateNode> {
        nodes.iter().find_map(|node| {
            if node.name == HOST_FOLDER {
                Some(node)
            } else {
                find_host(&node.children)
            }
        })
    }

    let mut tasks: Vec<String> = find_host(forest)
        .and_then(|host| host.children.iter().find(|c| c.name == "scenes"))
        .map(|scenes| {
            scenes
                .children
                .iter()
                .filter(|c| c.role.is_none() && !c.name.is_empty())
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default();
    tasks.sort_by_key(|t| t.to_lowercase());
    tasks
}
