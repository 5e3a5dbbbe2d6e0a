use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{
    validate_folder_name, HierarchyError, TemplateNode, TemplateTree, BUILTIN_TEMPLATE,
    DEFAULT_PROFILE_NAME, RESERVED_PREFIX,
};
use crate::utils::fs::{ensure_directory_exists, read_json_document, write_json_document};

/// Named hierarchy templates stored as `<name>.json` in one directory
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    pub fn is_reserved(name: &str) -> bool {
        name.starts_with(RESERVED_PREFIX)
    }

    /// Install the bundled default profile when it is missing
    pub fn ensure_defaults(&self) -> Result<()> {
        ensure_directory_exists(&self.dir)?;

        let default_path = self.path_for(DEFAULT_PROFILE_NAME);
        if !default_path.exists() {
            let forest: Vec<TemplateNode> =
                serde_json::from_str(BUILTIN_TEMPLATE).context("Bundled template is invalid")?;
            write_json_document(&default_path, &forest)?;
            info!("Installed default hierarchy profile");
        }
        Ok(())
    }

    /// User-selectable profile names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut profiles = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list profiles in {}", self.dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !Self::is_reserved(stem) {
                    profiles.push(stem.to_string());
                }
            }
        }

        profiles.sort();
        Ok(profiles)
    }

    pub fn load(&self, name: &str) -> Result<Vec<TemplateNode>> {
        let path = self.path_for(name);
        debug!("Loading hierarchy profile from {}", path.display());
        read_json_document(&path)?.ok_or_else(|| {
            HierarchyError::ProfileNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Save a profile in its normalized form (children sorted by name)
    pub fn save(&self, name: &str, forest: &[TemplateNode]) -> Result<()> {
        let normalized = TemplateTree::from_forest(forest.to_vec()).to_forest();
        write_json_document(&self.path_for(name), &normalized)
    }

    /// Create a new profile as a copy of the default profile
    pub fn create_from_default(&self, name: &str) -> Result<()> {
        self.check_new_name(name)?;
        self.ensure_defaults()?;

        let forest = self.load(DEFAULT_PROFILE_NAME)?;
        self.save(name, &forest)?;
        info!("Created hierarchy profile '{}'", name);
        Ok(())
    }

    /// Store a template under a new profile name
    pub fn create(&self, name: &str, forest: &[TemplateNode]) -> Result<()> {
        self.check_new_name(name)?;
        self.save(name, forest)
    }

    /// Make sure a profile can be made current
    pub fn check_selectable(&self, name: &str) -> Result<(), HierarchyError> {
        if Self::is_reserved(name) {
            return Err(HierarchyError::ReservedProfile {
                name: name.to_string(),
            });
        }
        if !self.exists(name) {
            return Err(HierarchyError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_new_name(&self, name: &str) -> Result<(), HierarchyError> {
        validate_folder_name(name)?;
        if Self::is_reserved(name) {
            return Err(HierarchyError::ReservedProfile {
                name: name.to_string(),
            });
        }
        if self.exists(name) {
            return Err(HierarchyError::ProfileExists {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let temp = TempDir::new().unwrap();
        let store = ProfileStore::new(temp.path().join("hierarchy_profiles"));
        (temp, store)
    }

    #[test]
    fn test_reserved_profiles_are_not_listed() {
        let (_temp, store) = store();
        store.ensure_defaults().unwrap();
        store.create_from_default("studio").unwrap();
        fs::write(store.dir().join("notes.txt"), "").unwrap();

        assert!(store.exists(DEFAULT_PROFILE_NAME));
        assert_eq!(store.list().unwrap(), vec!["studio"]);
    }

    #[test]
    fn test_create_from_default_copies_template() {
        let (_temp, store) = store();
        store.create_from_default("studio").unwrap();

        let copied = store.load("studio").unwrap();
        assert_eq!(copied[0].name, "CLIENT NAME");
    }

    #[test]
    fn test_create_existing_profile_fails() {
        let (_temp, store) = store();
        store.create_from_default("studio").unwrap();

        let err = store.create_from_default("studio").unwrap_err();
        assert!(matches!(
            err.downcast::<HierarchyError>().unwrap(),
            HierarchyError::ProfileExists { .. }
        ));
    }

    #[test]
    fn test_reserved_names_cannot_be_created_or_selected() {
        let (_temp, store) = store();
        store.ensure_defaults().unwrap();

        assert!(store.create_from_default("_mine").is_err());
        assert!(matches!(
            store.check_selectable(DEFAULT_PROFILE_NAME),
            Err(HierarchyError::ReservedProfile { .. })
        ));
        assert!(matches!(
            store.check_selectable("missing"),
            Err(HierarchyError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_save_normalizes_child_order() {
        let (_temp, store) = store();
        let forest = vec![TemplateNode::new("root")
            .with_children(vec![TemplateNode::new("b"), TemplateNode::new("A")])];

        store.save("custom", &forest).unwrap();
        let loaded = store.load("custom").unwrap();
        assert_eq!(loaded[0].children[0].name, "A");
    }

    #[test]
    fn test_missing_profile() {
        let (_temp, store) = store();
        assert!(store.load("ghost").is_err());
        assert!(store.list().unwrap().is_empty());
    }
}
