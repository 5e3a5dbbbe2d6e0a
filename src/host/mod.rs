//! The host application the explorer drives.
//!
//! Opening and saving scenes belongs to the host; the explorer only decides
//! which file to open and under which name to save.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait SceneHost {
    /// File of the scene currently open, if it was ever saved
    fn current_scene(&self) -> Option<PathBuf>;

    /// Whether the open scene has unsaved changes
    fn is_modified(&self) -> bool;

    fn open(&mut self, path: &Path) -> Result<()>;

    /// Save the open scene in place
    fn save(&mut self) -> Result<()>;

    /// Save the open scene under a new path and make it current
    fn save_as(&mut self, path: &Path) -> Result<()>;

    /// Merge the contents of `path` into the open scene
    fn import(&mut self, path: &Path) -> Result<()>;

    /// Load `path` as a reference under `namespace`.
    ///
    /// Returns the namespace actually used; hosts keep namespaces unique.
    fn reference(&mut self, path: &Path, namespace: &str) -> Result<String>;
}

/// A scene loaded by reference into the open scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneReference {
    pub path: PathBuf,
    pub namespace: String,
}

/// Host backed by plain files, for use outside a content-creation app.
///
/// The current scene is a file on disk; saving it under a new name copies
/// its bytes.
#[derive(Debug, Default)]
pub struct FileHost {
    current: Option<PathBuf>,
    modified: bool,
    imports: Vec<PathBuf>,
    references: Vec<SceneReference>,
}

impl FileHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scene(path: impl Into<PathBuf>) -> Self {
        Self {
            current: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn imports(&self) -> &[PathBuf] {
        &self.imports
    }

    pub fn references(&self) -> &[SceneReference] {
        &self.references
    }

    fn namespace_taken(&self, namespace: &str) -> bool {
        self.references.iter().any(|r| r.namespace == namespace)
    }

    /// Mark the scene as having unsaved changes
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

impl SceneHost for FileHost {
    fn current_scene(&self) -> Option<PathBuf> {
        self.current.clone()
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        require_file(path)?;
        info!("Opened {}", path.display());
        self.current = Some(path.to_path_buf());
        self.modified = false;
        self.imports.clear();
        self.references.clear();
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.modified = false;
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> Result<()> {
        match &self.current {
            Some(current) if current.is_file() => {
                fs::copy(current, path).with_context(|| {
                    format!("Failed to save {} as {}", current.display(), path.display())
                })?;
            }
            _ => {
                fs::write(path, b"")
                    .with_context(|| format!("Failed to create {}", path.display()))?;
            }
        }
        self.current = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    fn import(&mut self, path: &Path) -> Result<()> {
        require_file(path)?;
        info!("Imported {}", path.display());
        self.imports.push(path.to_path_buf());
        self.modified = true;
        Ok(())
    }

    fn reference(&mut self, path: &Path, namespace: &str) -> Result<String> {
        require_file(path)?;

        let mut unique = namespace.to_string();
        let mut counter = 1;
        while self.namespace_taken(&unique) {
            unique = format!("{namespace}{counter}");
            counter += 1;
        }

        info!("Referenced {} as {}", path.display(), unique);
        self.references.push(SceneReference {
            path: path.to_path_buf(),
            namespace: unique.clone(),
        });
        self.modified = true;
        Ok(unique)
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("Cannot find file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_as_copies_current_scene() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("work.ma");
        fs::write(&source, "scene data").unwrap();

        let mut host = FileHost::with_scene(&source);
        let target = temp.path().join("Foo_rig_v001.001.ma");
        host.save_as(&target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "scene data");
        assert_eq!(host.current_scene(), Some(target));
    }

    #[test]
    fn test_save_as_without_scene_creates_file() {
        let temp = TempDir::new().unwrap();
        let mut host = FileHost::new();
        let target = temp.path().join("Foo_rig_v001.001.ma");

        host.save_as(&target).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn test_import_marks_scene_modified() {
        let temp = TempDir::new().unwrap();
        let prop = temp.path().join("Chair_model_v001.003.ma");
        fs::write(&prop, "").unwrap();

        let mut host = FileHost::new();
        host.import(&prop).unwrap();

        assert_eq!(host.imports(), &[prop]);
        assert!(host.is_modified());
        assert!(host.import(&temp.path().join("missing.ma")).is_err());
    }

    #[test]
    fn test_reference_namespaces_stay_unique() {
        let temp = TempDir::new().unwrap();
        let rig = temp.path().join("Foo_rig_v001.pub.ma");
        fs::write(&rig, "").unwrap();

        let mut host = FileHost::new();
        let first = host.reference(&rig, "Foo_rig").unwrap();
        let second = host.reference(&rig, "Foo_rig").unwrap();

        assert_eq!(first, "Foo_rig");
        assert_eq!(second, "Foo_rig1");
        assert_eq!(host.references().len(), 2);
        assert!(host.is_modified());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let mut host = FileHost::new();
        host.set_modified(true);

        assert!(host.open(&temp.path().join("missing.ma")).is_err());
        assert!(host.is_modified());
        assert!(host.current_scene().is_none());
    }
}
