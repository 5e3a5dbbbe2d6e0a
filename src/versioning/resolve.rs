use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{
    compose_file_name, format_version, next_number, SubVersion, VersionError, VersionedFilename,
};
use crate::environment::{scene_dir, Environment};

/// How a save-as names its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    /// Bump the subversion of the latest file
    VersionUp,
    /// Mark the save as released with the `pub` subversion
    Publish,
}

/// Outcome of looking at the existing files of a scene folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: u32,
    pub subversion: SubVersion,
    /// Lexicographically-last existing file, if any
    pub latest: Option<String>,
    /// Version under which a publish duplicates the latest file
    pub copy_forward_version: Option<u32>,
}

impl ResolvedVersion {
    pub fn version_label(&self) -> String {
        format_version(self.version)
    }

    pub fn subversion_label(&self) -> String {
        self.subversion.to_string()
    }
}

/// Work out the next version for a save into `dir`.
///
/// Zero-padding makes the highest version sort last, so only the last file
/// name is parsed. An empty folder starts at `001.001`.
pub fn resolve_versions(dir: &Path, mode: SaveMode) -> Result<ResolvedVersion> {
    let latest = latest_file(dir)?;

    let Some(latest) = latest else {
        return Ok(ResolvedVersion {
            version: 1,
            subversion: SubVersion::Number(1),
            latest: None,
            copy_forward_version: None,
        });
    };

    let parsed = VersionedFilename::parse(&latest)?;
    debug!("Latest file {} parsed as {:?}", latest, parsed);

    let exhausted = || VersionError::VersionLimit {
        file_name: latest.clone(),
    };
    let next_version = || next_number(parsed.version).ok_or_else(exhausted);

    // A full subversion range continues on the next version
    let (version, subversion, copy_forward_version) = match (mode, parsed.subversion) {
        (SaveMode::VersionUp, SubVersion::Number(n)) => match next_number(n) {
            Some(next) => (parsed.version, SubVersion::Number(next), None),
            None => (next_version()?, SubVersion::Number(1), None),
        },
        (SaveMode::VersionUp, SubVersion::Published) => {
            (next_version()?, SubVersion::Number(1), None)
        }
        (SaveMode::Publish, SubVersion::Number(_)) => (
            parsed.version,
            SubVersion::Published,
            Some(next_version()?),
        ),
        (SaveMode::Publish, SubVersion::Published) => {
            return Err(VersionError::AlreadyPublished {
                file_name: latest.clone(),
            }
            .into());
        }
    };

    Ok(ResolvedVersion {
        version,
        subversion,
        latest: Some(latest),
        copy_forward_version,
    })
}

fn latest_file(dir: &Path) -> Result<Option<String>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list scene folder {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.file_type()?.is_file() && !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.pop())
}

/// Duplicate of the latest file made by a publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyForward {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Everything a save-as needs to know before touching the disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePlan {
    pub mode: SaveMode,
    pub directory: PathBuf,
    pub file_name: String,
    pub target: PathBuf,
    pub version: String,
    pub subversion: String,
    pub copy_forward: Option<CopyForward>,
}

/// Plan a save-as of the current environment's task.
///
/// A publish keeps the current version number for the `pub` file and moves
/// the work-in-progress line forward by copying the latest file to the next
/// version with subversion `001`.
pub fn plan_save(
    root: &Path,
    env: &Environment,
    mode: SaveMode,
    extension: &str,
) -> Result<SavePlan> {
    if env.asset.is_empty() || env.task.is_empty() {
        return Err(VersionError::IncompleteEnvironment.into());
    }

    let directory = scene_dir(root, env);
    let resolved = resolve_versions(&directory, mode)?;

    let file_name = compose_file_name(
        &env.asset,
        &env.task,
        resolved.version,
        resolved.subversion,
        extension,
    );

    let copy_forward = match (&resolved.latest, resolved.copy_forward_version) {
        (Some(latest), Some(next)) => {
            let latest_ext = VersionedFilename::parse(latest)?.extension;
            Some(CopyForward {
                source: directory.join(latest),
                destination: directory.join(compose_file_name(
                    &env.asset,
                    &env.task,
                    next,
                    SubVersion::Number(1),
                    &latest_ext,
                )),
            })
        }
        _ => None,
    };

    Ok(SavePlan {
        mode,
        target: directory.join(&file_name),
        directory,
        file_name,
        version: resolved.version_label(),
        subversion: resolved.subversion_label(),
        copy_forward,
    })
}

impl SavePlan {
    /// Perform the copy-forward duplicate, never overwriting a file
    pub fn apply_copy_forward(&self) -> Result<()> {
        let Some(copy) = &self.copy_forward else {
            return Ok(());
        };

        if copy.destination.exists() {
            return Err(VersionError::CopyForwardExists {
                path: copy.destination.clone(),
            }
            .into());
        }

        fs::copy(&copy.source, &copy.destination).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                copy.source.display(),
                copy.destination.display()
            )
        })?;
        info!(
            "Copied {} forward to {}",
            copy.source.display(),
            copy.destination.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env() -> Environment {
        Environment::new("acme", "spot", "Foo", "rig")
    }

    fn scene_folder(root: &Path, files: &[&str]) -> PathBuf {
        let dir = scene_dir(root, &env());
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), *file).unwrap();
        }
        dir
    }

    #[test]
    fn test_empty_folder_starts_at_one() {
        let temp = TempDir::new().unwrap();
        for mode in [SaveMode::VersionUp, SaveMode::Publish] {
            let resolved = resolve_versions(temp.path(), mode).unwrap();
            assert_eq!(resolved.version_label(), "001");
            assert_eq!(resolved.subversion_label(), "001");
            assert!(resolved.copy_forward_version.is_none());
        }
    }

    #[test]
    fn test_version_up_bumps_subversion() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.003.ma"]);

        let resolved = resolve_versions(&dir, SaveMode::VersionUp).unwrap();
        assert_eq!(resolved.version_label(), "001");
        assert_eq!(resolved.subversion_label(), "004");
    }

    #[test]
    fn test_publish_uses_pub_token() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.003.ma"]);

        let resolved = resolve_versions(&dir, SaveMode::Publish).unwrap();
        assert_eq!(resolved.version_label(), "001");
        assert_eq!(resolved.subversion_label(), "pub");
        assert_eq!(resolved.copy_forward_version, Some(2));
    }

    #[test]
    fn test_latest_is_last_in_sort_order() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(
            temp.path(),
            &[
                "Foo_rig_v002.001.ma",
                "Foo_rig_v001.009.ma",
                "Foo_rig_v001.pub.ma",
                ".hidden",
            ],
        );

        let resolved = resolve_versions(&dir, SaveMode::VersionUp).unwrap();
        assert_eq!(resolved.latest.as_deref(), Some("Foo_rig_v002.001.ma"));
        assert_eq!(resolved.subversion_label(), "002");
    }

    #[test]
    fn test_published_latest() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v003.pub.ma"]);

        let up = resolve_versions(&dir, SaveMode::VersionUp).unwrap();
        assert_eq!(up.version_label(), "004");
        assert_eq!(up.subversion_label(), "001");

        let err = resolve_versions(&dir, SaveMode::Publish).unwrap_err();
        assert!(matches!(
            err.downcast::<VersionError>().unwrap(),
            VersionError::AlreadyPublished { .. }
        ));
    }

    #[test]
    fn test_full_subversion_range_moves_to_next_version() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.999.ma"]);

        let plan = plan_save(temp.path(), &env(), SaveMode::VersionUp, "ma").unwrap();
        assert_eq!(plan.file_name, "Foo_rig_v002.001.ma");
        fs::write(&plan.target, "").unwrap();

        let next = resolve_versions(&dir, SaveMode::VersionUp).unwrap();
        assert_eq!(next.version_label(), "002");
        assert_eq!(next.subversion_label(), "002");
    }

    #[test]
    fn test_last_version_is_exhausted() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v999.999.ma"]);

        for mode in [SaveMode::VersionUp, SaveMode::Publish] {
            let err = resolve_versions(&dir, mode).unwrap_err();
            assert!(matches!(
                err.downcast::<VersionError>().unwrap(),
                VersionError::VersionLimit { .. }
            ));
        }
    }

    #[test]
    fn test_oversized_subversion_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.4294967295.ma"]);

        let err = resolve_versions(&dir, SaveMode::VersionUp).unwrap_err();
        assert!(matches!(
            err.downcast::<VersionError>().unwrap(),
            VersionError::CorruptFilename { .. }
        ));
    }

    #[test]
    fn test_corrupt_latest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.003.ma", "zz_notes.txt"]);

        let err = resolve_versions(&dir, SaveMode::VersionUp).unwrap_err();
        assert!(matches!(
            err.downcast::<VersionError>().unwrap(),
            VersionError::CorruptFilename { .. }
        ));
    }

    #[test]
    fn test_plan_publish_with_copy_forward() {
        let temp = TempDir::new().unwrap();
        let dir = scene_folder(temp.path(), &["Foo_rig_v001.003.ma"]);

        let plan = plan_save(temp.path(), &env(), SaveMode::Publish, "ma").unwrap();
        assert_eq!(plan.file_name, "Foo_rig_v001.pub.ma");
        assert_eq!(plan.target, dir.join("Foo_rig_v001.pub.ma"));

        plan.apply_copy_forward().unwrap();
        let copied = dir.join("Foo_rig_v002.001.ma");
        assert_eq!(fs::read_to_string(copied).unwrap(), "Foo_rig_v001.003.ma");

        // Second attempt must not overwrite the duplicate
        assert!(plan.apply_copy_forward().is_err());
    }

    #[test]
    fn test_plan_version_up_has_no_copy_forward() {
        let temp = TempDir::new().unwrap();
        scene_folder(temp.path(), &["Foo_rig_v001.003.ma"]);

        let plan = plan_save(temp.path(), &env(), SaveMode::VersionUp, "ma").unwrap();
        assert_eq!(plan.file_name, "Foo_rig_v001.004.ma");
        assert!(plan.copy_forward.is_none());
        plan.apply_copy_forward().unwrap();
    }

    #[test]
    fn test_plan_requires_asset_and_task() {
        let temp = TempDir::new().unwrap();
        let env = Environment::new("acme", "spot", "Foo", "");

        let err = plan_save(temp.path(), &env, SaveMode::VersionUp, "ma").unwrap_err();
        assert!(matches!(
            err.downcast::<VersionError>().unwrap(),
            VersionError::IncompleteEnvironment
        ));
    }
}
