use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{resolve, Environment, Role};
use crate::hierarchy::Blacklist;

/// Folder names offered for `role` in the given environment.
///
/// Returns `None` when the folder for that level does not exist. Template
/// folder names are hidden so only user-named folders are selectable.
pub fn options(
    root: &Path,
    env: &Environment,
    role: Role,
    blacklist: &Blacklist,
) -> Result<Option<Vec<String>>> {
    let dir = resolve(root, env, role.into());
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !blacklist.contains(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(Some(names))
}

/// Select `name` for `role` and refresh every deeper role from disk.
///
/// Each deeper role takes the first available option, or the default task
/// when it exists among the task options, or becomes empty.
pub fn select(
    root: &Path,
    env: &mut Environment,
    role: Role,
    name: &str,
    blacklist: &Blacklist,
    default_task: &str,
) -> Result<()> {
    env.set(role, name);

    for deeper in role.deeper() {
        let items = options(root, env, *deeper, blacklist)?.unwrap_or_default();

        let value = if *deeper == Role::Task
            && !default_task.is_empty()
            && items.iter().any(|item| item == default_task)
        {
            default_task.to_string()
        } else {
            items.first().cloned().unwrap_or_default()
        };

        debug!("Refreshing {} to '{}'", deeper, value);
        env.set(*deeper, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scaffold(root: &Path) {
        for dir in [
            "acme/spot/Assets/Foo/maya/scenes/model",
            "acme/spot/Assets/Foo/maya/scenes/rig",
            "acme/spot/Assets/Bar/maya/scenes/anim",
            "acme/spot/Documents",
            "acme/teaser/Assets",
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("acme/notes.txt"), "").unwrap();
    }

    #[test]
    fn test_options_lists_directories_only() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        let env = Environment::new("acme", "", "", "");
        let opts = options(temp.path(), &env, Role::Project, &Blacklist::default())
            .unwrap()
            .unwrap();
        assert_eq!(opts, vec!["spot", "teaser"]);
    }

    #[test]
    fn test_options_hide_blacklisted_names() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        let blacklist = Blacklist::from_names(["Documents", "Assets"]);
        let env = Environment::new("acme", "spot", "", "");
        let opts = options(temp.path(), &env, Role::Asset, &blacklist)
            .unwrap()
            .unwrap();
        assert_eq!(opts, vec!["Bar", "Foo"]);
    }

    #[test]
    fn test_options_missing_folder() {
        let temp = TempDir::new().unwrap();
        let env = Environment::new("nobody", "", "", "");
        let opts = options(temp.path(), &env, Role::Project, &Blacklist::default()).unwrap();
        assert!(opts.is_none());
    }

    #[test]
    fn test_select_cascades_to_first_options() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        let mut env = Environment::default();
        select(
            temp.path(),
            &mut env,
            Role::Client,
            "acme",
            &Blacklist::default(),
            "",
        )
        .unwrap();

        assert_eq!(env, Environment::new("acme", "spot", "Bar", "anim"));
    }

    #[test]
    fn test_select_prefers_default_task() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        let mut env = Environment::new("acme", "spot", "", "");
        select(
            temp.path(),
            &mut env,
            Role::Asset,
            "Foo",
            &Blacklist::default(),
            "rig",
        )
        .unwrap();

        assert_eq!(env.task, "rig");
    }

    #[test]
    fn test_select_clears_levels_without_options() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        let mut env = Environment::new("acme", "spot", "Foo", "rig");
        select(
            temp.path(),
            &mut env,
            Role::Project,
            "teaser",
            &Blacklist::default(),
            "",
        )
        .unwrap();

        assert_eq!(env, Environment::new("acme", "teaser", "", ""));
    }
}
