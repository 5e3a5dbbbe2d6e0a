use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{Environment, Role};

/// Literal folder holding every asset of a project
pub const ASSETS_SEGMENT: &str = "Assets";

const HOST_SEGMENT: &str = "maya";
const SCENES_SEGMENT: &str = "scenes";
const DATA_SEGMENT: &str = "data";

/// Target of a path resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRole {
    Client,
    Project,
    Asset,
    Task,
    Data,
}

impl From<Role> for PathRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => PathRole::Client,
            Role::Project => PathRole::Project,
            Role::Asset => PathRole::Asset,
            Role::Task => PathRole::Task,
        }
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathRole::Client => "client",
            PathRole::Project => "project",
            PathRole::Asset => "asset",
            PathRole::Task => "task",
            PathRole::Data => "data",
        };
        f.write_str(name)
    }
}

impl FromStr for PathRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("data") {
            return Ok(PathRole::Data);
        }
        s.parse::<Role>().map(PathRole::from)
    }
}

/// Folder listing the options for `role` in the given environment.
///
/// Pure: nothing is checked on disk and unset fields simply contribute no
/// segment, so callers validate existence before use.
pub fn resolve(root: &Path, env: &Environment, role: PathRole) -> PathBuf {
    match role {
        PathRole::Client => root.to_path_buf(),
        PathRole::Project => root.join(&env.client),
        PathRole::Asset => root.join(&env.client).join(&env.project).join(ASSETS_SEGMENT),
        PathRole::Task => asset_host_dir(root, env).join(SCENES_SEGMENT),
        PathRole::Data => asset_host_dir(root, env).join(DATA_SEGMENT),
    }
}

/// Folder holding the versioned scene files of the current task
pub fn scene_dir(root: &Path, env: &Environment) -> PathBuf {
    resolve(root, env, PathRole::Task).join(&env.task)
}

fn asset_host_dir(root: &Path, env: &Environment) -> PathBuf {
    resolve(root, env, PathRole::Asset)
        .join(&env.asset)
        .join(HOST_SEGMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_level_path() {
        let env = Environment::new("acme", "", "", "");
        let root = Path::new("/prod");
        assert_eq!(resolve(root, &env, PathRole::Project), root.join("acme"));
        assert_eq!(resolve(root, &env, PathRole::Client), root);
    }

    #[test]
    fn test_asset_level_path() {
        let env = Environment::new("acme", "spot", "", "");
        assert_eq!(
            resolve(Path::new("/prod"), &env, PathRole::Asset),
            Path::new("/prod/acme/spot/Assets")
        );
    }

    #[test]
    fn test_task_and_data_paths() {
        let env = Environment::new("acme", "spot", "Foo", "rig");
        let root = Path::new("/prod");
        assert_eq!(
            resolve(root, &env, PathRole::Task),
            Path::new("/prod/acme/spot/Assets/Foo/maya/scenes")
        );
        assert_eq!(
            resolve(root, &env, PathRole::Data),
            Path::new("/prod/acme/spot/Assets/Foo/maya/data")
        );
        assert_eq!(
            scene_dir(root, &env),
            Path::new("/prod/acme/spot/Assets/Foo/maya/scenes/rig")
        );
    }

    #[test]
    fn test_unset_fields_add_no_segment() {
        let env = Environment::default();
        assert_eq!(
            resolve(Path::new("/prod"), &env, PathRole::Asset),
            Path::new("/prod/Assets")
        );
    }

    #[test]
    fn test_path_role_parsing() {
        assert_eq!("data".parse::<PathRole>().unwrap(), PathRole::Data);
        assert_eq!("task".parse::<PathRole>().unwrap(), PathRole::Task);
        assert!("scenes".parse::<PathRole>().is_err());
    }
}
