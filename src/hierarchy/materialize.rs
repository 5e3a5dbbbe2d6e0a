use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{validate_folder_name, HierarchyError, TemplateNode};
use crate::environment::Role;
use crate::{log_debug, log_info};

/// What `create_role_folder` did on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleFolderOutcome {
    /// Folders were created from the template
    Scaffolded { path: PathBuf, created: usize },
    /// An unnamed scaffold folder was renamed in place
    RenamedPlaceholder { from: PathBuf, to: PathBuf },
}

impl RoleFolderOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RoleFolderOutcome::Scaffolded { path, .. } => path,
            RoleFolderOutcome::RenamedPlaceholder { to, .. } => to,
        }
    }
}

/// Create one directory per template node under `base`, parents first.
///
/// A node tagged with the substitution role is named after the
/// user-supplied name instead of its literal name. Nodes without a name are
/// skipped together with their subtree. Existing directories are left as
/// they are, so running this twice is harmless. Returns the directories that
/// did not exist before.
pub fn materialize(
    forest: &[TemplateNode],
    base: &Path,
    substitution: Option<(Role, &str)>,
) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    materialize_into(forest, base, substitution, &mut created)?;
    Ok(created)
}

fn materialize_into(
    nodes: &[TemplateNode],
    base: &Path,
    substitution: Option<(Role, &str)>,
    created: &mut Vec<PathBuf>,
) -> Result<()> {
    for node in nodes {
        if node.name.is_empty() {
            continue;
        }

        let folder_name = match (node.role, substitution) {
            (Some(role), Some((target, name))) if role == target => name,
            _ => node.name.as_str(),
        };

        let path = base.join(folder_name);
        if !path.is_dir() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create folder {}", path.display()))?;
            log_debug!("Created {}", path.display());
            created.push(path.clone());
        }

        materialize_into(&node.children, &path, substitution, created)?;
    }
    Ok(())
}

/// First node tagged with `role`, searching depth-first
pub fn find_branch_by_role(forest: &[TemplateNode], role: Role) -> Option<&TemplateNode> {
    forest.iter().find_map(|node| {
        if node.role == Some(role) {
            Some(node)
        } else {
            find_branch_by_role(&node.children, role)
        }
    })
}

/// Create the folder named `name` for `role` inside `base`.
///
/// A new client gets the whole template. For deeper roles an unnamed
/// scaffold folder (`<ROLE> NAME`) is renamed in place when present;
/// otherwise the template branch carrying the role is scaffolded, or a bare
/// folder when the template has no such branch. Nothing on disk changes when
/// the destination already exists.
pub fn create_role_folder(
    forest: &[TemplateNode],
    base: &Path,
    role: Role,
    name: &str,
) -> Result<RoleFolderOutcome> {
    validate_folder_name(name)?;
    let destination = base.join(name);

    if role == Role::Client {
        if destination.exists() {
            return Err(HierarchyError::RoleFolderExists {
                role,
                path: destination,
            }
            .into());
        }
        let created = materialize(forest, base, Some((role, name)))?;
        log_info!("Scaffolded client '{}' ({} folders)", name, created.len());
        return Ok(RoleFolderOutcome::Scaffolded {
            path: destination,
            created: created.len(),
        });
    }

    let placeholder = base.join(role.placeholder_name());
    if placeholder.is_dir() {
        if destination.exists() {
            return Err(HierarchyError::PlaceholderTargetExists {
                placeholder: role.placeholder_name(),
                path: destination,
            }
            .into());
        }
        fs::rename(&placeholder, &destination).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                placeholder.display(),
                destination.display()
            )
        })?;
        log_info!(
            "Renamed {} to {}",
            placeholder.display(),
            destination.display()
        );
        return Ok(RoleFolderOutcome::RenamedPlaceholder {
            from: placeholder,
            to: destination,
        });
    }

    if destination.exists() {
        return Err(HierarchyError::RoleFolderExists {
            role,
            path: destination,
        }
        .into());
    }

    let created = match find_branch_by_role(forest, role) {
        Some(branch) => materialize(std::slice::from_ref(branch), base, Some((role, name)))?,
        None => materialize(&[TemplateNode::new(name)], base, None)?,
    };
    log_info!("Scaffolded {} '{}' ({} folders)", role, name, created.len());

    Ok(RoleFolderOutcome::Scaffolded {
        path: destination,
        created: created.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::BUILTIN_TEMPLATE;
    use tempfile::TempDir;

    fn builtin() -> Vec<TemplateNode> {
        serde_json::from_str(BUILTIN_TEMPLATE).unwrap()
    }

    fn downcast(err: anyhow::Error) -> HierarchyError {
        err.downcast::<HierarchyError>().unwrap()
    }

    #[test]
    fn test_materialize_substitutes_role_name() {
        let temp = TempDir::new().unwrap();
        let forest = builtin();

        materialize(&forest, temp.path(), Some((Role::Client, "acme"))).unwrap();

        let root = temp.path();
        assert!(root.join("acme/PROJECT NAME/Assets/ASSET NAME/maya/scenes/rig").is_dir());
        assert!(root.join("acme/PROJECT NAME/Documents").is_dir());
        assert!(!root.join("CLIENT NAME").exists());
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let forest = builtin();

        let first = materialize(&forest, temp.path(), Some((Role::Client, "acme"))).unwrap();
        let second = materialize(&forest, temp.path(), Some((Role::Client, "acme"))).unwrap();

        assert!(!first.is_empty());
        assert!(second.is_empty());
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_materialize_skips_unnamed_nodes() {
        let temp = TempDir::new().unwrap();
        let forest = vec![
            TemplateNode::new("").with_children(vec![TemplateNode::new("orphan")]),
            TemplateNode::new("kept"),
        ];

        materialize(&forest, temp.path(), None).unwrap();
        assert!(temp.path().join("kept").is_dir());
        assert!(!temp.path().join("orphan").exists());
    }

    #[test]
    fn test_find_branch_by_role() {
        let forest = builtin();
        let branch = find_branch_by_role(&forest, Role::Asset).unwrap();
        assert_eq!(branch.name, "ASSET NAME");
        assert!(find_branch_by_role(&forest, Role::Task).is_none());
    }

    #[test]
    fn test_existing_client_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("acme")).unwrap();

        let err = create_role_folder(&builtin(), temp.path(), Role::Client, "acme").unwrap_err();
        assert!(matches!(
            downcast(err),
            HierarchyError::RoleFolderExists { .. }
        ));
        assert_eq!(fs::read_dir(temp.path().join("acme")).unwrap().count(), 0);
    }

    #[test]
    fn test_placeholder_is_renamed() {
        let temp = TempDir::new().unwrap();
        let forest = builtin();
        create_role_folder(&forest, temp.path(), Role::Client, "acme").unwrap();

        let base = temp.path().join("acme");
        let outcome = create_role_folder(&forest, &base, Role::Project, "spot").unwrap();

        assert!(matches!(outcome, RoleFolderOutcome::RenamedPlaceholder { .. }));
        assert!(!base.join("PROJECT NAME").exists());
        assert!(base.join("spot/Assets/ASSET NAME/maya/scenes").is_dir());
    }

    #[test]
    fn test_placeholder_rename_refuses_existing_target() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir(base.join("PROJECT NAME")).unwrap();
        fs::create_dir(base.join("spot")).unwrap();

        let err = create_role_folder(&builtin(), base, Role::Project, "spot").unwrap_err();
        assert!(matches!(
            downcast(err),
            HierarchyError::PlaceholderTargetExists { .. }
        ));
        assert!(base.join("PROJECT NAME").is_dir());
    }

    #[test]
    fn test_branch_is_scaffolded_without_placeholder() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("Assets");
        fs::create_dir(&base).unwrap();

        let outcome = create_role_folder(&builtin(), &base, Role::Asset, "Foo").unwrap();

        assert_eq!(outcome.path(), base.join("Foo"));
        assert!(base.join("Foo/maya/scenes/model").is_dir());
        assert!(base.join("Foo/maya/data").is_dir());
    }

    #[test]
    fn test_role_without_branch_creates_bare_folder() {
        let temp = TempDir::new().unwrap();
        let outcome = create_role_folder(&builtin(), temp.path(), Role::Task, "fx").unwrap();

        assert_eq!(
            outcome,
            RoleFolderOutcome::Scaffolded {
                path: temp.path().join("fx"),
                created: 1
            }
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = create_role_folder(&builtin(), temp.path(), Role::Client, "").unwrap_err();
        assert!(matches!(downcast(err), HierarchyError::EmptyName));
    }
}
