use super::{validate_folder_name, HierarchyError, TemplateNode};

/// Editable view of a hierarchy template.
///
/// Nodes are addressed by `/`-separated name paths from a top-level node,
/// e.g. `CLIENT NAME/PROJECT NAME/Assets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    roots: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn from_forest(forest: Vec<TemplateNode>) -> Self {
        Self { roots: forest }
    }

    pub fn roots(&self) -> &[TemplateNode] {
        &self.roots
    }

    /// Serialize back to the forest form. Children of every node are sorted
    /// case-insensitively by name; top-level order is kept.
    pub fn to_forest(&self) -> Vec<TemplateNode> {
        self.roots.iter().map(sorted_node).collect()
    }

    pub fn node(&self, path: &str) -> Option<&TemplateNode> {
        let segments = split_path(path);
        let (first, rest) = segments.split_first()?;
        let mut node = self.roots.iter().find(|n| n.name == *first)?;
        for segment in rest {
            node = node.children.iter().find(|n| n.name == *segment)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut TemplateNode, HierarchyError> {
        let not_found = || HierarchyError::NodeNotFound {
            path: path.to_string(),
        };

        let segments = split_path(path);
        let (first, rest) = segments.split_first().ok_or_else(not_found)?;
        let mut node = self
            .roots
            .iter_mut()
            .find(|n| n.name == *first)
            .ok_or_else(not_found)?;
        for segment in rest {
            node = node
                .children
                .iter_mut()
                .find(|n| n.name == *segment)
                .ok_or_else(not_found)?;
        }
        Ok(node)
    }

    /// Add a literal folder below `parent`
    pub fn add_folder(&mut self, parent: &str, name: &str) -> Result<(), HierarchyError> {
        validate_folder_name(name)?;
        let node = self.node_mut(parent)?;
        if node.children.iter().any(|c| c.name == name) {
            return Err(HierarchyError::DuplicateSibling {
                name: name.to_string(),
                parent: parent.to_string(),
            });
        }
        node.children.push(TemplateNode::new(name));
        Ok(())
    }

    /// Rename a literal folder; role folders keep their placeholder name
    pub fn rename_folder(&mut self, path: &str, new_name: &str) -> Result<(), HierarchyError> {
        validate_folder_name(new_name)?;

        let segments = split_path(path);
        if segments.last() == Some(&new_name) {
            self.node_mut(path)?;
            return Ok(());
        }

        let parent_path = segments[..segments.len().saturating_sub(1)].join("/");
        let siblings = if segments.len() <= 1 {
            &self.roots
        } else {
            &self
                .node(&parent_path)
                .ok_or_else(|| HierarchyError::NodeNotFound {
                    path: path.to_string(),
                })?
                .children
        };
        if siblings.iter().any(|n| n.name == new_name) {
            return Err(HierarchyError::DuplicateSibling {
                name: new_name.to_string(),
                parent: parent_path,
            });
        }

        let node = self.node_mut(path)?;
        if let Some(role) = node.role {
            return Err(HierarchyError::RoleNodeLocked {
                name: node.name.clone(),
                role,
            });
        }
        node.name = new_name.to_string();
        Ok(())
    }

    /// Delete a literal folder and its subtree
    pub fn delete_folder(&mut self, path: &str) -> Result<TemplateNode, HierarchyError> {
        let segments = split_path(path);
        let Some((name, parents)) = segments.split_last() else {
            return Err(HierarchyError::NodeNotFound {
                path: path.to_string(),
            });
        };
        if parents.is_empty() {
            return Err(HierarchyError::TopLevelDelete {
                name: name.to_string(),
            });
        }

        let target = self.node_mut(path)?;
        if let Some(role) = target.role {
            return Err(HierarchyError::RoleNodeLocked {
                name: target.name.clone(),
                role,
            });
        }

        let parent = self.node_mut(&parents.join("/"))?;
        let index = parent
            .children
            .iter()
            .position(|c| c.name == *name)
            .ok_or_else(|| HierarchyError::NodeNotFound {
                path: path.to_string(),
            })?;
        Ok(parent.children.remove(index))
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn sorted_node(node: &TemplateNode) -> TemplateNode {
    let mut children: Vec<TemplateNode> = node.children.iter().map(sorted_node).collect();
    children.sort_by_key(|c| c.name.to_lowercase());
    TemplateNode {
        name: node.name.clone(),
        role: node.role,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Role;

    fn sample() -> TemplateTree {
        TemplateTree::from_forest(vec![TemplateNode::new("CLIENT NAME")
            .with_role(Role::Client)
            .with_children(vec![TemplateNode::new("PROJECT NAME")
                .with_role(Role::Project)
                .with_children(vec![
                    TemplateNode::new("Documents"),
                    TemplateNode::new("Assets"),
                ])])])
    }

    fn names(nodes: &[TemplateNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_children_sorted_case_insensitively() {
        let tree = TemplateTree::from_forest(vec![TemplateNode::new("root").with_children(vec![
            TemplateNode::new("B"),
            TemplateNode::new("a"),
            TemplateNode::new("C"),
        ])]);

        let forest = tree.to_forest();
        assert_eq!(names(&forest[0].children), vec!["a", "B", "C"]);
    }

    #[test]
    fn test_top_level_order_is_kept() {
        let tree = TemplateTree::from_forest(vec![TemplateNode::new("z"), TemplateNode::new("a")]);
        assert_eq!(names(&tree.to_forest()), vec!["z", "a"]);
    }

    #[test]
    fn test_add_folder() {
        let mut tree = sample();
        tree.add_folder("CLIENT NAME/PROJECT NAME", "Editorial")
            .unwrap();

        let project = tree.node("CLIENT NAME/PROJECT NAME").unwrap();
        assert_eq!(project.children.len(), 3);

        let err = tree
            .add_folder("CLIENT NAME/PROJECT NAME", "Editorial")
            .unwrap_err();
        assert!(matches!(err, HierarchyError::DuplicateSibling { .. }));
    }

    #[test]
    fn test_add_folder_to_missing_parent() {
        let mut tree = sample();
        let err = tree.add_folder("CLIENT NAME/nope", "x").unwrap_err();
        assert!(matches!(err, HierarchyError::NodeNotFound { .. }));
    }

    #[test]
    fn test_rename_literal_folder() {
        let mut tree = sample();
        tree.rename_folder("CLIENT NAME/PROJECT NAME/Documents", "Docs")
            .unwrap();
        assert!(tree.node("CLIENT NAME/PROJECT NAME/Docs").is_some());
        assert!(tree.node("CLIENT NAME/PROJECT NAME/Documents").is_none());
    }

    #[test]
    fn test_rename_role_folder_is_locked() {
        let mut tree = sample();
        let err = tree
            .rename_folder("CLIENT NAME/PROJECT NAME", "Shows")
            .unwrap_err();
        assert!(matches!(err, HierarchyError::RoleNodeLocked { .. }));
    }

    #[test]
    fn test_rename_to_same_name_is_a_no_op() {
        let mut tree = sample();
        tree.rename_folder("CLIENT NAME/PROJECT NAME/Documents", "Documents")
            .unwrap();
        assert!(tree.node("CLIENT NAME/PROJECT NAME/Documents").is_some());

        let err = tree
            .rename_folder("CLIENT NAME/PROJECT NAME/nope", "nope")
            .unwrap_err();
        assert!(matches!(err, HierarchyError::NodeNotFound { .. }));
    }

    #[test]
    fn test_rename_to_existing_sibling() {
        let mut tree = sample();
        let err = tree
            .rename_folder("CLIENT NAME/PROJECT NAME/Documents", "Assets")
            .unwrap_err();
        assert!(matches!(err, HierarchyError::DuplicateSibling { .. }));
    }

    #[test]
    fn test_delete_folder() {
        let mut tree = sample();
        let removed = tree
            .delete_folder("CLIENT NAME/PROJECT NAME/Documents")
            .unwrap();
        assert_eq!(removed.name, "Documents");
        assert_eq!(
            names(&tree.node("CLIENT NAME/PROJECT NAME").unwrap().children),
            vec!["Assets"]
        );
    }

    #[test]
    fn test_top_level_delete_is_rejected() {
        let mut tree = TemplateTree::from_forest(vec![TemplateNode::new("Library")]);
        let err = tree.delete_folder("Library").unwrap_err();
        assert!(matches!(err, HierarchyError::TopLevelDelete { .. }));
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn test_role_folder_delete_is_rejected() {
        let mut tree = sample();
        let err = tree.delete_folder("CLIENT NAME/PROJECT NAME").unwrap_err();
        assert!(matches!(err, HierarchyError::RoleNodeLocked { .. }));
    }
}
