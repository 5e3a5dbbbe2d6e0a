use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

use super::TemplateNode;
use crate::log_trace;

/// Build a template from an existing folder tree.
///
/// The folder itself becomes the single top-level node; only directories
/// are captured, sorted by name. Unreadable folders are skipped.
pub fn capture_tree(dir: &Path) -> Result<Vec<TemplateNode>> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let root_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut root = TemplateNode::new(root_name);

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        log_trace!("Capturing {}", relative.display());

        let mut node = &mut root;
        for component in relative.iter() {
            let name = component.to_string_lossy();
            let index = match node.children.iter().position(|c| c.name == name) {
                Some(index) => index,
                None => {
                    node.children.push(TemplateNode::new(name.to_string()));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
    }

    Ok(vec![root])
}
