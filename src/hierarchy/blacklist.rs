use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{TemplateNode, HOST_FOLDER};
use crate::settings::DataPaths;
use crate::utils::fs::{read_json_document, write_json_document};

/// Template folder names that must never be offered as a client, project,
/// asset or task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blacklist {
    names: Vec<String>,
}

impl Blacklist {
    pub fn from_template(forest: &[TemplateNode]) -> Self {
        Self {
            names: collect_names(forest),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Load the blacklist document; a missing document is an empty list
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_json_document(path)?.unwrap_or_default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_document(path, self)
    }
}

/// Regenerate the selector blacklist document from a template
pub fn write_blacklist(paths: &DataPaths, forest: &[TemplateNode]) -> Result<Blacklist> {
    let blacklist = Blacklist::from_template(forest);
    blacklist.save(&paths.blacklist_file())?;
    Ok(blacklist)
}

/// Every node name in depth-first order, without descending into the host
/// application folder
pub fn collect_names(forest: &[TemplateNode]) -> Vec<String> {
    fn recurse(nodes: &[TemplateNode], names: &mut Vec<String>) {
        for node in nodes {
            if !node.name.is_empty() {
                names.push(node.name.clone());
            }
            if node.name != HOST_FOLDER {
                recurse(&node.children, names);
            }
        }
    }

    let mut names = Vec::new();
    recurse(forest, &mut names);
    names
}
