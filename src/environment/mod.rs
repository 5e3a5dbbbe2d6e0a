//! The current environment: which client, project, asset and task the user
//! is working in, and everything derived from it.

mod paths;
mod selector;

pub use paths::{resolve, scene_dir, PathRole, ASSETS_SEGMENT};
pub use selector::{options, select};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A level of the client/project/asset/task hierarchy whose folder name is
/// chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Project,
    Asset,
    Task,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Client, Role::Project, Role::Asset, Role::Task];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Project => "project",
            Role::Asset => "asset",
            Role::Task => "task",
        }
    }

    /// Roles nested below this one, shallowest first
    pub fn deeper(&self) -> &'static [Role] {
        match self {
            Role::Client => &[Role::Project, Role::Asset, Role::Task],
            Role::Project => &[Role::Asset, Role::Task],
            Role::Asset => &[Role::Task],
            Role::Task => &[],
        }
    }

    /// Name of the marker folder left behind by a scaffold that has not been
    /// given a real name yet, e.g. `PROJECT NAME`
    pub fn placeholder_name(&self) -> String {
        format!("{} NAME", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "project" => Ok(Role::Project),
            "asset" => Ok(Role::Asset),
            "task" => Ok(Role::Task),
            other => anyhow::bail!(
                "Unknown role '{}' (expected client, project, asset or task)",
                other
            ),
        }
    }
}

/// Currently selected client/project/asset/task; empty fields are unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub client: String,
    pub project: String,
    pub asset: String,
    pub task: String,
}

impl Environment {
    pub fn new(
        client: impl Into<String>,
        project: impl Into<String>,
        asset: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            client: client.into(),
            project: project.into(),
            asset: asset.into(),
            task: task.into(),
        }
    }

    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Client => &self.client,
            Role::Project => &self.project,
            Role::Asset => &self.asset,
            Role::Task => &self.task,
        }
    }

    pub fn set(&mut self, role: Role, value: impl Into<String>) {
        let value = value.into();
        match role {
            Role::Client => self.client = value,
            Role::Project => self.project = value,
            Role::Asset => self.asset = value,
            Role::Task => self.task = value,
        }
    }

    /// Set a role and clear every role nested below it
    pub fn set_and_clear_deeper(&mut self, role: Role, value: impl Into<String>) {
        self.set(role, value);
        for deeper in role.deeper() {
            self.set(*deeper, String::new());
        }
    }

    /// True when the role and every role above it are set
    pub fn is_set_through(&self, role: Role) -> bool {
        Role::ALL
            .iter()
            .take_while(|r| **r != role)
            .chain(std::iter::once(&role))
            .all(|r| !self.get(*r).is_empty())
    }

    /// `client | project | asset | task`
    pub fn display_label(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.client, self.project, self.asset, self.task
        )
    }
}
