//! Shared formatting for environment, file and template listings

use console::style;

use crate::content::SceneFile;
use crate::environment::{Environment, Role};
use crate::hierarchy::TemplateNode;
use crate::recent::RecentFileEntry;
use crate::versioning::SavePlan;

/// Environment as `client | project | asset | task`, unset fields dimmed
pub fn format_environment(env: &Environment) -> String {
    Role::ALL
        .iter()
        .map(|role| {
            let value = env.get(*role);
            if value.is_empty() {
                style(format!("<{role}>")).dim().to_string()
            } else {
                style(value).green().bold().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(style(" | ").dim().to_string().as_str())
}

pub fn format_scene_file(file: &SceneFile) -> String {
    format!("{:<40} {}", file.file_name, style(&file.modified).dim())
}

pub fn format_recent_entry(index: usize, entry: &RecentFileEntry) -> String {
    format!(
        "{} {} {}",
        style(format!("{:>2}.", index)).cyan().bold(),
        style(&entry.file_name).green(),
        style(format!("({})", entry.environment().display_label())).dim()
    )
}

pub fn format_save_plan(plan: &SavePlan) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        style("Save as").bold(),
        style(&plan.file_name).green().bold()
    )];
    lines.push(format!("  in {}", style(plan.directory.display()).dim()));
    if let Some(copy) = &plan.copy_forward {
        let name = copy
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        lines.push(format!(
            "  {} latest file copied forward to {}",
            style("+").yellow(),
            style(name).yellow()
        ));
    }
    lines
}

/// Render a template forest as an indented tree, role folders highlighted
pub fn format_template_tree(forest: &[TemplateNode]) -> Vec<String> {
    fn render(nodes: &[TemplateNode], prefix: &str, lines: &mut Vec<String>) {
        for (i, node) in nodes.iter().enumerate() {
            let last = i + 1 == nodes.len();
            let branch = if last { "└── " } else { "├── " };
            let label = match node.role {
                Some(role) => format!(
                    "{} {}",
                    style(&node.name).cyan().bold(),
                    style(format!("[{role}]")).dim()
                ),
                None => node.name.clone(),
            };
            lines.push(format!("{prefix}{branch}{label}"));

            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render(&node.children, &child_prefix, lines);
        }
    }

    let mut lines = Vec::new();
    render(forest, "", &mut lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_tree_shape() {
        console::set_colors_enabled(false);
        let forest = vec![TemplateNode::new("CLIENT NAME")
            .with_role(Role::Client)
            .with_children(vec![TemplateNode::new("a"), TemplateNode::new("b")])];

        let lines = format_template_tree(&forest);
        assert_eq!(
            lines,
            vec!["└── CLIENT NAME [client]", "    ├── a", "    └── b"]
        );
    }

    #[test]
    fn test_environment_marks_unset_roles() {
        console::set_colors_enabled(false);
        let env = Environment::new("acme", "spot", "", "");
        assert_eq!(
            format_environment(&env),
            "acme | spot | <asset> | <task>"
        );
    }
}
