use anyhow::{Context, Result};
use console::style;
use inquire::{Confirm, InquireError, Select, Text};

use crate::environment::Role;
use crate::explorer::{ExplorerError, ExplorerManager};
use crate::host::{FileHost, SceneHost};
use crate::ui::formatting::{
    format_environment, format_recent_entry, format_save_plan, format_scene_file,
};
use crate::utils::platform::reveal_in_file_browser;
use crate::versioning::SaveMode;
use crate::{display_println, display_success, display_warning, log_debug};

/// Handle prompt results to distinguish between ESC key navigation and fatal errors
/// Returns:
/// - Ok(Some(value)) for successful prompts
/// - Ok(None) for ESC key cancellation (navigation signal)
/// - Err(error) for other fatal errors
fn handle_prompt_result<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(error) => Err(anyhow::Error::from(error)),
    }
}

const NAVIGATION_SEPARATOR: &str = "────────────────────";
const CREATE_OPTION: &str = "[Create new]";
const BACK_OPTION: &str = "[Back]";
const EXIT_OPTION: &str = "[Exit]";

fn is_navigation_option(selection: &str) -> bool {
    selection.starts_with('[') && selection.ends_with(']')
}

fn is_separator(selection: &str) -> bool {
    console::strip_ansi_codes(selection) == NAVIGATION_SEPARATOR
}

fn with_navigation(mut items: Vec<String>, extra: &[&str], is_main_menu: bool) -> Vec<String> {
    items.push(style(NAVIGATION_SEPARATOR).dim().to_string());
    items.extend(extra.iter().map(|s| s.to_string()));
    items.push(if is_main_menu { EXIT_OPTION } else { BACK_OPTION }.to_string());
    items
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new(prompt)
        .with_default(default)
        .prompt()
        .context("Failed to get user confirmation")
}

/// Confirmation handler for destructive operations; `assume_yes` skips the prompt
pub fn confirm(assume_yes: bool) -> impl FnOnce(&str) -> Result<bool> {
    move |message| {
        if assume_yes {
            return Ok(true);
        }
        prompt_yes_no(message, false)
    }
}

/// Interactive browser: pick a client, project, asset and task, then open,
/// save or publish scene files
pub fn run_browser(manager: &mut ExplorerManager) -> Result<()> {
    let mut host = FileHost::new();

    display_println!("{} Asset Explorer", style("▶").cyan().bold());

    loop {
        display_println!();
        display_println!("{}", format_environment(manager.environment()));
        if let Some(scene) = host.current_scene() {
            display_println!("{} {}", style("Scene:").dim(), scene.display());
        }

        let items = with_navigation(
            vec![
                "Browse folders".to_string(),
                "Scene files".to_string(),
                "Save version up".to_string(),
                "Publish".to_string(),
                "Recent files".to_string(),
            ],
            &[],
            true,
        );

        let Some(choice) =
            handle_prompt_result(Select::new("What would you like to do?", items).prompt())?
        else {
            break;
        };

        let result = match choice.as_str() {
            "Browse folders" => browse_folders(manager),
            "Scene files" => scene_files(manager, &mut host),
            "Save version up" => save_scene(manager, &mut host, SaveMode::VersionUp),
            "Publish" => save_scene(manager, &mut host, SaveMode::Publish),
            "Recent files" => recent_files(manager, &mut host),
            EXIT_OPTION => break,
            _ => Ok(()),
        };

        if let Err(error) = result {
            report(&error);
        }
    }

    Ok(())
}

/// Print a failed action without leaving the browser
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<ExplorerError>() {
        Some(ExplorerError::Cancelled) => {}
        _ => display_warning!("{:#}", error),
    }
}

fn browse_folders(manager: &mut ExplorerManager) -> Result<()> {
    for role in Role::ALL {
        let options = manager.options(role)?.unwrap_or_default();
        let current = manager.environment().get(role).to_string();
        let cursor = options.iter().position(|o| *o == current).unwrap_or(0);

        let items = with_navigation(options, &[CREATE_OPTION], false);
        let prompt = format!("Select {role}:");
        let Some(choice) =
            handle_prompt_result(Select::new(&prompt, items).with_starting_cursor(cursor).prompt())?
        else {
            return Ok(());
        };

        if is_separator(&choice) {
            return Ok(());
        }

        match choice.as_str() {
            BACK_OPTION => return Ok(()),
            CREATE_OPTION => {
                let Some(name) =
                    handle_prompt_result(Text::new(&format!("New {role} name:")).prompt())?
                else {
                    return Ok(());
                };
                let outcome = manager.create_role_folder(role, name.trim())?;
                display_success!("Created {}", outcome.path().display());
            }
            name => {
                manager.select(role, name)?;
            }
        }
        log_debug!("Browser selected {} '{}'", role, manager.environment().get(role));
    }
    Ok(())
}

const OPEN_ACTION: &str = "Open";
const IMPORT_ACTION: &str = "Import";
const REFERENCE_ACTION: &str = "Reference";
const REVEAL_ACTION: &str = "Open in directory";
const REMOVE_ACTION: &str = "Remove from list";

/// Pick what to do with a chosen file; `None` goes back
fn prompt_file_action(file_name: &str, actions: &[&str]) -> Result<Option<String>> {
    let items = with_navigation(actions.iter().map(|a| a.to_string()).collect(), &[], false);
    let choice = handle_prompt_result(Select::new(&format!("{file_name}:"), items).prompt())?;
    Ok(choice.filter(|c| !is_navigation_option(c) && !is_separator(c)))
}

fn scene_files(manager: &mut ExplorerManager, host: &mut FileHost) -> Result<()> {
    let files = manager.scene_files()?;
    if files.is_empty() {
        display_println!("{}", style("No scene files in this task yet").dim());
        return Ok(());
    }

    let labels: Vec<String> = files.iter().map(format_scene_file).collect();
    let items = with_navigation(labels.clone(), &[], false);
    let Some(choice) = handle_prompt_result(Select::new("Scene files:", items).prompt())? else {
        return Ok(());
    };

    let Some(index) = labels.iter().position(|l| *l == choice) else {
        return Ok(());
    };
    let file = &files[index];
    let actions = [OPEN_ACTION, IMPORT_ACTION, REFERENCE_ACTION, REVEAL_ACTION];
    let Some(action) = prompt_file_action(&file.file_name, &actions)? else {
        return Ok(());
    };

    let path = file.path.clone();
    match action.as_str() {
        OPEN_ACTION => {
            manager.open_file(host, &path, confirm(false))?;
            display_success!("Opened {}", path.display());
        }
        IMPORT_ACTION => {
            manager.import_file(host, &path)?;
            display_success!("Imported {}", path.display());
        }
        REFERENCE_ACTION => {
            let namespace = manager.reference_file(host, &path)?;
            display_success!("Referenced {} as {}", path.display(), style(namespace).cyan());
        }
        REVEAL_ACTION => reveal_in_file_browser(&path)?,
        _ => {}
    }
    Ok(())
}

fn save_scene(manager: &mut ExplorerManager, host: &mut FileHost, mode: SaveMode) -> Result<()> {
    let plan = manager.preview_save(mode)?;
    for line in format_save_plan(&plan) {
        display_println!("{}", line);
    }
    if !prompt_yes_no("Save?", true)? {
        return Ok(());
    }

    let plan = manager.save(host, mode)?;
    display_success!("Saved {}", plan.target.display());
    Ok(())
}

fn recent_files(manager: &mut ExplorerManager, host: &mut FileHost) -> Result<()> {
    let entries = manager.recent_files().to_vec();
    if entries.is_empty() {
        display_println!("{}", style("No recent files").dim());
        return Ok(());
    }

    let labels: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format_recent_entry(i + 1, entry))
        .collect();
    let items = with_navigation(labels.clone(), &[], false);
    let Some(choice) = handle_prompt_result(Select::new("Recent files:", items).prompt())? else {
        return Ok(());
    };
    if is_navigation_option(&choice) {
        return Ok(());
    }

    let Some(index) = labels.iter().position(|l| *l == choice) else {
        return Ok(());
    };
    let entry = &entries[index];
    let actions = [OPEN_ACTION, REVEAL_ACTION, REMOVE_ACTION];
    let Some(action) = prompt_file_action(&entry.file_name, &actions)? else {
        return Ok(());
    };

    match action.as_str() {
        OPEN_ACTION => {
            let path = manager.open_recent(host, index, confirm(false))?;
            display_success!("Opened {}", path.display());
        }
        REVEAL_ACTION => reveal_in_file_browser(&manager.recent_file_path(index)?)?,
        REMOVE_ACTION => {
            manager.remove_recent(&entry.path)?;
            display_success!("Removed {}", entry.file_name);
        }
        _ => {}
    }
    Ok(())
}
