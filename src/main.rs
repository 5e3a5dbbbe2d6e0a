use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use asset_explorer::hierarchy::HierarchyError;
use asset_explorer::output::{self, OutputMode};
use asset_explorer::settings::constants::{get_data_dir, DATA_DIR_ENV};
use asset_explorer::ui::formatting::{
    format_environment, format_recent_entry, format_save_plan, format_scene_file,
    format_template_tree,
};
use asset_explorer::ui::prompts::{self, confirm};
use asset_explorer::utils::fs::expand_tilde;
use asset_explorer::utils::platform::reveal_in_file_browser;
use asset_explorer::{
    display_println, display_success, log_debug, DataPaths, ExplorerError, ExplorerManager,
    FileHost, PathRole, Role, SaveMode,
};

#[derive(Parser)]
#[command(name = "assetx")]
#[command(
    about = "Navigate, version and scaffold 3D production asset folders",
    long_about = "assetx keeps a current client / project / asset / task selection over a\n\
                  production folder tree, names versioned scene saves and scaffolds new\n\
                  folders from hierarchy profiles.\n\n\
                  GETTING STARTED:\n  \
                  1. Point it at your productions: 'assetx settings set-project-path <dir>'\n  \
                  2. Scaffold a client: 'assetx create client <name>'\n  \
                  3. Run 'assetx' to browse interactively"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print command results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding settings, recent files and hierarchy profiles
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the current client/project/asset/task
    Env {
        #[command(subcommand)]
        command: EnvCommands,
    },

    /// Create a client, project, asset or task folder from the current profile
    Create {
        /// client, project, asset or task
        role: Role,
        name: String,
    },

    /// List scene files of the current task
    Files,

    /// Open a scene file and record it as recent
    Open {
        /// File name in the current task folder, or a path
        file: PathBuf,
    },

    /// Import a scene file into the open scene
    Import {
        /// File name in the current task folder, or a path
        file: PathBuf,
    },

    /// Reference a scene file; the namespace is the file name without extension
    Reference {
        /// File name in the current task folder, or a path
        file: PathBuf,
    },

    /// Save the scene under the next version
    Save {
        /// Publish instead of bumping the subversion
        #[arg(long)]
        publish: bool,

        /// Only show what would be written
        #[arg(long)]
        dry_run: bool,

        /// Working scene to save; an empty file is written when omitted
        #[arg(long)]
        scene: Option<PathBuf>,
    },

    /// Recently opened and saved files
    Recent {
        #[command(subcommand)]
        command: RecentCommands,
    },

    /// Manage hierarchy profiles used for scaffolding
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show and change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Reveal a folder of the current environment, a scene file or a recent
    /// file in the file browser
    Reveal {
        /// client, project, asset, task or data
        #[arg(default_value = "task", conflicts_with_all = ["file", "recent"])]
        target: PathRole,

        /// Scene file name in the current task folder, or a path
        #[arg(long, conflicts_with = "recent")]
        file: Option<PathBuf>,

        /// Position as shown by `recent list`
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Interactive browser (default when no command is given)
    Browse,
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Show the current environment
    Show,

    /// Print the folder of a role in the current environment
    Path {
        /// client, project, asset, task or data
        #[arg(default_value = "task")]
        role: PathRole,
    },

    /// List selectable folders for a role
    Options { role: Role },

    /// Select a folder; deeper roles follow the first available folder
    Select { role: Role, name: String },
}

#[derive(Subcommand)]
enum RecentCommands {
    /// List recent files, most recent first
    List,

    /// Restore the environment of a recent file
    Select {
        /// Position as shown by `recent list`
        index: usize,
    },

    /// Restore the environment of a recent file and open it
    Open {
        /// Position as shown by `recent list`
        index: usize,
    },

    /// Remove a file from the list
    Remove { path: String },

    /// Clear the list
    Clear,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List hierarchy profiles
    List,

    /// Make a profile current
    Use { name: String },

    /// Create a profile from the default template
    New { name: String },

    /// Show a profile's folder tree
    Show {
        /// Defaults to the current profile
        name: Option<String>,
    },

    /// Add a folder to a profile
    Add {
        /// Parent folder path, e.g. "CLIENT NAME/PROJECT NAME"
        parent: String,
        name: String,

        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Rename a folder of a profile
    Rename {
        path: String,
        new_name: String,

        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Delete a folder and its subtree from a profile
    Delete {
        path: String,

        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Create a profile from an existing folder tree
    Capture { name: String, dir: PathBuf },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show all settings
    Show,

    /// Root folder holding every client
    SetProjectPath { path: String },

    /// Same as `profile use`
    SetProfile { name: String },

    /// Task selected by default when an asset is picked; empty clears it
    SetDefaultTask {
        #[arg(default_value = "")]
        task: String,
    },

    /// Number of recent files to keep
    SetRecentAmount { amount: usize },

    /// List task folders the current profile scaffolds
    Tasks,
}

fn main() {
    let cli = Cli::parse();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Cli
    };
    output::init_with_verbosity(output_mode, cli.verbose);

    if let Err(error) = run(cli) {
        report_error(&error);
        std::process::exit(1);
    }
}

fn report_error(error: &anyhow::Error) {
    let recoverable = error
        .downcast_ref::<ExplorerError>()
        .map(ExplorerError::is_recoverable)
        .or_else(|| {
            error
                .downcast_ref::<HierarchyError>()
                .map(HierarchyError::is_recoverable)
        })
        .unwrap_or(false);

    if recoverable {
        eprintln!("{} {}", style("Warning:").yellow().bold(), error);
    } else {
        eprintln!("{} {:#}", style("Error:").red().bold(), error);
    }
}

/// Print `value` as JSON in JSON mode, otherwise run the human renderer
fn emit<T: Serialize>(value: &T, human: impl FnOnce()) -> Result<()> {
    if output::is_json() {
        output::emit_json(value)
    } else {
        human();
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = cli
        .data_dir
        .map(expand_tilde)
        .unwrap_or_else(get_data_dir);
    log_debug!("Using data directory {}", data_dir.display());

    let mut manager = ExplorerManager::open(DataPaths::new(data_dir))?;
    let assume_yes = cli.yes;

    match cli.command {
        None | Some(Commands::Browse) => prompts::run_browser(&mut manager)?,

        Some(Commands::Env { command }) => match command {
            EnvCommands::Show => {
                let env = manager.environment();
                emit(env, || display_println!("{}", format_environment(env)))?;
            }
            EnvCommands::Path { role } => {
                let path = manager.path_for(role)?;
                emit(&json!({ "role": role.to_string(), "path": path }), || {
                    display_println!("{}", path.display())
                })?;
            }
            EnvCommands::Options { role } => {
                let options = manager.options(role)?;
                emit(&options, || match &options {
                    Some(names) if !names.is_empty() => {
                        for name in names {
                            display_println!("{}", name);
                        }
                    }
                    Some(_) => display_println!("{}", style(format!("No {role} folders")).dim()),
                    None => display_println!(
                        "{}",
                        style(format!("The {role} folder does not exist")).dim()
                    ),
                })?;
            }
            EnvCommands::Select { role, name } => {
                let env = manager.select(role, &name)?;
                emit(env, || display_println!("{}", format_environment(env)))?;
            }
        },

        Some(Commands::Create { role, name }) => {
            let outcome = manager.create_role_folder(role, &name)?;
            let path = outcome.path().to_path_buf();
            emit(&json!({ "role": role.to_string(), "path": path }), || {
                display_success!("Created {} {}", role, style(path.display()).cyan());
                display_println!("{}", format_environment(manager.environment()));
            })?;
        }

        Some(Commands::Files) => {
            let files = manager.scene_files()?;
            emit(&files, || {
                if files.is_empty() {
                    display_println!("{}", style("No scene files in this task yet").dim());
                }
                for file in &files {
                    display_println!("{}", format_scene_file(file));
                }
            })?;
        }

        Some(Commands::Open { file }) => {
            let path = manager.resolve_scene_path(&file)?;
            let mut host = FileHost::new();
            manager.open_file(&mut host, &path, confirm(assume_yes))?;
            emit(&json!({ "path": path }), || {
                display_success!("Opened {}", path.display())
            })?;
        }

        Some(Commands::Import { file }) => {
            let path = manager.resolve_scene_path(&file)?;
            let mut host = FileHost::new();
            manager.import_file(&mut host, &path)?;
            emit(&json!({ "path": path }), || {
                display_success!("Imported {}", path.display())
            })?;
        }

        Some(Commands::Reference { file }) => {
            let path = manager.resolve_scene_path(&file)?;
            let mut host = FileHost::new();
            let namespace = manager.reference_file(&mut host, &path)?;
            emit(&json!({ "path": path, "namespace": namespace }), || {
                display_success!(
                    "Referenced {} as {}",
                    path.display(),
                    style(&namespace).cyan()
                )
            })?;
        }

        Some(Commands::Save {
            publish,
            dry_run,
            scene,
        }) => {
            let mode = if publish {
                SaveMode::Publish
            } else {
                SaveMode::VersionUp
            };

            let plan = if dry_run {
                manager.preview_save(mode)?
            } else {
                let mut host = match scene {
                    Some(scene) => FileHost::with_scene(expand_tilde(scene)),
                    None => FileHost::new(),
                };
                manager.save(&mut host, mode)?
            };

            emit(&plan, || {
                for line in format_save_plan(&plan) {
                    display_println!("{}", line);
                }
                if !dry_run {
                    display_success!("Saved");
                }
            })?;
        }

        Some(Commands::Recent { command }) => match command {
            RecentCommands::List => {
                let entries = manager.recent_files();
                emit(&entries, || {
                    if entries.is_empty() {
                        display_println!("{}", style("No recent files").dim());
                    }
                    for (i, entry) in entries.iter().enumerate() {
                        display_println!("{}", format_recent_entry(i + 1, entry));
                    }
                })?;
            }
            RecentCommands::Select { index } => {
                let entry = manager.select_recent(index.saturating_sub(1))?;
                emit(&entry, || {
                    display_println!("{}", format_environment(&entry.environment()))
                })?;
            }
            RecentCommands::Open { index } => {
                let mut host = FileHost::new();
                let path =
                    manager.open_recent(&mut host, index.saturating_sub(1), confirm(assume_yes))?;
                emit(&json!({ "path": path }), || {
                    display_success!("Opened {}", path.display())
                })?;
            }
            RecentCommands::Remove { path } => {
                let removed = manager.remove_recent(&path)?;
                emit(&json!({ "removed": removed }), || {
                    if removed {
                        display_success!("Removed {}", path);
                    } else {
                        display_println!("{}", style(format!("{path} is not in the list")).dim());
                    }
                })?;
            }
            RecentCommands::Clear => {
                manager.clear_recent(confirm(assume_yes))?;
                emit(&json!({ "cleared": true }), || {
                    display_success!("Recent files cleared")
                })?;
            }
        },

        Some(Commands::Profile { command }) => {
            let current = manager.current_profile().to_string();
            match command {
                ProfileCommands::List => {
                    let profiles = manager.profiles()?;
                    emit(&profiles, || {
                        for name in &profiles {
                            if *name == current {
                                display_println!("{} {}", style("*").green().bold(), name);
                            } else {
                                display_println!("  {}", name);
                            }
                        }
                    })?;
                }
                ProfileCommands::Use { name } => {
                    manager.use_profile(&name)?;
                    emit(&json!({ "profile": name }), || {
                        display_success!("Using hierarchy profile {}", style(&name).cyan())
                    })?;
                }
                ProfileCommands::New { name } => {
                    manager.new_profile(&name)?;
                    emit(&json!({ "profile": name }), || {
                        display_success!("Created hierarchy profile {}", style(&name).cyan())
                    })?;
                }
                ProfileCommands::Show { name } => {
                    let name = name.unwrap_or(current);
                    let tree = manager.edit_template(&name)?;
                    let forest = tree.to_forest();
                    emit(&forest, || {
                        display_println!("{}", style(&name).bold());
                        for line in format_template_tree(&forest) {
                            display_println!("{}", line);
                        }
                    })?;
                }
                ProfileCommands::Add {
                    parent,
                    name,
                    profile,
                } => {
                    let profile = profile.unwrap_or(current);
                    manager.add_template_folder(&profile, &parent, &name)?;
                    emit(&json!({ "profile": profile, "added": format!("{parent}/{name}") }), || {
                        display_success!("Added {}/{}", parent, style(&name).cyan())
                    })?;
                }
                ProfileCommands::Rename {
                    path,
                    new_name,
                    profile,
                } => {
                    let profile = profile.unwrap_or(current);
                    manager.rename_template_folder(&profile, &path, &new_name)?;
                    emit(&json!({ "profile": profile, "renamed": path, "to": new_name }), || {
                        display_success!("Renamed {} to {}", path, style(&new_name).cyan())
                    })?;
                }
                ProfileCommands::Delete { path, profile } => {
                    let profile = profile.unwrap_or(current);
                    manager.delete_template_folder(&profile, &path, confirm(assume_yes))?;
                    emit(&json!({ "profile": profile, "deleted": path }), || {
                        display_success!("Deleted {}", path)
                    })?;
                }
                ProfileCommands::Capture { name, dir } => {
                    let forest = manager.capture_profile(&name, &dir)?;
                    emit(&forest, || {
                        display_success!("Captured {} as {}", dir.display(), style(&name).cyan());
                        for line in format_template_tree(&forest) {
                            display_println!("{}", line);
                        }
                    })?;
                }
            }
        }

        Some(Commands::Settings { command }) => {
            match command {
                SettingsCommands::Show => {}
                SettingsCommands::SetProjectPath { path } => manager.set_project_path(&path)?,
                SettingsCommands::SetProfile { name } => manager.use_profile(&name)?,
                SettingsCommands::SetDefaultTask { task } => manager.set_default_task(&task)?,
                SettingsCommands::SetRecentAmount { amount } => {
                    manager.set_recent_files_amount(amount)?
                }
                SettingsCommands::Tasks => {
                    let tasks = manager.default_task_candidates()?;
                    return emit(&tasks, || {
                        for task in &tasks {
                            display_println!("{}", task);
                        }
                    });
                }
            }

            let settings = manager.settings();
            emit(settings, || {
                display_println!("{:<22} {}", style("project_path").bold(), settings.project_path);
                display_println!(
                    "{:<22} {}",
                    style("hierarchy_profile").bold(),
                    settings.current_hierarchy_profile
                );
                display_println!("{:<22} {}", style("default_task").bold(), settings.default_task);
                display_println!(
                    "{:<22} {}",
                    style("recent_files_amount").bold(),
                    settings.recent_files_amount
                );
                display_println!(
                    "{:<22} {}",
                    style("environment").bold(),
                    format_environment(&settings.current_environment)
                );
                display_println!(
                    "{:<22} {}",
                    style("data_dir").bold(),
                    manager.data_paths().root().display()
                );
            })?;
        }

        Some(Commands::Reveal {
            target,
            file,
            recent,
        }) => {
            let path = match (file, recent) {
                (Some(file), _) => manager.resolve_scene_path(&file)?,
                (None, Some(index)) => manager.recent_file_path(index.saturating_sub(1))?,
                (None, None) => manager.path_for(target)?,
            };
            if !path.exists() {
                return Err(ExplorerError::FileNotFound { path }.into());
            }
            reveal_in_file_browser(&path)?;
            emit(&json!({ "path": path }), || {
                display_success!("Revealed {}", path.display())
            })?;
        }
    }

    Ok(())
}
