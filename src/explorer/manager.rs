use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ExplorerError;
use crate::content::{list_scene_files, SceneFile};
use crate::environment::{self, Environment, PathRole, Role};
use crate::hierarchy::{
    self, capture_tree, default_task_candidates, write_blacklist, Blacklist, HierarchyError,
    ProfileStore, RoleFolderOutcome, TemplateNode, TemplateTree,
};
use crate::host::SceneHost;
use crate::log_warn;
use crate::recent::{RecentFileEntry, RecentFiles};
use crate::settings::constants::{DEFAULT_PROFILE, SCENE_EXTENSION};
use crate::settings::{DataPaths, Settings, SettingsRepository};
use crate::utils::fs::{ensure_directory_exists, expand_tilde};
use crate::versioning::{plan_save, SaveMode, SavePlan};

/// Entry point for every explorer operation.
///
/// Holds the data directory documents and keeps the current environment in
/// the settings document, so every change survives the process.
pub struct ExplorerManager {
    paths: DataPaths,
    settings: SettingsRepository,
    profiles: ProfileStore,
    recent: RecentFiles,
}

impl ExplorerManager {
    /// Open the data directory, installing the default profile and the
    /// selector blacklist on first use
    pub fn open(paths: DataPaths) -> Result<Self> {
        ensure_directory_exists(paths.root())?;

        let settings = SettingsRepository::open(&paths)?;
        let profiles = ProfileStore::new(paths.profiles_dir());
        profiles.ensure_defaults()?;
        if !profiles.exists(DEFAULT_PROFILE) {
            profiles.create_from_default(DEFAULT_PROFILE)?;
        }
        let recent = RecentFiles::load(paths.recent_files())?;

        let manager = Self {
            paths,
            settings,
            profiles,
            recent,
        };

        if !manager.paths.blacklist_file().exists() {
            let forest = manager.current_template()?;
            write_blacklist(&manager.paths, &forest)?;
        }

        debug!("Opened data directory {}", manager.paths.root().display());
        Ok(manager)
    }

    pub fn data_paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn environment(&self) -> &Environment {
        self.settings.environment()
    }

    fn project_root(&self) -> Result<PathBuf> {
        if self.settings().project_path.is_empty() {
            return Err(ExplorerError::ProjectPathNotSet.into());
        }
        Ok(self.settings.project_root())
    }

    /// Every role down to `role` must be selected
    fn require_through(&self, role: Role) -> Result<()> {
        let env = self.environment();
        for current in Role::ALL {
            if env.get(current).is_empty() {
                return Err(ExplorerError::IncompleteEnvironment { needed: current }.into());
            }
            if current == role {
                break;
            }
        }
        Ok(())
    }

    /// Every role above `role` must be selected
    fn require_parents(&self, role: Role) -> Result<()> {
        match Role::ALL.iter().position(|r| *r == role) {
            Some(index) if index > 0 => self.require_through(Role::ALL[index - 1]),
            _ => Ok(()),
        }
    }

    fn blacklist(&self) -> Result<Blacklist> {
        Blacklist::load(&self.paths.blacklist_file())
    }

    // Environment

    pub fn path_for(&self, role: PathRole) -> Result<PathBuf> {
        let root = self.project_root()?;
        Ok(environment::resolve(&root, self.environment(), role))
    }

    /// Folder holding the versioned scene files of the current task
    pub fn scene_dir(&self) -> Result<PathBuf> {
        let root = self.project_root()?;
        self.require_through(Role::Task)?;
        Ok(environment::scene_dir(&root, self.environment()))
    }

    /// Selectable folder names for `role`; `None` when its folder is missing
    pub fn options(&self, role: Role) -> Result<Option<Vec<String>>> {
        let root = self.project_root()?;
        self.require_parents(role)?;
        environment::options(&root, self.environment(), role, &self.blacklist()?)
    }

    /// Select `name` for `role`, refreshing deeper roles from disk
    pub fn select(&mut self, role: Role, name: &str) -> Result<&Environment> {
        let available = self.options(role)?.unwrap_or_default();
        if !available.iter().any(|option| option == name) {
            return Err(ExplorerError::UnknownOption {
                role,
                name: name.to_string(),
            }
            .into());
        }

        self.apply_selection(role, name)?;
        Ok(self.environment())
    }

    fn apply_selection(&mut self, role: Role, name: &str) -> Result<()> {
        let root = self.project_root()?;
        let blacklist = self.blacklist()?;
        let default_task = self.settings().default_task.clone();

        let mut env = self.environment().clone();
        environment::select(&root, &mut env, role, name, &blacklist, &default_task)?;
        info!("Environment is now {}", env.display_label());
        self.settings.set_environment(env)
    }

    /// Create a client, project, asset or task folder from the current
    /// profile and select it
    pub fn create_role_folder(&mut self, role: Role, name: &str) -> Result<RoleFolderOutcome> {
        let root = self.project_root()?;
        self.require_parents(role)?;

        let forest = self.current_template()?;
        if role == Role::Client {
            write_blacklist(&self.paths, &forest)?;
        }

        let base = environment::resolve(&root, self.environment(), role.into());
        let outcome = hierarchy::create_role_folder(&forest, &base, role, name)?;

        self.apply_selection(role, name)?;
        Ok(outcome)
    }

    // Scene files

    pub fn scene_files(&self) -> Result<Vec<SceneFile>> {
        let dir = self.scene_dir()?;
        if !dir.is_dir() {
            return Ok(vec![]);
        }
        list_scene_files(&dir)
    }

    /// Open `path` in the host and record it as recent.
    ///
    /// `confirm` is asked before unsaved changes in the host are dropped.
    pub fn open_file<H, F>(&mut self, host: &mut H, path: &Path, confirm: F) -> Result<()>
    where
        H: SceneHost + ?Sized,
        F: FnOnce(&str) -> Result<bool>,
    {
        check_openable(&*host, path, confirm)?;
        host.open(path)?;
        self.record_recent(path)
    }

    /// A bare file name resolves inside the current task's scene folder
    pub fn resolve_scene_path(&self, file: &Path) -> Result<PathBuf> {
        let file = expand_tilde(file);
        if file.is_absolute() || file.exists() {
            return Ok(file);
        }
        Ok(self.scene_dir()?.join(file))
    }

    /// Merge another scene file into the host's open scene
    pub fn import_file<H>(&self, host: &mut H, path: &Path) -> Result<()>
    where
        H: SceneHost + ?Sized,
    {
        require_file(path)?;
        host.import(path)
    }

    /// Reference a scene file under a namespace named after its stem
    pub fn reference_file<H>(&self, host: &mut H, path: &Path) -> Result<String>
    where
        H: SceneHost + ?Sized,
    {
        require_file(path)?;
        let namespace = reference_namespace(path);
        host.reference(path, &namespace)
    }

    fn record_recent(&mut self, path: &Path) -> Result<()> {
        let cap = self.settings.recent_files_amount_on_disk()?;
        let entry = RecentFileEntry::new(path, self.environment());
        self.recent.record(entry, cap)
    }

    /// What a save would write, without touching the disk
    pub fn preview_save(&self, mode: SaveMode) -> Result<SavePlan> {
        let root = self.project_root()?;
        self.require_through(Role::Task)?;
        plan_save(&root, self.environment(), mode, SCENE_EXTENSION)
    }

    /// Save the host scene under the next versioned name.
    ///
    /// A named scene is saved in place first, then a publish copies the
    /// latest file forward before the host writes the new file.
    pub fn save<H>(&mut self, host: &mut H, mode: SaveMode) -> Result<SavePlan>
    where
        H: SceneHost + ?Sized,
    {
        let plan = self.preview_save(mode)?;
        if plan.target.exists() {
            return Err(ExplorerError::TargetExists { path: plan.target }.into());
        }

        ensure_directory_exists(&plan.directory)?;
        if host.current_scene().is_some() {
            host.save()?;
        }
        plan.apply_copy_forward()?;
        host.save_as(&plan.target)?;
        info!("Saved {}", plan.target.display());

        self.record_recent(&plan.target)?;
        Ok(plan)
    }

    // Recent files

    pub fn recent_files(&self) -> &[RecentFileEntry] {
        self.recent.list()
    }

    fn recent_entry(&self, index: usize) -> Result<RecentFileEntry> {
        self.recent.get(index).cloned().ok_or_else(|| {
            ExplorerError::RecentIndexOutOfRange {
                index,
                len: self.recent.len(),
            }
            .into()
        })
    }

    pub fn recent_file_path(&self, index: usize) -> Result<PathBuf> {
        Ok(PathBuf::from(self.recent_entry(index)?.path))
    }

    /// Restore the environment a recent file was recorded with
    pub fn select_recent(&mut self, index: usize) -> Result<RecentFileEntry> {
        let entry = self.recent_entry(index)?;
        self.settings.set_environment(entry.environment())?;
        Ok(entry)
    }

    /// Open a recent file and restore its environment.
    ///
    /// Nothing changes unless the host actually opened the file.
    pub fn open_recent<H, F>(&mut self, host: &mut H, index: usize, confirm: F) -> Result<PathBuf>
    where
        H: SceneHost + ?Sized,
        F: FnOnce(&str) -> Result<bool>,
    {
        let entry = self.recent_entry(index)?;
        let path = PathBuf::from(&entry.path);
        check_openable(&*host, &path, confirm)?;

        host.open(&path)?;
        self.settings.set_environment(entry.environment())?;
        self.record_recent(&path)?;
        Ok(path)
    }

    pub fn remove_recent(&mut self, path: &str) -> Result<bool> {
        self.recent.remove(path)
    }

    pub fn clear_recent<F>(&mut self, confirm: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        if self.recent.is_empty() {
            return Ok(());
        }
        if !confirm("Clear the recent files list?")? {
            return Err(ExplorerError::Cancelled.into());
        }
        self.recent.clear()
    }

    // Hierarchy profiles

    pub fn profiles(&self) -> Result<Vec<String>> {
        self.profiles.list()
    }

    pub fn current_profile(&self) -> &str {
        &self.settings().current_hierarchy_profile
    }

    pub fn current_template(&self) -> Result<Vec<TemplateNode>> {
        self.profiles.load(self.current_profile())
    }

    pub fn use_profile(&mut self, name: &str) -> Result<()> {
        self.profiles.check_selectable(name)?;
        let forest = self.profiles.load(name)?;
        self.settings.set_current_profile(name)?;
        write_blacklist(&self.paths, &forest)?;
        info!("Hierarchy profile is now '{}'", name);
        Ok(())
    }

    pub fn new_profile(&self, name: &str) -> Result<()> {
        hierarchy::validate_folder_name(name)?;
        self.profiles.create_from_default(name)
    }

    /// Load a profile for editing
    pub fn edit_template(&self, profile: &str) -> Result<TemplateTree> {
        self.profiles.check_selectable(profile)?;
        let forest = self.profiles.load(profile)?;
        Ok(TemplateTree::from_forest(forest))
    }

    fn update_template<T>(
        &self,
        profile: &str,
        edit: impl FnOnce(&mut TemplateTree) -> Result<T, HierarchyError>,
    ) -> Result<T> {
        let mut tree = self.edit_template(profile)?;
        let result = edit(&mut tree)?;

        let forest = tree.to_forest();
        self.profiles.save(profile, &forest)?;
        // The selector only ever hides names of the active profile
        if profile == self.current_profile() {
            write_blacklist(&self.paths, &forest)?;
        }
        Ok(result)
    }

    pub fn add_template_folder(&self, profile: &str, parent: &str, name: &str) -> Result<()> {
        self.update_template(profile, |tree| tree.add_folder(parent, name))
    }

    pub fn rename_template_folder(&self, profile: &str, path: &str, new_name: &str) -> Result<()> {
        self.update_template(profile, |tree| tree.rename_folder(path, new_name))
    }

    pub fn delete_template_folder<F>(
        &self,
        profile: &str,
        path: &str,
        confirm: F,
    ) -> Result<TemplateNode>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        // Locked and missing folders fail before anyone is asked
        let mut tree = self.edit_template(profile)?;
        tree.delete_folder(path)?;

        if !confirm(&format!("Delete '{path}' and everything below it?"))? {
            return Err(ExplorerError::Cancelled.into());
        }

        self.update_template(profile, |tree| tree.delete_folder(path))
    }

    /// Store the folder tree under `dir` as a new profile
    pub fn capture_profile(&self, name: &str, dir: &Path) -> Result<Vec<TemplateNode>> {
        hierarchy::validate_folder_name(name)?;
        let forest = capture_tree(&expand_tilde(dir))?;
        self.profiles.create(name, &forest)?;
        info!("Captured {} as hierarchy profile '{}'", dir.display(), name);
        Ok(forest)
    }

    pub fn default_task_candidates(&self) -> Result<Vec<String>> {
        Ok(default_task_candidates(&self.current_template()?))
    }

    // Settings

    /// Point the explorer at another root folder; the environment is reset
    pub fn set_project_path(&mut self, path: &str) -> Result<()> {
        let expanded = expand_tilde(path);
        if !expanded.is_dir() {
            log_warn!("Project path {} does not exist yet", expanded.display());
        }
        if self.settings().project_path != path {
            self.settings.set_environment(Environment::default())?;
        }
        self.settings.set_project_path(path)
    }

    pub fn set_default_task(&mut self, task: &str) -> Result<()> {
        if !task.is_empty() {
            let candidates = self.default_task_candidates()?;
            if !candidates.iter().any(|c| c == task) {
                log_warn!(
                    "'{}' is not a task folder of profile '{}'",
                    task,
                    self.current_profile()
                );
            }
        }
        self.settings.set_default_task(task)
    }

    pub fn set_recent_files_amount(&mut self, amount: usize) -> Result<()> {
        if amount == 0 {
            anyhow::bail!("Recent files amount must be at least 1");
        }
        self.settings.set_recent_files_amount(amount)
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ExplorerError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Namespace of a referenced file: its name without the last extension
fn reference_namespace(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// The file must exist and the host may only drop unsaved changes when
/// `confirm` agrees
fn check_openable<H, F>(host: &H, path: &Path, confirm: F) -> Result<()>
where
    H: SceneHost + ?Sized,
    F: FnOnce(&str) -> Result<bool>,
{
    require_file(path)?;
    if host.is_modified() && !confirm("The current scene has unsaved changes. Open anyway?")? {
        return Err(ExplorerError::Cancelled.into());
    }
    Ok(())
}
