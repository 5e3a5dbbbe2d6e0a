use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Supported operating system platforms
#[derive(Debug, Clone, PartialEq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    Unknown,
}

impl Platform {
    /// Detect the current platform
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unknown
        }
    }

    /// Get the display name for the platform
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::MacOS => "macOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::Unknown => "Unknown",
        }
    }

    /// Build the command that shows `path` in the platform file browser.
    ///
    /// Files are selected inside their folder where the browser supports it;
    /// on Linux the containing folder is opened instead.
    pub fn reveal_command(&self, path: &Path) -> Option<Command> {
        match self {
            Platform::Windows => {
                let mut cmd = Command::new("explorer");
                if path.is_file() {
                    cmd.arg(format!("/select,{}", path.display()));
                } else {
                    cmd.arg(path);
                }
                Some(cmd)
            }
            Platform::MacOS => {
                let mut cmd = Command::new("open");
                cmd.arg("-R").arg(path);
                Some(cmd)
            }
            Platform::Linux => {
                let target = if path.is_dir() {
                    path
                } else {
                    path.parent().unwrap_or(path)
                };
                let mut cmd = Command::new("xdg-open");
                cmd.arg(target);
                Some(cmd)
            }
            Platform::Unknown => None,
        }
    }
}

/// Reveal a path in the OS file browser
pub fn reveal_in_file_browser(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("The path {} does not exist yet", path.display());
    }

    let platform = Platform::current();
    let mut cmd = platform.reveal_command(path).with_context(|| {
        format!(
            "Revealing files is not supported on {}",
            platform.display_name()
        )
    })?;

    debug!("Revealing {} with {:?}", path.display(), cmd);
    cmd.spawn()
        .with_context(|| format!("Failed to open file browser for {}", path.display()))?;
    Ok(())
}
