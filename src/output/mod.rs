//! Unified output interface for interactive and host-driven use
//!
//! In CLI mode user-facing output goes to stdout. In JSON mode stdout carries
//! only the machine-readable result of a command and every other line goes to
//! stderr, so a host front-end can parse stdout directly.

mod config;
mod display;
mod logging;
#[doc(hidden)]
pub mod writer;

pub use config::{OutputConfig, OutputMode};

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::RwLock;

static OUTPUT_CONFIG: OnceCell<RwLock<OutputConfig>> = OnceCell::new();

/// Initialize the output system with the specified mode and verbosity
pub fn init_with_verbosity(mode: OutputMode, verbose: bool) {
    let mut config = OutputConfig::new(mode);
    if verbose {
        config.set_verbose();
    }

    config.init_tracing();
    console::set_colors_enabled(config.colors_enabled());

    // A second initialization keeps the first configuration
    let _ = OUTPUT_CONFIG.set(RwLock::new(config));
}

/// Get current output mode
pub fn current_mode() -> OutputMode {
    OUTPUT_CONFIG
        .get()
        .and_then(|config| config.read().ok().map(|c| c.mode()))
        .unwrap_or(OutputMode::Cli)
}

/// Whether command results should be emitted as JSON
pub fn is_json() -> bool {
    current_mode() == OutputMode::Json
}

/// Emit a command result as JSON on stdout
pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let value = serde_json::to_value(value)?;
    writer::write_json(&value)?;
    Ok(())
}
