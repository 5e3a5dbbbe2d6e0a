//! Output configuration and mode management

use console::Term;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive use - display to stdout, logs to stderr
    Cli,
    /// Driven by a host front-end - JSON results on stdout, everything else to stderr
    Json,
}

/// Configuration for the output system
#[derive(Debug)]
pub struct OutputConfig {
    mode: OutputMode,
    color_enabled: bool,
    log_level: Level,
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(mode: OutputMode) -> Self {
        let color_enabled = match mode {
            OutputMode::Cli => Term::stdout().features().colors_supported(),
            OutputMode::Json => false,
        };

        let default_level = match mode {
            OutputMode::Cli => Level::INFO,
            OutputMode::Json => Level::WARN,
        };

        let log_level = match std::env::var("RUST_LOG") {
            Ok(level) => match level.to_lowercase().as_str() {
                "trace" => Level::TRACE,
                "debug" => Level::DEBUG,
                "info" => Level::INFO,
                "warn" => Level::WARN,
                "error" => Level::ERROR,
                _ => default_level,
            },
            Err(_) => default_level,
        };

        Self {
            mode,
            color_enabled,
            log_level,
        }
    }

    /// Get the current output mode
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Get the current log level
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Set verbose mode (DEBUG level)
    pub fn set_verbose(&mut self) {
        self.log_level = Level::DEBUG;
    }

    /// Initialize the tracing subscriber based on configuration
    pub fn init_tracing(&self) {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(self.log_level.into()))
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr);

        match self.mode {
            OutputMode::Cli => {
                let _ = builder.with_ansi(self.color_enabled).try_init();
            }
            OutputMode::Json => {
                let _ = builder.with_ansi(false).without_time().compact().try_init();
            }
        }
    }
}
