mod config;
pub mod constants;

pub use config::{Settings, SettingsRepository};
pub use constants::DataPaths;
