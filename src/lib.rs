//! asset-explorer library
//!
//! Navigation, versioning and folder scaffolding for a 3D production
//! client/project/asset/task folder convention

pub mod content;
pub mod environment;
pub mod explorer;
pub mod hierarchy;
pub mod host;
pub mod output;
pub mod recent;
pub mod settings;
pub mod ui;
pub mod utils;
pub mod versioning;

// Re-export commonly used types
pub use environment::{Environment, PathRole, Role};
pub use explorer::{ExplorerError, ExplorerManager};
pub use host::{FileHost, SceneHost};
pub use settings::DataPaths;
pub use versioning::{SaveMode, SavePlan};
