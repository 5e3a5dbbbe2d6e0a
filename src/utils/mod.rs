pub mod fs;
pub mod platform;
