// Settings and their persistence

pub mod config;
pub mod settings;

pub use config::ConfigManager;
pub use settings::{DEFAULT_URI, Overrides, PruneSettings, Settings};
