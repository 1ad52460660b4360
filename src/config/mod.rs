#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

/// Accepted data file extensions.
pub const DATA_EXTENSIONS: &[&str] = &["csv", "txt"];

pub const DEFAULT_DATA_PATH: &str = "demo_data.csv";
