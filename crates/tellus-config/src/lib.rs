//! Configuration for Tellus.
//!
//! Walk tuning, body parameters, keybinding overrides and demo settings,
//! persisted to disk as `config.ron`. Supports CLI overrides via clap and
//! hot-reload detection. Unknown or missing fields fall back to defaults so
//! older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{BodyConfig, Config, DebugConfig, DemoConfig, InputConfig, WalkConfig};
pub use error::ConfigError;

/// Returns the platform config directory for Tellus, if the OS exposes one.
#[must_use]
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("tellus"))
}
