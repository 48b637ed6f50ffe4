//! Tabshell configuration.
//!
//! TOML on disk, `serde` defaults for every field, and validation that
//! reports all problems at once.
//!
//! ```rust,no_run
//! use tabshell_config::{config_to_json, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ContentConfig, LogLevel, LoggingConfig, ShellConfig, TabsConfig, UiConfig, WindowConfig,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use tabshell_common::ConfigError;

/// Load from the platform default path, creating it if needed.
pub fn load_config() -> Result<ShellConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load from an explicit path (the `--config` flag).
pub fn load_config_from(path: &Path) -> Result<ShellConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Pretty JSON, for `--print-config` and the chrome surfaces.
pub fn config_to_json(config: &ShellConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
