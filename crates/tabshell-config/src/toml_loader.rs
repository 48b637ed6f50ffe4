//! Reading and bootstrapping `config.toml`.

use std::path::{Path, PathBuf};

use tabshell_common::ConfigError;
use tracing::{info, warn};

use crate::schema::ShellConfig;
use crate::validation;

const APP_DIR: &str = "tabshell";
const FILE_NAME: &str = "config.toml";

/// Parse the file at `path`.
///
/// Missing fields take their defaults. A file that parses but fails
/// validation is logged and replaced by the default config.
pub fn load_from_path(path: &Path) -> Result<ShellConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))?;
    let config = parse(&text)?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "invalid config, using defaults");
        return Ok(ShellConfig::default());
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Parse TOML text without validating it.
pub fn parse(text: &str) -> Result<ShellConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError(format!("invalid TOML: {e}")))
}

/// Load from [`default_config_path`], writing a commented template first if
/// the file does not exist yet.
pub fn load_default() -> Result<ShellConfig, ConfigError> {
    let path = default_config_path()?;
    if path.exists() {
        return load_from_path(&path);
    }
    info!(path = %path.display(), "no config found, writing template");
    create_default_config(&path)?;
    Ok(ShellConfig::default())
}

/// `<platform config dir>/tabshell/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            ConfigError::ParseError(format!("cannot create {}: {e}", dir.display()))
        })?;
    }
    std::fs::write(path, TEMPLATE)
        .map_err(|e| ConfigError::ParseError(format!("cannot write {}: {e}", path.display())))?;
    info!(path = %path.display(), "default config written");
    Ok(())
}

const TEMPLATE: &str = r#"# Tabshell configuration (schema version 1)
# Every key is optional; uncomment to override the default shown.

[window]
# title = "Tabshell"
# initial_width = 1200     # 320-7680
# initial_height = 800     # 240-4320
# ui_height = 80           # header strip, 32-400
# sidebar_width = 300      # 100-1000

[tabs]
# initial_tab_id = "tab-1"
# default_url = "about:blank"
# default_title = "New Tab"

[content]
# user_agent = "Tabshell/0.1"
# allowed_schemes = ["http", "https", "about"]
# autoplay = false

[ui]
# dev_server_url = "http://localhost:5173"
# devtools = false

[logging]
# level = "info"           # trace, debug, info, warn, error
"#;
