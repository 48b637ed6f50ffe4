//! Configuration schema types for Tabshell.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod system;
mod tabs;
mod window;

pub use system::*;
pub use tabs::*;
pub use window::*;

use serde::{Deserialize, Serialize};
use tabshell_common::ContentViewConfig;

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration. Only override what you want to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub tabs: TabsConfig,
    pub content: ContentConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl ShellConfig {
    /// Isolated content-view settings derived from `[content]`.
    pub fn content_view_config(&self) -> ContentViewConfig {
        ContentViewConfig::isolated(
            self.content.user_agent.clone(),
            self.content.autoplay,
            self.content.allowed_schemes.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ShellConfig::default();
        assert_eq!(config.window.initial_width, 1200);
        assert_eq!(config.window.ui_height, 80);
        assert_eq!(config.window.sidebar_width, 300);
        assert_eq!(config.tabs.initial_tab_id, "tab-1");
        assert_eq!(config.tabs.default_url, "about:blank");
        assert_eq!(config.tabs.default_title, "New Tab");
        assert_eq!(config.content.allowed_schemes, vec!["http", "https", "about"]);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.ui.dev_server_url.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
[window]
title = "Custom"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Custom");
        assert_eq!(config.window.initial_height, 800);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.tabs, TabsConfig::default());
    }

    #[test]
    fn content_view_config_is_always_isolated() {
        let mut config = ShellConfig::default();
        config.content.user_agent = Some("Tabshell/0.1".into());
        config.content.allowed_schemes = vec!["HTTPS".into()];
        let view = config.content_view_config();
        assert!(view.incognito());
        assert!(!view.devtools());
        assert!(!view.privileged_ipc());
        assert_eq!(view.user_agent.as_deref(), Some("Tabshell/0.1"));
        assert_eq!(view.allowed_schemes, vec!["https"]);
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::Warn.as_directive(), "warn");
        assert_eq!(LogLevel::default().as_directive(), "info");
    }
}
