//! Tab and content-view configuration.

use serde::{Deserialize, Serialize};
use tabshell_common::content::DEFAULT_ALLOWED_SCHEMES;

/// Startup tab and defaults for new tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Id of the tab opened at startup.
    pub initial_tab_id: String,
    /// URL new tabs open with.
    pub default_url: String,
    /// Title shown until a tab's first navigation commits.
    pub default_title: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            initial_tab_id: "tab-1".into(),
            default_url: "about:blank".into(),
            default_title: "New Tab".into(),
        }
    }
}

/// Settings applied to every content view.
///
/// Isolation (ephemeral storage, no devtools, no access to the chrome IPC
/// bridge) is fixed and cannot be relaxed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub user_agent: Option<String>,
    /// URL schemes content views may navigate to.
    pub allowed_schemes: Vec<String>,
    pub autoplay: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES.iter().map(|s| s.to_string()).collect(),
            autoplay: false,
        }
    }
}
