//! Window and chrome geometry configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels (valid range: 320-7680).
    pub initial_width: u32,
    /// Initial inner height in logical pixels (valid range: 240-4320).
    pub initial_height: u32,
    /// Height of the header strip (valid range: 32-400).
    pub ui_height: u32,
    /// Width of the sidebar when shown (valid range: 100-1000).
    pub sidebar_width: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tabshell".into(),
            initial_width: 1200,
            initial_height: 800,
            ui_height: 80,
            sidebar_width: 300,
        }
    }
}
