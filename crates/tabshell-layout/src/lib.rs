//! Window chrome geometry.
//!
//! The window is split into a fixed-height header strip across the top, an
//! optional sidebar docked on the right below the header, and the content
//! area that the active tab's view fills.

mod viewport;

pub use viewport::{ChromeViewport, ContentGeometry};

use serde::{Deserialize, Serialize};
use tabshell_common::{Rect, Size};

/// Fixed chrome dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromeLayout {
    pub ui_height: f64,
    pub sidebar_width: f64,
}

impl Default for ChromeLayout {
    fn default() -> Self {
        Self {
            ui_height: 80.0,
            sidebar_width: 300.0,
        }
    }
}

impl ChromeLayout {
    pub fn new(ui_height: f64, sidebar_width: f64) -> Self {
        Self {
            ui_height,
            sidebar_width,
        }
    }

    pub fn header_bounds(&self, window: Size) -> Rect {
        Rect::new(0.0, 0.0, window.width.max(0.0), self.header_height(window))
    }

    pub fn sidebar_bounds(&self, window: Size) -> Rect {
        let width = self.sidebar_width.min(window.width).max(0.0);
        Rect::new(
            (window.width - width).max(0.0),
            self.header_height(window),
            width,
            self.body_height(window),
        )
    }

    pub fn content_bounds(&self, window: Size, sidebar_visible: bool) -> Rect {
        let reserved = if sidebar_visible {
            self.sidebar_width
        } else {
            0.0
        };
        Rect::new(
            0.0,
            self.header_height(window),
            (window.width - reserved).max(0.0),
            self.body_height(window),
        )
    }

    fn header_height(&self, window: Size) -> f64 {
        self.ui_height.min(window.height).max(0.0)
    }

    fn body_height(&self, window: Size) -> f64 {
        (window.height - self.ui_height).max(0.0)
    }
}
