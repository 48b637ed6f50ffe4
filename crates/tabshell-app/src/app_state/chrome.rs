//! Keeping the chrome surfaces and window in step with the tab core.

use serde_json::json;
use tabshell_tabs::TabView;

use super::core::ShellApp;
use super::types::{SIDEBAR_VISIBILITY_CHANGED, TAB_STATE};

impl ShellApp {
    /// Re-apply header, sidebar and content bounds after a resize or
    /// sidebar toggle.
    pub(super) fn sync_chrome_bounds(&self) {
        if let Some(header) = &self.header {
            if let Err(e) = header.set_bounds(self.viewport.header_bounds()) {
                tracing::warn!(error = %e, "header bounds not applied");
            }
        }
        if let (Some(sidebar), Some(bounds)) = (&self.sidebar, self.viewport.sidebar_bounds()) {
            if let Err(e) = sidebar.set_bounds(bounds) {
                tracing::warn!(error = %e, "sidebar bounds not applied");
            }
        }
        if let Some(commands) = &self.commands {
            commands.registry().relayout();
        }
    }

    pub(super) fn toggle_sidebar(&mut self) {
        let visible = self.viewport.toggle_sidebar();
        if let Some(sidebar) = &self.sidebar {
            if let Err(e) = sidebar.set_visible(visible) {
                tracing::warn!(error = %e, "sidebar visibility not applied");
            }
        }
        self.sync_chrome_bounds();
        self.notify_sidebar_visibility();
    }

    pub(super) fn notify_sidebar_visibility(&self) {
        let Some(header) = &self.header else {
            return;
        };
        let payload = json!({ "isVisible": self.viewport.sidebar_visible() });
        if let Err(e) = header.send(SIDEBAR_VISIBILITY_CHANGED, &payload) {
            tracing::warn!(error = %e, "sidebar visibility not delivered");
        }
    }

    /// Send the tab list to the header if it changed since the last push.
    pub(super) fn push_tab_state(&mut self) {
        if !self.chrome_dirty {
            return;
        }
        self.chrome_dirty = false;
        if let Some(header) = &self.header {
            if let Err(e) = header.send_serialized(TAB_STATE, self.ui.state()) {
                tracing::warn!(error = %e, "tab state not delivered");
            }
        }
        self.update_window_title();
    }

    pub(super) fn update_window_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&window_title(&self.config.window.title, self.ui.active()));
        }
    }
}

/// `"<page title> - <app title>"`, or just the app title with no active tab.
fn window_title(app_title: &str, active: Option<&TabView>) -> String {
    match active {
        Some(tab) if !tab.title.is_empty() => format!("{} - {app_title}", tab.title),
        _ => app_title.to_string(),
    }
}
