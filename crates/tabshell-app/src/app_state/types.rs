//! Internal types and constants for the app state module.

use std::time::Duration;

/// How often to poll chrome IPC, view signals and tab events (approx 120 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Message kind carrying the full tab list to the header.
pub(super) const TAB_STATE: &str = "tab-state";

/// Message kind announcing a sidebar toggle to the header.
pub(super) const SIDEBAR_VISIBILITY_CHANGED: &str = "sidebar-visibility-changed";
