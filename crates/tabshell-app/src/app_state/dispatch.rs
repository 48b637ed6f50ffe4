//! IPC message validation and dispatch from the chrome surfaces.

use tabshell_common::TabId;
use tabshell_tabs::{Command, CommandOutcome};
use tabshell_webview::{IpcMessage, SurfaceKind};

use super::core::ShellApp;

// =============================================================================
// IPC ALLOWLIST
// =============================================================================

/// Kinds the header may post. Content views have their own channel and
/// never reach this dispatcher.
const HEADER_IPC_KINDS: &[&str] = &[
    // Commands, passed through verbatim
    "create-tab",
    "switch-tab",
    "close-tab",
    "load-url",
    "navigate-history",
    "reload-tab",
    // UI intents
    "new-tab",
    "request-switch",
    "request-close",
    "submit-url",
    "go-back",
    "go-forward",
    "reload",
    // Shell
    "toggle-sidebar",
    "window-control",
    "ui-ready",
];

const SIDEBAR_IPC_KINDS: &[&str] = &["toggle-sidebar", "ui-ready"];

/// Check whether `surface` may post messages of `kind`.
pub fn is_ipc_kind_allowed(surface: SurfaceKind, kind: &str) -> bool {
    match surface {
        SurfaceKind::Header => HEADER_IPC_KINDS.contains(&kind),
        SurfaceKind::Sidebar => SIDEBAR_IPC_KINDS.contains(&kind),
    }
}

// =============================================================================
// INTENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Minimize,
    /// Toggles between maximized and restored.
    Maximize,
    Close,
}

impl WindowAction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "minimize" => Some(Self::Minimize),
            "maximize" => Some(Self::Maximize),
            "close" => Some(Self::Close),
            _ => None,
        }
    }
}

/// A decoded chrome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeIntent {
    Command(Command),
    NewTab,
    Switch(TabId),
    Close(TabId),
    SubmitUrl(String),
    Back,
    Forward,
    Reload,
    ToggleSidebar,
    WindowControl(WindowAction),
    UiReady,
}

/// Decode an allowlisted message. `None` when the payload does not fit
/// the kind.
pub fn parse_intent(msg: &IpcMessage) -> Option<ChromeIntent> {
    let intent = match msg.kind.as_str() {
        "new-tab" => ChromeIntent::NewTab,
        "request-switch" => ChromeIntent::Switch(TabId::from(msg.payload_str("tabId")?)),
        "request-close" => ChromeIntent::Close(TabId::from(msg.payload_str("tabId")?)),
        "submit-url" => ChromeIntent::SubmitUrl(msg.payload_str("input")?.to_string()),
        "go-back" => ChromeIntent::Back,
        "go-forward" => ChromeIntent::Forward,
        "reload" => ChromeIntent::Reload,
        "toggle-sidebar" => ChromeIntent::ToggleSidebar,
        "window-control" => {
            ChromeIntent::WindowControl(WindowAction::parse(msg.payload_str("action")?)?)
        }
        "ui-ready" => ChromeIntent::UiReady,
        _ => ChromeIntent::Command(parse_command(msg)?),
    };
    Some(intent)
}

/// Commands travel as `{kind, payload: {tabId, ...}}`; fold the kind back
/// into the payload and let serde do the rest.
fn parse_command(msg: &IpcMessage) -> Option<Command> {
    let mut body = match &msg.payload {
        serde_json::Value::Object(fields) => fields.clone(),
        _ => return None,
    };
    body.insert("kind".into(), serde_json::Value::String(msg.kind.clone()));
    serde_json::from_value(serde_json::Value::Object(body)).ok()
}

// =============================================================================
// DISPATCH
// =============================================================================

impl ShellApp {
    /// Handle a single IPC message from a chrome surface.
    pub(super) fn handle_ipc_message(&mut self, surface: SurfaceKind, msg: IpcMessage) {
        if !is_ipc_kind_allowed(surface, &msg.kind) {
            tracing::warn!(%surface, kind = %msg.kind, "IPC message rejected: kind not allowed");
            return;
        }
        let Some(intent) = parse_intent(&msg) else {
            tracing::warn!(%surface, kind = %msg.kind, "IPC message rejected: bad payload");
            return;
        };
        tracing::debug!(%surface, kind = %msg.kind, "IPC message dispatched");
        self.apply_intent(intent);
    }

    pub(super) fn apply_intent(&mut self, intent: ChromeIntent) {
        let commands = match intent {
            ChromeIntent::Command(command) => vec![command],
            ChromeIntent::NewTab => self.ui.new_tab(),
            ChromeIntent::Switch(tab_id) => self.ui.request_switch(&tab_id),
            ChromeIntent::Close(tab_id) => self.ui.request_close(&tab_id),
            ChromeIntent::SubmitUrl(input) => {
                let commands = self.ui.submit_url(&input);
                self.chrome_dirty |= !commands.is_empty();
                commands
            }
            ChromeIntent::Back => self.ui.back(),
            ChromeIntent::Forward => self.ui.forward(),
            ChromeIntent::Reload => self.ui.reload(),
            ChromeIntent::ToggleSidebar => {
                self.toggle_sidebar();
                Vec::new()
            }
            ChromeIntent::WindowControl(action) => {
                self.window_control(action);
                Vec::new()
            }
            ChromeIntent::UiReady => {
                self.chrome_dirty = true;
                self.notify_sidebar_visibility();
                Vec::new()
            }
        };
        self.submit(commands);
    }

    /// Queue commands on the local executor, in order. They run on the
    /// next poll tick.
    pub(super) fn submit(&self, commands: Vec<Command>) {
        if commands.is_empty() {
            return;
        }
        let Some(handler) = &self.commands else {
            tracing::warn!(count = commands.len(), "commands dropped: tab core not ready");
            return;
        };
        for command in commands {
            let handler = handler.clone();
            self.local.spawn_local(async move {
                let kind = command.kind();
                match handler.dispatch(command).await {
                    CommandOutcome::Rejected(e) => tracing::warn!(kind, error = %e, "command rejected"),
                    outcome => tracing::trace!(kind, ?outcome, "command done"),
                }
            });
        }
    }

    fn window_control(&mut self, action: WindowAction) {
        if action == WindowAction::Close {
            tracing::info!("Window close requested from chrome");
            self.should_exit = true;
            return;
        }
        let Some(window) = &self.window else {
            return;
        };
        match action {
            WindowAction::Minimize => window.set_minimized(true),
            WindowAction::Maximize => window.set_maximized(!window.is_maximized()),
            WindowAction::Close => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
