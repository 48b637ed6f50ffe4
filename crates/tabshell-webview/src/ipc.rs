//! IPC between the shell and its webviews.
//!
//! - **JS -> Rust**: `window.ipc.postMessage(JSON.stringify({kind, payload}))`
//!   reaches the webview's IPC handler.
//! - **Rust -> JS**: the shell evaluates `window.tabshell.ipc._dispatch(kind,
//!   payload)` in the chrome surface.

use serde::{Deserialize, Serialize};

/// Message kind content views use to report same-document navigations.
pub const IN_PAGE_NAVIGATION: &str = "in-page-navigation";

/// A message posted from JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Parse a raw `postMessage` body. `None` for anything that is not a
    /// `{kind, payload}` object.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// String field of an object payload.
    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(serde_json::Value::as_str)
    }
}

/// Installed in chrome surfaces only.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.tabshell = window.tabshell || {};
    window.tabshell.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        },
        _handlers: {},
        on: function(kind, callback) {
            this._handlers[kind] = callback;
        },
        _dispatch: function(kind, payload) {
            var handler = this._handlers[kind];
            if (handler) {
                handler(payload);
            }
        }
    };
})();
"#;

/// Installed in content views. Reports fragment and history-API route
/// changes; exposes nothing to the page.
pub const IN_PAGE_NAVIGATION_SCRIPT: &str = r#"
(function() {
    var last = location.href;
    function report() {
        if (location.href === last) { return; }
        last = location.href;
        window.ipc.postMessage(JSON.stringify({
            kind: "in-page-navigation",
            payload: { url: location.href }
        }));
    }
    window.addEventListener("hashchange", report);
    window.addEventListener("popstate", report);
    ["pushState", "replaceState"].forEach(function(name) {
        var original = history[name];
        history[name] = function() {
            var result = original.apply(this, arguments);
            report();
            return result;
        };
    });
})();
"#;

/// Script that delivers `payload` to the chrome handler registered for `kind`.
pub fn js_dispatch_message(kind: &str, payload: &serde_json::Value) -> String {
    let kind = serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string());
    let payload = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!("window.tabshell.ipc._dispatch({kind}, {payload});")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kind_and_payload() {
        let msg = IpcMessage::from_json(r#"{"kind":"submit-url","payload":{"input":"a.test"}}"#)
            .unwrap();
        assert_eq!(msg.kind, "submit-url");
        assert_eq!(msg.payload_str("input"), Some("a.test"));
    }

    #[test]
    fn payload_is_optional() {
        let msg = IpcMessage::from_json(r#"{"kind":"new-tab"}"#).unwrap();
        assert!(msg.payload.is_null());
        assert_eq!(msg.payload_str("tabId"), None);
    }

    #[test]
    fn rejects_non_messages() {
        assert!(IpcMessage::from_json("not json").is_none());
        assert!(IpcMessage::from_json(r#"{"payload":1}"#).is_none());
        assert!(IpcMessage::from_json("[1,2]").is_none());
    }

    #[test]
    fn dispatch_script_escapes_arguments() {
        let script = js_dispatch_message("tab-state", &json!({"title": "a\"b</script>"}));
        assert!(script.starts_with("window.tabshell.ipc._dispatch(\"tab-state\", {"));
        assert!(script.contains(r#"a\"b"#));
        assert!(script.ends_with(");"));
    }

    #[test]
    fn scripts_reference_expected_globals() {
        assert!(IPC_INIT_SCRIPT.contains("window.tabshell.ipc"));
        assert!(IN_PAGE_NAVIGATION_SCRIPT.contains(IN_PAGE_NAVIGATION));
        assert!(!IN_PAGE_NAVIGATION_SCRIPT.contains("window.tabshell"));
    }
}
