//! Privileged chrome surfaces: the header (tab strip, URL bar, navigation
//! buttons) and the optional sidebar.
//!
//! Unlike content views these get the IPC bridge. Incoming messages are
//! queued and drained by the event loop; nothing is executed from inside a
//! wry callback.

use std::sync::{Arc, Mutex};

use tabshell_common::Rect;
use tracing::{debug, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::bounds::to_wry_rect;
use crate::ipc::{js_dispatch_message, IpcMessage, IPC_INIT_SCRIPT};
use crate::navigation::is_chrome_navigation_allowed;

#[derive(Debug, thiserror::Error)]
pub enum ChromeError {
    #[error("failed to build {surface} surface: {source}")]
    Build {
        surface: SurfaceKind,
        #[source]
        source: wry::Error,
    },

    #[error("{surface} surface: {source}")]
    Webview {
        surface: SurfaceKind,
        #[source]
        source: wry::Error,
    },

    #[error("failed to encode message for {surface}: {source}")]
    Encode {
        surface: SurfaceKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Header,
    Sidebar,
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Sidebar => f.write_str("sidebar"),
        }
    }
}

/// Where a surface's page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeSource {
    /// Bundled HTML.
    Html(String),
    /// A local dev server (hot reload while working on the UI).
    DevServer(String),
}

impl ChromeSource {
    fn dev_server(&self) -> Option<&str> {
        match self {
            Self::DevServer(url) => Some(url),
            Self::Html(_) => None,
        }
    }
}

pub struct ChromeSurface {
    kind: SurfaceKind,
    webview: WebView,
    inbox: Arc<Mutex<Vec<IpcMessage>>>,
}

impl ChromeSurface {
    pub fn create<W: HasWindowHandle>(
        window: &W,
        kind: SurfaceKind,
        source: &ChromeSource,
        bounds: Rect,
        visible: bool,
        devtools: bool,
    ) -> Result<Self, ChromeError> {
        let inbox = Arc::new(Mutex::new(Vec::new()));

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(&bounds))
            .with_visible(visible)
            .with_devtools(devtools)
            .with_transparent(false)
            .with_initialization_script(IPC_INIT_SCRIPT);
        builder = attach_ipc_handler(builder, Arc::clone(&inbox), kind);
        builder = attach_navigation_handler(builder, source.dev_server().map(str::to_string), kind);
        builder = match source {
            ChromeSource::Html(html) => builder.with_html(html),
            ChromeSource::DevServer(url) => builder.with_url(url),
        };

        let webview = builder
            .build_as_child(window)
            .map_err(|source| ChromeError::Build { surface: kind, source })?;
        debug!(surface = %kind, "chrome surface created");

        Ok(Self {
            kind,
            webview,
            inbox,
        })
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Take every queued message, oldest first.
    pub fn drain_messages(&self) -> Vec<IpcMessage> {
        match self.inbox.lock() {
            Ok(mut inbox) => std::mem::take(&mut *inbox),
            Err(_) => {
                warn!(surface = %self.kind, "chrome inbox poisoned");
                Vec::new()
            }
        }
    }

    /// Deliver `payload` to the page's handler for `kind`.
    pub fn send(&self, kind: &str, payload: &serde_json::Value) -> Result<(), ChromeError> {
        let script = js_dispatch_message(kind, payload);
        self.webview.evaluate_script(&script).map_err(|source| self.webview_error(source))
    }

    /// Serialize `value` and [`send`](Self::send) it.
    pub fn send_serialized<T: serde::Serialize>(
        &self,
        kind: &str,
        value: &T,
    ) -> Result<(), ChromeError> {
        let payload = serde_json::to_value(value).map_err(|source| ChromeError::Encode {
            surface: self.kind,
            source,
        })?;
        self.send(kind, &payload)
    }

    pub fn set_bounds(&self, bounds: Rect) -> Result<(), ChromeError> {
        self.webview
            .set_bounds(to_wry_rect(&bounds))
            .map_err(|source| self.webview_error(source))
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), ChromeError> {
        self.webview
            .set_visible(visible)
            .map_err(|source| self.webview_error(source))
    }

    fn webview_error(&self, source: wry::Error) -> ChromeError {
        ChromeError::Webview {
            surface: self.kind,
            source,
        }
    }
}

fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    inbox: Arc<Mutex<Vec<IpcMessage>>>,
    kind: SurfaceKind,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body();
        let Some(message) = IpcMessage::from_json(body) else {
            warn!(surface = %kind, body_len = body.len(), "IPC message rejected: not a {{kind, payload}} object");
            return;
        };
        debug!(surface = %kind, kind = %message.kind, "IPC message from chrome");
        if let Ok(mut queue) = inbox.lock() {
            queue.push(message);
        }
    })
}

fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    dev_server: Option<String>,
    kind: SurfaceKind,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        let allowed = is_chrome_navigation_allowed(&url, dev_server.as_deref());
        if !allowed {
            warn!(surface = %kind, url = %url, "chrome navigation blocked");
        }
        allowed
    })
}
