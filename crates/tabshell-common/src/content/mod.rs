//! Content-view abstraction.
//!
//! A content view is the embeddable primitive that actually loads and
//! renders a page (a `wry` webview in the shipped binary, a scripted double
//! in tests). The tab core only ever talks to it through [`ContentView`]:
//!
//! - Loads are started eagerly and report their outcome through a
//!   [`LoadHandle`] future.
//! - Lifecycle signals are delivered to listeners registered with
//!   [`ContentView::subscribe`] and removed with [`ContentView::unsubscribe`].

mod load;
mod signal;

use std::rc::Rc;

use crate::errors::ContentViewError;
use crate::id::TabId;
use crate::types::Rect;

pub use load::{LoadCompleter, LoadHandle};
pub use signal::{ContentSignal, ListenerId, SignalHub, SignalListener};

/// Schemes content tabs may navigate to when nothing else is configured.
pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https", "about"];

/// A single embedded content view owned by one tab.
///
/// Implementations are single-threaded; the registry holds them as
/// `Rc<dyn ContentView>`.
pub trait ContentView {
    /// Begin loading `url`. The load proceeds whether or not the returned
    /// handle is awaited; a later load on the same view supersedes it.
    fn load_url(&self, url: &str) -> LoadHandle;

    /// Reload the current document.
    fn reload(&self) -> Result<(), ContentViewError>;

    /// URL the view currently reports.
    fn url(&self) -> String;

    /// Title the view currently reports (may be empty).
    fn title(&self) -> String;

    fn subscribe(&self, listener: SignalListener) -> ListenerId;

    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    fn set_bounds(&self, bounds: Rect) -> Result<(), ContentViewError>;

    /// Attach (`true`) or detach (`false`) the view from the visible surface.
    fn set_visible(&self, visible: bool) -> Result<(), ContentViewError>;

    /// Dispose of the view. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// Allocates content views for new tabs.
pub trait ContentViewFactory {
    fn create(
        &self,
        tab_id: &TabId,
        config: &ContentViewConfig,
    ) -> Result<Rc<dyn ContentView>, ContentViewError>;
}

/// Execution settings for a content view.
///
/// Only [`ContentViewConfig::isolated`] builds one, so every tab gets a
/// non-privileged context: no devtools, no access to the chrome IPC bridge,
/// no persistent storage shared with the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentViewConfig {
    incognito: bool,
    devtools: bool,
    privileged_ipc: bool,
    pub user_agent: Option<String>,
    pub autoplay: bool,
    pub allowed_schemes: Vec<String>,
}

impl ContentViewConfig {
    pub fn isolated(
        user_agent: Option<String>,
        autoplay: bool,
        allowed_schemes: Vec<String>,
    ) -> Self {
        Self {
            incognito: true,
            devtools: false,
            privileged_ipc: false,
            user_agent,
            autoplay,
            allowed_schemes: allowed_schemes
                .into_iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn incognito(&self) -> bool {
        self.incognito
    }

    pub fn devtools(&self) -> bool {
        self.devtools
    }

    pub fn privileged_ipc(&self) -> bool {
        self.privileged_ipc
    }

    /// Whether a content view may navigate to `url`, judged by its scheme.
    pub fn is_navigation_allowed(&self, url: &str) -> bool {
        match url_scheme(url) {
            Some(scheme) => self
                .allowed_schemes
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(scheme)),
            None => false,
        }
    }
}

impl Default for ContentViewConfig {
    fn default() -> Self {
        Self::isolated(
            None,
            false,
            DEFAULT_ALLOWED_SCHEMES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// The scheme of `url` (text before the first `:`), if it looks like one.
pub fn url_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.trim().split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}
