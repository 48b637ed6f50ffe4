//! Per-tab content webviews.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tabshell_common::{
    ContentSignal, ContentView, ContentViewConfig, ContentViewError, ContentViewFactory,
    ListenerId, LoadHandle, Rect, SignalHub, SignalListener, TabId,
};
use tracing::{debug, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::bounds::to_wry_rect;
use crate::events::PageLoadState;
use crate::ipc::{IpcMessage, IN_PAGE_NAVIGATION, IN_PAGE_NAVIGATION_SCRIPT};
use crate::navigation::same_origin;

/// State shared between the view and its wry handlers.
#[derive(Debug, Default)]
struct Shared {
    hub: SignalHub,
    url: Mutex<String>,
    title: Mutex<String>,
    /// Signals are suppressed until the first `load_url`, so the webview's
    /// own startup page never reaches history.
    armed: AtomicBool,
}

impl Shared {
    fn url(&self) -> String {
        self.url.lock().map(|u| u.clone()).unwrap_or_default()
    }

    fn set_url(&self, url: &str) {
        if let Ok(mut current) = self.url.lock() {
            *current = url.to_string();
        }
    }

    fn title(&self) -> String {
        self.title.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn set_title(&self, title: &str) {
        if let Ok(mut current) = self.title.lock() {
            *current = title.to_string();
        }
    }

    fn emit(&self, signal: ContentSignal) {
        if self.armed.load(Ordering::Relaxed) {
            self.hub.emit(&signal);
        }
    }
}

/// An isolated `wry` webview backing one tab.
pub struct WryContentView {
    tab_id: TabId,
    webview: RefCell<Option<WebView>>,
    shared: Arc<Shared>,
}

impl WryContentView {
    /// Build a hidden child webview of `window`.
    pub fn build<W: HasWindowHandle>(
        window: &W,
        tab_id: TabId,
        config: &ContentViewConfig,
    ) -> Result<Self, ContentViewError> {
        check_isolation(config)?;
        let shared = Arc::new(Shared::default());

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(&Rect::default()))
            .with_visible(false)
            .with_incognito(config.incognito())
            .with_devtools(config.devtools())
            .with_autoplay(config.autoplay)
            .with_clipboard(false)
            .with_focused(false)
            .with_initialization_script(IN_PAGE_NAVIGATION_SCRIPT);
        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = attach_page_load_handler(builder, Arc::clone(&shared), tab_id.clone());
        builder = attach_title_handler(builder, Arc::clone(&shared));
        builder = attach_navigation_handler(builder, Arc::clone(&shared), config.clone(), tab_id.clone());
        builder = attach_in_page_handler(builder, Arc::clone(&shared), config.clone(), tab_id.clone());

        let webview = builder.build_as_child(window).map_err(platform)?;
        debug!(tab_id = %tab_id, "content webview created");

        Ok(Self {
            tab_id,
            webview: RefCell::new(Some(webview)),
            shared,
        })
    }

    pub fn tab_id(&self) -> &TabId {
        &self.tab_id
    }

    fn with_webview<T>(
        &self,
        f: impl FnOnce(&WebView) -> Result<T, wry::Error>,
    ) -> Result<T, ContentViewError> {
        match self.webview.borrow().as_ref() {
            Some(webview) => f(webview).map_err(platform),
            None => Err(ContentViewError::Closed),
        }
    }
}

impl ContentView for WryContentView {
    fn load_url(&self, url: &str) -> LoadHandle {
        self.shared.armed.store(true, Ordering::Relaxed);
        let result = self.with_webview(|webview| webview.load_url(url));
        if let Err(e) = &result {
            warn!(tab_id = %self.tab_id, url, error = %e, "webview refused load");
        }
        LoadHandle::ready(result)
    }

    fn reload(&self) -> Result<(), ContentViewError> {
        self.with_webview(|webview| webview.reload())
    }

    fn url(&self) -> String {
        self.shared.url()
    }

    fn title(&self) -> String {
        self.shared.title()
    }

    fn subscribe(&self, listener: SignalListener) -> ListenerId {
        self.shared.hub.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.hub.unsubscribe(id)
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), ContentViewError> {
        self.with_webview(|webview| webview.set_bounds(to_wry_rect(&bounds)))
    }

    fn set_visible(&self, visible: bool) -> Result<(), ContentViewError> {
        self.with_webview(|webview| webview.set_visible(visible))
    }

    fn close(&self) {
        if self.webview.borrow_mut().take().is_some() {
            self.shared.armed.store(false, Ordering::Relaxed);
            self.shared.hub.clear();
            debug!(tab_id = %self.tab_id, "content webview destroyed");
        }
    }

    fn is_closed(&self) -> bool {
        self.webview.borrow().is_none()
    }
}

impl Drop for WryContentView {
    fn drop(&mut self) {
        self.close();
    }
}

/// Creates [`WryContentView`]s as children of one window.
pub struct WryViewFactory<W> {
    window: Rc<W>,
}

impl<W: HasWindowHandle> WryViewFactory<W> {
    pub fn new(window: Rc<W>) -> Self {
        Self { window }
    }
}

impl<W: HasWindowHandle> ContentViewFactory for WryViewFactory<W> {
    fn create(
        &self,
        tab_id: &TabId,
        config: &ContentViewConfig,
    ) -> Result<Rc<dyn ContentView>, ContentViewError> {
        let view = WryContentView::build(self.window.as_ref(), tab_id.clone(), config)?;
        Ok(Rc::new(view) as Rc<dyn ContentView>)
    }
}

/// Content views only ever get the page-side navigation reporter, never the
/// chrome IPC bridge.
fn check_isolation(config: &ContentViewConfig) -> Result<(), ContentViewError> {
    if config.privileged_ipc() {
        return Err(ContentViewError::Platform(
            "content views cannot use the chrome IPC bridge".into(),
        ));
    }
    Ok(())
}

fn platform(e: wry::Error) -> ContentViewError {
    ContentViewError::Platform(e.to_string())
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<Shared>,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(tab_id = %tab_id, ?state, url = %url, "page load");
        match state {
            PageLoadState::Started => shared.set_title(""),
            PageLoadState::Finished => shared.set_url(&url),
        }
        shared.emit(page_load_signal(state, url));
    })
}

fn attach_title_handler<'a>(builder: WebViewBuilder<'a>, shared: Arc<Shared>) -> WebViewBuilder<'a> {
    builder.with_document_title_changed_handler(move |title| {
        shared.set_title(&title);
        shared.emit(ContentSignal::TitleChanged { title });
    })
}

fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<Shared>,
    config: ContentViewConfig,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        if config.is_navigation_allowed(&url) {
            return true;
        }
        warn!(tab_id = %tab_id, url = %url, "navigation blocked: scheme not allowed");
        shared.emit(ContentSignal::LoadFailed {
            url,
            reason: "navigation blocked".into(),
        });
        false
    })
}

fn attach_in_page_handler<'a>(
    builder: WebViewBuilder<'a>,
    shared: Arc<Shared>,
    config: ContentViewConfig,
    tab_id: TabId,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let current = shared.url();
        match in_page_signal(request.body(), &current, &config) {
            Some(signal) => {
                if let ContentSignal::InPageNavigation { url } = &signal {
                    shared.set_url(url);
                }
                shared.emit(signal);
            }
            None => debug!(tab_id = %tab_id, body_len = request.body().len(), "content IPC ignored"),
        }
    })
}

fn page_load_signal(state: PageLoadState, url: String) -> ContentSignal {
    match state {
        PageLoadState::Started => ContentSignal::NavigationStarted { url },
        PageLoadState::Finished => ContentSignal::NavigationCommitted { url },
    }
}

/// Accept only a same-origin `in-page-navigation` report to an allowed URL;
/// content pages get no other channel to the shell.
fn in_page_signal(
    body: &str,
    current_url: &str,
    config: &ContentViewConfig,
) -> Option<ContentSignal> {
    let message = IpcMessage::from_json(body)?;
    if message.kind != IN_PAGE_NAVIGATION {
        return None;
    }
    let url = message.payload_str("url")?;
    if !config.is_navigation_allowed(url) || !same_origin(url, current_url) {
        return None;
    }
    Some(ContentSignal::InPageNavigation {
        url: url.to_string(),
    })
}
