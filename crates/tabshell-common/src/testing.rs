//! Scripted content views for exercising the tab core without a webview.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::content::{
    ContentSignal, ContentView, ContentViewConfig, ContentViewFactory, ListenerId, LoadCompleter,
    LoadHandle, SignalHub, SignalListener,
};
use crate::errors::ContentViewError;
use crate::id::TabId;
use crate::types::Rect;

/// How a [`ScriptedView`] answers `load_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMode {
    /// Resolve `Ok` immediately.
    Succeed,
    /// Resolve with `ContentViewError::Load(reason)` immediately.
    Fail(String),
    /// Park the load until the test resolves it with [`ScriptedView::complete_next`].
    Manual,
}

/// A content view whose signals and load outcomes are driven by the test.
///
/// Dispose calls are counted rather than deduplicated, and closing does not
/// drop listeners, so tests can observe whether the owner cleaned up.
#[derive(Debug)]
pub struct ScriptedView {
    hub: SignalHub,
    url: RefCell<String>,
    title: RefCell<String>,
    load_mode: RefCell<LoadMode>,
    requested: RefCell<Vec<String>>,
    parked: RefCell<VecDeque<(String, LoadCompleter)>>,
    reloads: Cell<usize>,
    fail_reload: Cell<bool>,
    bounds: Cell<Option<Rect>>,
    visible: Cell<bool>,
    close_calls: Cell<usize>,
}

impl ScriptedView {
    pub fn new(load_mode: LoadMode) -> Self {
        Self {
            hub: SignalHub::new(),
            url: RefCell::new(String::new()),
            title: RefCell::new(String::new()),
            load_mode: RefCell::new(load_mode),
            requested: RefCell::new(Vec::new()),
            parked: RefCell::new(VecDeque::new()),
            reloads: Cell::new(0),
            fail_reload: Cell::new(false),
            bounds: Cell::new(None),
            visible: Cell::new(false),
            close_calls: Cell::new(0),
        }
    }

    pub fn set_load_mode(&self, mode: LoadMode) {
        *self.load_mode.borrow_mut() = mode;
    }

    pub fn set_fail_reload(&self, fail: bool) {
        self.fail_reload.set(fail);
    }

    /// URLs passed to `load_url`, oldest first.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    pub fn parked_loads(&self) -> usize {
        self.parked.borrow().len()
    }

    /// Resolve the oldest parked load. Returns the URL it was for.
    pub fn complete_next(&self, result: Result<(), ContentViewError>) -> Option<String> {
        let (url, completer) = self.parked.borrow_mut().pop_front()?;
        match result {
            Ok(()) => completer.succeed(),
            Err(e) => completer.fail(e),
        }
        Some(url)
    }

    pub fn set_title_silently(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    pub fn start(&self, url: &str) {
        self.hub.emit(&ContentSignal::NavigationStarted {
            url: url.to_string(),
        });
    }

    pub fn commit(&self, url: &str) {
        *self.url.borrow_mut() = url.to_string();
        self.hub.emit(&ContentSignal::NavigationCommitted {
            url: url.to_string(),
        });
    }

    pub fn commit_in_page(&self, url: &str) {
        *self.url.borrow_mut() = url.to_string();
        self.hub.emit(&ContentSignal::InPageNavigation {
            url: url.to_string(),
        });
    }

    pub fn change_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
        self.hub.emit(&ContentSignal::TitleChanged {
            title: title.to_string(),
        });
    }

    pub fn fail(&self, url: &str, reason: &str) {
        self.hub.emit(&ContentSignal::LoadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn listener_count(&self) -> usize {
        self.hub.len()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.get()
    }
}

impl ContentView for ScriptedView {
    fn load_url(&self, url: &str) -> LoadHandle {
        self.requested.borrow_mut().push(url.to_string());
        let mode = self.load_mode.borrow().clone();
        match mode {
            LoadMode::Succeed => LoadHandle::ready(Ok(())),
            LoadMode::Fail(reason) => LoadHandle::ready(Err(ContentViewError::Load(reason))),
            LoadMode::Manual => {
                let (handle, completer) = LoadHandle::pending();
                self.parked
                    .borrow_mut()
                    .push_back((url.to_string(), completer));
                handle
            }
        }
    }

    fn reload(&self) -> Result<(), ContentViewError> {
        if self.fail_reload.get() {
            return Err(ContentViewError::Platform("reload refused".into()));
        }
        self.reloads.set(self.reloads.get() + 1);
        // A reload reports the same start/commit pair a real view fires.
        let url = self.url();
        if !url.is_empty() {
            self.start(&url);
            self.commit(&url);
        }
        Ok(())
    }

    fn url(&self) -> String {
        self.url.borrow().clone()
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn subscribe(&self, listener: SignalListener) -> ListenerId {
        self.hub.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.hub.unsubscribe(id)
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), ContentViewError> {
        self.bounds.set(Some(bounds));
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<(), ContentViewError> {
        self.visible.set(visible);
        Ok(())
    }

    fn close(&self) {
        self.close_calls.set(self.close_calls.get() + 1);
        self.visible.set(false);
    }

    fn is_closed(&self) -> bool {
        self.close_calls.get() > 0
    }
}

/// Factory handing out [`ScriptedView`]s and remembering them by tab id.
#[derive(Debug)]
pub struct ScriptedViewFactory {
    load_mode: RefCell<LoadMode>,
    fail_next: Cell<bool>,
    created: RefCell<Vec<(TabId, Rc<ScriptedView>)>>,
    configs: RefCell<Vec<ContentViewConfig>>,
}

impl ScriptedViewFactory {
    pub fn new(load_mode: LoadMode) -> Self {
        Self {
            load_mode: RefCell::new(load_mode),
            fail_next: Cell::new(false),
            created: RefCell::new(Vec::new()),
            configs: RefCell::new(Vec::new()),
        }
    }

    pub fn set_load_mode(&self, mode: LoadMode) {
        *self.load_mode.borrow_mut() = mode;
    }

    /// Make the next `create` call fail.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    /// Most recent view created for `tab_id`.
    pub fn view(&self, tab_id: &str) -> Option<Rc<ScriptedView>> {
        self.created
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| id.as_str() == tab_id)
            .map(|(_, view)| Rc::clone(view))
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    pub fn configs(&self) -> Vec<ContentViewConfig> {
        self.configs.borrow().clone()
    }
}

impl Default for ScriptedViewFactory {
    fn default() -> Self {
        Self::new(LoadMode::Succeed)
    }
}

impl ContentViewFactory for ScriptedViewFactory {
    fn create(
        &self,
        tab_id: &TabId,
        config: &ContentViewConfig,
    ) -> Result<Rc<dyn ContentView>, ContentViewError> {
        if self.fail_next.replace(false) {
            return Err(ContentViewError::Platform("view allocation failed".into()));
        }
        let view = Rc::new(ScriptedView::new(self.load_mode.borrow().clone()));
        self.created
            .borrow_mut()
            .push((tab_id.clone(), Rc::clone(&view)));
        self.configs.borrow_mut().push(config.clone());
        Ok(view as Rc<dyn ContentView>)
    }
}
