//! Tab registry: owns every tab's content view, history and listeners, and
//! tracks which tab is active.
//!
//! All methods take `&self`; state lives behind a `RefCell` and borrows are
//! never held across an `.await`, so loads on different tabs (or a load and
//! a close on the same tab) may interleave freely on a single-threaded
//! executor.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tabshell_common::{
    ContentSignal, ContentView, ContentViewConfig, ContentViewFactory, EventSink,
    NavigationDirection, TabError, TabEvent, TabId, TabSnapshot,
};
use tabshell_layout::ContentGeometry;
use tracing::{debug, info, warn};

use crate::bridge::{self, EventBridge, HistoryEffect};
use crate::history::NavigationHistory;
use crate::tab::{Tab, TabPhase};

/// Construction-time settings for a [`TabRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Loaded when `create_tab` is given no URL.
    pub default_url: String,
    /// Title of a fresh tab until its first commit.
    pub default_title: String,
    pub view_config: ContentViewConfig,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            default_url: "about:blank".into(),
            default_title: "New Tab".into(),
            view_config: ContentViewConfig::default(),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    tabs: HashMap<TabId, Tab>,
    active: Option<TabId>,
    retired: HashSet<TabId>,
}

pub struct TabRegistry {
    state: RefCell<RegistryState>,
    factory: Rc<dyn ContentViewFactory>,
    geometry: Rc<dyn ContentGeometry>,
    bridge: EventBridge,
    events: EventSink,
    options: RegistryOptions,
}

impl TabRegistry {
    pub fn new(
        factory: Rc<dyn ContentViewFactory>,
        geometry: Rc<dyn ContentGeometry>,
        events: EventSink,
        options: RegistryOptions,
    ) -> Self {
        Self {
            state: RefCell::new(RegistryState::default()),
            factory,
            geometry,
            bridge: EventBridge::new(),
            events,
            options,
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub(crate) fn emit(&self, event: TabEvent) -> bool {
        self.events.emit(event)
    }

    /// Create a tab and start loading `url` (or the default URL).
    ///
    /// The tab starts detached; it becomes visible on `switch_tab`. Ids of
    /// live or closed tabs are rejected. The initial load is not awaited;
    /// its failure surfaces through the view's own signals.
    pub fn create_tab(&self, tab_id: TabId, url: Option<&str>) -> Result<(), TabError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.options.default_url)
            .to_string();

        {
            let state = self.state.borrow();
            if state.tabs.contains_key(&tab_id) {
                return Err(TabError::DuplicateTabId(tab_id));
            }
            if state.retired.contains(&tab_id) {
                return Err(TabError::RetiredTabId(tab_id));
            }
        }
        if !self.options.view_config.is_navigation_allowed(&url) {
            return Err(TabError::LoadFailure {
                tab_id,
                url,
                reason: "scheme not allowed".into(),
            });
        }

        let view = self.factory.create(&tab_id, &self.options.view_config)?;
        let subscriptions = self.bridge.attach(&tab_id, &view);
        let history = NavigationHistory::new(url.clone(), self.options.default_title.clone());
        let mut tab = Tab::new(tab_id.clone(), Rc::clone(&view), history, subscriptions);
        tab.begin_load();

        self.state.borrow_mut().tabs.insert(tab_id.clone(), tab);
        info!(tab_id = %tab_id, url = %url, "tab created");

        drop(view.load_url(&url));
        Ok(())
    }

    /// Make `tab_id` the visible tab. Unknown ids are ignored.
    pub fn switch_tab(&self, tab_id: &TabId) -> Option<TabSnapshot> {
        let bounds = self.geometry.content_bounds();
        let mut state = self.state.borrow_mut();
        let RegistryState { tabs, active, .. } = &mut *state;

        if !tabs.contains_key(tab_id) {
            debug!(tab_id = %tab_id, "switch to unknown tab ignored");
            return None;
        }
        if let Some(previous) = active.as_ref().filter(|prev| *prev != tab_id) {
            if let Some(prev_tab) = tabs.get_mut(previous) {
                prev_tab.hide();
            }
        }

        let tab = tabs.get_mut(tab_id)?;
        tab.show(bounds);
        *active = Some(tab_id.clone());
        info!(tab_id = %tab_id, "tab activated");
        Some(tab.history.snapshot())
    }

    /// Close `tab_id`, release its listeners and dispose its view.
    ///
    /// Returns `false` for unknown or already-closed ids. Closing the active
    /// tab leaves no tab active; picking a replacement is up to the caller.
    pub fn close_tab(&self, tab_id: &TabId) -> bool {
        let tab = {
            let mut state = self.state.borrow_mut();
            let Some(tab) = state.tabs.remove(tab_id) else {
                debug!(tab_id = %tab_id, "close of unknown tab ignored");
                return false;
            };
            if state.active.as_ref() == Some(tab_id) {
                state.active = None;
            }
            state.retired.insert(tab_id.clone());
            tab
        };
        tab.dispose();
        info!(tab_id = %tab_id, "tab closed");
        true
    }

    /// Navigate `tab_id` to `url`. History changes only when the view
    /// commits; a failure emits `load-failed` and restores the URL bar.
    pub async fn try_load_url(&self, tab_id: &TabId, url: &str) -> Result<(), TabError> {
        let url = url.trim();
        if !self.contains(tab_id) {
            return Err(TabError::NotFound(tab_id.clone()));
        }
        if !self.options.view_config.is_navigation_allowed(url) {
            let reason = "scheme not allowed";
            self.report_load_failure(tab_id, None, url, reason);
            return Err(self.load_failure(tab_id, url, reason));
        }

        let (view, ticket) = self.begin_load(tab_id)?;
        debug!(tab_id = %tab_id, url, ticket, "load started");
        match view.load_url(url).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let reason = e.to_string();
                self.report_load_failure(tab_id, Some(ticket), url, &reason);
                Err(self.load_failure(tab_id, url, &reason))
            }
        }
    }

    pub async fn load_url(&self, tab_id: &TabId, url: &str) -> bool {
        match self.try_load_url(tab_id, url).await {
            Ok(()) => true,
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "load_url failed");
                false
            }
        }
    }

    /// Step `tab_id` back or forward.
    ///
    /// `Ok(false)` when there is nowhere to go. The cursor moves once the
    /// view commits the target URL or the load resolves, whichever is first.
    pub async fn try_navigate_history(
        &self,
        tab_id: &TabId,
        direction: NavigationDirection,
    ) -> Result<bool, TabError> {
        let (view, ticket, url) = {
            let mut state = self.state.borrow_mut();
            let tab = state
                .tabs
                .get_mut(tab_id)
                .ok_or_else(|| TabError::NotFound(tab_id.clone()))?;
            let Some((index, entry)) = tab.history.peek(direction) else {
                debug!(tab_id = %tab_id, ?direction, "no history entry");
                return Ok(false);
            };
            let url = entry.url.clone();
            let ticket = tab.begin_traversal(index, url.clone());
            (Rc::clone(&tab.view), ticket, url)
        };

        debug!(tab_id = %tab_id, ?direction, url = %url, ticket, "history traversal started");
        match view.load_url(&url).await {
            Ok(()) => {
                self.confirm_traversal(tab_id, ticket);
                Ok(true)
            }
            Err(e) => {
                if let Some(tab) = self.state.borrow_mut().tabs.get_mut(tab_id) {
                    tab.abandon_traversal(ticket);
                }
                let reason = e.to_string();
                self.report_load_failure(tab_id, Some(ticket), &url, &reason);
                Err(self.load_failure(tab_id, &url, &reason))
            }
        }
    }

    pub async fn navigate_history(&self, tab_id: &TabId, direction: NavigationDirection) -> bool {
        match self.try_navigate_history(tab_id, direction).await {
            Ok(moved) => moved,
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "history navigation failed");
                false
            }
        }
    }

    /// Reload the current entry. The view's commit for it refreshes the
    /// entry in place; history is not rewritten.
    pub fn try_reload_tab(&self, tab_id: &TabId) -> Result<(), TabError> {
        let (view, ticket) = {
            let mut state = self.state.borrow_mut();
            let tab = state
                .tabs
                .get_mut(tab_id)
                .ok_or_else(|| TabError::NotFound(tab_id.clone()))?;
            (Rc::clone(&tab.view), tab.begin_reload())
        };
        if let Err(e) = view.reload() {
            if let Some(tab) = self.state.borrow_mut().tabs.get_mut(tab_id) {
                tab.abandon_reload(ticket);
            }
            return Err(e.into());
        }
        debug!(tab_id = %tab_id, ticket, "reload requested");
        Ok(())
    }

    pub fn reload_tab(&self, tab_id: &TabId) -> bool {
        match self.try_reload_tab(tab_id) {
            Ok(()) => true,
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "reload failed");
                false
            }
        }
    }

    /// Apply one view signal to the tab's history and emit its events.
    /// Signals for tabs that no longer exist are dropped.
    pub fn apply_signal(&self, tab_id: &TabId, signal: ContentSignal) -> bool {
        let events = {
            let mut state = self.state.borrow_mut();
            let Some(tab) = state.tabs.get_mut(tab_id) else {
                debug!(tab_id = %tab_id, ?signal, "signal for closed tab dropped");
                return false;
            };
            match HistoryEffect::of(&signal) {
                HistoryEffect::None => {}
                HistoryEffect::Commit { url } => {
                    let kind = tab.commit(&url);
                    debug!(tab_id = %tab_id, url = %url, ?kind, "navigation committed");
                }
                HistoryEffect::UpdateTitle { title } => tab.history.update_title(title),
                HistoryEffect::Failure { url } => tab.view_failed(&url),
            }
            bridge::domain_events(tab_id, &signal, &tab.history)
        };
        for event in events {
            self.events.emit(event);
        }
        true
    }

    /// Drain queued view signals and apply them in arrival order.
    pub fn pump_signals(&self) -> usize {
        let signals = self.bridge.drain();
        let count = signals.len();
        for (tab_id, signal) in signals {
            self.apply_signal(&tab_id, signal);
        }
        count
    }

    /// Re-apply content bounds to the active view (window resized or
    /// sidebar toggled).
    pub fn relayout(&self) -> bool {
        let bounds = self.geometry.content_bounds();
        let state = self.state.borrow();
        let Some(tab) = state.active.as_ref().and_then(|id| state.tabs.get(id)) else {
            return false;
        };
        if let Err(e) = tab.view.set_bounds(bounds) {
            warn!(tab_id = %tab.id, error = %e, "relayout failed");
            return false;
        }
        true
    }

    /// Close every tab. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let ids = self.tab_ids();
        ids.iter().filter(|id| self.close_tab(id)).count()
    }

    pub fn tab_info(&self, tab_id: &TabId) -> Option<TabSnapshot> {
        self.state
            .borrow()
            .tabs
            .get(tab_id)
            .map(|tab| tab.history.snapshot())
    }

    pub fn history(&self, tab_id: &TabId) -> Option<NavigationHistory> {
        self.state
            .borrow()
            .tabs
            .get(tab_id)
            .map(|tab| tab.history.clone())
    }

    /// Lifecycle phase; `Closed` for retired ids, `None` for ids never seen.
    pub fn phase(&self, tab_id: &TabId) -> Option<TabPhase> {
        let state = self.state.borrow();
        match state.tabs.get(tab_id) {
            Some(tab) => Some(tab.phase),
            None if state.retired.contains(tab_id) => Some(TabPhase::Closed),
            None => None,
        }
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.state.borrow().active.clone()
    }

    /// Ids of live tabs, sorted.
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.state.borrow().tabs.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    pub fn contains(&self, tab_id: &TabId) -> bool {
        self.state.borrow().tabs.contains_key(tab_id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().tabs.is_empty()
    }

    fn begin_load(&self, tab_id: &TabId) -> Result<(Rc<dyn ContentView>, u64), TabError> {
        let mut state = self.state.borrow_mut();
        let tab = state
            .tabs
            .get_mut(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.clone()))?;
        Ok((Rc::clone(&tab.view), tab.begin_load()))
    }

    fn confirm_traversal(&self, tab_id: &TabId, ticket: u64) {
        let events = {
            let mut state = self.state.borrow_mut();
            let Some(tab) = state.tabs.get_mut(tab_id) else {
                return;
            };
            if !tab.confirm_traversal(ticket) {
                return;
            }
            let current = tab.history.current().clone();
            vec![
                TabEvent::UrlUpdated {
                    tab_id: tab_id.clone(),
                    url: current.url,
                },
                TabEvent::TitleUpdated {
                    tab_id: tab_id.clone(),
                    title: current.title,
                },
                bridge::navigation_state(tab_id, &tab.history),
            ]
        };
        for event in events {
            self.events.emit(event);
        }
    }

    /// Emit `load-failed`, and when `ticket` is still the latest load (or
    /// the load never started) a corrective `url-updated` with the current
    /// entry's URL. Nothing is emitted for tabs closed in the meantime.
    fn report_load_failure(&self, tab_id: &TabId, ticket: Option<u64>, url: &str, reason: &str) {
        let current_url = {
            let state = self.state.borrow();
            let Some(tab) = state.tabs.get(tab_id) else {
                debug!(tab_id = %tab_id, url, "failure for closed tab dropped");
                return;
            };
            let latest = ticket.map_or(true, |t| tab.is_latest(t));
            latest.then(|| tab.history.current().url.clone())
        };
        warn!(tab_id = %tab_id, url, reason, "load failed");
        self.events.emit(TabEvent::LoadFailed {
            tab_id: tab_id.clone(),
            url: url.to_string(),
            reason: reason.to_string(),
        });
        if let Some(url) = current_url {
            self.events.emit(TabEvent::UrlUpdated {
                tab_id: tab_id.clone(),
                url,
            });
        }
    }

    fn load_failure(&self, tab_id: &TabId, url: &str, reason: &str) -> TabError {
        TabError::LoadFailure {
            tab_id: tab_id.clone(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Drop for TabRegistry {
    fn drop(&mut self) {
        let closed = self.close_all();
        if closed > 0 {
            debug!(closed, "registry dropped with open tabs");
        }
    }
}
