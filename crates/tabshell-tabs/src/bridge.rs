//! Content-view signal plumbing.
//!
//! Every tab's view gets one listener per signal kind. Listeners only
//! forward `(tab_id, signal)` pairs into a shared channel; the registry
//! drains that channel and turns each signal into history mutations and
//! domain events.

use std::cell::RefCell;
use std::rc::Rc;

use tabshell_common::{ContentSignal, ContentView, ListenerId, TabEvent, TabId};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, trace};

use crate::history::NavigationHistory;

/// Discriminant of a [`ContentSignal`], one listener per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    NavigationStarted,
    NavigationCommitted,
    InPageNavigation,
    TitleChanged,
    LoadFailed,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::NavigationStarted,
        SignalKind::NavigationCommitted,
        SignalKind::InPageNavigation,
        SignalKind::TitleChanged,
        SignalKind::LoadFailed,
    ];

    pub fn of(signal: &ContentSignal) -> Self {
        match signal {
            ContentSignal::NavigationStarted { .. } => Self::NavigationStarted,
            ContentSignal::NavigationCommitted { .. } => Self::NavigationCommitted,
            ContentSignal::InPageNavigation { .. } => Self::InPageNavigation,
            ContentSignal::TitleChanged { .. } => Self::TitleChanged,
            ContentSignal::LoadFailed { .. } => Self::LoadFailed,
        }
    }
}

/// Listener registrations held by one tab.
///
/// Released exactly once: by [`TabSubscriptions::cancel`] or on drop,
/// whichever comes first.
pub struct TabSubscriptions {
    view: Rc<dyn ContentView>,
    ids: Vec<ListenerId>,
    cancelled: bool,
}

impl TabSubscriptions {
    fn new(view: Rc<dyn ContentView>) -> Self {
        Self {
            view,
            ids: Vec::new(),
            cancelled: false,
        }
    }

    /// Unsubscribe every listener. Returns how many were removed; a second
    /// call removes nothing.
    pub fn cancel(&mut self) -> usize {
        if self.cancelled {
            return 0;
        }
        self.cancelled = true;
        let view = &self.view;
        let removed = self.ids.drain(..).filter(|id| view.unsubscribe(*id)).count();
        trace!(removed, "tab subscriptions cancelled");
        removed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Drop for TabSubscriptions {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TabSubscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSubscriptions")
            .field("listeners", &self.ids.len())
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

/// Collects signals from all attached views in arrival order.
#[derive(Debug)]
pub struct EventBridge {
    tx: mpsc::UnboundedSender<(TabId, ContentSignal)>,
    rx: RefCell<mpsc::UnboundedReceiver<(TabId, ContentSignal)>>,
}

impl EventBridge {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: RefCell::new(rx),
        }
    }

    /// Register listeners on `view` tagging every signal with `tab_id`.
    pub fn attach(&self, tab_id: &TabId, view: &Rc<dyn ContentView>) -> TabSubscriptions {
        let mut subscriptions = TabSubscriptions::new(Rc::clone(view));
        for kind in SignalKind::ALL {
            let tx = self.tx.clone();
            let tab_id = tab_id.clone();
            let id = view.subscribe(Box::new(move |signal| {
                if SignalKind::of(signal) != kind {
                    return;
                }
                if tx.send((tab_id.clone(), signal.clone())).is_err() {
                    debug!(tab_id = %tab_id, "signal dropped: bridge gone");
                }
            }));
            subscriptions.ids.push(id);
        }
        debug!(tab_id = %tab_id, listeners = subscriptions.len(), "bridge attached");
        subscriptions
    }

    /// Take every signal received so far.
    pub fn drain(&self) -> Vec<(TabId, ContentSignal)> {
        let mut rx = self.rx.borrow_mut();
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(item) => out.push(item),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// What a signal does to the tab's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HistoryEffect {
    None,
    Commit { url: String },
    UpdateTitle { title: String },
    Failure { url: String },
}

impl HistoryEffect {
    pub(crate) fn of(signal: &ContentSignal) -> Self {
        match signal {
            ContentSignal::NavigationStarted { .. } => Self::None,
            ContentSignal::NavigationCommitted { url } | ContentSignal::InPageNavigation { url } => {
                Self::Commit { url: url.clone() }
            }
            ContentSignal::TitleChanged { title } => Self::UpdateTitle {
                title: title.clone(),
            },
            ContentSignal::LoadFailed { url, .. } => Self::Failure { url: url.clone() },
        }
    }
}

/// Domain events for `signal`, read against history after its effect applied.
pub fn domain_events(
    tab_id: &TabId,
    signal: &ContentSignal,
    history: &NavigationHistory,
) -> Vec<TabEvent> {
    match signal {
        ContentSignal::NavigationStarted { url } => vec![TabEvent::UrlUpdated {
            tab_id: tab_id.clone(),
            url: url.clone(),
        }],
        ContentSignal::NavigationCommitted { url } | ContentSignal::InPageNavigation { url } => {
            vec![
                TabEvent::UrlUpdated {
                    tab_id: tab_id.clone(),
                    url: url.clone(),
                },
                TabEvent::TitleUpdated {
                    tab_id: tab_id.clone(),
                    title: history.current().title.clone(),
                },
                navigation_state(tab_id, history),
            ]
        }
        ContentSignal::TitleChanged { title } => vec![TabEvent::TitleUpdated {
            tab_id: tab_id.clone(),
            title: title.clone(),
        }],
        ContentSignal::LoadFailed { url, reason } => vec![
            TabEvent::LoadFailed {
                tab_id: tab_id.clone(),
                url: url.clone(),
                reason: reason.clone(),
            },
            TabEvent::UrlUpdated {
                tab_id: tab_id.clone(),
                url: history.current().url.clone(),
            },
        ],
    }
}

pub(crate) fn navigation_state(tab_id: &TabId, history: &NavigationHistory) -> TabEvent {
    TabEvent::NavigationStateChanged {
        tab_id: tab_id.clone(),
        can_go_back: history.can_go_back(),
        can_go_forward: history.can_go_forward(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabshell_common::testing::{LoadMode, ScriptedView};

    fn scripted() -> (Rc<ScriptedView>, Rc<dyn ContentView>) {
        let view = Rc::new(ScriptedView::new(LoadMode::Succeed));
        let dyn_view: Rc<dyn ContentView> = view.clone();
        (view, dyn_view)
    }

    #[test]
    fn attach_registers_one_listener_per_kind() {
        let bridge = EventBridge::new();
        let (view, dyn_view) = scripted();
        let subs = bridge.attach(&TabId::from("tab-1"), &dyn_view);
        assert_eq!(subs.len(), SignalKind::ALL.len());
        assert_eq!(view.listener_count(), SignalKind::ALL.len());
    }

    #[test]
    fn signals_arrive_once_in_order_with_tab_id() {
        let bridge = EventBridge::new();
        let (view, dyn_view) = scripted();
        let _subs = bridge.attach(&TabId::from("tab-1"), &dyn_view);

        view.start("https://a.test/");
        view.commit("https://a.test/");
        view.change_title("A");

        let drained = bridge.drain();
        let kinds: Vec<_> = drained.iter().map(|(_, s)| SignalKind::of(s)).collect();
        assert_eq!(
            kinds,
            vec![
                SignalKind::NavigationStarted,
                SignalKind::NavigationCommitted,
                SignalKind::TitleChanged,
            ]
        );
        assert!(drained.iter().all(|(id, _)| id.as_str() == "tab-1"));
        assert!(bridge.drain().is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let bridge = EventBridge::new();
        let (view, dyn_view) = scripted();
        let mut subs = bridge.attach(&TabId::from("tab-1"), &dyn_view);

        assert_eq!(subs.cancel(), SignalKind::ALL.len());
        assert_eq!(subs.cancel(), 0);
        assert!(subs.is_cancelled());
        assert_eq!(view.listener_count(), 0);

        view.commit("https://late.test/");
        assert!(bridge.drain().is_empty());
    }

    #[test]
    fn drop_releases_listeners() {
        let bridge = EventBridge::new();
        let (view, dyn_view) = scripted();
        {
            let _subs = bridge.attach(&TabId::from("tab-1"), &dyn_view);
            assert_eq!(view.listener_count(), SignalKind::ALL.len());
        }
        assert_eq!(view.listener_count(), 0);
    }

    #[test]
    fn commit_events_read_history() {
        let mut history = NavigationHistory::new("about:blank", "New Tab");
        history.record("https://a.test/", "A");
        let tab = TabId::from("tab-1");
        let events = domain_events(
            &tab,
            &ContentSignal::NavigationCommitted {
                url: "https://a.test/".into(),
            },
            &history,
        );
        assert_eq!(
            events,
            vec![
                TabEvent::UrlUpdated {
                    tab_id: tab.clone(),
                    url: "https://a.test/".into()
                },
                TabEvent::TitleUpdated {
                    tab_id: tab.clone(),
                    title: "A".into()
                },
                TabEvent::NavigationStateChanged {
                    tab_id: tab,
                    can_go_back: true,
                    can_go_forward: false
                },
            ]
        );
    }

    #[test]
    fn failure_restores_current_url() {
        let history = NavigationHistory::new("https://ok.test/", "Ok");
        let tab = TabId::from("tab-1");
        let events = domain_events(
            &tab,
            &ContentSignal::LoadFailed {
                url: "https://bad.test/".into(),
                reason: "dns".into(),
            },
            &history,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "load-failed");
        assert_eq!(
            events[1],
            TabEvent::UrlUpdated {
                tab_id: tab,
                url: "https://ok.test/".into()
            }
        );
    }

    #[test]
    fn started_and_title_are_single_events() {
        let history = NavigationHistory::new("about:blank", "New Tab");
        let tab = TabId::from("t");
        let started = domain_events(
            &tab,
            &ContentSignal::NavigationStarted { url: "https://x/".into() },
            &history,
        );
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind(), "url-updated");
        let title = domain_events(
            &tab,
            &ContentSignal::TitleChanged { title: "X".into() },
            &history,
        );
        assert_eq!(title.len(), 1);
        assert_eq!(title[0].kind(), "title-updated");
    }

    #[test]
    fn history_effects() {
        assert_eq!(
            HistoryEffect::of(&ContentSignal::NavigationStarted { url: "u".into() }),
            HistoryEffect::None
        );
        assert_eq!(
            HistoryEffect::of(&ContentSignal::InPageNavigation { url: "u#x".into() }),
            HistoryEffect::Commit { url: "u#x".into() }
        );
        assert_eq!(
            HistoryEffect::of(&ContentSignal::TitleChanged { title: "t".into() }),
            HistoryEffect::UpdateTitle { title: "t".into() }
        );
    }
}
