use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tabshell_common::{ContentView, Rect, TabId};
use tracing::{debug, warn};

use crate::bridge::TabSubscriptions;
use crate::history::NavigationHistory;

/// Lifecycle of a tab.
///
/// `Created -> Active <-> Inactive -> Closed`; `Closed` is terminal and the
/// id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPhase {
    Created,
    Active,
    Inactive,
    Closed,
}

/// A history traversal waiting for the view to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingTraversal {
    pub index: usize,
    pub url: String,
    pub ticket: u64,
    /// The load already resolved and the cursor moved; only the view's
    /// commit signal is still expected.
    pub confirmed: bool,
}

/// A reload of the current entry waiting for its commit signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingReload {
    pub url: String,
    pub ticket: u64,
}

/// How a commit signal was folded into history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitKind {
    Recorded,
    Traversed,
    Reloaded,
}

/// Registry-owned state for one tab.
pub(crate) struct Tab {
    pub id: TabId,
    pub view: Rc<dyn ContentView>,
    pub history: NavigationHistory,
    pub phase: TabPhase,
    subscriptions: TabSubscriptions,
    load_ticket: u64,
    pending: Option<PendingTraversal>,
    reloading: Option<PendingReload>,
}

impl Tab {
    pub fn new(
        id: TabId,
        view: Rc<dyn ContentView>,
        history: NavigationHistory,
        subscriptions: TabSubscriptions,
    ) -> Self {
        Self {
            id,
            view,
            history,
            phase: TabPhase::Created,
            subscriptions,
            load_ticket: 0,
            pending: None,
            reloading: None,
        }
    }

    /// Start a new load generation, superseding any earlier one.
    pub fn begin_load(&mut self) -> u64 {
        self.load_ticket += 1;
        self.pending = None;
        self.reloading = None;
        self.load_ticket
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.load_ticket == ticket
    }

    pub fn begin_traversal(&mut self, index: usize, url: String) -> u64 {
        let ticket = self.begin_load();
        self.pending = Some(PendingTraversal {
            index,
            url,
            ticket,
            confirmed: false,
        });
        ticket
    }

    /// The traversal load for `ticket` resolved. Moves the cursor unless the
    /// commit signal got there first. Returns `true` if the cursor moved.
    pub fn confirm_traversal(&mut self, ticket: u64) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if pending.ticket != ticket || pending.confirmed {
            return false;
        }
        pending.confirmed = true;
        let moved = self.history.move_to(pending.index, &pending.url);
        if !moved {
            self.pending = None;
        }
        moved
    }

    /// Drop the traversal marker for `ticket`, if it is still pending.
    pub fn abandon_traversal(&mut self, ticket: u64) {
        if self.pending.as_ref().is_some_and(|p| p.ticket == ticket) {
            self.pending = None;
        }
    }

    /// Mark the current entry as reloading. Its next commit updates the
    /// entry in place instead of recording a new one.
    pub fn begin_reload(&mut self) -> u64 {
        let ticket = self.begin_load();
        self.reloading = Some(PendingReload {
            url: self.history.current().url.clone(),
            ticket,
        });
        ticket
    }

    pub fn abandon_reload(&mut self, ticket: u64) {
        if self.reloading.as_ref().is_some_and(|r| r.ticket == ticket) {
            self.reloading = None;
        }
    }

    /// The view reported that a load of `url` failed.
    pub fn view_failed(&mut self, url: &str) {
        if self.pending.as_ref().is_some_and(|p| p.url == url) {
            debug!(tab_id = %self.id, url, "traversal target failed");
            self.pending = None;
        }
        if self.reloading.take().is_some() {
            debug!(tab_id = %self.id, url, "reload failed");
        }
    }

    /// Fold a committed navigation into history.
    pub fn commit(&mut self, url: &str) -> CommitKind {
        if let Some(reload) = self.reloading.take() {
            if reload.url == url {
                let title = self.view.title();
                if !title.trim().is_empty() {
                    self.history.update_title(title);
                }
                return CommitKind::Reloaded;
            }
        }
        match self.pending.take() {
            Some(pending) if pending.url == url => {
                if !pending.confirmed {
                    self.history.move_to(pending.index, &pending.url);
                }
                CommitKind::Traversed
            }
            _ => {
                let title = self.committed_title(url);
                self.history.record(url, title);
                CommitKind::Recorded
            }
        }
    }

    fn committed_title(&self, url: &str) -> String {
        let title = self.view.title();
        if title.trim().is_empty() {
            url.to_string()
        } else {
            title
        }
    }

    pub fn show(&mut self, bounds: Rect) {
        if let Err(e) = self.view.set_bounds(bounds) {
            warn!(tab_id = %self.id, error = %e, "failed to size content view");
        }
        if let Err(e) = self.view.set_visible(true) {
            warn!(tab_id = %self.id, error = %e, "failed to attach content view");
        }
        self.phase = TabPhase::Active;
    }

    pub fn hide(&mut self) {
        if let Err(e) = self.view.set_visible(false) {
            warn!(tab_id = %self.id, error = %e, "failed to detach content view");
        }
        self.phase = TabPhase::Inactive;
    }

    /// Release listeners, detach and dispose the view.
    pub fn dispose(mut self) {
        self.subscriptions.cancel();
        if self.phase == TabPhase::Active {
            self.hide();
        }
        self.view.close();
        debug!(tab_id = %self.id, "tab disposed");
    }
}

#[cfg(test)]
mod tests {
    use tabshell_common::testing::{LoadMode, ScriptedView};

    use super::*;
    use crate::bridge::EventBridge;

    fn tab_at(urls: &[&str]) -> Tab {
        let view: Rc<dyn ContentView> = Rc::new(ScriptedView::new(LoadMode::Succeed));
        let id = TabId::from("t1");
        let subscriptions = EventBridge::new().attach(&id, &view);
        let mut history = NavigationHistory::new(urls[0], urls[0]);
        for url in &urls[1..] {
            history.record(*url, *url);
        }
        Tab::new(id, view, history, subscriptions)
    }

    fn urls(tab: &Tab) -> Vec<&str> {
        tab.history.entries().iter().map(|e| e.url.as_str()).collect()
    }

    #[test]
    fn reload_commit_keeps_forward_entries() {
        let mut tab = tab_at(&["a", "b"]);
        assert!(tab.history.move_to(0, "a"));

        tab.begin_reload();
        assert_eq!(tab.commit("a"), CommitKind::Reloaded);
        assert_eq!(urls(&tab), ["a", "b"]);
        assert!(tab.history.can_go_forward());
    }

    #[test]
    fn redirected_reload_records_the_new_url() {
        let mut tab = tab_at(&["a", "b"]);
        tab.begin_reload();
        assert_eq!(tab.commit("c"), CommitKind::Recorded);
        assert_eq!(urls(&tab), ["a", "b", "c"]);

        // The marker is gone; a second commit of the old URL records too.
        assert_eq!(tab.commit("b"), CommitKind::Recorded);
    }

    #[test]
    fn reload_marker_cleared_by_newer_load_failure_or_abandon() {
        let mut tab = tab_at(&["a", "b"]);
        tab.begin_reload();
        tab.begin_load();
        assert_eq!(tab.commit("b"), CommitKind::Recorded);

        tab.begin_reload();
        tab.view_failed("b");
        assert_eq!(tab.commit("b"), CommitKind::Recorded);

        let ticket = tab.begin_reload();
        tab.abandon_reload(ticket + 1);
        tab.abandon_reload(ticket);
        assert_eq!(tab.commit("b"), CommitKind::Recorded);
    }

    #[test]
    fn traversal_supersedes_reload() {
        let mut tab = tab_at(&["a", "b"]);
        tab.begin_reload();
        tab.begin_traversal(0, "a".into());
        assert_eq!(tab.commit("a"), CommitKind::Traversed);
        assert_eq!(tab.history.current_index(), 0);
        assert_eq!(urls(&tab), ["a", "b"]);
    }
}
