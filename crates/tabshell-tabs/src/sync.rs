//! Renderer-side tab list state.
//!
//! [`UiSync`] is a reducer: it folds [`TabEvent`]s into a [`TabListState`]
//! and turns user intents into [`Command`]s. It never talks to the registry
//! directly, so it can run anywhere events can be delivered.

use serde::{Deserialize, Serialize};
use tabshell_common::{NavigationDirection, TabEvent, TabId, TabSnapshot};
use tracing::{debug, trace};

use crate::commands::Command;

/// Shown for a created tab whose snapshot carries no title.
const UNTITLED: &str = "New Tab";

/// One row of the tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl TabView {
    pub fn new(id: TabId, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: title.into(),
            can_go_back: false,
            can_go_forward: false,
            last_error: None,
        }
    }

    fn from_snapshot(id: TabId, snapshot: &TabSnapshot) -> Self {
        let mut view = Self::new(id, "", UNTITLED);
        view.apply_snapshot(snapshot);
        view
    }

    /// An empty snapshot title keeps the one already shown.
    fn apply_snapshot(&mut self, snapshot: &TabSnapshot) {
        self.url = snapshot.url.clone();
        if !snapshot.title.is_empty() {
            self.title = snapshot.title.clone();
        }
        self.can_go_back = snapshot.can_go_back;
        self.can_go_forward = snapshot.can_go_forward;
    }
}

/// Ordered tab strip plus the active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabListState {
    pub tabs: Vec<TabView>,
    pub active_tab_id: Option<TabId>,
}

impl TabListState {
    pub fn get(&self, tab_id: &TabId) -> Option<&TabView> {
        self.tabs.iter().find(|t| &t.id == tab_id)
    }

    pub fn active(&self) -> Option<&TabView> {
        self.active_tab_id.as_ref().and_then(|id| self.get(id))
    }

    fn get_mut(&mut self, tab_id: &TabId) -> Option<&mut TabView> {
        self.tabs.iter_mut().find(|t| &t.id == tab_id)
    }

    fn position(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == tab_id)
    }
}

pub struct UiSync {
    state: TabListState,
    default_url: String,
}

impl UiSync {
    /// Start with a single active tab, matching the tab the shell opens at
    /// startup.
    pub fn new(initial: TabView, default_url: impl Into<String>) -> Self {
        Self {
            state: TabListState {
                active_tab_id: Some(initial.id.clone()),
                tabs: vec![initial],
            },
            default_url: default_url.into(),
        }
    }

    pub fn state(&self) -> &TabListState {
        &self.state
    }

    pub fn active(&self) -> Option<&TabView> {
        self.state.active()
    }

    /// Fold one event into the state. Events for unknown tabs are ignored
    /// (except `tab-created`). Returns follow-up commands, e.g. the switch
    /// to a replacement tab after the active one closed.
    pub fn reduce(&mut self, event: &TabEvent) -> Vec<Command> {
        trace!(kind = event.kind(), tab_id = %event.tab_id(), "reducing event");
        match event {
            TabEvent::TabCreated { tab_id, snapshot } => {
                match self.state.get_mut(tab_id) {
                    Some(existing) => existing.apply_snapshot(snapshot),
                    None => self
                        .state
                        .tabs
                        .push(TabView::from_snapshot(tab_id.clone(), snapshot)),
                }
                self.state.active_tab_id = Some(tab_id.clone());
            }
            TabEvent::TabSwitched { tab_id, snapshot } => {
                if let Some(tab) = self.state.get_mut(tab_id) {
                    tab.apply_snapshot(snapshot);
                    self.state.active_tab_id = Some(tab_id.clone());
                }
            }
            TabEvent::TabClosed { tab_id } => return self.remove(tab_id),
            TabEvent::UrlUpdated { tab_id, url } => {
                if let Some(tab) = self.state.get_mut(tab_id) {
                    tab.url = url.clone();
                }
            }
            TabEvent::TitleUpdated { tab_id, title } => {
                if let Some(tab) = self.state.get_mut(tab_id) {
                    tab.title = title.clone();
                }
            }
            TabEvent::NavigationStateChanged {
                tab_id,
                can_go_back,
                can_go_forward,
            } => {
                if let Some(tab) = self.state.get_mut(tab_id) {
                    tab.can_go_back = *can_go_back;
                    tab.can_go_forward = *can_go_forward;
                    tab.last_error = None;
                }
            }
            TabEvent::LoadFailed { tab_id, reason, .. } => {
                if let Some(tab) = self.state.get_mut(tab_id) {
                    tab.last_error = Some(reason.clone());
                }
            }
        }
        Vec::new()
    }

    fn remove(&mut self, tab_id: &TabId) -> Vec<Command> {
        let Some(index) = self.state.position(tab_id) else {
            return Vec::new();
        };
        self.state.tabs.remove(index);
        if self.state.active_tab_id.as_ref() != Some(tab_id) {
            return Vec::new();
        }

        // Nearest predecessor, else whatever is now last.
        let replacement = index
            .checked_sub(1)
            .and_then(|i| self.state.tabs.get(i))
            .or_else(|| self.state.tabs.last())
            .map(|t| t.id.clone());
        self.state.active_tab_id = replacement.clone();
        match replacement {
            Some(tab_id) => {
                debug!(tab_id = %tab_id, "activating replacement tab");
                vec![Command::SwitchTab { tab_id }]
            }
            None => Vec::new(),
        }
    }

    pub fn new_tab(&self) -> Vec<Command> {
        vec![Command::CreateTab {
            tab_id: TabId::generate(),
            url: Some(self.default_url.clone()),
        }]
    }

    pub fn request_switch(&self, tab_id: &TabId) -> Vec<Command> {
        if self.state.active_tab_id.as_ref() == Some(tab_id) || self.state.get(tab_id).is_none() {
            return Vec::new();
        }
        vec![Command::SwitchTab {
            tab_id: tab_id.clone(),
        }]
    }

    /// Close `tab_id`; closing the last tab opens a fresh one first so the
    /// strip is never empty.
    pub fn request_close(&self, tab_id: &TabId) -> Vec<Command> {
        if self.state.get(tab_id).is_none() {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if self.state.tabs.len() == 1 {
            commands.extend(self.new_tab());
        }
        commands.push(Command::CloseTab {
            tab_id: tab_id.clone(),
        });
        commands
    }

    /// Load typed input in the active tab. The URL bar shows the target
    /// immediately; core events overwrite it.
    pub fn submit_url(&mut self, input: &str) -> Vec<Command> {
        let Some(url) = normalize_url_input(input) else {
            return Vec::new();
        };
        let Some(active) = self.state.active_tab_id.clone() else {
            return Vec::new();
        };
        let Some(tab) = self.state.get_mut(&active) else {
            return Vec::new();
        };
        tab.url = url.clone();
        tab.last_error = None;
        vec![Command::LoadUrl {
            tab_id: tab.id.clone(),
            url,
        }]
    }

    pub fn back(&self) -> Vec<Command> {
        self.traverse(NavigationDirection::Back)
    }

    pub fn forward(&self) -> Vec<Command> {
        self.traverse(NavigationDirection::Forward)
    }

    pub fn reload(&self) -> Vec<Command> {
        self.active()
            .map(|tab| Command::ReloadTab {
                tab_id: tab.id.clone(),
            })
            .into_iter()
            .collect()
    }

    fn traverse(&self, direction: NavigationDirection) -> Vec<Command> {
        let Some(tab) = self.active() else {
            return Vec::new();
        };
        let possible = match direction {
            NavigationDirection::Back => tab.can_go_back,
            NavigationDirection::Forward => tab.can_go_forward,
        };
        if !possible {
            return Vec::new();
        }
        vec![Command::NavigateHistory {
            tab_id: tab.id.clone(),
            direction,
        }]
    }
}

/// Turn URL bar input into a loadable URL: anything not starting with
/// `http` gets an `https://` prefix. Blank input yields `None`.
pub fn normalize_url_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("http") {
        Some(input.to_string())
    } else {
        Some(format!("https://{input}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TabId {
        TabId::from(s)
    }

    fn snap(url: &str, title: &str) -> TabSnapshot {
        TabSnapshot {
            url: url.into(),
            title: title.into(),
            can_go_back: false,
            can_go_forward: false,
        }
    }

    fn sync() -> UiSync {
        UiSync::new(TabView::new(id("tab-1"), "about:blank", "New Tab"), "about:blank")
    }

    fn created(s: &str) -> TabEvent {
        TabEvent::TabCreated {
            tab_id: id(s),
            snapshot: snap("about:blank", "New Tab"),
        }
    }

    fn ids(sync: &UiSync) -> Vec<&str> {
        sync.state().tabs.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn starts_with_initial_tab_active() {
        let s = sync();
        assert_eq!(ids(&s), vec!["tab-1"]);
        assert_eq!(s.active().unwrap().title, "New Tab");
    }

    #[test]
    fn created_appends_and_activates() {
        let mut s = sync();
        assert!(s.reduce(&created("tab-2")).is_empty());
        assert_eq!(ids(&s), vec!["tab-1", "tab-2"]);
        assert_eq!(s.state().active_tab_id, Some(id("tab-2")));
    }

    #[test]
    fn created_for_known_tab_refreshes_in_place() {
        let mut s = sync();
        s.reduce(&TabEvent::TabCreated {
            tab_id: id("tab-1"),
            snapshot: snap("https://home.test/", "Home"),
        });
        assert_eq!(ids(&s), vec!["tab-1"]);
        assert_eq!(s.active().unwrap().url, "https://home.test/");
    }

    #[test]
    fn untitled_snapshots_keep_a_title() {
        let mut s = sync();
        s.reduce(&TabEvent::TabCreated {
            tab_id: id("tab-2"),
            snapshot: snap("about:blank", ""),
        });
        assert_eq!(s.active().unwrap().title, "New Tab");

        s.reduce(&TabEvent::TitleUpdated {
            tab_id: id("tab-1"),
            title: "Home".into(),
        });
        s.reduce(&TabEvent::TabSwitched {
            tab_id: id("tab-1"),
            snapshot: snap("https://home.test/", ""),
        });
        let active = s.active().unwrap();
        assert_eq!(active.title, "Home");
        assert_eq!(active.url, "https://home.test/");
    }

    #[test]
    fn updates_patch_only_their_tab() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        s.reduce(&TabEvent::UrlUpdated {
            tab_id: id("tab-1"),
            url: "https://a.test/".into(),
        });
        s.reduce(&TabEvent::TitleUpdated {
            tab_id: id("tab-1"),
            title: "A".into(),
        });
        s.reduce(&TabEvent::NavigationStateChanged {
            tab_id: id("tab-1"),
            can_go_back: true,
            can_go_forward: false,
        });
        let t1 = s.state().get(&id("tab-1")).unwrap();
        assert_eq!((t1.url.as_str(), t1.title.as_str()), ("https://a.test/", "A"));
        assert!(t1.can_go_back);
        let t2 = s.state().get(&id("tab-2")).unwrap();
        assert_eq!(t2.url, "about:blank");
        assert_eq!(s.state().active_tab_id, Some(id("tab-2")));
    }

    #[test]
    fn events_for_unknown_tabs_are_ignored() {
        let mut s = sync();
        let before = s.state().clone();
        s.reduce(&TabEvent::UrlUpdated {
            tab_id: id("ghost"),
            url: "https://x/".into(),
        });
        s.reduce(&TabEvent::TabSwitched {
            tab_id: id("ghost"),
            snapshot: snap("https://x/", "X"),
        });
        assert!(s.reduce(&TabEvent::TabClosed { tab_id: id("ghost") }).is_empty());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn closing_active_middle_tab_selects_predecessor() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        s.reduce(&created("tab-3"));
        s.reduce(&TabEvent::TabSwitched {
            tab_id: id("tab-2"),
            snapshot: snap("about:blank", "New Tab"),
        });
        let commands = s.reduce(&TabEvent::TabClosed { tab_id: id("tab-2") });
        assert_eq!(commands, vec![Command::SwitchTab { tab_id: id("tab-1") }]);
        assert_eq!(s.state().active_tab_id, Some(id("tab-1")));
    }

    #[test]
    fn closing_active_first_tab_selects_new_last() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        s.reduce(&created("tab-3"));
        s.reduce(&TabEvent::TabSwitched {
            tab_id: id("tab-1"),
            snapshot: snap("about:blank", "New Tab"),
        });
        let commands = s.reduce(&TabEvent::TabClosed { tab_id: id("tab-1") });
        assert_eq!(commands, vec![Command::SwitchTab { tab_id: id("tab-3") }]);
    }

    #[test]
    fn closing_inactive_tab_keeps_selection() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        let commands = s.reduce(&TabEvent::TabClosed { tab_id: id("tab-1") });
        assert!(commands.is_empty());
        assert_eq!(s.state().active_tab_id, Some(id("tab-2")));
    }

    #[test]
    fn closing_only_tab_leaves_nothing_active() {
        let mut s = sync();
        assert!(s.reduce(&TabEvent::TabClosed { tab_id: id("tab-1") }).is_empty());
        assert!(s.state().tabs.is_empty());
        assert_eq!(s.state().active_tab_id, None);
    }

    #[test]
    fn load_failure_is_recorded_until_next_commit() {
        let mut s = sync();
        s.reduce(&TabEvent::LoadFailed {
            tab_id: id("tab-1"),
            url: "https://bad.test/".into(),
            reason: "dns".into(),
        });
        assert_eq!(s.active().unwrap().last_error.as_deref(), Some("dns"));
        s.reduce(&TabEvent::NavigationStateChanged {
            tab_id: id("tab-1"),
            can_go_back: false,
            can_go_forward: false,
        });
        assert!(s.active().unwrap().last_error.is_none());
    }

    #[test]
    fn request_close_of_last_tab_creates_replacement_first() {
        let s = sync();
        let commands = s.request_close(&id("tab-1"));
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            &commands[0],
            Command::CreateTab { url: Some(url), .. } if url == "about:blank"
        ));
        assert_eq!(commands[1], Command::CloseTab { tab_id: id("tab-1") });
    }

    #[test]
    fn request_close_with_siblings_only_closes() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        assert_eq!(
            s.request_close(&id("tab-1")),
            vec![Command::CloseTab { tab_id: id("tab-1") }]
        );
        assert!(s.request_close(&id("ghost")).is_empty());
    }

    #[test]
    fn request_switch_skips_active_and_unknown() {
        let mut s = sync();
        s.reduce(&created("tab-2"));
        assert!(s.request_switch(&id("tab-2")).is_empty());
        assert!(s.request_switch(&id("ghost")).is_empty());
        assert_eq!(
            s.request_switch(&id("tab-1")),
            vec![Command::SwitchTab { tab_id: id("tab-1") }]
        );
    }

    #[test]
    fn new_tab_ids_are_fresh() {
        let s = sync();
        let a = s.new_tab();
        let b = s.new_tab();
        assert_ne!(a[0].tab_id(), b[0].tab_id());
    }

    #[test]
    fn submit_url_normalizes_and_updates_optimistically() {
        let mut s = sync();
        let commands = s.submit_url("  example.com ");
        assert_eq!(
            commands,
            vec![Command::LoadUrl {
                tab_id: id("tab-1"),
                url: "https://example.com".into()
            }]
        );
        assert_eq!(s.active().unwrap().url, "https://example.com");

        s.reduce(&TabEvent::UrlUpdated {
            tab_id: id("tab-1"),
            url: "https://www.example.com/".into(),
        });
        assert_eq!(s.active().unwrap().url, "https://www.example.com/");
        assert!(s.submit_url("   ").is_empty());
    }

    #[test]
    fn navigation_intents_follow_capabilities() {
        let mut s = sync();
        assert!(s.back().is_empty());
        assert!(s.forward().is_empty());
        s.reduce(&TabEvent::NavigationStateChanged {
            tab_id: id("tab-1"),
            can_go_back: true,
            can_go_forward: false,
        });
        assert_eq!(
            s.back(),
            vec![Command::NavigateHistory {
                tab_id: id("tab-1"),
                direction: NavigationDirection::Back
            }]
        );
        assert!(s.forward().is_empty());
        assert_eq!(s.reload(), vec![Command::ReloadTab { tab_id: id("tab-1") }]);
    }

    #[test]
    fn url_input_normalization() {
        assert_eq!(normalize_url_input("http://a.test").as_deref(), Some("http://a.test"));
        assert_eq!(normalize_url_input("https://a.test").as_deref(), Some("https://a.test"));
        assert_eq!(normalize_url_input("a.test/path").as_deref(), Some("https://a.test/path"));
        assert_eq!(normalize_url_input(""), None);
    }

    #[test]
    fn state_serializes_for_the_header() {
        let s = sync();
        let json = serde_json::to_value(s.state()).unwrap();
        assert_eq!(json["activeTabId"], "tab-1");
        assert_eq!(json["tabs"][0]["canGoBack"], false);
        assert!(json["tabs"][0].get("lastError").is_none());
    }
}
