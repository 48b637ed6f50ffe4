//! Commands sent from the UI layer to the tab core.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tabshell_common::{NavigationDirection, TabError, TabEvent, TabId, TabSnapshot};
use tracing::{debug, warn};

use crate::registry::TabRegistry;

/// Wire form is `{"kind": "load-url", "tabId": "...", "url": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Command {
    CreateTab {
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    SwitchTab {
        tab_id: TabId,
    },
    CloseTab {
        tab_id: TabId,
    },
    LoadUrl {
        tab_id: TabId,
        url: String,
    },
    NavigateHistory {
        tab_id: TabId,
        direction: NavigationDirection,
    },
    ReloadTab {
        tab_id: TabId,
    },
}

impl Command {
    pub fn tab_id(&self) -> &TabId {
        match self {
            Self::CreateTab { tab_id, .. }
            | Self::SwitchTab { tab_id }
            | Self::CloseTab { tab_id }
            | Self::LoadUrl { tab_id, .. }
            | Self::NavigateHistory { tab_id, .. }
            | Self::ReloadTab { tab_id } => tab_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTab { .. } => "create-tab",
            Self::SwitchTab { .. } => "switch-tab",
            Self::CloseTab { .. } => "close-tab",
            Self::LoadUrl { .. } => "load-url",
            Self::NavigateHistory { .. } => "navigate-history",
            Self::ReloadTab { .. } => "reload-tab",
        }
    }
}

/// What a dispatched command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    Snapshot(Option<TabSnapshot>),
    Success(bool),
    Rejected(TabError),
}

/// Executes [`Command`]s against the registry and emits the lifecycle
/// events (`tab-created`, `tab-switched`, `tab-closed`) that go with them.
#[derive(Clone)]
pub struct CommandHandler {
    registry: Rc<TabRegistry>,
}

impl CommandHandler {
    pub fn new(registry: Rc<TabRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Rc<TabRegistry> {
        &self.registry
    }

    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        debug!(kind = command.kind(), tab_id = %command.tab_id(), "dispatching command");
        match command {
            Command::CreateTab { tab_id, url } => self.create_tab(tab_id, url.as_deref()),
            Command::SwitchTab { tab_id } => {
                let snapshot = self.registry.switch_tab(&tab_id);
                if let Some(snapshot) = &snapshot {
                    self.registry.emit(TabEvent::TabSwitched {
                        tab_id,
                        snapshot: snapshot.clone(),
                    });
                }
                CommandOutcome::Snapshot(snapshot)
            }
            Command::CloseTab { tab_id } => {
                let closed = self.registry.close_tab(&tab_id);
                if closed {
                    self.registry.emit(TabEvent::TabClosed { tab_id });
                }
                CommandOutcome::Success(closed)
            }
            Command::LoadUrl { tab_id, url } => {
                CommandOutcome::Success(self.registry.load_url(&tab_id, &url).await)
            }
            Command::NavigateHistory { tab_id, direction } => {
                CommandOutcome::Success(self.registry.navigate_history(&tab_id, direction).await)
            }
            Command::ReloadTab { tab_id } => {
                CommandOutcome::Success(self.registry.reload_tab(&tab_id))
            }
        }
    }

    /// Create, activate and announce a tab.
    fn create_tab(&self, tab_id: TabId, url: Option<&str>) -> CommandOutcome {
        if let Err(e) = self.registry.create_tab(tab_id.clone(), url) {
            warn!(tab_id = %tab_id, error = %e, "create-tab rejected");
            return CommandOutcome::Rejected(e);
        }
        let snapshot = self.registry.switch_tab(&tab_id);
        if let Some(snapshot) = snapshot {
            self.registry.emit(TabEvent::TabCreated { tab_id, snapshot });
        }
        CommandOutcome::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryOptions;
    use tabshell_common::testing::ScriptedViewFactory;
    use tabshell_common::{EventSink, Size};
    use tabshell_layout::{ChromeLayout, ChromeViewport};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn handler() -> (CommandHandler, Rc<ScriptedViewFactory>, UnboundedReceiver<TabEvent>) {
        let factory = Rc::new(ScriptedViewFactory::default());
        let viewport = Rc::new(ChromeViewport::new(
            ChromeLayout::default(),
            Size::new(800.0, 600.0),
        ));
        let (sink, rx) = EventSink::channel();
        let registry = TabRegistry::new(factory.clone(), viewport, sink, RegistryOptions::default());
        (CommandHandler::new(Rc::new(registry)), factory, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<TabEvent>) -> Vec<TabEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn wire_format() {
        let cmd: Command = serde_json::from_str(
            r#"{"kind":"navigate-history","tabId":"tab-1","direction":"back"}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::NavigateHistory {
                tab_id: TabId::from("tab-1"),
                direction: NavigationDirection::Back
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"kind":"create-tab","tabId":"tab-2"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::CreateTab {
                tab_id: TabId::from("tab-2"),
                url: None
            }
        );

        let json = serde_json::to_value(Command::LoadUrl {
            tab_id: TabId::from("t"),
            url: "https://a.test/".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "load-url");
        assert_eq!(json["tabId"], "t");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed = serde_json::from_str::<Command>(r#"{"kind":"eval-js","tabId":"t"}"#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn create_tab_activates_and_announces() {
        let (handler, factory, mut rx) = handler();
        let outcome = handler
            .dispatch(Command::CreateTab {
                tab_id: TabId::from("tab-1"),
                url: Some("https://a.test/".into()),
            })
            .await;
        assert_eq!(outcome, CommandOutcome::Done);
        assert!(factory.view("tab-1").unwrap().is_visible());
        assert_eq!(
            drain(&mut rx),
            vec![TabEvent::TabCreated {
                tab_id: TabId::from("tab-1"),
                snapshot: TabSnapshot {
                    url: "https://a.test/".into(),
                    title: "New Tab".into(),
                    can_go_back: false,
                    can_go_forward: false,
                },
            }]
        );
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_silently() {
        let (handler, _factory, mut rx) = handler();
        let create = Command::CreateTab {
            tab_id: TabId::from("tab-1"),
            url: None,
        };
        handler.dispatch(create.clone()).await;
        drain(&mut rx);
        let outcome = handler.dispatch(create).await;
        assert_eq!(
            outcome,
            CommandOutcome::Rejected(TabError::DuplicateTabId(TabId::from("tab-1")))
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn switch_and_close_emit_events() {
        let (handler, _factory, mut rx) = handler();
        for id in ["tab-1", "tab-2"] {
            handler
                .dispatch(Command::CreateTab {
                    tab_id: TabId::from(id),
                    url: None,
                })
                .await;
        }
        drain(&mut rx);

        let outcome = handler
            .dispatch(Command::SwitchTab {
                tab_id: TabId::from("tab-1"),
            })
            .await;
        assert!(matches!(outcome, CommandOutcome::Snapshot(Some(_))));
        let outcome = handler
            .dispatch(Command::CloseTab {
                tab_id: TabId::from("tab-2"),
            })
            .await;
        assert_eq!(outcome, CommandOutcome::Success(true));
        let kinds: Vec<_> = drain(&mut rx).iter().map(TabEvent::kind).collect();
        assert_eq!(kinds, vec!["tab-switched", "tab-closed"]);
    }

    #[tokio::test]
    async fn commands_on_unknown_tabs_emit_nothing() {
        let (handler, _factory, mut rx) = handler();
        let ghost = TabId::from("ghost");
        assert_eq!(
            handler.dispatch(Command::SwitchTab { tab_id: ghost.clone() }).await,
            CommandOutcome::Snapshot(None)
        );
        assert_eq!(
            handler.dispatch(Command::CloseTab { tab_id: ghost.clone() }).await,
            CommandOutcome::Success(false)
        );
        assert_eq!(
            handler.dispatch(Command::ReloadTab { tab_id: ghost }).await,
            CommandOutcome::Success(false)
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn load_and_navigate_route_to_registry() {
        let (handler, factory, _rx) = handler();
        let tab = TabId::from("tab-1");
        handler
            .dispatch(Command::CreateTab {
                tab_id: tab.clone(),
                url: None,
            })
            .await;
        let outcome = handler
            .dispatch(Command::LoadUrl {
                tab_id: tab.clone(),
                url: "https://b.test/".into(),
            })
            .await;
        assert_eq!(outcome, CommandOutcome::Success(true));
        assert_eq!(
            factory.view("tab-1").unwrap().requested_urls(),
            vec!["about:blank", "https://b.test/"]
        );

        let outcome = handler
            .dispatch(Command::NavigateHistory {
                tab_id: tab,
                direction: NavigationDirection::Back,
            })
            .await;
        assert_eq!(outcome, CommandOutcome::Success(false));
    }
}
