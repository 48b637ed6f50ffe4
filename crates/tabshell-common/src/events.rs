//! Domain events sent from the tab core to the UI layer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::id::TabId;

/// Point-in-time read of a tab's navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub url: String,
    pub title: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// A normalized, tab-scoped notification.
///
/// Wire form is `{"kind": "url-updated", "tabId": "...", "url": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum TabEvent {
    UrlUpdated {
        tab_id: TabId,
        url: String,
    },
    TitleUpdated {
        tab_id: TabId,
        title: String,
    },
    NavigationStateChanged {
        tab_id: TabId,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TabCreated {
        tab_id: TabId,
        #[serde(flatten)]
        snapshot: TabSnapshot,
    },
    TabSwitched {
        tab_id: TabId,
        #[serde(flatten)]
        snapshot: TabSnapshot,
    },
    TabClosed {
        tab_id: TabId,
    },
    LoadFailed {
        tab_id: TabId,
        url: String,
        reason: String,
    },
}

impl TabEvent {
    pub fn tab_id(&self) -> &TabId {
        match self {
            Self::UrlUpdated { tab_id, .. }
            | Self::TitleUpdated { tab_id, .. }
            | Self::NavigationStateChanged { tab_id, .. }
            | Self::TabCreated { tab_id, .. }
            | Self::TabSwitched { tab_id, .. }
            | Self::TabClosed { tab_id }
            | Self::LoadFailed { tab_id, .. } => tab_id,
        }
    }

    /// The wire name of this event (`"url-updated"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UrlUpdated { .. } => "url-updated",
            Self::TitleUpdated { .. } => "title-updated",
            Self::NavigationStateChanged { .. } => "navigation-state-changed",
            Self::TabCreated { .. } => "tab-created",
            Self::TabSwitched { .. } => "tab-switched",
            Self::TabClosed { .. } => "tab-closed",
            Self::LoadFailed { .. } => "load-failed",
        }
    }
}

/// Ordered, lossless event channel from the core to its consumer.
///
/// Events are delivered in emission order; nothing is coalesced or dropped
/// while the receiver is alive.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: mpsc::UnboundedSender<TabEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TabEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Returns `false` when the consumer has gone away.
    pub fn emit(&self, event: TabEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                tracing::debug!(kind = event.kind(), tab_id = %event.tab_id(), "event dropped: no receiver");
                false
            }
        }
    }
}
