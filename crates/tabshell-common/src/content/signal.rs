use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Raw lifecycle signal reported by a content view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSignal {
    /// A top-level navigation began. The URL is not yet committed.
    NavigationStarted { url: String },
    /// A top-level navigation committed.
    NavigationCommitted { url: String },
    /// Same-document navigation (fragment or history API route change).
    InPageNavigation { url: String },
    /// The document title changed without a navigation.
    TitleChanged { title: String },
    /// The view gave up on a load.
    LoadFailed { url: String, reason: String },
}

/// Callback registered on a content view.
pub type SignalListener = Box<dyn Fn(&ContentSignal) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener list shared by [`ContentView`](super::ContentView) implementations.
///
/// Listeners are invoked in subscription order while the hub lock is held,
/// so a listener must not subscribe or unsubscribe from inside its callback.
pub struct SignalHub {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, SignalListener)>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: SignalListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push((id, listener)),
            Err(_) => warn!("signal hub poisoned; listener not registered"),
        }
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let Ok(mut listeners) = self.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver `signal` to every listener. Returns how many were called.
    pub fn emit(&self, signal: &ContentSignal) -> usize {
        let Ok(listeners) = self.listeners.lock() else {
            return 0;
        };
        for (_, listener) in listeners.iter() {
            listener(signal);
        }
        listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener (used when the owning view is disposed).
    pub fn clear(&self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.clear();
        }
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("listeners", &self.len())
            .finish()
    }
}
