//! Graceful shutdown: close tabs, drop pending commands, destroy chrome.

use std::time::Duration;

use tokio::task::LocalSet;

use super::core::ShellApp;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl ShellApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Close every tab (listeners released, views destroyed)
    /// 2. Drop queued command futures and the tab core
    /// 3. Destroy chrome surfaces
    /// 4. Shut down the tokio runtime
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        // 1. Close tabs while the window and chrome still exist
        if let Some(commands) = &self.commands {
            let closed = commands.registry().close_all();
            tracing::debug!(closed, "tabs closed");
        }

        // 2. Pending futures hold registry handles; drop them with it
        self.local = LocalSet::new();
        self.commands = None;
        self.events = None;

        // 3. Destroy chrome surfaces
        self.header = None;
        self.sidebar = None;

        // 4. Shut down tokio runtime
        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        tracing::info!("Graceful shutdown complete");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use tabshell_common::testing::ScriptedViewFactory;
    use tabshell_config::ShellConfig;

    use crate::app_state::core::ShellApp;
    use crate::app_state::dispatch::ChromeIntent;

    #[test]
    fn shutdown_on_fresh_app_does_not_panic() {
        let mut app = ShellApp::new(ShellConfig::default()).unwrap();

        app.shutdown();

        assert!(app.commands.is_none());
        assert!(app.events.is_none());
        assert!(app.header.is_none());
        assert!(app.tokio_runtime.is_none());
    }

    #[test]
    fn shutdown_closes_every_tab_once() {
        let mut app = ShellApp::new(ShellConfig::default()).unwrap();
        let factory = Rc::new(ScriptedViewFactory::default());
        app.attach_tabs(factory.clone());
        app.pump();
        app.apply_intent(ChromeIntent::NewTab);
        app.pump();
        assert_eq!(factory.created_count(), 2);

        app.shutdown();
        app.shutdown();

        let first = factory.view("tab-1").unwrap();
        assert_eq!(first.close_calls(), 1);
        assert_eq!(first.listener_count(), 0);
        assert!(app.tokio_runtime.is_none());
    }

    #[test]
    fn shutdown_drops_queued_commands() {
        let mut app = ShellApp::new(ShellConfig::default()).unwrap();
        let factory = Rc::new(ScriptedViewFactory::default());
        app.attach_tabs(factory.clone());

        app.shutdown();

        // The initial create-tab never ran.
        assert_eq!(factory.created_count(), 0);
    }
}
