//! Per-tick polling: chrome IPC, local command futures, view signals and
//! tab events.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use tabshell_common::TabEvent;

use super::core::ShellApp;
use super::types::POLL_INTERVAL;

impl ShellApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.pump();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// One full pass. Follow-up commands produced while reducing events are
    /// queued and run on the next pass.
    pub(super) fn pump(&mut self) {
        self.poll_chrome_messages();
        self.run_local_tasks();
        if let Some(commands) = &self.commands {
            commands.registry().pump_signals();
        }
        self.poll_tab_events();
        self.push_tab_state();
    }

    fn poll_chrome_messages(&mut self) {
        let mut messages = Vec::new();
        for surface in [&self.header, &self.sidebar].into_iter().flatten() {
            let kind = surface.kind();
            messages.extend(surface.drain_messages().into_iter().map(|m| (kind, m)));
        }
        for (kind, msg) in messages {
            self.handle_ipc_message(kind, msg);
        }
    }

    /// Give spawned command futures one turn of the local executor.
    fn run_local_tasks(&self) {
        if let Some(rt) = &self.tokio_runtime {
            rt.block_on(self.local.run_until(tokio::task::yield_now()));
        }
    }

    fn poll_tab_events(&mut self) {
        let Some(rx) = self.events.as_mut() else {
            return;
        };
        let mut events: Vec<TabEvent> = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        if events.is_empty() {
            return;
        }

        let mut follow_ups = Vec::new();
        for event in &events {
            tracing::debug!(kind = event.kind(), tab_id = %event.tab_id(), "tab event");
            follow_ups.extend(self.ui.reduce(event));
        }
        self.chrome_dirty = true;
        self.submit(follow_ups);
    }
}
