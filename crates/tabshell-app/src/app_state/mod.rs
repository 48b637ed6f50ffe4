//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns config, window geometry, the tab core, the UI-side
//! reducer and the chrome surfaces; nothing lives in globals.

mod chrome;
mod core;
mod dispatch;
mod event_handler;
mod init;
mod polling;
mod shutdown;
mod types;

pub use core::ShellApp;
