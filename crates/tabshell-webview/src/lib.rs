//! `wry` backends for the tab shell.
//!
//! - [`WryContentView`]: one isolated webview per tab, implementing
//!   [`tabshell_common::ContentView`].
//! - [`ChromeSurface`]: the privileged header and sidebar webviews that talk
//!   to the shell over IPC.

pub mod bounds;
pub mod chrome;
pub mod content_view;
pub mod events;
pub mod ipc;
pub mod navigation;

pub use bounds::to_wry_rect;
pub use chrome::{ChromeError, ChromeSource, ChromeSurface, SurfaceKind};
pub use content_view::{WryContentView, WryViewFactory};
pub use events::PageLoadState;
pub use ipc::{IpcMessage, IPC_INIT_SCRIPT};
