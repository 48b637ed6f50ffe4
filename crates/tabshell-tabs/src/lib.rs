//! Headless tab core: per-tab navigation history, the tab registry, the
//! signal bridge from content views, the command surface and the UI-side
//! reducer that mirrors registry state.

pub mod bridge;
pub mod commands;
pub mod history;
pub mod registry;
pub mod sync;
mod tab;

pub use bridge::{EventBridge, SignalKind, TabSubscriptions};
pub use commands::{Command, CommandHandler, CommandOutcome};
pub use history::{HistoryEntry, NavigationHistory};
pub use registry::{RegistryOptions, TabRegistry};
pub use sync::{normalize_url_input, TabListState, TabView, UiSync};
pub use tab::TabPhase;
