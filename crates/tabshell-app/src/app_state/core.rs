//! ShellApp struct definition and constructor.

use std::rc::Rc;
use std::time::Instant;

use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::LocalSet;
use winit::window::Window;

use tabshell_common::{ShellError, Size, TabEvent, TabId};
use tabshell_config::ShellConfig;
use tabshell_layout::{ChromeLayout, ChromeViewport};
use tabshell_tabs::{CommandHandler, TabView, UiSync};
use tabshell_webview::ChromeSurface;

/// Top-level application state.
pub struct ShellApp {
    pub(super) config: ShellConfig,

    // Windowing
    pub(super) window: Option<Rc<Window>>,
    pub(super) viewport: Rc<ChromeViewport>,

    // Tab core; present once the window exists
    pub(super) commands: Option<CommandHandler>,
    pub(super) events: Option<UnboundedReceiver<TabEvent>>,

    // Renderer-side mirror of the tab list
    pub(super) ui: UiSync,

    // Chrome surfaces
    pub(super) header: Option<ChromeSurface>,
    pub(super) sidebar: Option<ChromeSurface>,

    // Single-threaded executor for command futures
    pub(super) tokio_runtime: Option<Runtime>,
    pub(super) local: LocalSet,

    // Whether the app should exit
    pub(super) should_exit: bool,

    // Set when the tab list changed and the header needs a fresh copy
    pub(super) chrome_dirty: bool,
    pub(super) last_poll: Instant,
}

impl ShellApp {
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        let window = &config.window;
        let viewport = ChromeViewport::new(
            ChromeLayout::new(f64::from(window.ui_height), f64::from(window.sidebar_width)),
            Size::new(
                f64::from(window.initial_width),
                f64::from(window.initial_height),
            ),
        );
        let ui = UiSync::new(
            TabView::new(
                TabId::new(config.tabs.initial_tab_id.clone()),
                config.tabs.default_url.clone(),
                config.tabs.default_title.clone(),
            ),
            config.tabs.default_url.clone(),
        );
        let tokio_runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            config,
            window: None,
            viewport: Rc::new(viewport),
            commands: None,
            events: None,
            ui,
            header: None,
            sidebar: None,
            tokio_runtime: Some(tokio_runtime),
            local: LocalSet::new(),
            should_exit: false,
            chrome_dirty: true,
            last_poll: Instant::now(),
        })
    }
}
