//! Window creation, chrome surfaces and tab core setup.

use std::rc::Rc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use tabshell_common::{ContentViewFactory, EventSink, Size, TabId};
use tabshell_layout::ContentGeometry;
use tabshell_tabs::{Command, CommandHandler, RegistryOptions, TabRegistry};
use tabshell_webview::{ChromeSource, ChromeSurface, SurfaceKind, WryViewFactory};

use super::core::ShellApp;

// =============================================================================
// CONSTANTS
// =============================================================================

const HEADER_HTML: &str = include_str!("../../assets/header.html");
const SIDEBAR_HTML: &str = include_str!("../../assets/sidebar.html");

// =============================================================================
// INITIALIZATION
// =============================================================================

impl ShellApp {
    /// Create the window, the chrome surfaces and the tab core.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.initial_width,
                self.config.window.initial_height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };
        let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
        self.viewport.resize(Size::new(logical.width, logical.height));

        let devtools = self.config.ui.devtools;
        let dev_server = self.config.ui.dev_server_url.as_deref();
        let header = ChromeSurface::create(
            window.as_ref(),
            SurfaceKind::Header,
            &chrome_source(dev_server, "header.html", HEADER_HTML),
            self.viewport.header_bounds(),
            true,
            devtools,
        );
        let header = match header {
            Ok(surface) => surface,
            Err(e) => {
                tracing::error!("Failed to create header: {e}");
                return false;
            }
        };
        let sidebar_bounds = self
            .viewport
            .layout()
            .sidebar_bounds(self.viewport.size());
        match ChromeSurface::create(
            window.as_ref(),
            SurfaceKind::Sidebar,
            &chrome_source(dev_server, "sidebar.html", SIDEBAR_HTML),
            sidebar_bounds,
            self.viewport.sidebar_visible(),
            devtools,
        ) {
            Ok(surface) => self.sidebar = Some(surface),
            // The shell works without a sidebar; the toggle becomes a no-op.
            Err(e) => tracing::warn!("Sidebar unavailable: {e}"),
        }
        self.header = Some(header);

        let factory = WryViewFactory::new(Rc::clone(&window));
        self.window = Some(window);
        self.attach_tabs(Rc::new(factory));

        tracing::info!("Window created and chrome initialized");
        true
    }

    /// Build the tab core on top of `factory` and open the initial tab.
    pub(super) fn attach_tabs(&mut self, factory: Rc<dyn ContentViewFactory>) {
        let (sink, events) = EventSink::channel();
        let options = RegistryOptions {
            default_url: self.config.tabs.default_url.clone(),
            default_title: self.config.tabs.default_title.clone(),
            view_config: self.config.content_view_config(),
        };
        let geometry: Rc<dyn ContentGeometry> = self.viewport.clone();
        let registry = TabRegistry::new(factory, geometry, sink, options);

        self.commands = Some(CommandHandler::new(Rc::new(registry)));
        self.events = Some(events);
        self.submit(vec![Command::CreateTab {
            tab_id: TabId::new(self.config.tabs.initial_tab_id.clone()),
            url: None,
        }]);
        tracing::info!("Tab core initialized");
    }
}

/// Bundled page, or `<dev server>/<page>` while developing the UI.
fn chrome_source(dev_server: Option<&str>, page: &str, bundled: &str) -> ChromeSource {
    match dev_server {
        Some(url) => ChromeSource::DevServer(format!("{}/{page}", url.trim_end_matches('/'))),
        None => ChromeSource::Html(bundled.to_string()),
    }
}
