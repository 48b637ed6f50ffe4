use std::cell::Cell;

use tabshell_common::{Rect, Size};
use tracing::debug;

use crate::ChromeLayout;

/// Source of the rectangle the active content view should occupy.
///
/// The tab registry calls this whenever it attaches a view or is asked to
/// re-layout; it never decides geometry itself.
pub trait ContentGeometry {
    fn content_bounds(&self) -> Rect;
}

/// Live window geometry: the fixed layout plus the current window size and
/// sidebar visibility, updated from the event loop.
#[derive(Debug)]
pub struct ChromeViewport {
    layout: ChromeLayout,
    size: Cell<Size>,
    sidebar_visible: Cell<bool>,
}

impl ChromeViewport {
    pub fn new(layout: ChromeLayout, size: Size) -> Self {
        Self {
            layout,
            size: Cell::new(size),
            sidebar_visible: Cell::new(false),
        }
    }

    pub fn layout(&self) -> ChromeLayout {
        self.layout
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn resize(&self, size: Size) {
        self.size.set(size);
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible.get()
    }

    pub fn set_sidebar_visible(&self, visible: bool) {
        self.sidebar_visible.set(visible);
    }

    /// Flip sidebar visibility and return the new state.
    pub fn toggle_sidebar(&self) -> bool {
        let visible = !self.sidebar_visible.get();
        self.sidebar_visible.set(visible);
        debug!(visible, "sidebar toggled");
        visible
    }

    pub fn header_bounds(&self) -> Rect {
        self.layout.header_bounds(self.size.get())
    }

    /// Sidebar rectangle, or `None` while it is hidden.
    pub fn sidebar_bounds(&self) -> Option<Rect> {
        self.sidebar_visible
            .get()
            .then(|| self.layout.sidebar_bounds(self.size.get()))
    }
}

impl ContentGeometry for ChromeViewport {
    fn content_bounds(&self) -> Rect {
        self.layout
            .content_bounds(self.size.get(), self.sidebar_visible.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ChromeViewport {
        ChromeViewport::new(ChromeLayout::default(), Size::new(1200.0, 800.0))
    }

    #[test]
    fn starts_with_sidebar_hidden() {
        let vp = viewport();
        assert!(!vp.sidebar_visible());
        assert!(vp.sidebar_bounds().is_none());
        assert_eq!(vp.content_bounds().width, 1200.0);
    }

    #[test]
    fn toggle_changes_content_width() {
        let vp = viewport();
        assert!(vp.toggle_sidebar());
        assert_eq!(vp.content_bounds().width, 900.0);
        assert_eq!(vp.sidebar_bounds(), Some(Rect::new(900.0, 80.0, 300.0, 720.0)));
        assert!(!vp.toggle_sidebar());
        assert_eq!(vp.content_bounds().width, 1200.0);
    }

    #[test]
    fn resize_updates_all_regions() {
        let vp = viewport();
        vp.set_sidebar_visible(true);
        vp.resize(Size::new(1000.0, 600.0));
        assert_eq!(vp.header_bounds(), Rect::new(0.0, 0.0, 1000.0, 80.0));
        assert_eq!(vp.content_bounds(), Rect::new(0.0, 80.0, 700.0, 520.0));
        assert_eq!(vp.size(), Size::new(1000.0, 600.0));
    }
}
