//! Per-tab navigation history.

use serde::{Deserialize, Serialize};
use tabshell_common::{NavigationDirection, TabSnapshot};

/// One committed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Ordered record of visited locations with a cursor.
///
/// Never empty: it is seeded with the tab's initial location, and
/// `current_index` always points at a valid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl NavigationHistory {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(url, title)],
            current: 0,
        }
    }

    /// Record a committed navigation.
    ///
    /// Forward entries past the cursor are discarded and the new entry
    /// becomes the last one. Committing the URL already under the cursor
    /// replaces that entry instead of stacking a duplicate.
    pub fn record(&mut self, url: impl Into<String>, title: impl Into<String>) {
        let entry = HistoryEntry::new(url, title);
        self.entries.truncate(self.current + 1);
        if self.entries[self.current].url == entry.url {
            self.entries[self.current] = entry;
        } else {
            self.entries.push(entry);
            self.current = self.entries.len() - 1;
        }
    }

    /// Patch the title of the current entry without moving the cursor.
    pub fn update_title(&mut self, title: impl Into<String>) {
        self.entries[self.current].title = title.into();
    }

    /// Step the cursor back. `None` (and no change) when `!can_go_back()`.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(NavigationDirection::Back)
    }

    /// Step the cursor forward. `None` (and no change) when `!can_go_forward()`.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(NavigationDirection::Forward)
    }

    pub fn go(&mut self, direction: NavigationDirection) -> Option<&HistoryEntry> {
        let (index, _) = self.peek(direction)?;
        self.current = index;
        Some(&self.entries[index])
    }

    /// The entry a traversal in `direction` would land on, without moving.
    pub fn peek(&self, direction: NavigationDirection) -> Option<(usize, &HistoryEntry)> {
        let index = match direction {
            NavigationDirection::Back if self.can_go_back() => self.current - 1,
            NavigationDirection::Forward if self.can_go_forward() => self.current + 1,
            _ => return None,
        };
        Some((index, &self.entries[index]))
    }

    /// Move the cursor to `index` if that entry still holds `url`.
    pub(crate) fn move_to(&mut self, index: usize, url: &str) -> bool {
        match self.entries.get(index) {
            Some(entry) if entry.url == url => {
                self.current = index;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn snapshot(&self) -> TabSnapshot {
        let current = self.current();
        TabSnapshot {
            url: current.url.clone(),
            title: current.title.clone(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        }
    }
}
