use std::path::PathBuf;

use crate::id::TabId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by a content-view primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentViewError {
    #[error("load failed: {0}")]
    Load(String),

    #[error("load aborted before completion")]
    Aborted,

    #[error("content view already closed")]
    Closed,

    #[error("platform error: {0}")]
    Platform(String),
}

/// Per-tab failures. None of these are fatal to the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabError {
    #[error("tab id already in use: {0}")]
    DuplicateTabId(TabId),

    #[error("tab id belongs to a closed tab: {0}")]
    RetiredTabId(TabId),

    #[error("no such tab: {0}")]
    NotFound(TabId),

    #[error("failed to load {url} in {tab_id}: {reason}")]
    LoadFailure {
        tab_id: TabId,
        url: String,
        reason: String,
    },

    #[error(transparent)]
    ContentView(#[from] ContentViewError),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tab(#[from] TabError),

    #[error(transparent)]
    ContentView(#[from] ContentViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("window error: {0}")]
    Window(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("window.ui_height = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: window.ui_height = 0"
        );
    }

    #[test]
    fn tab_error_display() {
        let err = TabError::DuplicateTabId(TabId::from("t1"));
        assert_eq!(err.to_string(), "tab id already in use: t1");

        let err = TabError::NotFound(TabId::from("gone"));
        assert_eq!(err.to_string(), "no such tab: gone");

        let err = TabError::LoadFailure {
            tab_id: TabId::from("t1"),
            url: "https://x".into(),
            reason: "dns".into(),
        };
        assert_eq!(err.to_string(), "failed to load https://x in t1: dns");
    }

    #[test]
    fn tab_error_from_content_view() {
        let err: TabError = ContentViewError::Closed.into();
        assert!(matches!(err, TabError::ContentView(ContentViewError::Closed)));
        assert_eq!(err.to_string(), "content view already closed");
    }

    #[test]
    fn shell_error_from_variants() {
        let err: ShellError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, ShellError::Config(_)));
        assert!(err.to_string().contains("bad toml"));

        let err: ShellError = TabError::NotFound(TabId::from("x")).into();
        assert!(matches!(err, ShellError::Tab(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ShellError = io_err.into();
        assert!(matches!(err, ShellError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
