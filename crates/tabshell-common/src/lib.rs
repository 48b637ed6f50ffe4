pub mod content;
pub mod errors;
pub mod events;
pub mod id;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use content::{
    ContentSignal, ContentView, ContentViewConfig, ContentViewFactory, ListenerId, LoadCompleter,
    LoadHandle, SignalHub, SignalListener,
};
pub use errors::{ConfigError, ContentViewError, ShellError, TabError};
pub use events::{EventSink, TabEvent, TabSnapshot};
pub use id::{new_id, TabId};
pub use types::{NavigationDirection, Rect, Size};

pub type Result<T> = std::result::Result<T, ShellError>;
