use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::errors::ContentViewError;

type LoadResult = Result<(), ContentViewError>;

/// Outcome of a load started by [`ContentView::load_url`](super::ContentView::load_url).
///
/// The load itself is already in flight when the handle is returned;
/// awaiting the handle only observes its result. Dropping it does not
/// cancel anything.
#[derive(Debug)]
#[must_use = "a dropped LoadHandle discards the load outcome"]
pub struct LoadHandle {
    state: LoadState,
}

#[derive(Debug)]
enum LoadState {
    Ready(Option<LoadResult>),
    Pending(oneshot::Receiver<LoadResult>),
}

impl LoadHandle {
    /// A handle whose outcome is already known (synchronous primitives).
    pub fn ready(result: LoadResult) -> Self {
        Self {
            state: LoadState::Ready(Some(result)),
        }
    }

    /// A handle resolved later through the returned completer.
    pub fn pending() -> (Self, LoadCompleter) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                state: LoadState::Pending(rx),
            },
            LoadCompleter { tx },
        )
    }
}

impl Future for LoadHandle {
    type Output = LoadResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            LoadState::Ready(result) => {
                Poll::Ready(result.take().unwrap_or(Err(ContentViewError::Aborted)))
            }
            LoadState::Pending(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(ContentViewError::Aborted))),
        }
    }
}

/// Resolves a pending [`LoadHandle`]. Dropping it resolves the handle with
/// [`ContentViewError::Aborted`].
#[derive(Debug)]
pub struct LoadCompleter {
    tx: oneshot::Sender<LoadResult>,
}

impl LoadCompleter {
    pub fn succeed(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(self, error: ContentViewError) {
        let _ = self.tx.send(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_handle_resolves_immediately() {
        assert_eq!(LoadHandle::ready(Ok(())).await, Ok(()));
        assert_eq!(
            LoadHandle::ready(Err(ContentViewError::Load("dns".into()))).await,
            Err(ContentViewError::Load("dns".into()))
        );
    }

    #[tokio::test]
    async fn pending_handle_waits_for_completer() {
        let (handle, completer) = LoadHandle::pending();
        completer.succeed();
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn pending_handle_reports_failure() {
        let (handle, completer) = LoadHandle::pending();
        completer.fail(ContentViewError::Load("refused".into()));
        assert_eq!(handle.await, Err(ContentViewError::Load("refused".into())));
    }

    #[tokio::test]
    async fn dropped_completer_aborts() {
        let (handle, completer) = LoadHandle::pending();
        drop(completer);
        assert_eq!(handle.await, Err(ContentViewError::Aborted));
    }
}
