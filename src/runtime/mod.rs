use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Where actors spawn their work and park their timers.
///
/// Every deferred action in the crate goes through `schedule_once`, so a test can swap in a
/// runtime that records what was scheduled, and the tokio clock can be paused to step time by hand.
pub trait Runtime {
    fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    fn schedule_once<A, F>(&self, after: Duration, action: F)
    where
        A: Send + 'static,
        F: Future<Output = anyhow::Result<A>> + Send + 'static;
}

#[derive(Clone)]
pub struct TokioRuntime {
    handle: Handle,
}

impl TokioRuntime {
    pub fn new(handle: Handle) -> TokioRuntime {
        TokioRuntime { handle }
    }

    /// Panics when called outside of a tokio runtime, same as `Handle::current`.
    pub fn current() -> TokioRuntime {
        TokioRuntime::new(Handle::current())
    }
}

impl Runtime for TokioRuntime {
    fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(task)
    }

    fn schedule_once<A, F>(&self, after: Duration, action: F)
    where
        A: Send + 'static,
        F: Future<Output = anyhow::Result<A>> + Send + 'static,
    {
        self.handle.spawn(async move {
            if !after.is_zero() {
                tokio::time::sleep(after).await;
            }
            if let Err(error) = action.await {
                tracing::debug!(?after, %error, "Scheduled action failed.");
            }
        });
    }
}
