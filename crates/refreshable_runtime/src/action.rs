//! Injected refresh capability

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a refresh action
pub type RefreshFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Asynchronous refresh action supplied by the application
///
/// Cheap to clone; the controller clones it into every refresh task so the
/// application can swap actions while a refresh is still running. Errors
/// returned by the action are logged and otherwise treated as completion.
#[derive(Clone)]
pub struct RefreshAction {
    run: Arc<dyn Fn() -> RefreshFuture + Send + Sync>,
}

impl RefreshAction {
    /// Wrap a fallible async closure
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            run: Arc::new(move || Box::pin(action()) as RefreshFuture),
        }
    }

    /// Wrap an async closure that cannot fail
    pub fn infallible<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(move || {
            let refresh = action();
            async move {
                refresh.await;
                Ok(())
            }
        })
    }

    /// Start one run of the action
    pub fn call(&self) -> RefreshFuture {
        (self.run)()
    }
}

impl fmt::Debug for RefreshAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshAction").finish_non_exhaustive()
    }
}
