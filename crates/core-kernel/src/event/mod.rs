pub mod dispatcher;
pub mod error;
pub mod types;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Type for listener identifiers
pub type ListenerId = u64;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was processed successfully and propagation should continue
    Continue,
    /// Event was processed and propagation should stop
    Stop,
}

/// Asynchronous event handler trait.
///
/// Returning `Err` aborts the dispatch. During bootstrap that aborts the
/// pipeline before the announced step runs.
#[async_trait]
pub trait AsyncEventHandler: Send + Sync {
    async fn handle(&self, event: &KernelEvent) -> Result<EventResult>;
}

// This type represents an owned future that returns a handler outcome
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = Result<EventResult>> + Send + 'a>>;

struct FnHandler<F> {
    handler: F,
}

#[async_trait]
impl<F> AsyncEventHandler for FnHandler<F>
where
    F: for<'a> Fn(&'a KernelEvent) -> BoxFuture<'a> + Send + Sync,
{
    async fn handle(&self, event: &KernelEvent) -> Result<EventResult> {
        (self.handler)(event).await
    }
}

struct SyncHandler<F> {
    handler: F,
}

#[async_trait]
impl<F> AsyncEventHandler for SyncHandler<F>
where
    F: Fn(&KernelEvent) -> Result<EventResult> + Send + Sync,
{
    async fn handle(&self, event: &KernelEvent) -> Result<EventResult> {
        (self.handler)(event)
    }
}

/// Wrap an async closure returning a boxed future as a handler
pub fn async_event_handler<F>(handler: F) -> Box<dyn AsyncEventHandler>
where
    F: for<'a> Fn(&'a KernelEvent) -> BoxFuture<'a> + Send + Sync + 'static,
{
    Box::new(FnHandler { handler })
}

/// Wrap a synchronous closure as a handler
pub fn sync_event_handler<F>(handler: F) -> Box<dyn AsyncEventHandler>
where
    F: Fn(&KernelEvent) -> Result<EventResult> + Send + Sync + 'static,
{
    Box::new(SyncHandler { handler })
}

/// Re-export important types
pub use dispatcher::{EventDispatcher, SharedEventDispatcher, create_dispatcher};
pub use error::EventSystemError;
pub use types::{EventKind, KernelEvent};
