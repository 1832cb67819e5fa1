//! # Core Kernel Event System Errors
//!
//! Defines error types specific to event dispatch.
//!
//! A listener that fails aborts the dispatch; the failure is wrapped in
//! [`EventSystemError::ListenerFailed`] together with the event name so the
//! caller can tell which lifecycle event was refused.
use thiserror::Error;

use crate::event::ListenerId;
use crate::kernel::error::Error as KernelError;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Listener {listener} failed while handling '{event}': {source}")]
    ListenerFailed {
        event: String,
        listener: ListenerId,
        #[source]
        source: Box<KernelError>,
    },
}
