use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex; // Use tokio's Mutex

use crate::event::error::EventSystemError;
use crate::event::{AsyncEventHandler, EventKind, EventResult, KernelEvent, ListenerId};
use crate::kernel::error::Result;

#[derive(Clone)]
struct Listener {
    id: ListenerId,
    handler: Arc<dyn AsyncEventHandler>,
    once: bool,
}

//--------------------------------------------------
// EventDispatcher (Internal, wrapped by SharedEventDispatcher)
//--------------------------------------------------

/// Listener table (Internal Implementation)
pub struct EventDispatcher {
    listeners: HashMap<EventKind, Vec<Listener>>,
    wildcard: Vec<Listener>,
    next_listener_id: ListenerId,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_listener_count: usize = self.listeners.values().map(|v| v.len()).sum();
        f.debug_struct("EventDispatcher")
            .field("kind_listeners_count", &kind_listener_count)
            .field("wildcard_listeners_count", &self.wildcard.len())
            .field("next_listener_id", &self.next_listener_id)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            wildcard: Vec::new(),
            next_listener_id: 1,
        }
    }

    fn next_id(&mut self) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        id
    }

    pub fn listen(&mut self, kind: EventKind, handler: Box<dyn AsyncEventHandler>, once: bool) -> ListenerId {
        let id = self.next_id();
        self.listeners.entry(kind).or_default().push(Listener {
            id,
            handler: Arc::from(handler),
            once,
        });
        id
    }

    pub fn listen_any(&mut self, handler: Box<dyn AsyncEventHandler>) -> ListenerId {
        let id = self.next_id();
        self.wildcard.push(Listener {
            id,
            handler: Arc::from(handler),
            once: false,
        });
        id
    }

    pub fn forget(&mut self, id: ListenerId) -> bool {
        let mut found = false;
        self.listeners.values_mut().for_each(|listeners| {
            let len_before = listeners.len();
            listeners.retain(|listener| listener.id != id);
            if listeners.len() < len_before {
                found = true;
            }
        });
        let len_before = self.wildcard.len();
        self.wildcard.retain(|listener| listener.id != id);
        found || self.wildcard.len() < len_before
    }

    /// Remove every listener registered for `kind`. Returns how many were removed.
    pub fn flush(&mut self, kind: EventKind) -> usize {
        self.listeners.remove(&kind).map_or(0, |listeners| listeners.len())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, |listeners| listeners.len())
    }

    /// Listeners that should see an event of `kind`, kind listeners first.
    /// One-shot listeners are removed from the table as they are taken.
    fn take_listeners_for(&mut self, kind: EventKind) -> Vec<Listener> {
        let mut selected = Vec::new();
        if let Some(listeners) = self.listeners.get_mut(&kind) {
            selected.extend(listeners.iter().cloned());
            listeners.retain(|listener| !listener.once);
        }
        selected.extend(self.wildcard.iter().cloned());
        selected
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// SharedEventDispatcher (Public API)
//--------------------------------------------------

/// Thread-safe shared event dispatcher using Tokio Mutex.
///
/// Listeners run sequentially, in registration order, without the lock held,
/// so a listener may register or forget other listeners.
#[derive(Clone, Default)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<Mutex<EventDispatcher>>,
}

impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for every event of `kind`.
    pub async fn listen(&self, kind: EventKind, handler: Box<dyn AsyncEventHandler>) -> ListenerId {
        self.dispatcher.lock().await.listen(kind, handler, false)
    }

    /// Listen for the next event of `kind` only.
    pub async fn listen_once(&self, kind: EventKind, handler: Box<dyn AsyncEventHandler>) -> ListenerId {
        self.dispatcher.lock().await.listen(kind, handler, true)
    }

    /// Listen for every event, regardless of kind.
    pub async fn listen_any(&self, handler: Box<dyn AsyncEventHandler>) -> ListenerId {
        self.dispatcher.lock().await.listen_any(handler)
    }

    pub async fn forget(&self, id: ListenerId) -> bool {
        self.dispatcher.lock().await.forget(id)
    }

    pub async fn flush(&self, kind: EventKind) -> usize {
        self.dispatcher.lock().await.flush(kind)
    }

    pub async fn has_listeners(&self, kind: EventKind) -> bool {
        self.listener_count(kind).await > 0
    }

    pub async fn listener_count(&self, kind: EventKind) -> usize {
        self.dispatcher.lock().await.listener_count(kind)
    }

    /// Dispatch `event` to its listeners.
    ///
    /// Stops at the first listener returning [`EventResult::Stop`]. A listener
    /// error aborts the dispatch and is returned to the caller.
    pub async fn dispatch(&self, event: &KernelEvent) -> Result<EventResult> {
        let listeners = self.dispatcher.lock().await.take_listeners_for(event.kind());
        log::trace!("Dispatching '{}' to {} listener(s)", event, listeners.len());

        for listener in listeners {
            let outcome = listener.handler.handle(event).await.map_err(|source| {
                EventSystemError::ListenerFailed {
                    event: event.name(),
                    listener: listener.id,
                    source: Box::new(source),
                }
            })?;
            if outcome == EventResult::Stop {
                return Ok(EventResult::Stop);
            }
        }
        Ok(EventResult::Continue)
    }
}

/// Create a new shared event dispatcher
pub fn create_dispatcher() -> SharedEventDispatcher {
    SharedEventDispatcher::new()
}
