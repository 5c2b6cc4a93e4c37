use super::event::{EventKind, StoreEvent};
use crate::store::Store;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Priority given to listeners registered without an explicit one.
pub const DEFAULT_PRIORITY: i32 = 500;

/// Priority of the built-in relay that pushes changes to connected stores.
///
/// Runs after every listener registered at [`DEFAULT_PRIORITY`] or lower.
pub const RELAY_PRIORITY: i32 = 1000;

/// A listener callback. Receives the emitting store and the event.
pub type Handler = Arc<dyn Fn(&Store, &StoreEvent) + Send + Sync>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`EventEmitter::add_listener`], used to unsubscribe.
///
/// Ids are unique across all emitters, so an id from one store never
/// matches a listener of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst))
    }
}

struct Listener {
    id: ListenerId,
    kind: EventKind,
    priority: i32,
    handler: Handler,
}

/// Synchronous, priority-ordered event dispatcher.
///
/// Listeners are kept sorted by ascending priority; listeners sharing a
/// priority run in registration order.
#[derive(Default)]
pub struct EventEmitter {
    listeners: RwLock<Vec<Listener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn add_listener<F>(&self, kind: EventKind, priority: i32, handler: F) -> ListenerId
    where
        F: Fn(&Store, &StoreEvent) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        let mut listeners = self.listeners.write();
        let position = listeners.partition_point(|listener| listener.priority <= priority);
        listeners.insert(
            position,
            Listener {
                id,
                kind,
                priority,
                handler: Arc::new(handler),
            },
        );

        tracing::trace!(event = %kind, priority, listener = id.0, "listener added");
        id
    }

    /// Unsubscribe a listener. Returns `false` if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        before != listeners.len()
    }

    /// Number of listeners subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Run every listener for the event's kind, in priority order, and return how many ran.
    ///
    /// The listener list is snapshotted first, so handlers may subscribe,
    /// unsubscribe or emit again without deadlocking.
    pub fn emit(&self, store: &Store, event: &StoreEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .listeners
            .read()
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| Arc::clone(&listener.handler))
            .collect();

        tracing::trace!(event = %kind, listeners = handlers.len(), "emitting");
        for handler in &handlers {
            handler(store, event);
        }
        handlers.len()
    }
}
