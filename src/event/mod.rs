//! Named events and the synchronous, priority-ordered dispatcher behind them.
//!
//! Every [`Store`](crate::Store) owns one [`EventEmitter`]. Listeners are
//! registered for an [`EventKind`] with a numeric priority and run in
//! ascending priority order, on the caller's stack, before `emit` returns.

mod emitter;
mod event;

pub use emitter::{EventEmitter, Handler, ListenerId, DEFAULT_PRIORITY, RELAY_PRIORITY};
pub use event::{ChangeEvent, EventKind, StoreEvent};
