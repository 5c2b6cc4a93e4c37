//! # Conduit
//!
//! Observable in-memory key-value stores with one-way change propagation.
//!
//! A [`Store`] holds a mapping of string keys to JSON values. Mutations go
//! through three entry points:
//! - [`Store::change_silent`] applies a path-set update without notifying
//! - [`Store::change`] applies the update, then emits a `change` event
//!   carrying full before/after snapshots if [`Store::should_change`] allows
//! - [`Store::trigger_change`] re-broadcasts current data without mutating it
//!
//! Listeners run synchronously in ascending priority order. Each store
//! registers one built-in listener at the lowest priority that relays its
//! whole dataset to every connected store, nested under its own
//! [`store_key`](Store::store_key). Connections are directed and the graph
//! must stay acyclic.

pub mod error;
pub mod event;
pub mod path;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use event::{ChangeEvent, EventKind, ListenerId, StoreEvent};
pub use store::{DefaultPolicy, Keys, ShapePolicy, Store, StoreConfig, StoreId, Update};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::with_data(serde_json::json!({ "count": 0 }));
        assert_eq!(store.get("count"), 0);
        store.change(("count", 42));
        assert_eq!(store.get("count"), 42);
    }
}
