//! Observable key-value stores.
//!
//! A [`Store`] holds a JSON mapping, emits `change` events with before and
//! after snapshots, and relays its data one way to the stores connected to it.

mod config;
mod id;
mod store;
mod update;

pub use config::{DefaultPolicy, ShapePolicy, StoreConfig};
pub use id::StoreId;
pub use store::Store;
pub use update::{Keys, Update};
