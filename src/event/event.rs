use crate::error::StoreError;
use crate::store::Store;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Names of the events a store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Data changed, or a re-broadcast of current data was forced.
    Change,
    /// Another store was connected as a broadcast target.
    ConnectStore,
}

impl EventKind {
    /// The wire name of this event.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Change => "change",
            EventKind::ConnectStore => "connect_store",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(EventKind::Change),
            "connect_store" => Ok(EventKind::ConnectStore),
            other => Err(StoreError::UnknownEvent(other.to_owned())),
        }
    }
}

/// Payload of a `change` event: full snapshots taken before and after the update.
///
/// Both maps are owned copies; listeners may keep or mutate them freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub old_data: Map<String, Value>,
    pub new_data: Map<String, Value>,
}

impl ChangeEvent {
    /// Top-level keys whose values differ between the two snapshots.
    pub fn changed_keys(&self) -> Vec<&str> {
        let added_or_updated = self
            .new_data
            .iter()
            .filter(|(key, value)| self.old_data.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.as_str());
        let removed = self
            .old_data
            .keys()
            .filter(|key| !self.new_data.contains_key(key.as_str()))
            .map(String::as_str);

        added_or_updated.chain(removed).collect()
    }
}

/// An event emitted by a store.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Change(ChangeEvent),
    ConnectStore {
        /// Key the connected store was registered under.
        key: String,
        store: Store,
    },
}

impl StoreEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::Change(_) => EventKind::Change,
            StoreEvent::ConnectStore { .. } => EventKind::ConnectStore,
        }
    }
}
