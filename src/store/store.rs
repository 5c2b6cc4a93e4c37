use super::config::{DefaultPolicy, StoreConfig};
use super::id::StoreId;
use super::update::{Keys, Update};
use crate::error::{Result, StoreError};
use crate::event::{ChangeEvent, EventEmitter, EventKind, ListenerId, StoreEvent, DEFAULT_PRIORITY};
use crate::path::omit;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

type Gate = Arc<dyn Fn(&Map<String, Value>) -> bool + Send + Sync>;

struct StoreInner {
    id: StoreId,
    name: RwLock<String>,
    data: RwLock<Map<String, Value>>,
    // Keyed by the target's store key at connection time, in connection order.
    stores: RwLock<Vec<(String, Weak<StoreInner>)>>,
    gate: RwLock<Option<Gate>>,
    emitter: EventEmitter,
    config: StoreConfig,
}

/// An observable key-value store.
///
/// `Store` is a cheap handle; clones share the same data, listeners and
/// connections. Values cross the API boundary by copy: reads return owned
/// snapshots and writes take ownership, so callers never alias internal state.
///
/// Every change is emitted synchronously as a `change` event. A built-in
/// listener at [`RELAY_PRIORITY`](crate::event::RELAY_PRIORITY) then pushes
/// this store's full data to each connected store, nested under this store's
/// [`store_key`](Store::store_key).
///
/// The connection graph must be acyclic. Connecting stores in a cycle makes
/// each change re-trigger itself until the stack is exhausted.
///
/// # Examples
///
/// ```
/// use conduit::Store;
/// use serde_json::json;
///
/// let a = Store::new();
/// let b = Store::new();
/// a.connect(&b);
///
/// a.change(("user.name", "Al"));
/// assert_eq!(b.get(&a.store_key())["user"]["name"], json!("Al"));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(Map::new(), StoreConfig::default())
    }

    /// Create a store from any initial value. Only objects are kept; anything else starts empty.
    pub fn with_data(init: impl Into<Value>) -> Self {
        match init.into() {
            Value::Object(data) => Self::from_map(data),
            other => {
                tracing::debug!(initial = %other, "ignoring non-object initial data");
                Self::new()
            }
        }
    }

    /// Create a store owning `data`, with default configuration.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self::with_config(data, StoreConfig::default())
    }

    /// Create a store owning `data`, named and tuned by `config`.
    pub fn with_config(data: Map<String, Value>, config: StoreConfig) -> Self {
        let store = Self {
            inner: Arc::new(StoreInner {
                id: StoreId::next(),
                name: RwLock::new(config.name.clone()),
                data: RwLock::new(data),
                stores: RwLock::new(Vec::new()),
                gate: RwLock::new(None),
                emitter: EventEmitter::new(),
                config,
            }),
        };

        // The relay reaches the store through the handler argument, so the
        // emitter never holds a strong reference back to its own store.
        store.inner.emitter.add_listener(
            EventKind::Change,
            store.inner.config.relay_priority,
            |store, _| store.push_change_to_connected(),
        );

        tracing::debug!(store = %store.inner.id, name = %store.inner.config.name, "store created");
        store
    }

    /// The fallback identity used as the store key when the name is empty.
    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    /// The current name, empty by default.
    pub fn name(&self) -> String {
        self.inner.name.read().clone()
    }

    /// Rename the store. Connections made earlier keep the key they were registered under.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.inner.name.write() = name.into();
    }

    /// The configuration the store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// The store's name if non-empty, otherwise its id.
    pub fn store_key(&self) -> String {
        let name = self.inner.name.read();
        if name.is_empty() {
            self.inner.id.to_string()
        } else {
            name.clone()
        }
    }

    /// Whether a `change` should emit an event. Always `true` unless overridden.
    ///
    /// Evaluated once per [`change`](Store::change), after the update is applied.
    /// The gate runs on a snapshot with no lock held, so it may use the store.
    pub fn should_change(&self) -> bool {
        let gate = self.inner.gate.read().clone();
        match gate {
            Some(gate) => gate(&self.get_data()),
            None => true,
        }
    }

    /// Override [`should_change`](Store::should_change) for this store.
    ///
    /// The predicate sees the store's current data only.
    pub fn set_should_change<F>(&self, gate: F)
    where
        F: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    {
        *self.inner.gate.write() = Some(Arc::new(gate));
    }

    /// Restore the always-true gate.
    pub fn clear_should_change(&self) {
        *self.inner.gate.write() = None;
    }

    /// Apply an update without emitting anything.
    pub fn change_silent(&self, update: impl Into<Update>) {
        let update = update.into();
        tracing::trace!(store = %self.inner.id, ?update, "applying update");
        update.apply(&mut self.inner.data.write());
    }

    /// Apply an update, then emit `change` if the gate allows it.
    ///
    /// A rejected gate leaves the update in place and only suppresses the
    /// event. Returns whether the event was emitted.
    pub fn change(&self, update: impl Into<Update>) -> bool {
        let old_data = self.get_data();
        self.change_silent(update);

        if !self.should_change() {
            tracing::debug!(store = %self.inner.id, "change gate rejected update, event suppressed");
            return false;
        }

        self.emit_event(StoreEvent::Change(ChangeEvent {
            old_data,
            new_data: self.get_data(),
        }));
        true
    }

    /// [`change_silent`](Store::change_silent) for dynamically-shaped arguments.
    ///
    /// `name` is validated per the store's [`ShapePolicy`](crate::ShapePolicy);
    /// on error nothing is mutated.
    pub fn change_silent_value(&self, name: Value, value: Value) -> Result<()> {
        let update = Update::parse(name, value, self.inner.config.update_shape)?;
        self.change_silent(update);
        Ok(())
    }

    /// [`change`](Store::change) for dynamically-shaped arguments.
    pub fn change_value(&self, name: Value, value: Value) -> Result<bool> {
        let update = Update::parse(name, value, self.inner.config.update_shape)?;
        Ok(self.change(update))
    }

    /// Emit `change` with the current data as both snapshots, bypassing the gate.
    pub fn trigger_change(&self) {
        let data = self.get_data();
        self.emit_event(StoreEvent::Change(ChangeEvent {
            old_data: data.clone(),
            new_data: data,
        }));
    }

    /// A copy of all data.
    pub fn get_data(&self) -> Map<String, Value> {
        self.inner.data.read().clone()
    }

    /// A copy of the value under top-level `key`, or `null` if absent.
    pub fn get(&self, key: &str) -> Value {
        self.lookup(key).unwrap_or(Value::Null)
    }

    /// A copy of the value under top-level `key`, or `default` if absent.
    ///
    /// Under [`DefaultPolicy::FalsyAsNull`] a falsy default is returned as `null`.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        match self.lookup(key) {
            Some(value) => value,
            None => match self.inner.config.default_value {
                DefaultPolicy::Exact => default,
                DefaultPolicy::FalsyAsNull if is_falsy(&default) => Value::Null,
                DefaultPolicy::FalsyAsNull => default,
            },
        }
    }

    /// Whether `key` is present at the top level, whatever its value.
    pub fn has_data(&self, key: &str) -> bool {
        self.inner.data.read().contains_key(key)
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.inner.data.read().get(key).cloned()
    }

    /// Remove top-level keys, then emit `change` regardless of the gate.
    pub fn remove(&self, keys: impl Into<Keys>) {
        let keys = keys.into();
        {
            let mut data = self.inner.data.write();
            let current = std::mem::take(&mut *data);
            *data = omit(current, keys.as_slice());
        }

        tracing::debug!(store = %self.inner.id, keys = ?keys.as_slice(), "removed keys");
        self.trigger_change();
    }

    /// Replace all data (or clear it), then emit `change` regardless of the gate.
    pub fn reset(&self, data: Option<Map<String, Value>>) {
        *self.inner.data.write() = data.unwrap_or_default();

        tracing::debug!(store = %self.inner.id, "store reset");
        self.trigger_change();
    }

    /// Register `store` as a target for this store's changes.
    ///
    /// The target is registered under its current [`store_key`](Store::store_key)
    /// and held weakly. Returns `false` without side effects if a live store is
    /// already registered under that key; otherwise emits `connect_store` and
    /// returns `true`. Connections are one-way.
    pub fn connect(&self, store: &Store) -> bool {
        let key = store.store_key();
        {
            let mut stores = self.inner.stores.write();
            stores.retain(|(_, target)| target.strong_count() > 0);
            if stores.iter().any(|(existing, _)| *existing == key) {
                tracing::debug!(store = %self.inner.id, %key, "store key already connected");
                return false;
            }
            stores.push((key.clone(), Arc::downgrade(&store.inner)));
        }

        tracing::debug!(store = %self.inner.id, %key, "connected store");
        self.emit_event(StoreEvent::ConnectStore {
            key,
            store: store.clone(),
        });
        true
    }

    /// [`connect`](Store::connect) for a type-erased target.
    ///
    /// Fails with [`StoreError::InvalidTarget`] if `target` is not a `Store`.
    pub fn connect_any(&self, target: &dyn Any) -> Result<bool> {
        match target.downcast_ref::<Store>() {
            Some(store) => Ok(self.connect(store)),
            None => Err(StoreError::InvalidTarget),
        }
    }

    /// Keys of live connected stores, in connection order.
    pub fn connected_keys(&self) -> Vec<String> {
        self.inner
            .stores
            .read()
            .iter()
            .filter(|(_, target)| target.strong_count() > 0)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Whether a live store is connected under `key`.
    pub fn is_connected(&self, key: &str) -> bool {
        self.inner
            .stores
            .read()
            .iter()
            .any(|(existing, target)| existing == key && target.strong_count() > 0)
    }

    /// Subscribe to events of `kind` at the given priority. Lower priorities run first.
    pub fn add_listener<F>(&self, kind: EventKind, priority: i32, handler: F) -> ListenerId
    where
        F: Fn(&Store, &StoreEvent) + Send + Sync + 'static,
    {
        self.inner.emitter.add_listener(kind, priority, handler)
    }

    /// Subscribe to `change` events at [`DEFAULT_PRIORITY`].
    pub fn on_change<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&Store, &ChangeEvent) + Send + Sync + 'static,
    {
        self.add_listener(EventKind::Change, DEFAULT_PRIORITY, move |store, event| {
            if let StoreEvent::Change(change) = event {
                handler(store, change);
            }
        })
    }

    /// Subscribe to `connect_store` events at [`DEFAULT_PRIORITY`].
    pub fn on_connect_store<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&Store, &str, &Store) + Send + Sync + 'static,
    {
        self.add_listener(EventKind::ConnectStore, DEFAULT_PRIORITY, move |store, event| {
            if let StoreEvent::ConnectStore { key, store: connected } = event {
                handler(store, key.as_str(), connected);
            }
        })
    }

    /// Unsubscribe a listener of this store. Returns `false` if it is not registered here.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.emitter.remove_listener(id)
    }

    /// Number of listeners for `kind`, including the built-in relay.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.emitter.listener_count(kind)
    }

    /// Run this store's listeners for `event` synchronously.
    pub fn emit_event(&self, event: StoreEvent) {
        self.inner.emitter.emit(self, &event);
    }

    /// Whether both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn push_change_to_connected(&self) {
        let targets: Vec<Store> = {
            let mut stores = self.inner.stores.write();
            stores.retain(|(key, target)| {
                let alive = target.strong_count() > 0;
                if !alive {
                    tracing::warn!(store = %self.inner.id, %key, "dropping connection to released store");
                }
                alive
            });
            stores
                .iter()
                .filter_map(|(_, target)| target.upgrade())
                .map(|inner| Store { inner })
                .collect()
        };

        if targets.is_empty() {
            return;
        }

        let key = self.store_key();
        let data = Value::Object(self.get_data());
        for target in targets {
            tracing::trace!(from = %self.inner.id, to = %target.inner.id, %key, "relaying change");
            target.change((key.clone(), data.clone()));
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Store {}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("name", &*self.inner.name.read())
            .field("keys", &self.inner.data.read().len())
            .field("connected", &self.inner.stores.read().len())
            .finish()
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
