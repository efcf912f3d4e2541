//! Value synchronized with a key/value backend.
//!
//! The backend seam covers both namespaces: a transient per-run store
//! (`MemoryStore` here) and a durable one (`FileStore` in
//! `rewire-platform`). Stored text is JSON; malformed text is treated as
//! absent and never surfaced as an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rewire_core::{Signal, signal};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key/value text storage.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, text: &str);
}

/// Transient backend, scoped to this run.
#[derive(Default)]
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, text: &str) {
        self.map.borrow_mut().insert(key.to_owned(), text.to_owned());
    }
}

/// In-memory value kept converged with its backend entry.
///
/// Seeded from the backend on creation (absent or malformed text falls back
/// to the caller's default); every mutation writes the serialized value back
/// before returning. Backend consumers of the same key observe the write.
pub struct StoredValue<T: Serialize + DeserializeOwned + Clone + 'static> {
    key: String,
    backend: Rc<dyn StorageBackend>,
    value: Signal<T>,
}

impl<T: Serialize + DeserializeOwned + Clone + 'static> StoredValue<T> {
    pub fn new(backend: Rc<dyn StorageBackend>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let seed = match backend.read(&key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(err) => {
                    log::warn!("stored value {key:?} is malformed ({err}); using default");
                    default
                }
            },
            None => default,
        };
        let stored = Self {
            key,
            backend,
            value: signal(seed),
        };
        // Seed the backend too, so a first read-after-create round-trips.
        stored.persist();
        stored
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn set(&self, v: T) {
        self.value.set(v);
        self.persist();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.value.update(f);
        self.persist();
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn signal(&self) -> &Signal<T> {
        &self.value
    }

    fn persist(&self) {
        self.value.with(|v| match serde_json::to_string(v) {
            Ok(raw) => self.backend.write(&self.key, &raw),
            Err(err) => log::warn!("could not serialize stored value {:?}: {err}", self.key),
        });
    }
}

pub fn use_stored<T: Serialize + DeserializeOwned + Clone + 'static>(
    backend: Rc<dyn StorageBackend>,
    key: impl Into<String>,
    default: T,
) -> StoredValue<T> {
    StoredValue::new(backend, key, default)
}
