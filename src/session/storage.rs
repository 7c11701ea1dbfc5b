//! Key/value storage backends for session persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser build persists through `localStorage` so sessions survive
//! reloads and are shared across tabs. Native builds (tests, SSR tooling)
//! use an in-memory map with identical semantics minus durability.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String-keyed storage with whole-value overwrite semantics.
///
/// Writes replace the entire value for a key, so interleaved writers
/// degrade to last-writer-wins rather than partial state.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory backend for native builds and tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Browser `localStorage` backend. All operations are best-effort: a
/// missing window or a storage quota error reads as absent / no-op.
#[cfg(feature = "hydrate")]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(s) = Self::storage() {
            let _ = s.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(s) = Self::storage() {
            let _ = s.remove_item(key);
        }
    }
}

/// Default backend for the current build: `localStorage` in the browser,
/// in-memory everywhere else.
#[must_use]
pub fn browser_or_memory() -> Rc<dyn KeyValueStorage> {
    #[cfg(feature = "hydrate")]
    {
        Rc::new(LocalStorage)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Rc::new(MemoryStorage::new())
    }
}
