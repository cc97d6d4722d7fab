//! Key-value persistence capability.
//!
//! The market only needs string-keyed blobs with whole-value writes
//! (the browser `localStorage` model). Backends:
//! - [`MemoryStore`]: in-process map, for tests and ephemeral sessions.
//! - `FileStore` (in `market-server`): one file per key on disk.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// String-keyed blob storage with whole-value writes.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value under `key` in a single write.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same map.
///
/// Counts writes so tests can assert how many times a collection was
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Total number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Seed raw bytes without counting a write (e.g. corrupt data in tests).
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
