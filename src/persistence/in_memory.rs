//! InMemorySlotStore - HashMap-backed slot store for tests and embedding.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{PersistenceError, SlotStore};

/// In-memory slot store. Clone-friendly via Arc; clones share storage.
#[derive(Clone, Default)]
pub struct InMemorySlotStore {
    slots: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently written.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotStore for InMemorySlotStore {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("read"))?;
        Ok(slots.get(key).cloned())
    }

    fn write_slot(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("write"))?;
        slots.insert(key.to_string(), bytes);
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool, PersistenceError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("remove"))?;
        Ok(slots.remove(key).is_some())
    }
}
