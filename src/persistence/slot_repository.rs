//! SlotRepository - typed accessor for a single slot.

use std::marker::PhantomData;

use tracing::{debug, warn};

use super::{PersistenceError, Slot, SlotStore};

/// Typed view of one slot on a [`SlotStore`]. Values are JSON encoded.
pub struct SlotRepository<'a, S: ?Sized, T> {
    store: &'a S,
    _marker: PhantomData<T>,
}

impl<'a, S: SlotStore + ?Sized, T: Slot> SlotRepository<'a, S, T> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Load the slot. `Ok(None)` means never written, `Err` means unreadable.
    pub fn load(&self) -> Result<Option<T::Value>, PersistenceError> {
        let Some(bytes) = self.store.read_slot(T::KEY)? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Corrupt {
            slot: T::KEY.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Load the slot, treating undecodable data like missing data.
    ///
    /// Storage failures (`Io`, `LockPoisoned`) are still returned, so a
    /// transient read error is never mistaken for an empty slot.
    pub fn load_lenient(&self) -> Result<Option<T::Value>, PersistenceError> {
        match self.load() {
            Err(err @ PersistenceError::Corrupt { .. }) => {
                warn!(slot = T::KEY, error = %err, "discarding corrupt slot");
                Ok(None)
            }
            other => other,
        }
    }

    /// Save the whole value.
    pub fn save(&self, value: &T::Value) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(value).map_err(|e| PersistenceError::Encode {
            slot: T::KEY.to_string(),
            message: e.to_string(),
        })?;
        debug!(slot = T::KEY, bytes = bytes.len(), "saving slot");
        self.store.write_slot(T::KEY, bytes)
    }

    /// Remove the slot. Returns true if it existed.
    pub fn clear(&self) -> Result<bool, PersistenceError> {
        self.store.remove_slot(T::KEY)
    }
}

impl<'a, S: SlotStore + ?Sized, T: Slot> SlotRepository<'a, S, T>
where
    T::Value: Default,
{
    /// Load the slot, falling back to the default when missing or corrupt.
    pub fn load_or_default(&self) -> Result<T::Value, PersistenceError> {
        Ok(self.load_lenient()?.unwrap_or_default())
    }
}

/// Extension trait for typed slot access on any SlotStore.
pub trait SlotsExt: SlotStore {
    /// Get a typed slot repository.
    fn slot<T: Slot>(&self) -> SlotRepository<'_, Self, T> {
        SlotRepository::new(self)
    }
}

impl<S: SlotStore + ?Sized> SlotsExt for S {}
