//! SlotStore - raw byte storage keyed by slot name.

use super::PersistenceError;

/// Raw blob storage. Implementations never interpret the bytes.
pub trait SlotStore: Send + Sync {
    /// Read a slot. Returns None if it was never written.
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the whole slot.
    fn write_slot(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError>;

    /// Remove a slot. Returns true if it existed.
    fn remove_slot(&self, key: &str) -> Result<bool, PersistenceError>;
}
