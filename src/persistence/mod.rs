//! Persistence - whole-value slots stored as encoded blobs.
//!
//! Each slot is a named key holding one serialized value that is always read
//! and written as a whole. Stores only see raw bytes; typed access goes
//! through [`SlotsExt::slot`].
//!
//! ## Example
//!
//! ```ignore
//! use book_tracker::{BooksSlot, InMemorySlotStore, SlotsExt};
//!
//! let store = InMemorySlotStore::new();
//! store.slot::<BooksSlot>().save(&books)?;
//!
//! // Err = corrupt, Ok(None) = never written
//! let loaded = store.slot::<BooksSlot>().load()?;
//!
//! // Missing or corrupt both fall back to an empty list; i/o errors do not.
//! let books = store.slot::<BooksSlot>().load_or_default()?;
//! ```

mod file;
mod in_memory;
mod slot_repository;
mod store;

use std::collections::BTreeSet;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::book::Book;
use crate::goal::{ReadingGoal, YearlyGoal};

pub use file::FileSlotStore;
pub use in_memory::InMemorySlotStore;
pub use slot_repository::{SlotRepository, SlotsExt};
pub use store::SlotStore;

/// A named persistence slot and the type stored in it.
pub trait Slot {
    /// Storage key. Maps to a file name, a preferences key, a KV key, etc.
    const KEY: &'static str;

    type Value: Serialize + DeserializeOwned;
}

pub struct BooksSlot;

impl Slot for BooksSlot {
    const KEY: &'static str = "saved_books";
    type Value = Vec<Book>;
}

pub struct ReadingGoalSlot;

impl Slot for ReadingGoalSlot {
    const KEY: &'static str = "reading_goal";
    type Value = ReadingGoal;
}

pub struct GenresSlot;

impl Slot for GenresSlot {
    const KEY: &'static str = "genres";
    type Value = BTreeSet<String>;
}

pub struct YearlyGoalsSlot;

impl Slot for YearlyGoalsSlot {
    const KEY: &'static str = "yearly_goals";
    type Value = Vec<YearlyGoal>;
}

/// Set once the legacy goal migration has run.
pub struct GoalMigrationSlot;

impl Slot for GoalMigrationSlot {
    const KEY: &'static str = "goal_migration_done";
    type Value = bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("slot storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("slot {slot}: i/o error: {message}")]
    Io { slot: String, message: String },
    #[error("slot {slot} is corrupt: {message}")]
    Corrupt { slot: String, message: String },
    #[error("slot {slot} could not be encoded: {message}")]
    Encode { slot: String, message: String },
}
