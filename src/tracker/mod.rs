//! BookTracker - the owned book store.
//!
//! Holds the books, the goal tracker and the genre vocabulary, keeps the
//! current-year count reconciled with the book records after every mutation,
//! and writes every slot back to its [`SlotStore`] after each change.
//!
//! ## Example
//!
//! ```ignore
//! use book_tracker::{BookDraft, BookTracker, InMemorySlotStore, ReadingStatus, TrackerEvent};
//!
//! let mut tracker = BookTracker::open(InMemorySlotStore::new())?;
//! tracker.on(TrackerEvent::GoalChanged, |goal| println!("goal: {}", goal));
//!
//! tracker.set_target(24)?;
//! let id = tracker.add_draft(BookDraft::new("Dune", "Frank Herbert"))?;
//! tracker.update_status(id, ReadingStatus::Completed)?;
//!
//! assert_eq!(tracker.current_goal().completed_books, 1);
//! ```

mod events;
mod mutations;
mod queries;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Datelike;
use tracing::{info, warn};

use crate::book::{Book, BookId};
use crate::clock::{Clock, SystemClock};
use crate::error::TrackerError;
use crate::genre::GenreVocabulary;
use crate::goal::{GoalTracker, ReadingGoal};
use crate::persistence::{
    BooksSlot, GenresSlot, GoalMigrationSlot, ReadingGoalSlot, SlotStore, SlotsExt,
    YearlyGoalsSlot,
};

pub use events::TrackerEvent;
use events::Notifier;

/// A tracker shared between the owning thread and background workers.
pub type SharedTracker<S> = Arc<RwLock<BookTracker<S>>>;

/// Lock access on a [`SharedTracker`] that reports poisoning as a `TrackerError`.
pub trait SharedTrackerExt<S: SlotStore> {
    fn read_tracker(&self) -> Result<RwLockReadGuard<'_, BookTracker<S>>, TrackerError>;

    fn write_tracker(&self) -> Result<RwLockWriteGuard<'_, BookTracker<S>>, TrackerError>;
}

impl<S: SlotStore> SharedTrackerExt<S> for SharedTracker<S> {
    fn read_tracker(&self) -> Result<RwLockReadGuard<'_, BookTracker<S>>, TrackerError> {
        self.read().map_err(|_| TrackerError::LockPoisoned("read"))
    }

    fn write_tracker(&self) -> Result<RwLockWriteGuard<'_, BookTracker<S>>, TrackerError> {
        self.write().map_err(|_| TrackerError::LockPoisoned("write"))
    }
}

pub struct BookTracker<S: SlotStore> {
    store: S,
    clock: Arc<dyn Clock>,
    books: Vec<Book>,
    goals: GoalTracker,
    genres: GenreVocabulary,
    notifier: Notifier,
}

impl<S: SlotStore> BookTracker<S> {
    /// Open a tracker on `store` using the system clock.
    pub fn open(store: S) -> Result<Self, TrackerError> {
        Self::open_with_clock(store, Arc::new(SystemClock))
    }

    /// Open a tracker on `store`.
    ///
    /// Missing or corrupt slots load as their defaults. A storage failure
    /// while reading aborts the open before anything is written. Opening runs the
    /// one-time legacy goal migration, rolls the goal over if the year has
    /// changed since the last save, reconciles the current count and writes
    /// everything back.
    pub fn open_with_clock(store: S, clock: Arc<dyn Clock>) -> Result<Self, TrackerError> {
        let now = clock.now();
        let today = now.date_naive();

        let mut books = store.slot::<BooksSlot>().load_or_default()?;
        for book in &mut books {
            book.normalize(now);
        }

        let current = store
            .slot::<ReadingGoalSlot>()
            .load_lenient()?
            .unwrap_or_else(|| ReadingGoal::new(today.year()));
        let history = store.slot::<YearlyGoalsSlot>().load_or_default()?;
        let migrated = store.slot::<GoalMigrationSlot>().load_or_default()?;
        let genres = GenreVocabulary::from_persisted(store.slot::<GenresSlot>().load_or_default()?);

        let mut goals = GoalTracker::from_parts(current, history, migrated);
        goals.advance_year_if_needed(today);
        goals.migrate_legacy_goals(&books);
        goals.recompute_current_year(&books);

        info!(
            books = books.len(),
            year = goals.year(),
            history = goals.history().len(),
            "book tracker opened"
        );

        let tracker = Self {
            store,
            clock,
            books,
            goals,
            genres,
            notifier: Notifier::new(),
        };
        tracker.save_all()?;
        Ok(tracker)
    }

    /// Wrap the tracker for sharing with a [`RolloverWorkerThread`](crate::RolloverWorkerThread).
    pub fn into_shared(self) -> SharedTracker<S> {
        Arc::new(RwLock::new(self))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Register a listener. Returns an id for [`remove_listener`](Self::remove_listener).
    ///
    /// Listeners are invoked on a background thread.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&mut self, event: TrackerEvent, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.notifier.on(event, listener)
    }

    #[cfg(feature = "emitter")]
    pub fn remove_listener(&mut self, listener_id: &str) -> bool {
        self.notifier.remove_listener(listener_id)
    }

    /// Write every slot.
    pub fn save_all(&self) -> Result<(), TrackerError> {
        self.store.slot::<BooksSlot>().save(&self.books)?;
        self.store.slot::<ReadingGoalSlot>().save(self.goals.current())?;
        self.store
            .slot::<YearlyGoalsSlot>()
            .save(&self.goals.history().to_vec())?;
        self.store.slot::<GenresSlot>().save(self.genres.names())?;
        self.store
            .slot::<GoalMigrationSlot>()
            .save(&self.goals.is_migrated())?;
        Ok(())
    }

    fn index_of(&self, id: BookId) -> Result<usize, TrackerError> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or(TrackerError::BookNotFound(id))
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            books: self.books.clone(),
            goals: self.goals.clone(),
            genres: self.genres.clone(),
        }
    }

    /// Reconcile and persist. If saving fails the in-memory state goes back
    /// to `checkpoint`, so a retry starts from what was last saved.
    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), TrackerError> {
        self.goals.recompute_current_year(&self.books);
        if let Err(err) = self.save_all() {
            warn!(error = %err, "save failed, discarding change");
            self.books = checkpoint.books;
            self.goals = checkpoint.goals;
            self.genres = checkpoint.genres;
            return Err(err);
        }
        Ok(())
    }
}

/// In-memory state taken before a mutation.
struct Checkpoint {
    books: Vec<Book>,
    goals: GoalTracker,
    genres: GenreVocabulary,
}
