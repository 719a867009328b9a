pub mod book;
pub mod clock;
pub mod config;
mod error;
pub mod genre;
pub mod goal;
pub mod lookup;
pub mod persistence;
pub mod rollover;
pub mod stats;
pub mod tracker;

pub use book::{Book, BookDraft, BookId, ReadingStatus, ValidationError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LookupConfig, TrackerConfig};
pub use error::TrackerError;
pub use genre::{GenreVocabulary, DEFAULT_GENRES};
pub use goal::{GoalTracker, ReadingGoal, YearlyGoal};
pub use lookup::{BookCandidate, LookupError, LookupQuery, MetadataLookup, QueryGuard, QueryTicket};
#[cfg(feature = "lookup")]
pub use lookup::{GoogleBooksClient, OpenLibraryClient};
pub use persistence::{
    BooksSlot, FileSlotStore, GenresSlot, GoalMigrationSlot, InMemorySlotStore,
    PersistenceError, ReadingGoalSlot, Slot, SlotRepository, SlotStore, SlotsExt,
    YearlyGoalsSlot,
};
pub use rollover::{RolloverStats, RolloverWorkerThread};
pub use stats::{
    AuthorStat, GenreStat, MonthStat, RatingStat, YearEndSummary, YearlyStats,
};
pub use tracker::{BookTracker, SharedTracker, SharedTrackerExt, TrackerEvent};
