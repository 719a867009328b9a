//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use book_tracker::{
    Book, BookTracker, FixedClock, InMemorySlotStore, PersistenceError, ReadingStatus, SlotStore,
};
use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once. Honors RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn clock_at(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock::new(at(year, month, day))
}

/// Open a tracker on `store` with a clock the test controls.
pub fn open_tracker<S: SlotStore>(store: S, clock: &FixedClock) -> BookTracker<S> {
    init_tracing();
    BookTracker::open_with_clock(store, Arc::new(clock.clone())).unwrap()
}

/// A fresh in-memory tracker whose clock reads `year-month-day`.
pub fn tracker_at(
    year: i32,
    month: u32,
    day: u32,
) -> (BookTracker<InMemorySlotStore>, FixedClock, InMemorySlotStore) {
    let store = InMemorySlotStore::new();
    let clock = clock_at(year, month, day);
    let tracker = open_tracker(store.clone(), &clock);
    (tracker, clock, store)
}

/// Fluent builder for book fixtures.
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            book: Book::new(title, "Test Author", at(2025, 1, 1)),
        }
    }

    pub fn author(mut self, author: &str) -> Self {
        self.book.author = author.to_string();
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.book = self.book.with_genres(genres.iter().copied());
        self
    }

    pub fn to_read(mut self) -> Self {
        self.book = self.book.with_status(ReadingStatus::ToRead);
        self
    }

    pub fn completed(mut self, year: i32, month: u32, day: u32) -> Self {
        self.book = self.book.completed_at(at(year, month, day));
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.book = self.book.with_rating(rating);
        self
    }

    pub fn build(self) -> Book {
        self.book
    }
}

/// The current goal's count matches the book records.
pub fn assert_reconciled<S: SlotStore>(tracker: &BookTracker<S>) {
    let goal = tracker.current_goal();
    let expected = tracker
        .books()
        .iter()
        .filter(|book| book.is_completed() && book.completion_year() == Some(goal.year))
        .count() as u32;
    assert_eq!(
        goal.completed_books, expected,
        "current goal drifted from the book records"
    );
}

/// In-memory store whose reads or writes can be made to fail with `Io`.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemorySlotStore,
    fail_reads: Arc<AtomicBool>,
    failing_writes: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(inner: InMemorySlotStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn inner(&self) -> &InMemorySlotStore {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make the next `count` writes fail.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    fn io(key: &str) -> PersistenceError {
        PersistenceError::Io {
            slot: key.to_string(),
            message: "device not ready".to_string(),
        }
    }
}

impl SlotStore for FlakyStore {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::io(key));
        }
        self.inner.read_slot(key)
    }

    fn write_slot(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        let failing = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(Self::io(key));
        }
        self.inner.write_slot(key, bytes)
    }

    fn remove_slot(&self, key: &str) -> Result<bool, PersistenceError> {
        self.inner.remove_slot(key)
    }
}
