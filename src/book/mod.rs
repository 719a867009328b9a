//! Book records - the source of truth for every goal count and statistic.
//!
//! A [`Book`] carries its reading status together with the completion
//! timestamp and rating. The completion timestamp is present if and only if
//! the status is [`ReadingStatus::Completed`], and a rating is only kept for
//! completed books. [`Book::normalize`] enforces both rules and the store
//! calls it on every write.

mod draft;
mod rating;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use draft::{BookDraft, ValidationError};
pub use rating::{clamp_rating, snap_rating, MAX_RATING};

/// Stable identity of a book record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        BookId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        BookId(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    CurrentlyReading,
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::ToRead,
        ReadingStatus::CurrentlyReading,
        ReadingStatus::Completed,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ReadingStatus::ToRead => "To Read",
            ReadingStatus::CurrentlyReading => "Currently Reading",
            ReadingStatus::Completed => "Completed",
        }
    }
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::CurrentlyReading
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: ReadingStatus,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub date_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read_count: u32,
    #[serde(default = "default_owned")]
    pub is_owned: bool,
}

fn default_owned() -> bool {
    true
}

impl Book {
    /// A new book in the default `currently_reading` state.
    pub fn new(title: impl Into<String>, author: impl Into<String>, date_added: DateTime<Utc>) -> Self {
        Book {
            id: BookId::new(),
            title: title.into(),
            author: author.into(),
            isbn: String::new(),
            cover_url: None,
            genres: BTreeSet::new(),
            rating: None,
            notes: None,
            status: ReadingStatus::default(),
            date_added,
            date_completed: None,
            read_count: 0,
            is_owned: true,
        }
    }

    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = id;
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    pub fn with_genres<I, G>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set a non-completed status, dropping completion data.
    pub fn with_status(mut self, status: ReadingStatus) -> Self {
        self.status = status;
        if status != ReadingStatus::Completed {
            self.date_completed = None;
            self.rating = None;
        }
        self
    }

    /// Mark the book completed at `at`.
    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.status = ReadingStatus::Completed;
        self.date_completed = Some(at);
        self
    }

    /// Attach a rating, clamped to 0..=5 and snapped to a quarter point.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(clamp_rating(rating));
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReadingStatus::Completed
    }

    /// Calendar day of completion, only for completed books.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        if !self.is_completed() {
            return None;
        }
        self.date_completed.map(|at| at.date_naive())
    }

    /// Calendar year of completion, only for completed books.
    pub fn completion_year(&self) -> Option<i32> {
        self.completion_date().map(|date| date.year())
    }

    pub fn completed_in(&self, year: i32) -> bool {
        self.completion_year() == Some(year)
    }

    /// Restore the record invariants.
    ///
    /// A completed book without a timestamp is stamped with `now`; any other
    /// status clears the timestamp and rating. Ratings are re-clamped.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if self.is_completed() {
            if self.date_completed.is_none() {
                self.date_completed = Some(now);
            }
            self.rating = self.rating.map(clamp_rating);
        } else {
            self.date_completed = None;
            self.rating = None;
        }
    }
}
