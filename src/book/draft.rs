//! Caller-side validation for new books.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{snap_rating, Book, BookId, ReadingStatus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("book title is required")]
    EmptyTitle,
    #[error("book author is required")]
    EmptyAuthor,
    #[error("rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),
    #[error("only completed books can be rated")]
    RatingWithoutCompletion,
}

/// Unvalidated form input for a new book.
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_url: Option<String>,
    pub genres: BTreeSet<String>,
    pub notes: Option<String>,
    pub status: ReadingStatus,
    pub rating: Option<f64>,
    pub is_owned: bool,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        BookDraft {
            title: title.into(),
            author: author.into(),
            is_owned: true,
            ..Default::default()
        }
    }

    /// Validate and build the record. Completed drafts are stamped with `now`.
    pub fn into_book(self, now: DateTime<Utc>) -> Result<Book, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let author = self.author.trim().to_string();
        if author.is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }

        let rating = match self.rating {
            Some(value) => {
                if self.status != ReadingStatus::Completed {
                    return Err(ValidationError::RatingWithoutCompletion);
                }
                Some(snap_rating(value).ok_or(ValidationError::RatingOutOfRange(value))?)
            }
            None => None,
        };

        let genres = self
            .genres
            .into_iter()
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect();

        let notes = self
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        let mut book = Book {
            id: BookId::new(),
            title,
            author,
            isbn: self.isbn.trim().to_string(),
            cover_url: self.cover_url,
            genres,
            rating,
            notes,
            status: self.status,
            date_added: now,
            date_completed: None,
            read_count: 0,
            is_owned: self.is_owned,
        };
        book.normalize(now);
        Ok(book)
    }
}
