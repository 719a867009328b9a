//! Metadata lookup - resolve a search string or ISBN to candidate books.
//!
//! Response parsing is pure and always compiled. The HTTP clients need the
//! `lookup` feature.

mod google_books;
#[cfg(feature = "lookup")]
mod http;
mod open_library;
mod query;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::book::BookDraft;

#[cfg(feature = "lookup")]
pub use google_books::GoogleBooksClient;
pub use google_books::parse_volumes;
#[cfg(feature = "lookup")]
pub use open_library::OpenLibraryClient;
pub use open_library::{cover_url, parse_author, parse_edition, parse_search, Edition};
pub use query::{LookupQuery, QueryGuard, QueryTicket};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A book descriptor returned by a metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCandidate {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookCandidate {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: String::new(),
            cover_url: None,
            genres: Vec::new(),
            description: None,
        }
    }

    /// Seed an add-book form. The description becomes the notes.
    pub fn into_draft(self) -> BookDraft {
        let mut draft = BookDraft::new(self.title, self.author);
        draft.isbn = self.isbn;
        draft.cover_url = self.cover_url;
        draft.genres = self.genres.into_iter().collect();
        draft.notes = self.description;
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

/// A book metadata source.
pub trait MetadataLookup {
    /// Free-text search, best match first.
    fn search_text(&self, text: &str) -> Result<Vec<BookCandidate>, LookupError>;

    /// Exact lookup. `Ok(None)` when the source has no such ISBN.
    fn lookup_isbn(&self, isbn: &str) -> Result<Option<BookCandidate>, LookupError>;

    /// Run a parsed query. ISBN lookups return at most one candidate.
    fn search(&self, query: &LookupQuery) -> Result<Vec<BookCandidate>, LookupError> {
        match query {
            LookupQuery::Isbn(isbn) => Ok(self.lookup_isbn(isbn)?.into_iter().collect()),
            LookupQuery::Text(text) => self.search_text(text),
        }
    }

    /// Route raw input and search. Failures are logged and yield no results.
    fn lookup(&self, input: &str) -> Vec<BookCandidate> {
        let Some(query) = LookupQuery::parse(input) else {
            return Vec::new();
        };
        match self.search(&query) {
            Ok(candidates) => {
                debug!(query = query.as_str(), results = candidates.len(), "lookup finished");
                candidates
            }
            Err(err) => {
                warn!(query = query.as_str(), error = %err, "lookup failed");
                Vec::new()
            }
        }
    }
}
