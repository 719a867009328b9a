use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How a user's search input should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// Exact lookup by ISBN. Digits only, hyphens stripped.
    Isbn(String),
    /// Free-text search.
    Text(String),
}

impl LookupQuery {
    /// Route raw input. Returns None for blank input.
    ///
    /// After stripping hyphens, input of at least ten ASCII digits is an
    /// ISBN; anything else is searched as text.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let stripped: String = trimmed.chars().filter(|c| *c != '-').collect();
        if stripped.len() >= 10 && stripped.chars().all(|c| c.is_ascii_digit()) {
            return Some(LookupQuery::Isbn(stripped));
        }
        Some(LookupQuery::Text(trimmed.to_string()))
    }

    pub fn is_isbn(&self) -> bool {
        matches!(self, LookupQuery::Isbn(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            LookupQuery::Isbn(isbn) => isbn,
            LookupQuery::Text(text) => text,
        }
    }
}

/// Identifies one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Tracks the most recent query so late responses can be dropped.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct QueryGuard {
    latest: Arc<AtomicU64>,
}

impl QueryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new query, superseding every earlier ticket.
    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no query was issued after `ticket`.
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
