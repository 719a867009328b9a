use thiserror::Error;

use crate::book::{BookId, ValidationError};
use crate::persistence::PersistenceError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("book {0} not found")]
    BookNotFound(BookId),
    #[error("book {0} is already stored")]
    DuplicateBook(BookId),
    #[error("tracker lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
