use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use crate::book::{Book, BookDraft, BookId, ReadingStatus};
use crate::error::TrackerError;
use crate::goal::YearlyGoal;
use crate::persistence::SlotStore;

use super::{BookTracker, TrackerEvent};

fn book_payload(book: &Book) -> serde_json::Value {
    json!({
        "id": book.id,
        "title": book.title,
        "status": book.status,
    })
}

impl<S: SlotStore> BookTracker<S> {
    /// Append a book. A book added as completed counts toward its year.
    ///
    /// Fails with `DuplicateBook` if a book with the same id is stored.
    pub fn add(&mut self, mut book: Book) -> Result<BookId, TrackerError> {
        if self.book(book.id).is_some() {
            return Err(TrackerError::DuplicateBook(book.id));
        }
        let checkpoint = self.checkpoint();
        book.normalize(self.clock.now());
        if book.is_completed() {
            self.goals.record_completion(&book, None);
        }

        let id = book.id;
        info!(book_id = %id, title = %book.title, status = %book.status, "book added");
        let payload = book_payload(&book);
        self.books.push(book);
        self.commit(checkpoint)?;

        self.notifier.notify(TrackerEvent::BookAdded, &payload);
        self.notify_goal();
        Ok(id)
    }

    /// Validate a draft and append it.
    pub fn add_draft(&mut self, draft: BookDraft) -> Result<BookId, TrackerError> {
        let book = draft.into_book(self.clock.now())?;
        self.add(book)
    }

    /// Change a book's status, completing it now if it becomes completed.
    pub fn update_status(&mut self, id: BookId, status: ReadingStatus) -> Result<(), TrackerError> {
        let now = self.clock.now();
        self.update_status_on(id, status, now)
    }

    /// Change a book's status, using `completed_at` as the completion time
    /// when it becomes completed. Other fields are left alone.
    pub fn update_status_on(
        &mut self,
        id: BookId,
        status: ReadingStatus,
        completed_at: DateTime<Utc>,
    ) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        let previous = self.books[index].clone();
        if previous.status == status {
            return Ok(());
        }
        let checkpoint = self.checkpoint();

        let mut updated = previous.clone();
        updated.status = status;
        if status == ReadingStatus::Completed {
            updated.date_completed = Some(completed_at);
            self.goals.record_completion(&updated, Some(previous.status));
        } else {
            updated.date_completed = None;
            updated.rating = None;
            if previous.is_completed() {
                self.goals.record_uncompletion(&previous);
            }
        }

        debug!(book_id = %id, from = %previous.status, to = %status, "book status changed");
        let payload = book_payload(&updated);
        self.books[index] = updated;
        self.commit(checkpoint)?;

        self.notifier.notify(TrackerEvent::BookUpdated, &payload);
        self.notify_goal();
        Ok(())
    }

    /// Replace a book by identity.
    ///
    /// Completion changes made through the record itself, such as a new
    /// completion date in another year, move the count between years.
    pub fn update(&mut self, mut book: Book) -> Result<(), TrackerError> {
        let index = self.index_of(book.id)?;
        let checkpoint = self.checkpoint();
        book.normalize(self.clock.now());

        let previous = &self.books[index];
        let before = previous.completion_year();
        let after = book.completion_year();
        if before != after {
            if before.is_some() {
                self.goals.record_uncompletion(previous);
            }
            if after.is_some() {
                self.goals.record_completion(&book, None);
            }
        }

        debug!(book_id = %book.id, "book updated");
        let payload = book_payload(&book);
        self.books[index] = book;
        self.commit(checkpoint)?;

        self.notifier.notify(TrackerEvent::BookUpdated, &payload);
        self.notify_goal();
        Ok(())
    }

    /// Remove a book, uncounting it if it was completed.
    pub fn delete(&mut self, id: BookId) -> Result<Book, TrackerError> {
        let index = self.index_of(id)?;
        let checkpoint = self.checkpoint();
        if self.books[index].is_completed() {
            self.goals.record_uncompletion(&self.books[index]);
        }
        let removed = self.books.remove(index);

        info!(book_id = %id, title = %removed.title, "book deleted");
        self.commit(checkpoint)?;

        self.notifier.notify(TrackerEvent::BookDeleted, &book_payload(&removed));
        self.notify_goal();
        Ok(removed)
    }

    /// Set the current year's target. 0 clears the goal.
    pub fn set_target(&mut self, target_books: u32) -> Result<(), TrackerError> {
        let checkpoint = self.checkpoint();
        self.goals.set_target(target_books);
        self.commit(checkpoint)?;
        self.notify_goal();
        Ok(())
    }

    /// Add a genre to the vocabulary. Returns false for blank or known names.
    pub fn add_genre(&mut self, name: &str) -> Result<bool, TrackerError> {
        let checkpoint = self.checkpoint();
        if !self.genres.add(name) {
            return Ok(false);
        }
        debug!(genre = name.trim(), "genre added");
        self.commit(checkpoint)?;
        self.notify_genres();
        Ok(true)
    }

    /// Remove a custom genre from the vocabulary. Books keep their tags.
    pub fn delete_genre(&mut self, name: &str) -> Result<bool, TrackerError> {
        let checkpoint = self.checkpoint();
        if !self.genres.remove(name) {
            return Ok(false);
        }
        debug!(genre = name, "genre deleted");
        self.commit(checkpoint)?;
        self.notify_genres();
        Ok(true)
    }

    /// Roll the goal over if the clock has moved into a new year.
    ///
    /// Returns the archived goal when a rollover happened.
    pub fn advance_year_if_needed(&mut self) -> Result<Option<YearlyGoal>, TrackerError> {
        let today = self.clock.today();
        let checkpoint = self.checkpoint();
        let Some(archived) = self.goals.advance_year_if_needed(today) else {
            return Ok(None);
        };
        self.commit(checkpoint)?;

        self.notifier.notify(TrackerEvent::YearRolledOver, &archived);
        self.notify_goal();
        Ok(Some(archived))
    }

    fn notify_goal(&mut self) {
        let goal = self.goals.current().clone();
        self.notifier.notify(TrackerEvent::GoalChanged, &goal);
    }

    fn notify_genres(&mut self) {
        let names: Vec<String> = self.genres.iter().map(str::to_string).collect();
        self.notifier.notify(TrackerEvent::GenresChanged, &names);
    }
}
