use chrono::Datelike;

use crate::book::{Book, BookId, ReadingStatus};
use crate::genre::GenreVocabulary;
use crate::goal::{ReadingGoal, YearlyGoal};
use crate::persistence::SlotStore;
use crate::stats::{self, YearEndSummary, YearlyStats};

use super::BookTracker;

impl<S: SlotStore> BookTracker<S> {
    /// All books in store order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn books_with_status(&self, status: ReadingStatus) -> Vec<&Book> {
        self.books.iter().filter(|book| book.status == status).collect()
    }

    pub fn currently_reading(&self) -> Vec<&Book> {
        self.books_with_status(ReadingStatus::CurrentlyReading)
    }

    pub fn read_books(&self) -> Vec<&Book> {
        self.books_with_status(ReadingStatus::Completed)
    }

    pub fn to_read_books(&self) -> Vec<&Book> {
        self.books_with_status(ReadingStatus::ToRead)
    }

    pub fn genres(&self) -> &GenreVocabulary {
        &self.genres
    }

    pub fn is_custom_genre(&self, name: &str) -> bool {
        self.genres.is_custom(name)
    }

    /// Number of books tagged with `name`.
    pub fn genre_usage(&self, name: &str) -> usize {
        self.books
            .iter()
            .filter(|book| book.genres.contains(name))
            .count()
    }

    pub fn current_goal(&self) -> &ReadingGoal {
        self.goals.current()
    }

    pub fn historical_goals(&self) -> &[YearlyGoal] {
        self.goals.history()
    }

    pub fn goal_for_year(&self, year: i32) -> Option<YearlyGoal> {
        self.goals.goal_for_year(year)
    }

    /// Current year, completion years and archived years, newest first.
    pub fn available_years(&self) -> Vec<i32> {
        let current_year = self.clock.today().year();
        stats::available_years(&self.books, self.goals.history(), current_year)
    }

    pub fn stats_for_year(&self, year: i32) -> YearlyStats {
        stats::stats_for_year(&self.books, self.goal_for_year(year), year)
    }

    pub fn year_end_summary(&self, year: i32) -> YearEndSummary {
        let goal = self.goal_for_year(year);
        stats::year_end_summary(&self.books, goal.as_ref(), year)
    }
}
