//! Reading goals - the live goal for the current year and the archive of
//! past years.
//!
//! ## Example
//!
//! ```ignore
//! use book_tracker::GoalTracker;
//!
//! let mut goals = GoalTracker::new(2025);
//! goals.set_target(24);
//! goals.recompute_current_year(&books);
//!
//! let today = chrono::Utc::now().date_naive();
//! if goals.current().is_ahead_of_schedule(today) {
//!     // ...
//! }
//! ```

pub mod calendar;
mod tracker;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use tracker::GoalTracker;

use calendar::{days_in_year, days_left_in_year, days_since_start_of_year};

fn new_goal_id() -> Uuid {
    Uuid::new_v4()
}

/// The single live goal for the present calendar year.
///
/// `completed_books` is a cache of the book store; the tracker recomputes it
/// after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingGoal {
    #[serde(default = "new_goal_id")]
    pub id: Uuid,
    pub year: i32,
    pub target_books: u32,
    pub completed_books: u32,
}

impl ReadingGoal {
    /// An unset goal (target 0) for `year`.
    pub fn new(year: i32) -> Self {
        Self::with_target(year, 0)
    }

    pub fn with_target(year: i32, target_books: u32) -> Self {
        ReadingGoal {
            id: new_goal_id(),
            year,
            target_books,
            completed_books: 0,
        }
    }

    pub fn is_set(&self) -> bool {
        self.target_books > 0
    }

    pub fn percent_complete(&self) -> f64 {
        if !self.is_set() {
            return 0.0;
        }
        f64::from(self.completed_books) / f64::from(self.target_books) * 100.0
    }

    pub fn remaining_books(&self) -> u32 {
        if !self.is_set() {
            return 0;
        }
        self.target_books.saturating_sub(self.completed_books)
    }

    /// Days available per remaining book to finish by December 31st.
    pub fn days_per_book_required(&self, today: NaiveDate) -> Option<f64> {
        let remaining = self.remaining_books();
        if remaining == 0 {
            return None;
        }
        Some(f64::from(days_left_in_year(today)) / f64::from(remaining))
    }

    /// Books that should be done by `today` at an even pace.
    pub fn expected_books_at(&self, today: NaiveDate) -> f64 {
        f64::from(self.target_books) * self.year_elapsed_fraction(today)
    }

    pub fn books_ahead_of_schedule(&self, today: NaiveDate) -> f64 {
        f64::from(self.completed_books) - self.expected_books_at(today)
    }

    pub fn is_ahead_of_schedule(&self, today: NaiveDate) -> bool {
        self.books_ahead_of_schedule(today) > 0.0
    }

    /// Projected books per year at the pace so far. None on January 1st.
    pub fn current_pace(&self, today: NaiveDate) -> Option<f64> {
        let days_passed = days_since_start_of_year(today);
        if days_passed == 0 {
            return None;
        }
        Some(f64::from(self.completed_books) / f64::from(days_passed) * 365.0)
    }

    pub fn to_yearly(&self) -> YearlyGoal {
        YearlyGoal {
            id: self.id,
            year: self.year,
            target_books: self.target_books,
            completed_books: self.completed_books,
        }
    }

    fn year_elapsed_fraction(&self, today: NaiveDate) -> f64 {
        if today.year() > self.year {
            return 1.0;
        }
        if today.year() < self.year {
            return 0.0;
        }
        f64::from(days_since_start_of_year(today)) / f64::from(days_in_year(self.year))
    }
}

/// Archived snapshot of a past year's goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyGoal {
    pub id: Uuid,
    pub year: i32,
    pub target_books: u32,
    pub completed_books: u32,
}

impl YearlyGoal {
    pub fn new(year: i32, target_books: u32, completed_books: u32) -> Self {
        YearlyGoal {
            id: new_goal_id(),
            year,
            target_books,
            completed_books,
        }
    }

    /// A goal is achieved only when one was set and reached.
    pub fn is_achieved(&self) -> bool {
        self.target_books > 0 && self.completed_books >= self.target_books
    }
}
