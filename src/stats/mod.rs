//! Statistics - pure aggregations over a snapshot of book records.
//!
//! Nothing here mutates its input. Functions that work on "books in a year"
//! take the output of [`books_in_year`], so callers filter once and reuse
//! the slice for every distribution.

mod distribution;
mod summary;

use serde::Serialize;

use crate::book::Book;
use crate::goal::YearlyGoal;

pub use distribution::{
    books_in_year, genre_distribution, monthly_distribution, rating_distribution, MONTHS,
};
pub use summary::{
    available_years, average_rating, best_rated_book, goal_achieved, longest_streak,
    most_productive_month, most_read_author, reading_streak, year_end_summary,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreStat {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthStat {
    /// 1 = January.
    pub number: u32,
    /// Three-letter abbreviation, `Jan`..`Dec`.
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingStat {
    /// Rating formatted with one decimal place.
    pub rating: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorStat {
    pub author: String,
    pub count: usize,
}

/// Everything the stats screen shows for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStats {
    pub year: i32,
    pub goal: Option<YearlyGoal>,
    pub genre_distribution: Vec<GenreStat>,
    pub monthly_books: Vec<MonthStat>,
    pub rating_distribution: Vec<RatingStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEndSummary {
    pub year: i32,
    pub total_books_read: usize,
    pub goal_achieved: bool,
    pub average_rating: f64,
    pub longest_reading_streak: usize,
    pub most_read_author: Option<AuthorStat>,
    pub top_genres: Vec<GenreStat>,
    pub best_rated_book: Option<Book>,
    pub most_productive_month: Option<MonthStat>,
}

/// Goal plus the three distributions for `year`.
pub fn stats_for_year(books: &[Book], goal: Option<YearlyGoal>, year: i32) -> YearlyStats {
    let in_year = books_in_year(books, year);
    YearlyStats {
        year,
        goal,
        genre_distribution: genre_distribution(&in_year),
        monthly_books: monthly_distribution(&in_year),
        rating_distribution: rating_distribution(&in_year),
    }
}
