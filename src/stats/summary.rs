use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::book::Book;
use crate::goal::YearlyGoal;

use super::distribution::{books_in_year, genre_distribution, monthly_distribution};
use super::{AuthorStat, MonthStat, YearEndSummary};

/// Year-end roll-up for `year`. `goal` is the goal recorded for that year.
pub fn year_end_summary(books: &[Book], goal: Option<&YearlyGoal>, year: i32) -> YearEndSummary {
    let in_year = books_in_year(books, year);
    let monthly = monthly_distribution(&in_year);

    YearEndSummary {
        year,
        total_books_read: in_year.len(),
        goal_achieved: goal_achieved(goal),
        average_rating: average_rating(&in_year),
        longest_reading_streak: reading_streak(&in_year),
        most_read_author: most_read_author(&in_year),
        top_genres: genre_distribution(&in_year),
        best_rated_book: best_rated_book(&in_year).cloned(),
        most_productive_month: most_productive_month(&monthly),
    }
}

/// Achieved only when a target was set and met.
pub fn goal_achieved(goal: Option<&YearlyGoal>) -> bool {
    goal.is_some_and(YearlyGoal::is_achieved)
}

/// Mean over rated books; 0 when none are rated.
pub fn average_rating(books: &[&Book]) -> f64 {
    let ratings: Vec<f64> = books.iter().filter_map(|book| book.rating).collect();
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// Longest run of consecutive completion days among `books`.
pub fn reading_streak(books: &[&Book]) -> usize {
    let dates: Vec<NaiveDate> = books.iter().filter_map(|book| book.completion_date()).collect();
    longest_streak(&dates)
}

/// Longest run where each sorted date is exactly one day after the previous.
///
/// Any other gap, including two completions on the same day, starts a new
/// run. Empty input gives 0.
pub fn longest_streak(dates: &[NaiveDate]) -> usize {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();

    let Some(first) = sorted.first() else {
        return 0;
    };

    let mut previous = *first;
    let mut current = 1;
    let mut longest = 1;
    for date in sorted.iter().skip(1) {
        if (*date - previous).num_days() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
        previous = *date;
    }
    longest
}

/// Author with the most books; ties go to the author seen first.
pub fn most_read_author(books: &[&Book]) -> Option<AuthorStat> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for book in books {
        let count = counts.entry(book.author.as_str()).or_insert(0);
        if *count == 0 {
            order.push(book.author.as_str());
        }
        *count += 1;
    }

    let mut best: Option<AuthorStat> = None;
    for author in order {
        let count = counts[author];
        if best.as_ref().map_or(true, |b| count > b.count) {
            best = Some(AuthorStat {
                author: author.to_string(),
                count,
            });
        }
    }
    best
}

/// Highest rated book; ties go to the earliest in store order.
pub fn best_rated_book<'a>(books: &[&'a Book]) -> Option<&'a Book> {
    let mut best: Option<(&'a Book, f64)> = None;
    for book in books {
        let Some(rating) = book.rating else {
            continue;
        };
        if best.map_or(true, |(_, top)| rating > top) {
            best = Some((*book, rating));
        }
    }
    best.map(|(book, _)| book)
}

/// Month with the most completions, earliest on ties. None if all are zero.
pub fn most_productive_month(monthly: &[MonthStat]) -> Option<MonthStat> {
    let mut best: Option<&MonthStat> = None;
    for month in monthly {
        if month.count == 0 {
            continue;
        }
        if best.map_or(true, |b| month.count > b.count) {
            best = Some(month);
        }
    }
    best.cloned()
}

/// Years the stats screen can show, newest first.
pub fn available_years(books: &[Book], history: &[YearlyGoal], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = BTreeSet::new();
    years.insert(current_year);
    years.extend(books.iter().filter_map(Book::completion_year));
    years.extend(history.iter().map(|goal| goal.year));
    years.into_iter().rev().collect()
}
