use std::collections::BTreeMap;

use chrono::Datelike;

use crate::book::Book;

use super::{GenreStat, MonthStat, RatingStat};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Completed books whose completion timestamp falls in `year`, in store order.
pub fn books_in_year(books: &[Book], year: i32) -> Vec<&Book> {
    books.iter().filter(|book| book.completed_in(year)).collect()
}

/// Books per genre tag, most common first, ties alphabetical.
///
/// A book with several genres counts once in each.
pub fn genre_distribution(books: &[&Book]) -> Vec<GenreStat> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for book in books {
        for genre in &book.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    let mut stats: Vec<GenreStat> = counts
        .into_iter()
        .map(|(genre, count)| GenreStat {
            genre: genre.to_string(),
            count,
        })
        .collect();
    // stable: alphabetical order from the BTreeMap survives within a count
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Completions per month, always twelve entries `Jan`..`Dec`.
pub fn monthly_distribution(books: &[&Book]) -> Vec<MonthStat> {
    let mut counts = [0usize; 12];
    for date in books.iter().filter_map(|book| book.completion_date()) {
        counts[date.month0() as usize] += 1;
    }

    MONTHS
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(index, (month, count))| MonthStat {
            number: index as u32 + 1,
            month: month.to_string(),
            count,
        })
        .collect()
}

/// Books per rating, keyed by the rating with one decimal, ascending.
pub fn rating_distribution(books: &[&Book]) -> Vec<RatingStat> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rating in books.iter().filter_map(|book| book.rating) {
        *counts.entry(format!("{:.1}", rating)).or_insert(0) += 1;
    }

    let mut stats: Vec<RatingStat> = counts
        .into_iter()
        .map(|(rating, count)| RatingStat { rating, count })
        .collect();
    stats.sort_by(|a, b| rating_key(&a.rating).total_cmp(&rating_key(&b.rating)));
    stats
}

fn rating_key(formatted: &str) -> f64 {
    formatted.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 30, 0).unwrap()
    }

    fn completed(m: u32, genres: &[&str]) -> Book {
        Book::new("Title", "Author", at(2025, 1, 1))
            .with_genres(genres.iter().copied())
            .completed_at(at(2025, m, 10))
    }

    #[test]
    fn books_in_year_filters_status_and_year() {
        let books = vec![
            completed(3, &[]),
            Book::new("Other", "Author", at(2024, 1, 1)).completed_at(at(2024, 6, 1)),
            Book::new("Reading", "Author", at(2025, 1, 1)),
        ];
        assert_eq!(books_in_year(&books, 2025).len(), 1);
        assert_eq!(books_in_year(&books, 2024).len(), 1);
    }

    #[test]
    fn genres_count_every_tag() {
        let books = vec![
            completed(1, &["Fantasy", "Fiction"]),
            completed(2, &["Fantasy"]),
            completed(3, &["Mystery", "Fiction"]),
        ];
        let refs: Vec<&Book> = books.iter().collect();
        let stats = genre_distribution(&refs);

        let total: usize = stats.iter().map(|s| s.count).sum();
        assert_eq!(total, 5);
        assert_eq!(stats[0].genre, "Fantasy");
        assert_eq!(stats[1].genre, "Fiction");
        assert_eq!(stats[2].genre, "Mystery");
    }

    #[test]
    fn genre_ties_are_alphabetical() {
        let books = vec![completed(1, &["Zen", "Art", "Mystery"])];
        let refs: Vec<&Book> = books.iter().collect();
        let names: Vec<String> = genre_distribution(&refs)
            .into_iter()
            .map(|s| s.genre)
            .collect();
        assert_eq!(names, vec!["Art", "Mystery", "Zen"]);
    }

    #[test]
    fn months_always_twelve() {
        let books = vec![completed(2, &[]), completed(2, &[]), completed(11, &[])];
        let refs: Vec<&Book> = books.iter().collect();
        let months = monthly_distribution(&refs);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, "Jan");
        assert_eq!(months[11].month, "Dec");
        assert_eq!(months[1].count, 2);
        assert_eq!(months[10].count, 1);
        assert_eq!(months.iter().map(|m| m.count).sum::<usize>(), 3);

        assert!(monthly_distribution(&[]).iter().all(|m| m.count == 0));
    }

    #[test]
    fn ratings_sorted_numerically() {
        let books = vec![
            completed(1, &[]).with_rating(4.5),
            completed(2, &[]).with_rating(2.0),
            completed(3, &[]).with_rating(4.5),
            completed(4, &[]),
        ];
        let refs: Vec<&Book> = books.iter().collect();
        let stats = rating_distribution(&refs);

        assert_eq!(
            stats,
            vec![
                RatingStat {
                    rating: "2.0".into(),
                    count: 1
                },
                RatingStat {
                    rating: "4.5".into(),
                    count: 2
                },
            ]
        );
    }
}
