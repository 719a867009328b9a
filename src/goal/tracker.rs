use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::book::{Book, ReadingStatus};

use super::{ReadingGoal, YearlyGoal};

/// Owns the current year's goal and the archive of past years.
///
/// No operation fails. Counts are unsigned and decrements saturate at zero.
/// The archive never holds two entries for the same year, nor an entry for
/// the current year.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalTracker {
    current: ReadingGoal,
    history: Vec<YearlyGoal>,
    migrated: bool,
}

impl GoalTracker {
    pub fn new(year: i32) -> Self {
        GoalTracker {
            current: ReadingGoal::new(year),
            history: Vec::new(),
            migrated: false,
        }
    }

    /// Rebuild from persisted parts, dropping archive entries that would
    /// duplicate a year.
    pub fn from_parts(current: ReadingGoal, history: Vec<YearlyGoal>, migrated: bool) -> Self {
        let mut tracker = GoalTracker {
            current,
            history: Vec::with_capacity(history.len()),
            migrated,
        };
        for goal in history {
            if goal.year == tracker.current.year || tracker.history_index(goal.year).is_some() {
                warn!(year = goal.year, "dropping duplicate historical goal");
                continue;
            }
            tracker.history.push(goal);
        }
        tracker
    }

    pub fn current(&self) -> &ReadingGoal {
        &self.current
    }

    pub fn history(&self) -> &[YearlyGoal] {
        &self.history
    }

    pub fn year(&self) -> i32 {
        self.current.year
    }

    pub fn is_migrated(&self) -> bool {
        self.migrated
    }

    /// Set the current year's target. 0 means no goal.
    pub fn set_target(&mut self, target_books: u32) {
        debug!(year = self.current.year, target_books, "goal target set");
        self.current.target_books = target_books;
    }

    /// Count a transition into `completed`.
    ///
    /// `previous` is the status this tracker last counted for the book, or
    /// `None` if the book was never counted. Calling with a previous status
    /// of `completed` is a no-op so a repeated call for the same transition
    /// cannot double count.
    pub fn record_completion(&mut self, book: &Book, previous: Option<ReadingStatus>) {
        if previous == Some(ReadingStatus::Completed) {
            debug!(book_id = %book.id, "completion already counted");
            return;
        }
        let Some(year) = book.completion_year() else {
            return;
        };

        if year == self.current.year {
            self.current.completed_books = self.current.completed_books.saturating_add(1);
            return;
        }

        match self.history_index(year) {
            Some(index) => {
                let goal = &mut self.history[index];
                goal.completed_books = goal.completed_books.saturating_add(1);
            }
            None => {
                debug!(year, "creating historical goal for completion");
                self.history.push(YearlyGoal::new(year, 0, 1));
            }
        }
    }

    /// Inverse of [`record_completion`](Self::record_completion).
    ///
    /// `book` must still carry its completion data, i.e. be the record as it
    /// was before the transition or deletion.
    pub fn record_uncompletion(&mut self, book: &Book) {
        let Some(year) = book.completion_year() else {
            return;
        };

        if year == self.current.year {
            self.current.completed_books = self.current.completed_books.saturating_sub(1);
            return;
        }

        if let Some(index) = self.history_index(year) {
            let goal = &mut self.history[index];
            goal.completed_books = goal.completed_books.saturating_sub(1);
        }
    }

    /// Reconcile the current count with the book records. Returns the count.
    pub fn recompute_current_year(&mut self, books: &[Book]) -> u32 {
        let year = self.current.year;
        let count = books.iter().filter(|book| book.completed_in(year)).count();
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        if count != self.current.completed_books {
            debug!(
                year,
                cached = self.current.completed_books,
                actual = count,
                "reconciled current year count"
            );
        }
        self.current.completed_books = count;
        count
    }

    /// Archive the current goal if `today` is in a later year.
    ///
    /// The new goal keeps the previous target and starts at zero. Returns the
    /// archived snapshot when a rollover happened. A clock reading an earlier
    /// year never rolls back; archived goals stay as they are.
    pub fn advance_year_if_needed(&mut self, today: NaiveDate) -> Option<YearlyGoal> {
        let new_year = today.year();
        if new_year <= self.current.year {
            if new_year < self.current.year {
                warn!(
                    clock_year = new_year,
                    goal_year = self.current.year,
                    "clock is behind the current goal, not rolling back"
                );
            }
            return None;
        }

        let archived = self.current.to_yearly();
        let next = ReadingGoal::with_target(new_year, self.current.target_books);

        self.history.retain(|goal| goal.year != new_year);
        self.upsert_history(archived.clone());
        self.current = next;

        info!(
            from = archived.year,
            to = new_year,
            target_books = archived.target_books,
            completed_books = archived.completed_books,
            "reading goal rolled over"
        );
        Some(archived)
    }

    /// One-time synthesis of historical goals from completed books.
    ///
    /// Each past year with completions and no archive entry gets one, using
    /// the current target as an estimate of that year's target. Returns the
    /// number of entries created; 0 once migration has run.
    pub fn migrate_legacy_goals(&mut self, books: &[Book]) -> usize {
        if self.migrated {
            return 0;
        }

        let mut by_year: BTreeMap<i32, u32> = BTreeMap::new();
        for year in books.iter().filter_map(Book::completion_year) {
            *by_year.entry(year).or_insert(0) += 1;
        }

        let mut created = 0;
        for (year, completed) in by_year {
            if year == self.current.year || self.history_index(year).is_some() {
                continue;
            }
            self.history
                .push(YearlyGoal::new(year, self.current.target_books, completed));
            created += 1;
        }

        self.migrated = true;
        info!(created, "legacy goal migration finished");
        created
    }

    /// The goal for `year`, as a snapshot.
    pub fn goal_for_year(&self, year: i32) -> Option<YearlyGoal> {
        if year == self.current.year {
            return Some(self.current.to_yearly());
        }
        self.history.iter().find(|goal| goal.year == year).cloned()
    }

    fn history_index(&self, year: i32) -> Option<usize> {
        self.history.iter().position(|goal| goal.year == year)
    }

    fn upsert_history(&mut self, goal: YearlyGoal) {
        match self.history_index(goal.year) {
            Some(index) => self.history[index] = goal,
            None => self.history.push(goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn completed(y: i32, m: u32, d: u32) -> Book {
        let at = Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap();
        Book::new("Title", "Author", at).completed_at(at)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completion_then_uncompletion_restores_current() {
        let mut goals = GoalTracker::new(2025);
        let book = completed(2025, 3, 1);

        goals.record_completion(&book, Some(ReadingStatus::CurrentlyReading));
        assert_eq!(goals.current().completed_books, 1);

        goals.record_uncompletion(&book);
        assert_eq!(goals.current().completed_books, 0);
    }

    #[test]
    fn completion_then_uncompletion_restores_history() {
        let mut goals = GoalTracker::from_parts(
            ReadingGoal::new(2025),
            vec![YearlyGoal::new(2023, 10, 7)],
            true,
        );
        let book = completed(2023, 6, 1);

        goals.record_completion(&book, None);
        assert_eq!(goals.goal_for_year(2023).unwrap().completed_books, 8);

        goals.record_uncompletion(&book);
        assert_eq!(goals.goal_for_year(2023).unwrap().completed_books, 7);
        assert_eq!(goals.current().completed_books, 0);
    }

    #[test]
    fn completion_creates_missing_history_entry() {
        let mut goals = GoalTracker::new(2025);
        goals.record_completion(&completed(2022, 1, 1), None);

        let goal = goals.goal_for_year(2022).unwrap();
        assert_eq!(goal.completed_books, 1);
        assert_eq!(goal.target_books, 0);
    }

    #[test]
    fn already_completed_is_not_counted_twice() {
        let mut goals = GoalTracker::new(2025);
        let book = completed(2025, 3, 1);
        goals.record_completion(&book, None);
        goals.record_completion(&book, Some(ReadingStatus::Completed));
        assert_eq!(goals.current().completed_books, 1);
    }

    #[test]
    fn uncompletion_floors_at_zero() {
        let mut goals = GoalTracker::new(2025);
        goals.record_uncompletion(&completed(2025, 3, 1));
        assert_eq!(goals.current().completed_books, 0);
    }

    #[test]
    fn recompute_ignores_other_years_and_statuses() {
        let mut goals = GoalTracker::new(2025);
        let books = vec![
            completed(2025, 1, 5),
            completed(2025, 7, 5),
            completed(2024, 12, 31),
            Book::new("Unread", "Author", Utc::now()),
        ];
        assert_eq!(goals.recompute_current_year(&books), 2);
    }

    #[test]
    fn rollover_archives_and_carries_target() {
        let mut goals = GoalTracker::new(2025);
        goals.set_target(12);
        let books: Vec<Book> = (1..=12).map(|m| completed(2025, m, 1)).collect();
        goals.recompute_current_year(&books);

        let archived = goals.advance_year_if_needed(date(2026, 1, 1)).unwrap();
        assert_eq!(archived.year, 2025);
        assert_eq!(archived.target_books, 12);
        assert_eq!(archived.completed_books, 12);

        assert_eq!(goals.year(), 2026);
        assert_eq!(goals.current().completed_books, 0);
        assert_eq!(goals.current().target_books, 12);
    }

    #[test]
    fn rollover_is_noop_within_year() {
        let mut goals = GoalTracker::new(2025);
        assert!(goals.advance_year_if_needed(date(2025, 12, 31)).is_none());
        assert!(goals.history().is_empty());
    }

    #[test]
    fn backwards_clock_keeps_archive() {
        let mut goals = GoalTracker::from_parts(
            ReadingGoal::with_target(2025, 12),
            vec![YearlyGoal::new(2024, 30, 28)],
            true,
        );

        assert!(goals.advance_year_if_needed(date(2024, 6, 1)).is_none());
        assert_eq!(goals.year(), 2025);
        assert_eq!(goals.current().target_books, 12);

        let archived = goals.goal_for_year(2024).unwrap();
        assert_eq!(archived.target_books, 30);
        assert_eq!(archived.completed_books, 28);
        assert_eq!(goals.history().len(), 1);
    }

    #[test]
    fn archived_goal_is_detached_from_current() {
        let mut goals = GoalTracker::new(2025);
        goals.set_target(5);
        goals.advance_year_if_needed(date(2026, 2, 1));

        goals.set_target(50);
        goals.record_completion(&completed(2026, 2, 2), None);

        let archived = goals.goal_for_year(2025).unwrap();
        assert_eq!(archived.target_books, 5);
        assert_eq!(archived.completed_books, 0);
    }

    #[test]
    fn rollover_never_duplicates_years() {
        let mut goals = GoalTracker::new(2025);
        // A future-dated completion created an archive entry for 2026.
        goals.record_completion(&completed(2026, 1, 3), None);
        goals.advance_year_if_needed(date(2026, 1, 5));

        let years: Vec<i32> = goals.history().iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2025]);
        assert_eq!(goals.year(), 2026);
    }

    #[test]
    fn migration_runs_once() {
        let mut goals = GoalTracker::new(2025);
        goals.set_target(20);
        let books = vec![
            completed(2023, 2, 1),
            completed(2023, 5, 1),
            completed(2024, 5, 1),
            completed(2025, 5, 1),
        ];

        assert_eq!(goals.migrate_legacy_goals(&books), 2);
        let goal_2023 = goals.goal_for_year(2023).unwrap();
        assert_eq!(goal_2023.completed_books, 2);
        assert_eq!(goal_2023.target_books, 20);
        assert!(goals.is_migrated());

        assert_eq!(goals.migrate_legacy_goals(&books), 0);
        assert_eq!(goals.history().len(), 2);
    }

    #[test]
    fn migration_keeps_existing_entries() {
        let mut goals = GoalTracker::from_parts(
            ReadingGoal::new(2025),
            vec![YearlyGoal::new(2024, 30, 28)],
            false,
        );
        goals.migrate_legacy_goals(&[completed(2024, 5, 1)]);
        let goal = goals.goal_for_year(2024).unwrap();
        assert_eq!((goal.target_books, goal.completed_books), (30, 28));
    }

    #[test]
    fn from_parts_drops_duplicates() {
        let goals = GoalTracker::from_parts(
            ReadingGoal::new(2025),
            vec![
                YearlyGoal::new(2024, 1, 1),
                YearlyGoal::new(2024, 2, 2),
                YearlyGoal::new(2025, 3, 3),
            ],
            true,
        );
        assert_eq!(goals.history().len(), 1);
        assert_eq!(goals.goal_for_year(2024).unwrap().target_books, 1);
    }

    #[test]
    fn goal_for_unknown_year() {
        let goals = GoalTracker::new(2025);
        assert!(goals.goal_for_year(1999).is_none());
        assert_eq!(goals.goal_for_year(2025).unwrap().year, 2025);
    }
}
