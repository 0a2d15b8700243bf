// file: src/review/schedule.rs
// description: spreads unreviewed highlights evenly over the days of a month
// reference: internal scheduling logic

use crate::models::Highlight;
use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::HashSet;

/// `YYYY-MM` key under which reviews of a month are recorded.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Highlights shown per day so that `pending` ones fit in the month.
pub fn per_day(pending: usize, date: NaiveDate) -> usize {
    pending.div_ceil(days_in_month(date) as usize)
}

/// Highlights due for review on `date`.
///
/// The pool is every non-archived highlight not yet reviewed this month,
/// newest first; undated ones go last. Day `d` gets the `d`-th run of
/// [`per_day`] highlights, so late days of the month may get none.
pub fn daily_selection<'a>(
    pool: &'a [Highlight],
    reviewed_this_month: &HashSet<String>,
    date: NaiveDate,
) -> Vec<&'a Highlight> {
    let mut pending: Vec<&Highlight> = pool
        .iter()
        .filter(|h| !h.archived && !reviewed_this_month.contains(&h.id))
        .collect();

    if pending.is_empty() {
        return Vec::new();
    }

    // None sorts below any timestamp, so undated highlights end up last
    pending.sort_by_key(|h| Reverse(h.created_at));

    let step = per_day(pending.len(), date);
    let start = (date.day() as usize - 1) * step;
    if start >= pending.len() {
        return Vec::new();
    }
    let end = (start + step).min(pending.len());

    pending[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// `count` highlights, id "0" the oldest.
    fn pool(count: usize) -> Vec<Highlight> {
        (0..count)
            .map(|i| {
                let mut h = Highlight::new(i.to_string(), format!("passage {}", i));
                h.created_at = Some(Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap());
                h
            })
            .collect()
    }

    fn ids(selection: &[&Highlight]) -> Vec<String> {
        selection.iter().map(|h| h.id.clone()).collect()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(day(2024, 2, 10)), 29);
        assert_eq!(days_in_month(day(2023, 2, 10)), 28);
        assert_eq!(days_in_month(day(2025, 12, 31)), 31);
        assert_eq!(days_in_month(day(2025, 4, 1)), 30);
        assert_eq!(month_key(day(2025, 4, 1)), "2025-04");
    }

    #[test]
    fn test_first_days_take_newest() {
        let highlights = pool(40);
        let reviewed = HashSet::new();

        // 40 over 30 days: two per day, days 21..=30 get nothing
        let first = daily_selection(&highlights, &reviewed, day(2025, 4, 1));
        assert_eq!(ids(&first), vec!["39", "38"]);

        let twentieth = daily_selection(&highlights, &reviewed, day(2025, 4, 20));
        assert_eq!(ids(&twentieth), vec!["1", "0"]);

        assert!(daily_selection(&highlights, &reviewed, day(2025, 4, 21)).is_empty());
        assert!(daily_selection(&highlights, &reviewed, day(2025, 4, 30)).is_empty());
    }

    #[test]
    fn test_month_length_changes_the_last_slice() {
        let highlights = pool(29);
        let reviewed = HashSet::new();

        // one per day in a leap February, every day covered
        let last_leap = daily_selection(&highlights, &reviewed, day(2024, 2, 29));
        assert_eq!(ids(&last_leap), vec!["0"]);

        // two per day in a 28-day February
        assert_eq!(per_day(29, day(2023, 2, 1)), 2);
        let fifteenth = daily_selection(&highlights, &reviewed, day(2023, 2, 15));
        assert_eq!(ids(&fifteenth), vec!["0"]);
        assert!(daily_selection(&highlights, &reviewed, day(2023, 2, 28)).is_empty());
    }

    #[test]
    fn test_archived_and_reviewed_are_skipped() {
        let mut highlights = pool(3);
        highlights[2].archived = true;
        let reviewed: HashSet<String> = ["1".to_string()].into_iter().collect();

        let today = daily_selection(&highlights, &reviewed, day(2025, 1, 1));
        assert_eq!(ids(&today), vec!["0"]);
    }

    #[test]
    fn test_empty_pool() {
        let reviewed = HashSet::new();
        assert!(daily_selection(&[], &reviewed, day(2025, 1, 1)).is_empty());

        let highlights = pool(2);
        let all: HashSet<String> = ["0".to_string(), "1".to_string()].into_iter().collect();
        assert!(daily_selection(&highlights, &all, day(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_undated_highlights_come_last() {
        let mut highlights = pool(2);
        highlights.push(Highlight::new("undated", "no timestamp"));
        let reviewed = HashSet::new();

        let today = daily_selection(&highlights, &reviewed, day(2025, 1, 1));
        assert_eq!(ids(&today), vec!["1"]);
        let third = daily_selection(&highlights, &reviewed, day(2025, 1, 3));
        assert_eq!(ids(&third), vec!["undated"]);
    }
}
