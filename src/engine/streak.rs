//! Calendar-day streak arithmetic.
//!
//! A "day" is a UTC calendar date. Everything that needs day granularity
//! goes through [`calendar_date`] so the reference timezone lives in
//! exactly one place.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

fn calendar_date(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

fn day_gap(prev: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (calendar_date(now) - calendar_date(prev)).num_days()
}

/// Next value of the current streak after a completion at `now`, given the
/// previous activity timestamp and streak.
///
/// Same-day completions keep the streak (but establish at least 1), the next
/// day extends it, anything later restarts at 1. A negative gap means clock
/// skew and is treated as same-day.
pub fn advance(
    prev_activity: Option<DateTime<Utc>>,
    prev_streak: i32,
    now: DateTime<Utc>,
) -> i32 {
    let Some(prev) = prev_activity else {
        return 1;
    };

    match day_gap(prev, now) {
        g if g <= 0 => prev_streak.max(1),
        1 => prev_streak + 1,
        _ => 1,
    }
}

/// Length of the longest run of consecutive distinct calendar days in the
/// full completion history. Multiple completions on one day collapse into
/// a single date.
pub fn longest_run(times: &[DateTime<Utc>]) -> i32 {
    let days: BTreeSet<NaiveDate> = times.iter().map(|t| calendar_date(*t)).collect();

    let mut longest = 0i32;
    let mut run = 0i32;
    let mut prev: Option<NaiveDate> = None;

    for day in days {
        run = match prev {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn first_activity_starts_at_one() {
        assert_eq!(advance(None, 0, at(2024, 1, 1, 12)), 1);
    }

    #[test]
    fn consecutive_days_increment() {
        let day1 = at(2024, 1, 1, 23);
        let day2 = at(2024, 1, 2, 0);
        let day3 = at(2024, 1, 3, 18);

        let s1 = advance(None, 0, day1);
        let s2 = advance(Some(day1), s1, day2);
        let s3 = advance(Some(day2), s2, day3);
        assert_eq!((s1, s2, s3), (1, 2, 3));
    }

    #[test]
    fn same_day_does_not_increment() {
        let morning = at(2024, 1, 1, 8);
        let evening = at(2024, 1, 1, 21);
        assert_eq!(advance(Some(morning), 4, evening), 4);
    }

    #[test]
    fn same_day_establishes_at_least_one() {
        let morning = at(2024, 1, 1, 8);
        let evening = at(2024, 1, 1, 21);
        assert_eq!(advance(Some(morning), 0, evening), 1);
    }

    #[test]
    fn gap_resets_to_one() {
        let day3 = at(2024, 1, 3, 12);
        let day5 = at(2024, 1, 5, 12);
        assert_eq!(advance(Some(day3), 3, day5), 1);
    }

    #[test]
    fn clock_skew_counts_as_same_day() {
        let later = at(2024, 1, 2, 12);
        let earlier = at(2024, 1, 1, 12);
        assert_eq!(advance(Some(later), 5, earlier), 5);
    }

    #[test]
    fn longest_run_spans_whole_history() {
        // Jan 1-3, gap, Jan 6-9 -> longest run is the trailing 4
        let times = vec![
            at(2024, 1, 1, 9),
            at(2024, 1, 2, 9),
            at(2024, 1, 3, 9),
            at(2024, 1, 6, 9),
            at(2024, 1, 7, 9),
            at(2024, 1, 8, 9),
            at(2024, 1, 9, 9),
        ];
        assert_eq!(longest_run(&times), 4);
    }

    #[test]
    fn longest_run_collapses_same_day() {
        let times = vec![
            at(2024, 1, 1, 9),
            at(2024, 1, 1, 15),
            at(2024, 1, 1, 22),
            at(2024, 1, 2, 9),
        ];
        assert_eq!(longest_run(&times), 2);
    }

    #[test]
    fn longest_run_empty_history() {
        assert_eq!(longest_run(&[]), 0);
    }
}
