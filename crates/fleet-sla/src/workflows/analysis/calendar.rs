use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Counts weekdays (Monday through Friday) in the half-open range
/// `[start, end)`. Returns zero when `end <= start`.
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }

    start
        .iter_days()
        .take_while(|day| *day < end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Business days spanned by a maintenance window, both endpoints inclusive:
/// the exit date is pushed one day forward and treated as the exclusive end.
pub fn maintenance_business_days(entry: NaiveDate, exit: NaiveDate) -> u32 {
    count_business_days(entry, exit + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn single_weekday_window_counts_one() {
        // 2024-01-01 is a Monday.
        assert_eq!(maintenance_business_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
    }

    #[test]
    fn single_weekend_window_counts_zero() {
        // 2024-01-06 is a Saturday.
        assert_eq!(maintenance_business_days(date(2024, 1, 6), date(2024, 1, 6)), 0);
    }

    #[test]
    fn monday_to_tuesday_counts_both_endpoints() {
        assert_eq!(maintenance_business_days(date(2024, 1, 1), date(2024, 1, 2)), 2);
    }

    #[test]
    fn window_spanning_weekends_skips_them() {
        // Jan 1 (Mon) through Jan 10 (Wed) inclusive: two weekends excluded.
        assert_eq!(maintenance_business_days(date(2024, 1, 1), date(2024, 1, 10)), 8);
    }

    #[test]
    fn inverted_range_counts_zero() {
        assert_eq!(count_business_days(date(2024, 1, 10), date(2024, 1, 1)), 0);
    }

    #[test]
    fn half_open_end_is_exclusive() {
        // [Mon, Tue) covers only Monday.
        assert_eq!(count_business_days(date(2024, 1, 1), date(2024, 1, 2)), 1);
    }
}
