use chrono::{Datelike, Days, NaiveDate};

/// This is the standard way of converting a date to a string in contribgrid.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the Saturday closing the Sunday based week of `date`. `None` past the last
/// representable Saturday.
pub fn end_of_week(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(
        6 - date.weekday().num_days_from_sunday() as u64,
    ))
}

/// First Sunday on or after `date`.
pub fn next_sunday(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(
        (7 - date.weekday().num_days_from_sunday() as u64) % 7,
    ))
}

/// Last Saturday on or before `date`.
pub fn previous_saturday(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(
        (date.weekday().num_days_from_sunday() as u64 + 1) % 7,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Weekday};

    use super::{date_to_key, end_of_week, next_sunday, previous_saturday};

    const SATURDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();

    #[test]
    fn test_end_of_week() {
        for day in 2..=8 {
            let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            assert_eq!(end_of_week(date), Some(SATURDAY), "{date}");
        }
        assert_eq!(
            end_of_week(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn test_end_of_week_past_the_calendar() {
        let last = previous_saturday(NaiveDate::MAX).unwrap();
        assert_eq!(end_of_week(last), Some(last));
        if NaiveDate::MAX.weekday() != Weekday::Sat {
            assert_eq!(end_of_week(NaiveDate::MAX), None);
        }
    }

    #[test]
    fn test_week_bounds() {
        for day in 2..=8 {
            let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            let sunday = next_sunday(date).unwrap();
            assert_eq!(sunday.weekday(), Weekday::Sun);
            assert!(sunday >= date && (sunday - date).num_days() < 7);

            let saturday = previous_saturday(date).unwrap();
            assert_eq!(saturday.weekday(), Weekday::Sat);
            assert!(saturday <= date && (date - saturday).num_days() < 7);
        }
        assert_eq!(previous_saturday(SATURDAY), Some(SATURDAY));
        assert_eq!(next_sunday(NaiveDate::MIN).unwrap().weekday(), Weekday::Sun);
    }

    #[test]
    fn test_date_to_key_pads() {
        assert_eq!(
            date_to_key(NaiveDate::from_ymd_opt(987, 1, 2).unwrap()),
            "0987-01-02"
        );
    }
}
