//! Builds the contribution heatmap.
//!  - The grid always has [WEEKS] columns of 7 days, Sunday first.
//!  - The last column ends on the Saturday of the week `today` falls into.
//!  - Days missing from the source become empty cells, so every cell is filled.

pub mod entities;
pub mod normalize;

use std::collections::HashMap;

use chrono::{Datelike, Days, Month, NaiveDate};
use tracing::{debug, instrument, trace, warn};

use crate::utils::time::{date_to_key, end_of_week, next_sunday, previous_saturday};

use entities::{
    ActivityGrid, ActivityRecord, GridCell, GridLayout, SizedGrid, DAYS_PER_WEEK, WEEKS,
};
use normalize::normalize_date;

const WINDOW_DAYS: u64 = (WEEKS * DAYS_PER_WEEK) as u64;

/// Lays `records` out on a calendar grid ending with the week of `today`.
///
/// Records with dates outside of the window or with dates that can't be parsed don't show up in
/// the grid, but their counts are still part of [ActivityGrid::total_contributions]. When several
/// records fall on the same day the last one wins. A `today` so close to the ends of the calendar
/// that its [window] can't be represented gets the nearest window that can.
#[instrument(skip(records), fields(records = records.len()))]
pub fn build_grid(records: &[ActivityRecord], today: NaiveDate, layout: GridLayout) -> SizedGrid {
    let by_date = records
        .iter()
        .map(|record| (normalize_date(&record.date), record))
        .collect::<HashMap<_, _>>();

    let (start, end) = window(today).unwrap_or_else(|| {
        warn!("No full window around {today}, using the closest one");
        edge_window(today)
    });
    debug!("Building grid from {start} to {end}");

    let mut labels = MonthLabels::new(today);
    let weeks = (0..WEEKS)
        .map(|week| {
            std::array::from_fn(|day| {
                let offset = Days::new((week * DAYS_PER_WEEK + day) as u64);
                let date = start.checked_add_days(offset).unwrap_or(end);
                labels.observe(week, date);
                match by_date.get(&date_to_key(date)) {
                    Some(record) => GridCell::placed(date, record),
                    None => GridCell::empty(date),
                }
            })
        })
        .collect::<Vec<_>>();

    let total_contributions = records
        .iter()
        .fold(0u64, |total, record| total.saturating_add(record.count));
    trace!("Total contributions {total_contributions}");

    SizedGrid {
        grid: ActivityGrid {
            weeks,
            month_labels: labels.into_inner(),
            total_contributions,
        },
        width: layout.width(),
        height: layout.height(),
    }
}

/// First and last day of the grid ending with the week of `today`. `None` when part of it falls
/// outside of the dates chrono can represent.
pub fn window(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let end = end_of_week(today)?;
    let start = end.checked_sub_days(Days::new(WINDOW_DAYS - 1))?;
    Some((start, end))
}

/// Earliest or latest full window, whichever end of the calendar `today` is at.
fn edge_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let span = Days::new(WINDOW_DAYS - 1);
    if today.year() < 0 {
        let start = next_sunday(NaiveDate::MIN).unwrap_or(NaiveDate::MIN);
        (start, start.checked_add_days(span).unwrap_or(NaiveDate::MAX))
    } else {
        let end = previous_saturday(NaiveDate::MAX).unwrap_or(NaiveDate::MAX);
        (end.checked_sub_days(span).unwrap_or(NaiveDate::MIN), end)
    }
}

/// Tracks which week column gets which month label. A month is labeled once, at the week holding
/// its first day, and only if that day isn't in the future.
struct MonthLabels {
    today: NaiveDate,
    labels: Vec<Option<Month>>,
    shown: [bool; 12],
}

impl MonthLabels {
    fn new(today: NaiveDate) -> Self {
        Self {
            today,
            labels: vec![None; WEEKS],
            shown: [false; 12],
        }
    }

    fn observe(&mut self, week: usize, date: NaiveDate) {
        let month = date.month0() as usize;
        if date.day() == 1 && date <= self.today && !self.shown[month] {
            self.shown[month] = true;
            self.labels[week] = Month::try_from(date.month() as u8).ok();
        }
    }

    fn into_inner(self) -> Vec<Option<Month>> {
        self.labels
    }
}
