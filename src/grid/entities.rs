use std::{fmt::Display, ops::Deref};

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::time::date_to_key;

pub const WEEKS: usize = 50;
pub const DAYS_PER_WEEK: usize = 7;
pub const MAX_LEVEL: u8 = 4;

/// A single day of activity as it comes from the data source. The date is kept as a raw string
/// because sources are not consistent about the format, see
/// [normalize_date](super::normalize::normalize_date).
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ActivityRecord {
    pub date: String,
    pub count: u64,
    #[serde(default, deserialize_with = "level_de::deserialize")]
    pub level: i64,
}

impl ActivityRecord {
    pub fn new(date: impl Into<String>, count: u64, level: i64) -> Self {
        Self {
            date: date.into(),
            count,
            level,
        }
    }
}

/// Intensity tier of a day, always within `0..=4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Level(u8);

impl Level {
    pub const NONE: Level = Level(0);

    /// Out of range values coming from a source are clamped instead of rejected.
    pub fn clamped(value: i64) -> Self {
        Level(value.clamp(0, MAX_LEVEL as i64) as u8)
    }
}

impl Deref for Level {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One square of the heatmap.
#[derive(PartialEq, Eq, Debug, Serialize, Clone)]
pub struct GridCell {
    pub date: NaiveDate,
    pub count: u64,
    pub level: Level,
}

impl GridCell {
    /// Padding cell for a day the source knows nothing about.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            level: Level::NONE,
        }
    }

    pub fn placed(date: NaiveDate, record: &ActivityRecord) -> Self {
        Self {
            date,
            count: record.count,
            level: Level::clamped(record.level),
        }
    }

    /// Hover text of the cell, e.g. `2024-03-15: 5 contributions`.
    pub fn label(&self) -> String {
        contribution_label(self.date, self.count)
    }
}

pub fn contribution_label(date: NaiveDate, count: u64) -> String {
    format!("{}: {}", date_to_key(date), pluralize_contributions(count))
}

pub fn pluralize_contributions(count: u64) -> String {
    if count == 1 {
        format!("{count} contribution")
    } else {
        format!("{count} contributions")
    }
}

/// Three letter abbreviation used for month labels, `""` when there is no label.
pub fn month_abbreviation(month: Option<Month>) -> &'static str {
    match month {
        Some(month) => &month.name()[..3],
        None => "",
    }
}

/// Dense calendar of [WEEKS] columns, each going from Sunday to Saturday.
#[derive(PartialEq, Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityGrid {
    pub weeks: Vec<[GridCell; DAYS_PER_WEEK]>,
    #[serde(serialize_with = "month_labels_ser::serialize")]
    pub month_labels: Vec<Option<Month>>,
    pub total_contributions: u64,
}

impl ActivityGrid {
    /// Cells in week then day order. Consecutive cells are consecutive days.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks.iter().flatten()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&GridCell> {
        let first = self.first_date()?;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.weeks
            .get(offset / DAYS_PER_WEEK)
            .map(|week| &week[offset % DAYS_PER_WEEK])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|week| week[0].date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|week| week[DAYS_PER_WEEK - 1].date)
    }

    pub fn month_label(&self, week: usize) -> &'static str {
        month_abbreviation(self.month_labels.get(week).copied().flatten())
    }

    /// Sum of counts that actually landed in the grid. Unlike [Self::total_contributions] this
    /// ignores records outside of the window and records with unparseable dates.
    pub fn visible_contributions(&self) -> u64 {
        self.cells()
            .fold(0u64, |total, cell| total.saturating_add(cell.count))
    }
}

/// Grid together with the size it occupies once drawn.
#[derive(PartialEq, Debug, Serialize, Clone)]
pub struct SizedGrid {
    #[serde(flatten)]
    pub grid: ActivityGrid,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_size: f64,
    pub gap: f64,
}

impl GridLayout {
    pub const DEFAULT_CELL_SIZE: f64 = 13.6;
    pub const DEFAULT_GAP: f64 = 3.;

    pub fn new(cell_size: f64, gap: f64) -> Self {
        Self { cell_size, gap }
    }

    pub fn width(&self) -> f64 {
        WEEKS as f64 * (self.cell_size + self.gap)
    }

    pub fn height(&self) -> f64 {
        DAYS_PER_WEEK as f64 * (self.cell_size + self.gap)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_SIZE, Self::DEFAULT_GAP)
    }
}

/// Sources send levels as any JSON number, sometimes `null`. Fractions are floored, the clamp
/// happens once the record is placed.
mod level_de {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level = Option::<f64>::deserialize(deserializer)?;
        // `as` saturates at the bounds of i64.
        Ok(level.map_or(0, |level| level.floor() as i64))
    }
}

mod month_labels_ser {
    use chrono::Month;
    use serde::Serializer;

    use super::month_abbreviation;

    pub fn serialize<S>(labels: &[Option<Month>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(labels.iter().map(|month| month_abbreviation(*month)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Month, NaiveDate};

    use super::{contribution_label, month_abbreviation, ActivityRecord, GridCell, GridLayout, Level};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    #[test]
    fn test_level_clamp() {
        assert_eq!(*Level::clamped(-1), 0);
        assert_eq!(*Level::clamped(0), 0);
        assert_eq!(*Level::clamped(3), 3);
        assert_eq!(*Level::clamped(4), 4);
        assert_eq!(*Level::clamped(9), 4);
        assert_eq!(*Level::clamped(i64::MIN), 0);
    }

    #[test]
    fn test_contribution_label_pluralization() {
        assert_eq!(contribution_label(TEST_DATE, 0), "2024-03-15: 0 contributions");
        assert_eq!(contribution_label(TEST_DATE, 1), "2024-03-15: 1 contribution");
        assert_eq!(contribution_label(TEST_DATE, 12), "2024-03-15: 12 contributions");
    }

    #[test]
    fn test_placed_cell_clamps_level() {
        let cell = GridCell::placed(TEST_DATE, &ActivityRecord::new("2024-03-15", 7, 9));
        assert_eq!(cell.count, 7);
        assert_eq!(*cell.level, 4);
        assert_eq!(cell.label(), "2024-03-15: 7 contributions");
    }

    #[test]
    fn test_month_abbreviation() {
        assert_eq!(month_abbreviation(None), "");
        assert_eq!(month_abbreviation(Some(Month::January)), "Jan");
        assert_eq!(month_abbreviation(Some(Month::May)), "May");
        assert_eq!(month_abbreviation(Some(Month::September)), "Sep");
    }

    #[test]
    fn test_layout_dimensions() {
        let layout = GridLayout::new(10., 2.);
        assert_eq!(layout.width(), 600.);
        assert_eq!(layout.height(), 84.);
    }

    #[test]
    fn test_record_deserialize_without_level() {
        let record: ActivityRecord =
            serde_json::from_str(r#"{"date":"2024-03-15","count":2}"#).unwrap();
        assert_eq!(record, ActivityRecord::new("2024-03-15", 2, 0));
    }

    #[test]
    fn test_record_level_accepts_any_number() {
        let level = |json: &str| {
            serde_json::from_str::<ActivityRecord>(&format!(
                r#"{{"date":"2024-03-15","count":2,"level":{json}}}"#
            ))
            .unwrap()
            .level
        };
        assert_eq!(level("2"), 2);
        assert_eq!(level("2.0"), 2);
        assert_eq!(level("2.7"), 2);
        assert_eq!(level("-0.5"), -1);
        assert_eq!(level("null"), 0);
        assert_eq!(level("1e300"), i64::MAX);

        let record: ActivityRecord =
            serde_json::from_str(r#"{"date":"2024-03-15","count":2,"level":9.5}"#).unwrap();
        assert_eq!(*GridCell::placed(TEST_DATE, &record).level, 4);
    }

    #[test]
    fn test_record_level_rejects_non_numbers() {
        assert!(serde_json::from_str::<ActivityRecord>(
            r#"{"date":"2024-03-15","count":2,"level":"high"}"#
        )
        .is_err());
    }
}
