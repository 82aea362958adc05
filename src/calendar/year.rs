//! Year heatmap: every day of a year in fixed-width rows.

use crate::constants::{EMPTY_CELL_COLOR, MAX_HEATMAP_COLUMNS};
use crate::date_key::{date_key, DateKey};
use crate::errors::{AppError, AppResult};
use crate::log_store::MoodLog;
use crate::mood::{self, Mood};
use chrono::{Datelike, Duration, NaiveDate};

/// One day of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// The day.
    pub key: DateKey,
    /// Logged mood; always `None` for future days and dangling ids.
    pub mood: Option<&'static Mood>,
    /// After today. Future cells are inert.
    pub is_future: bool,
    /// Exactly today.
    pub is_today: bool,
    /// First day of its month.
    pub is_month_start: bool,
}

impl DayCell {
    /// Fill color of the cell.
    pub fn color(&self) -> &'static str {
        self.mood.map_or(EMPTY_CELL_COLOR, |mood| mood.color)
    }

    /// Whether pressing the cell may open the day.
    pub fn is_interactive(&self) -> bool {
        !self.is_future
    }
}

/// A heatmap slot: a real day or padding after Dec 31.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeatmapCell {
    /// A calendar day.
    Day(DayCell),
    /// Non-interactive filler completing the last row.
    Placeholder,
}

impl HeatmapCell {
    /// The day behind this cell, if any.
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            HeatmapCell::Day(day) => Some(day),
            HeatmapCell::Placeholder => None,
        }
    }
}

/// One row of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapRow {
    /// Month number (1-12) when a month starts in this row.
    pub label: Option<u32>,
    /// Exactly `columns` cells.
    pub cells: Vec<HeatmapCell>,
}

/// A full year laid out for the heatmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    /// Displayed year.
    pub year: i32,
    /// Cells per row.
    pub columns: usize,
    /// Rows in chronological order.
    pub rows: Vec<HeatmapRow>,
}

impl YearGrid {
    /// Every real day, in order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter_map(HeatmapCell::day)
    }

    /// Looks up one day of the grid.
    pub fn day(&self, key: DateKey) -> Option<&DayCell> {
        self.days().find(|day| day.key == key)
    }
}

/// Lays out `year` as rows of `columns` days.
///
/// Each row is labelled with the month that starts in it. With at most 28
/// columns a row can never contain two month starts.
///
/// # Errors
///
/// Returns `AppError::Config` when `columns` is outside `1..=28` and
/// `AppError::Date` for a year chrono cannot represent.
///
/// # Examples
///
/// ```
/// use moodflow::calendar::year_grid;
/// use moodflow::log_store::MoodLog;
///
/// let today = "2025-03-01".parse().unwrap();
/// let grid = year_grid(&MoodLog::new(), 2024, today, 20).unwrap();
/// assert_eq!(grid.days().count(), 366);
/// assert_eq!(grid.rows.len(), 19);
/// ```
pub fn year_grid(log: &MoodLog, year: i32, today: DateKey, columns: usize) -> AppResult<YearGrid> {
    if columns == 0 || columns > MAX_HEATMAP_COLUMNS {
        return Err(AppError::Config(format!(
            "Heatmap columns must be between 1 and {}, got {}",
            MAX_HEATMAP_COLUMNS, columns
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::Date(format!("Unsupported year {}", year)))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| AppError::Date(format!("Unsupported year {}", year)))?;

    let mut days = Vec::with_capacity(366);
    let mut date = first;
    while date <= last {
        let key = date_key(date);
        let is_future = key.is_after(today);
        let mood = if is_future {
            None
        } else {
            log.get(&key).and_then(|entry| mood::find(&entry.mood_id))
        };
        days.push(DayCell {
            key,
            mood,
            is_future,
            is_today: key == today,
            is_month_start: date.day() == 1,
        });
        date += Duration::days(1);
    }

    let rows = days
        .chunks(columns)
        .map(|chunk| {
            let label = chunk
                .iter()
                .find(|day| day.is_month_start)
                .map(|day| day.key.date().month());
            let mut cells: Vec<HeatmapCell> = chunk.iter().cloned().map(HeatmapCell::Day).collect();
            cells.resize(columns, HeatmapCell::Placeholder);
            HeatmapRow { label, cells }
        })
        .collect();

    Ok(YearGrid {
        year,
        columns,
        rows,
    })
}

/// Year navigation stops at the current year.
pub fn can_show_next_year(year: i32, today: DateKey) -> bool {
    year < today.date().year()
}
