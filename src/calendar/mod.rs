//! Calendar markings derived from the mood log.
//!
//! Two presentations share this module: the month view, which colors each
//! logged day and highlights the focused day, and the year heatmap in
//! [`year`], which lays a whole year out as fixed-width rows.

pub mod year;

pub use year::{can_show_next_year, year_grid, DayCell, HeatmapCell, HeatmapRow, YearGrid};

use crate::constants::{MARKED_TEXT_COLOR, SELECTED_COLOR, SELECTED_TEXT_COLOR};
use crate::date_key::{date_key, DateKey};
use crate::errors::{AppError, AppResult};
use crate::log_store::MoodLog;
use crate::mood::{self, Mood};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// How one day is drawn in the month view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarMarking {
    /// Mood logged for the day, when it resolves in the catalog.
    pub mood: Option<&'static Mood>,
    /// Whether the day is the focused one.
    pub selected: bool,
}

impl CalendarMarking {
    /// Fill color of the day cell.
    pub fn color(&self) -> Option<&'static str> {
        match (self.mood, self.selected) {
            (Some(mood), _) => Some(mood.color),
            (None, true) => Some(SELECTED_COLOR),
            (None, false) => None,
        }
    }

    /// Text color of the day number.
    pub fn text_color(&self) -> Option<&'static str> {
        match (self.mood, self.selected) {
            (Some(_), _) => Some(MARKED_TEXT_COLOR),
            (None, true) => Some(SELECTED_TEXT_COLOR),
            (None, false) => None,
        }
    }
}

/// Builds the month-view markings.
///
/// Entries whose mood does not resolve are left unmarked. When `focused` is
/// set, that day is flagged as selected on top of any mood marking it
/// already has.
pub fn marks_for(log: &MoodLog, focused: Option<DateKey>) -> BTreeMap<DateKey, CalendarMarking> {
    let mut marks: BTreeMap<DateKey, CalendarMarking> = log
        .iter()
        .filter_map(|(key, entry)| {
            mood::find(&entry.mood_id).map(|mood| {
                (
                    *key,
                    CalendarMarking {
                        mood: Some(mood),
                        selected: false,
                    },
                )
            })
        })
        .collect();

    if let Some(focused) = focused {
        marks.entry(focused).or_default().selected = true;
    }
    marks
}

/// Weeks of a month, Sunday first, with `None` outside the month.
///
/// # Errors
///
/// Returns `AppError::Date` for a month that does not exist.
pub fn month_weeks(year: i32, month: u32) -> AppResult<Vec<[Option<DateKey>; 7]>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Date(format!("Invalid month {:04}-{:02}", year, month)))?;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut date = first;
    while date.month() == month {
        let column = date.weekday().num_days_from_sunday() as usize;
        week[column] = Some(date_key(date));
        if column == 6 {
            weeks.push(week);
            week = [None; 7];
        }
        date += Duration::days(1);
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    Ok(weeks)
}
