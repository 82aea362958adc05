//! Plain-text views for the terminal.
//!
//! Every function returns a `String` so the binary only has to print it and
//! tests can assert on the output directly.

use crate::app::TodayView;
use crate::calendar::{self, CalendarMarking, HeatmapCell, YearGrid};
use crate::date_key::DateKey;
use crate::errors::AppResult;
use crate::log_store::LogEntry;
use crate::mood::{self, MOODS};
use crate::stats::MoodStats;
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use std::fmt::Write;

const LEGEND_BAR_WIDTH: usize = 20;
const WEEKDAY_HEADER: &str = " Su  Mo  Tu  We  Th  Fr  Sa";
const EMPTY_DAY_GLYPH: &str = "··";
const BLANK_GLYPH: &str = "  ";
const TODAY_GLYPH: &str = "◻️";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn mood_display(mood_id: &str) -> String {
    match mood::find(mood_id) {
        Some(mood) => format!("{} {} ({})", mood.emoji, mood.label, mood.id),
        None => format!("? ({})", mood_id),
    }
}

/// One entry, or a hint when the day is empty.
pub fn entry(date: DateKey, entry: Option<&LogEntry>) -> String {
    let Some(entry) = entry else {
        return format!("{}: nothing logged\n", date);
    };
    let mut out = format!("{}: {}\n", date, mood_display(&entry.mood_id));
    if !entry.note.is_empty() {
        let _ = writeln!(out, "  {}", entry.note);
    }
    if let Some(updated) = DateTime::<Utc>::from_timestamp_millis(entry.timestamp) {
        let _ = writeln!(out, "  updated {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    out
}

/// The quick-entry view of today.
pub fn today(date: DateKey, view: &TodayView) -> String {
    let mut out = match view.mood_id.as_deref() {
        Some(mood_id) => format!("Today ({}): {}\n", date, mood_display(mood_id)),
        None => format!("Today ({}): how are you feeling?\n", date),
    };
    if !view.note.is_empty() {
        let _ = writeln!(out, "  {}", view.note);
    }
    out
}

/// The mood catalog.
pub fn catalog() -> String {
    MOODS
        .iter()
        .map(|mood| format!("{}  {:<6} {}\n", mood.emoji, mood.id, mood.label))
        .collect()
}

/// Total plus a legend row per logged mood.
pub fn stats(stats: &MoodStats) -> String {
    let mut out = format!("{} days logged\n", stats.total);
    for row in stats.distribution() {
        let filled = (row.fraction * LEGEND_BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "{} {}  {:<width$} {:>4} ({:.0}%)",
            row.mood.emoji,
            row.mood.label,
            "█".repeat(filled),
            row.count,
            row.fraction * 100.0,
            width = LEGEND_BAR_WIDTH
        );
    }
    out
}

/// A month calendar, Sunday first.
///
/// Logged days show their mood emoji; the focused day is bracketed.
///
/// # Errors
///
/// Returns `AppError::Date` for a month that does not exist.
pub fn month(
    year: i32,
    month: u32,
    marks: &BTreeMap<DateKey, CalendarMarking>,
) -> AppResult<String> {
    let weeks = calendar::month_weeks(year, month)?;
    let name = MONTH_ABBREVIATIONS
        .get(month as usize - 1)
        .copied()
        .unwrap_or("???");
    let mut out = format!("{} {}\n{}\n", name, year, WEEKDAY_HEADER);
    for week in weeks {
        for day in week {
            let cell = match day {
                None => "    ".to_string(),
                Some(key) => {
                    let marking = marks.get(&key).copied().unwrap_or_default();
                    let body = match marking.mood {
                        Some(mood) => mood.emoji.to_string(),
                        None => format!("{:>2}", key.date().day()),
                    };
                    if marking.selected {
                        format!("[{}]", body)
                    } else {
                        format!(" {} ", body)
                    }
                }
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    Ok(out)
}

/// The year heatmap, one labelled line per row.
pub fn year(grid: &YearGrid) -> String {
    let mut out = format!("{}\n", grid.year);
    for row in &grid.rows {
        let label = row
            .label
            .and_then(|month| MONTH_ABBREVIATIONS.get(month as usize - 1))
            .copied()
            .unwrap_or("");
        let _ = write!(out, "{:<4}", label);
        for cell in &row.cells {
            let glyph = match cell {
                HeatmapCell::Placeholder => BLANK_GLYPH,
                HeatmapCell::Day(day) if day.is_future => BLANK_GLYPH,
                HeatmapCell::Day(day) => match day.mood {
                    Some(mood) => mood.emoji,
                    None if day.is_today => TODAY_GLYPH,
                    None => EMPTY_DAY_GLYPH,
                },
            };
            out.push_str(glyph);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_store::MoodLog;
    use crate::stats::aggregate;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_entry_with_note() {
        let entry_value = LogEntry::new("good", "sunny", 0);
        let out = entry(key("2024-06-15"), Some(&entry_value));

        assert!(out.starts_with("2024-06-15: 😊 开心 (good)"));
        assert!(out.contains("  sunny"));
        assert!(out.contains("updated 1970-01-01 00:00 UTC"));
    }

    #[test]
    fn test_empty_day() {
        assert_eq!(
            entry(key("2024-06-15"), None),
            "2024-06-15: nothing logged\n"
        );
    }

    #[test]
    fn test_unknown_mood_is_shown_raw() {
        let entry_value = LogEntry::new("ecstatic", "", 0);
        assert!(entry(key("2024-06-15"), Some(&entry_value)).contains("? (ecstatic)"));
    }

    #[test]
    fn test_today_prompt() {
        let out = today(key("2024-06-15"), &TodayView::default());
        assert!(out.contains("how are you feeling?"));
    }

    #[test]
    fn test_stats_legend_in_catalog_order() {
        let mut log = MoodLog::new();
        log.insert(key("2024-01-01"), LogEntry::new("sad", "", 0));
        log.insert(key("2024-01-02"), LogEntry::new("good", "", 0));
        log.insert(key("2024-01-03"), LogEntry::new("good", "", 0));
        log.insert(key("2024-01-04"), LogEntry::new("good", "", 0));

        let out = stats(&aggregate(&log));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "4 days logged");
        assert!(lines[1].starts_with("😊 开心"));
        assert!(lines[1].contains("(75%)"));
        assert!(lines[2].starts_with("😔 难过"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_month_marks_and_focus() {
        let mut log = MoodLog::new();
        log.insert(key("2024-06-01"), LogEntry::new("rad", "", 0));
        let marks = calendar::marks_for(&log, Some(key("2024-06-03")));

        let out = month(2024, 6, &marks).unwrap();

        assert!(out.starts_with("Jun 2024\n"));
        assert!(out.contains("🤩"));
        assert!(out.contains("[ 3]"));
        assert!(out.contains(" 30 "));
        assert!(month(2024, 13, &marks).is_err());
    }

    #[test]
    fn test_year_labels_every_month() {
        let grid = calendar::year_grid(&MoodLog::new(), 2023, key("2024-01-01"), 20).unwrap();
        let out = year(&grid);

        for name in MONTH_ABBREVIATIONS {
            assert!(out.contains(name), "missing {}", name);
        }
        assert_eq!(out.lines().count(), 1 + grid.rows.len());
    }

    #[test]
    fn test_catalog_lists_all_moods() {
        assert_eq!(catalog().lines().count(), 5);
        assert!(catalog().contains("awful"));
    }
}
