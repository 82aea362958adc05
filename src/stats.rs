//! Per-mood statistics derived from the mood log.

use crate::log_store::MoodLog;
use crate::mood::{Mood, MOODS};
use std::collections::BTreeMap;

/// Entry totals, recomputed from the log and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodStats {
    /// Number of logged days.
    pub total: usize,
    /// Occurrences per mood identifier, unknown identifiers included.
    pub counts: BTreeMap<String, usize>,
}

/// One legend row of the distribution bar.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    /// The catalog mood.
    pub mood: &'static Mood,
    /// Days logged with this mood.
    pub count: usize,
    /// Share of all logged days, in `0.0..=1.0`.
    pub fraction: f64,
}

impl MoodStats {
    /// Occurrences of `mood_id`, zero when absent.
    pub fn count(&self, mood_id: &str) -> usize {
        self.counts.get(mood_id).copied().unwrap_or(0)
    }

    /// Legend rows for catalog moods that occur at least once, in catalog order.
    ///
    /// Unknown identifiers count towards `total` but get no row, so the
    /// fractions may sum to less than one.
    pub fn distribution(&self) -> Vec<LegendRow> {
        if self.total == 0 {
            return Vec::new();
        }
        MOODS
            .iter()
            .filter_map(|mood| {
                let count = self.count(mood.id);
                (count > 0).then(|| LegendRow {
                    mood,
                    count,
                    fraction: count as f64 / self.total as f64,
                })
            })
            .collect()
    }
}

/// Counts entries per mood in a single pass.
///
/// # Examples
///
/// ```
/// use moodflow::log_store::{LogEntry, MoodLog};
/// use moodflow::date_key::DateKey;
/// use moodflow::stats::aggregate;
///
/// let mut log = MoodLog::new();
/// log.insert("2024-01-01".parse::<DateKey>().unwrap(), LogEntry::new("good", "", 0));
/// log.insert("2024-01-02".parse::<DateKey>().unwrap(), LogEntry::new("good", "", 0));
///
/// let stats = aggregate(&log);
/// assert_eq!(stats.total, 2);
/// assert_eq!(stats.count("good"), 2);
/// ```
pub fn aggregate(log: &MoodLog) -> MoodStats {
    let mut stats = MoodStats::default();
    for entry in log.values() {
        stats.total += 1;
        *stats.counts.entry(entry.mood_id.clone()).or_insert(0) += 1;
    }
    stats
}
