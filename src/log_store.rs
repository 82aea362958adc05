//! The date-keyed mood log and its persistence.
//!
//! The log is loaded once from its storage slot, mutated in memory, and
//! written back in full after every mutation. Writes finish before the
//! mutating call returns; a failed write is reported but never undoes the
//! in-memory change.

use crate::constants::{CORRUPT_SLOT_SUFFIX, LOG_STORAGE_KEY, NOTE_MAX_CHARS};
use crate::date_key::DateKey;
use crate::errors::StorageError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One day's logged mood.
///
/// Fields this version does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Identifier of the chosen mood; may not resolve in the catalog.
    pub mood_id: String,
    /// Free text, at most 100 characters.
    #[serde(default)]
    pub note: String,
    /// Creation or last modification, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Unrecognized fields carried through a rewrite.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    /// Builds an entry, capping the note length.
    pub fn new(mood_id: &str, note: &str, timestamp: i64) -> Self {
        LogEntry {
            mood_id: mood_id.to_string(),
            note: truncate_note(note),
            timestamp,
            extra: BTreeMap::new(),
        }
    }
}

/// The in-memory log: at most one entry per calendar day.
pub type MoodLog = BTreeMap<DateKey, LogEntry>;

/// Caps `text` at the maximum note length, counted in characters.
///
/// # Examples
///
/// ```
/// use moodflow::log_store::truncate_note;
///
/// assert_eq!(truncate_note("short"), "short");
/// assert_eq!(truncate_note(&"好".repeat(150)).chars().count(), 100);
/// ```
pub fn truncate_note(text: &str) -> String {
    text.chars().take(NOTE_MAX_CHARS).collect()
}

fn quarantine<S: KeyValueStore>(backend: &mut S, key: &str) {
    let target = format!("{}{}", key, CORRUPT_SLOT_SUFFIX);
    if let Err(e) = backend.preserve(key, &target) {
        warn!("Could not preserve corrupt mood log: {}", e);
    }
}

/// The mood log bound to its storage slot.
#[derive(Debug)]
pub struct LogStore<S> {
    backend: S,
    key: String,
    entries: MoodLog,
    revision: u64,
}

impl<S: KeyValueStore> LogStore<S> {
    /// Loads the log from the default slot.
    ///
    /// Never fails: see [`LogStore::load_from`].
    pub fn load(backend: S) -> Self {
        Self::load_from(backend, LOG_STORAGE_KEY)
    }

    /// Loads the log from slot `key`.
    ///
    /// An absent slot yields an empty log. An unreadable or corrupt slot also
    /// yields an empty log; a corrupt value (bad JSON or bytes that are not
    /// UTF-8) is first copied to `<key>.corrupt` so the next write does not
    /// destroy the only copy.
    pub fn load_from(mut backend: S, key: &str) -> Self {
        let entries = match backend.get(key) {
            Ok(None) => {
                debug!("No stored mood log under {}, starting empty", key);
                MoodLog::new()
            }
            Ok(Some(raw)) => match serde_json::from_str::<MoodLog>(&raw) {
                Ok(entries) => {
                    info!("Loaded {} mood entries", entries.len());
                    entries
                }
                Err(source) => {
                    let error = StorageError::Corrupt {
                        key: key.to_string(),
                        source,
                    };
                    warn!("{}; starting with an empty log", error);
                    quarantine(&mut backend, key);
                    MoodLog::new()
                }
            },
            Err(error @ StorageError::InvalidEncoding { .. }) => {
                warn!("{}; starting with an empty log", error);
                quarantine(&mut backend, key);
                MoodLog::new()
            }
            Err(e) => {
                warn!("{}; starting with an empty log", e);
                MoodLog::new()
            }
        };

        LogStore {
            backend,
            key: key.to_string(),
            entries,
            revision: 0,
        }
    }

    /// Current entries.
    pub fn entries(&self) -> &MoodLog {
        &self.entries
    }

    /// The entry for `date`, if any.
    pub fn get(&self, date: DateKey) -> Option<&LogEntry> {
        self.entries.get(&date)
    }

    /// Number of logged days.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter bumped on every in-memory mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The storage backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The storage backend, mutably.
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Inserts or replaces the entry for `date` and persists the log.
    ///
    /// The new timestamp never goes backwards relative to the entry it
    /// replaces, even if the wall clock does.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting fails twice. The entry is in
    /// the in-memory log either way.
    pub fn upsert(
        &mut self,
        date: DateKey,
        mood_id: &str,
        note: &str,
        now_millis: i64,
    ) -> Result<&MoodLog, StorageError> {
        let mut entry = LogEntry::new(mood_id, note, now_millis);
        if let Some(previous) = self.entries.get(&date) {
            entry.timestamp = entry.timestamp.max(previous.timestamp);
            entry.extra = previous.extra.clone();
        }

        info!("Logging mood {} for {}", mood_id, date);
        self.entries.insert(date, entry);
        self.revision += 1;
        self.persist()?;
        Ok(&self.entries)
    }

    /// Deletes the entry for `date` and persists the log.
    ///
    /// Removing a day with no entry changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting fails twice. The entry is gone
    /// from the in-memory log either way.
    pub fn remove(&mut self, date: DateKey) -> Result<&MoodLog, StorageError> {
        if self.entries.remove(&date).is_none() {
            debug!("No entry for {}, nothing to remove", date);
            return Ok(&self.entries);
        }

        info!("Removed mood entry for {}", date);
        self.revision += 1;
        self.persist()?;
        Ok(&self.entries)
    }

    /// Serializes the whole log into its slot, retrying a failed write once.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialize` or the second write failure.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&self.entries).map_err(StorageError::Serialize)?;

        if let Err(first) = self.backend.set(&self.key, &serialized) {
            warn!("{}; retrying once", first);
            self.backend.set(&self.key, &serialized)?;
        }
        debug!("Persisted {} mood entries", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::date_key;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DateKey {
        date_key(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn reload(store: &LogStore<MemoryStore>) -> LogStore<MemoryStore> {
        LogStore::load(store.backend().clone())
    }

    #[test]
    fn test_load_absent_slot_is_empty() {
        let store = LogStore::load(MemoryStore::new());
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_load_reads_camel_case_layout() {
        let raw = r#"{"2024-01-01":{"moodId":"sad","note":"x","timestamp":1704100000000},
                      "2024-01-02":{"moodId":"good","timestamp":1704200000000}}"#;
        let store = LogStore::load(MemoryStore::with_slot(LOG_STORAGE_KEY, raw));

        assert_eq!(store.len(), 2);
        let first = store.get(day(2024, 1, 1)).unwrap();
        assert_eq!(first.mood_id, "sad");
        assert_eq!(first.note, "x");
        assert_eq!(store.get(day(2024, 1, 2)).unwrap().note, "");
    }

    #[test]
    fn test_load_corrupt_slot_is_empty_and_quarantined() {
        let store = LogStore::load(MemoryStore::with_slot(LOG_STORAGE_KEY, "{not json"));

        assert!(store.is_empty());
        assert_eq!(store.backend().raw("moodLogs.corrupt"), Some("{not json"));
        assert_eq!(store.backend().raw(LOG_STORAGE_KEY), Some("{not json"));
    }

    #[test]
    fn test_load_read_failure_is_empty() {
        let mut backend = MemoryStore::with_slot(LOG_STORAGE_KEY, "{}");
        backend.set_fail_reads(true);
        let store = LogStore::load(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_is_visible_after_reload() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 6, 15), "good", "", 1_000).unwrap();

        let reloaded = reload(&store);
        let entry = reloaded.get(day(2024, 6, 15)).unwrap();
        assert_eq!(entry, &LogEntry::new("good", "", 1_000));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_upsert_replaces_and_keeps_one_entry_per_day() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 6, 15), "good", "a", 1_000).unwrap();
        store.upsert(day(2024, 6, 15), "rad", "b", 2_000).unwrap();

        assert_eq!(store.len(), 1);
        let entry = store.get(day(2024, 6, 15)).unwrap();
        assert_eq!(entry.mood_id, "rad");
        assert_eq!(entry.note, "b");
        assert_eq!(entry.timestamp, 2_000);
    }

    #[test]
    fn test_upsert_timestamp_never_goes_backwards() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 6, 15), "good", "", 5_000).unwrap();
        store.upsert(day(2024, 6, 15), "meh", "", 4_000).unwrap();

        assert_eq!(store.get(day(2024, 6, 15)).unwrap().timestamp, 5_000);
    }

    #[test]
    fn test_upsert_truncates_note() {
        let mut store = LogStore::load(MemoryStore::new());
        let long = "x".repeat(250);
        store.upsert(day(2024, 6, 15), "good", &long, 1).unwrap();

        assert_eq!(store.get(day(2024, 6, 15)).unwrap().note.len(), 100);
    }

    #[test]
    fn test_upsert_preserves_unknown_fields() {
        let raw = r#"{"2024-01-01":{"moodId":"sad","note":"x","timestamp":1,"intensity":3}}"#;
        let mut store = LogStore::load(MemoryStore::with_slot(LOG_STORAGE_KEY, raw));
        store.upsert(day(2024, 1, 1), "rad", "x", 2).unwrap();

        let written = store.backend().raw(LOG_STORAGE_KEY).unwrap();
        assert!(written.contains("\"intensity\":3"));
        assert!(written.contains("\"moodId\":\"rad\""));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 3, 9), "meh", "", 1).unwrap();
        let writes = store.backend().write_count();
        let revision = store.revision();

        store.remove(day(2024, 3, 10)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_remove_is_visible_after_reload() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 3, 10), "meh", "", 1).unwrap();
        store.remove(day(2024, 3, 10)).unwrap();

        assert!(reload(&store).get(day(2024, 3, 10)).is_none());
    }

    #[test]
    fn test_persist_retries_once() {
        let mut store = LogStore::load(MemoryStore::new());
        store.backend_mut().fail_next_writes(1);

        store.upsert(day(2024, 6, 15), "good", "", 1).unwrap();

        assert!(reload(&store).get(day(2024, 6, 15)).is_some());
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut store = LogStore::load(MemoryStore::new());
        store.backend_mut().fail_next_writes(2);

        let result = store.upsert(day(2024, 6, 15), "good", "", 1);

        assert!(matches!(result, Err(StorageError::WriteFailed { .. })));
        assert_eq!(store.get(day(2024, 6, 15)).unwrap().mood_id, "good");
        assert!(reload(&store).is_empty());
    }

    #[test]
    fn test_written_layout_uses_camel_case() {
        let mut store = LogStore::load(MemoryStore::new());
        store.upsert(day(2024, 6, 15), "good", "hi", 42).unwrap();

        assert_eq!(
            store.backend().raw(LOG_STORAGE_KEY),
            Some(r#"{"2024-06-15":{"moodId":"good","note":"hi","timestamp":42}}"#)
        );
    }
}
