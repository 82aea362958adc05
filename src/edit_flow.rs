//! The open-edit-commit cycle for a single day.
//!
//! ```text
//! Closed --open(date <= today)--> Open(session)
//! Open   --save(mood chosen)----> Closed   (log upsert)
//! Open   --delete---------------> Closed   (log remove)
//! Open   --cancel---------------> Closed   (no mutation)
//! ```
//!
//! Edits made while open only touch the session; nothing is persisted until
//! save or delete.

use crate::date_key::DateKey;
use crate::errors::{AppResult, EditError, ValidationError};
use crate::log_store::{truncate_note, LogStore, MoodLog};
use crate::mood::Mood;
use crate::storage::KeyValueStore;
use std::mem;
use tracing::debug;

/// Working copy of one day while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// The day being edited.
    pub date: DateKey,
    /// Chosen mood, `None` until one is picked for a new day.
    pub mood_id: Option<String>,
    /// Note text, already capped.
    pub note: String,
    /// Whether the day had an entry when it was opened.
    pub has_entry: bool,
}

/// How an open session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The session was written to the log.
    Saved {
        /// The edited day.
        date: DateKey,
    },
    /// The day's entry was removed from the log.
    Deleted {
        /// The edited day.
        date: DateKey,
    },
    /// The session was discarded.
    Cancelled {
        /// The edited day.
        date: DateKey,
    },
}

impl FlowOutcome {
    /// The day the outcome applies to.
    pub fn date(&self) -> DateKey {
        match self {
            FlowOutcome::Saved { date }
            | FlowOutcome::Deleted { date }
            | FlowOutcome::Cancelled { date } => *date,
        }
    }
}

/// Edit flow state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditFlow {
    /// No day is open.
    #[default]
    Closed,
    /// A day is open for editing.
    Open(EditSession),
}

impl EditFlow {
    /// Whether a day is open.
    pub fn is_open(&self) -> bool {
        matches!(self, EditFlow::Open(_))
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditFlow::Open(session) => Some(session),
            EditFlow::Closed => None,
        }
    }

    fn session_mut(&mut self) -> Result<&mut EditSession, EditError> {
        match self {
            EditFlow::Open(session) => Ok(session),
            EditFlow::Closed => Err(EditError::NotOpen),
        }
    }

    /// Opens `date`, snapshotting its entry from `log`.
    ///
    /// # Errors
    ///
    /// - `EditError::FutureDate` if `date` is after `today`; the flow stays closed
    /// - `EditError::AlreadyOpen` if another day is open
    pub fn open(
        &mut self,
        date: DateKey,
        log: &MoodLog,
        today: DateKey,
    ) -> Result<&EditSession, EditError> {
        if let EditFlow::Open(session) = self {
            return Err(EditError::AlreadyOpen { date: session.date.date() });
        }
        if date.is_after(today) {
            return Err(EditError::FutureDate { date: date.date() });
        }

        let session = match log.get(&date) {
            Some(entry) => EditSession {
                date,
                mood_id: Some(entry.mood_id.clone()),
                note: entry.note.clone(),
                has_entry: true,
            },
            None => EditSession {
                date,
                mood_id: None,
                note: String::new(),
                has_entry: false,
            },
        };
        debug!("Opened {} for editing (existing entry: {})", date, session.has_entry);
        *self = EditFlow::Open(session);
        self.session().ok_or(EditError::NotOpen)
    }

    /// Picks a mood for the open day.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn select_mood(&mut self, mood: &Mood) -> Result<(), EditError> {
        self.session_mut()?.mood_id = Some(mood.id.to_string());
        Ok(())
    }

    /// Replaces the note of the open day, truncated to the maximum length.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn set_note(&mut self, text: &str) -> Result<(), EditError> {
        self.session_mut()?.note = truncate_note(text);
        Ok(())
    }

    /// Commits the session to `store` and closes the flow.
    ///
    /// # Errors
    ///
    /// - `EditError::NotOpen` when no day is open
    /// - `ValidationError::MissingMood` when no mood was chosen; the flow stays open
    /// - the storage error when persisting fails; the flow is closed and the
    ///   in-memory log already holds the entry
    pub fn save<S: KeyValueStore>(
        &mut self,
        store: &mut LogStore<S>,
        now_millis: i64,
    ) -> AppResult<FlowOutcome> {
        if self.session_mut()?.mood_id.is_none() {
            return Err(ValidationError::MissingMood.into());
        }
        let session = self.close()?;
        let date = session.date;
        let mood_id = session.mood_id.unwrap_or_default();

        store.upsert(date, &mood_id, &session.note, now_millis)?;
        Ok(FlowOutcome::Saved { date })
    }

    /// Removes the open day from `store` and closes the flow.
    ///
    /// # Errors
    ///
    /// - `EditError::NotOpen` when no day is open
    /// - the storage error when persisting fails; the flow is closed and the
    ///   in-memory log no longer holds the entry
    pub fn delete<S: KeyValueStore>(&mut self, store: &mut LogStore<S>) -> AppResult<FlowOutcome> {
        let session = self.close()?;
        store.remove(session.date)?;
        Ok(FlowOutcome::Deleted { date: session.date })
    }

    /// Discards the session.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn cancel(&mut self) -> Result<FlowOutcome, EditError> {
        let session = self.close()?;
        Ok(FlowOutcome::Cancelled { date: session.date })
    }

    fn close(&mut self) -> Result<EditSession, EditError> {
        match mem::take(self) {
            EditFlow::Open(session) => {
                debug!("Closed edit session for {}", session.date);
                Ok(session)
            }
            EditFlow::Closed => Err(EditError::NotOpen),
        }
    }
}
