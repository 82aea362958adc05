//! The application state container.
//!
//! [`MoodApp`] owns the mood log and every piece of UI state as explicit
//! fields and exposes one method per user action. Derived views (statistics
//! and month markings) are memoized on the log revision, so they are
//! recomputed only after the log actually changed.
//!
//! Failures that the user should hear about are queued as one-shot
//! [`Notice`]s in addition to being returned, so a front-end can show them
//! once and move on.

use crate::calendar::{self, CalendarMarking, YearGrid};
use crate::constants::{DEFAULT_HEATMAP_COLUMNS, REMINDER_MESSAGE};
use crate::date_key::{today_key, Clock, DateKey};
use crate::edit_flow::{EditFlow, EditSession, FlowOutcome};
use crate::errors::{AppError, AppResult, EditError, NotificationError, ValidationError};
use crate::log_store::{truncate_note, LogEntry, LogStore, MoodLog};
use crate::mood::Mood;
use crate::services::{
    HapticStyle, Haptics, NoopHaptics, NotificationScheduler, Permission, ShareExporter,
};
use crate::share::{card_date_label, ShareCard};
use crate::stats::{aggregate, MoodStats};
use crate::storage::KeyValueStore;
use chrono::Datelike;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Quick entry for today.
    #[default]
    Home,
    /// Month calendar or year heatmap plus statistics.
    Calendar,
    /// Share card.
    Share,
}

/// Calendar presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarMode {
    /// Month grid with markings.
    #[default]
    Month,
    /// Whole-year heatmap.
    Year,
}

/// The quick-entry view of today.
///
/// The note may be typed before a mood is chosen; it is only written to the
/// log once today has a mood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodayView {
    /// Today's mood, if logged.
    pub mood_id: Option<String>,
    /// Today's note.
    pub note: String,
}

impl TodayView {
    fn from_entry(entry: Option<&LogEntry>) -> Self {
        match entry {
            Some(entry) => TodayView {
                mood_id: Some(entry.mood_id.clone()),
                note: entry.note.clone(),
            },
            None => TodayView::default(),
        }
    }
}

/// A message to show the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The log could not be written; the change is kept in memory.
    SaveFailed(String),
    /// Save was attempted without a mood.
    MissingMood,
    /// Notification permission was refused; reminders are off for the session.
    PermissionDenied,
    /// The reminder could not be scheduled.
    ReminderFailed(String),
    /// The reminder was scheduled.
    ReminderScheduled {
        /// Hour of day.
        hour: u32,
        /// Minute.
        minute: u32,
    },
    /// The share card could not be produced or shared.
    ExportFailed(String),
}

impl Notice {
    /// Whether the notice reports a failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::ReminderScheduled { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SaveFailed(reason) => write!(f, "Could not save your mood: {}", reason),
            Notice::MissingMood => write!(f, "Please choose a mood"),
            Notice::PermissionDenied => {
                write!(f, "Notifications are not allowed. Enable them in your system settings.")
            }
            Notice::ReminderFailed(reason) => write!(f, "Could not set the reminder: {}", reason),
            Notice::ReminderScheduled { hour, minute } => {
                write!(f, "Reminder set: every day at {:02}:{:02} 🌱", hour, minute)
            }
            Notice::ExportFailed(reason) => {
                write!(f, "Could not generate the share image: {}", reason)
            }
        }
    }
}

/// A value cached under the key it was computed from.
#[derive(Debug)]
struct Memo<K, V> {
    cached: Option<(K, V)>,
    computations: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Memo {
            cached: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if matches!(&self.cached, Some((cached, _)) if *cached != key) {
            self.cached = None;
        }
        let computations = &mut self.computations;
        &self
            .cached
            .get_or_insert_with(|| {
                *computations += 1;
                (key, compute())
            })
            .1
    }
}

/// The whole application state.
pub struct MoodApp<S, C> {
    store: LogStore<S>,
    clock: C,
    haptics: Box<dyn Haptics>,
    tab: Tab,
    calendar_mode: CalendarMode,
    displayed_year: i32,
    focused: Option<DateKey>,
    edit: EditFlow,
    today: TodayView,
    today_for: DateKey,
    reminders_enabled: bool,
    heatmap_columns: usize,
    notices: Vec<Notice>,
    stats_memo: Memo<u64, MoodStats>,
    marks_memo: Memo<(u64, Option<DateKey>), BTreeMap<DateKey, CalendarMarking>>,
}

impl<S: KeyValueStore, C: Clock> MoodApp<S, C> {
    /// Builds the state around a loaded log.
    pub fn new(store: LogStore<S>, clock: C) -> Self {
        let today = today_key(&clock);
        let today_view = TodayView::from_entry(store.get(today));
        MoodApp {
            store,
            displayed_year: today.date().year(),
            clock,
            haptics: Box::new(NoopHaptics),
            tab: Tab::default(),
            calendar_mode: CalendarMode::default(),
            focused: None,
            edit: EditFlow::default(),
            today: today_view,
            today_for: today,
            reminders_enabled: true,
            heatmap_columns: DEFAULT_HEATMAP_COLUMNS,
            notices: Vec::new(),
            stats_memo: Memo::default(),
            marks_memo: Memo::default(),
        }
    }

    /// Replaces the haptic feedback implementation.
    pub fn with_haptics(mut self, haptics: Box<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Sets the heatmap row width.
    pub fn with_heatmap_columns(mut self, columns: usize) -> Self {
        self.heatmap_columns = columns;
        self
    }

    /// The mood log.
    pub fn store(&self) -> &LogStore<S> {
        &self.store
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Today's key according to the clock.
    pub fn today_key(&self) -> DateKey {
        today_key(&self.clock)
    }

    /// The quick-entry view of the clock's current day.
    ///
    /// Once the clock passes midnight the view is rebuilt from the log, so a
    /// note typed yesterday without a mood is dropped.
    pub fn today(&mut self) -> &TodayView {
        self.refresh_today();
        &self.today
    }

    fn refresh_today(&mut self) {
        let today = self.today_key();
        if today != self.today_for {
            debug!(
                "Day changed from {} to {}, reloading today's view",
                self.today_for, today
            );
            self.today = TodayView::from_entry(self.store.get(today));
            self.today_for = today;
        }
    }

    /// The edit flow.
    pub fn edit_flow(&self) -> &EditFlow {
        &self.edit
    }

    /// The current tab.
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switches tabs.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// The calendar presentation.
    pub fn calendar_mode(&self) -> CalendarMode {
        self.calendar_mode
    }

    /// Switches between month and year presentations.
    pub fn set_calendar_mode(&mut self, mode: CalendarMode) {
        self.calendar_mode = mode;
    }

    /// The focused day of the month view.
    pub fn focused(&self) -> Option<DateKey> {
        self.focused
    }

    /// Highlights a day of the month view without opening it.
    pub fn set_focus(&mut self, date: Option<DateKey>) {
        self.focused = date;
    }

    /// Whether reminders can still be scheduled this session.
    pub fn reminders_enabled(&self) -> bool {
        self.reminders_enabled
    }

    /// Quick entry: logs `mood` for today, keeping today's note.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the log cannot be written; today's
    /// view and the in-memory log are updated regardless.
    pub fn select_mood(&mut self, mood: &Mood) -> AppResult<()> {
        self.haptics.pulse(HapticStyle::Medium);
        self.refresh_today();
        let today = self.today_for;
        self.today.mood_id = Some(mood.id.to_string());
        let note = self.today.note.clone();
        let result = self
            .store
            .upsert(today, mood.id, &note, self.clock.now_millis())
            .map(|_| ())
            .map_err(AppError::from);
        self.surface_storage(result)
    }

    /// Quick entry: replaces today's note.
    ///
    /// The note is persisted only when today already has a mood.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the log cannot be written.
    pub fn edit_today_note(&mut self, text: &str) -> AppResult<()> {
        self.refresh_today();
        self.today.note = truncate_note(text);
        let Some(mood_id) = self.today.mood_id.clone() else {
            debug!("No mood chosen for today yet, note kept in view only");
            return Ok(());
        };
        let today = self.today_for;
        let note = self.today.note.clone();
        let result = self
            .store
            .upsert(today, &mood_id, &note, self.clock.now_millis())
            .map(|_| ())
            .map_err(AppError::from);
        self.surface_storage(result)
    }

    /// Calendar: presses a day, focusing it and opening the edit flow.
    ///
    /// # Errors
    ///
    /// - `EditError::FutureDate` for days after today; nothing changes
    /// - `EditError::AlreadyOpen` while another day is open
    pub fn press_day(&mut self, date: DateKey) -> AppResult<&EditSession> {
        let today = self.today_key();
        self.edit.open(date, self.store.entries(), today)?;
        self.focused = Some(date);
        self.haptics.pulse(HapticStyle::Light);
        self.edit
            .session()
            .ok_or(AppError::Edit(EditError::NotOpen))
    }

    /// Edit flow: picks a mood for the open day.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn edit_select_mood(&mut self, mood: &Mood) -> AppResult<()> {
        Ok(self.edit.select_mood(mood)?)
    }

    /// Edit flow: replaces the note of the open day.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn edit_set_note(&mut self, text: &str) -> AppResult<()> {
        Ok(self.edit.set_note(text)?)
    }

    /// Edit flow: saves the open day.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingMood` when no mood was chosen; the day stays open
    /// - the storage error when the log cannot be written
    pub fn save_edit(&mut self) -> AppResult<FlowOutcome> {
        let date = self.edit.session().map(|session| session.date);
        let result = self.edit.save(&mut self.store, self.clock.now_millis());
        self.finish_edit(date, result)
    }

    /// Edit flow: deletes the open day's entry.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the log cannot be written.
    pub fn delete_edit(&mut self) -> AppResult<FlowOutcome> {
        let date = self.edit.session().map(|session| session.date);
        let result = self.edit.delete(&mut self.store);
        self.finish_edit(date, result)
    }

    /// Edit flow: discards the open day's edits.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotOpen` when no day is open.
    pub fn cancel_edit(&mut self) -> AppResult<FlowOutcome> {
        Ok(self.edit.cancel()?)
    }

    fn finish_edit(
        &mut self,
        date: Option<DateKey>,
        result: AppResult<FlowOutcome>,
    ) -> AppResult<FlowOutcome> {
        if let Err(AppError::Validation(ValidationError::MissingMood)) = &result {
            self.notices.push(Notice::MissingMood);
            return result;
        }
        self.refresh_today();
        if let Some(date) = date.filter(|_| !self.edit.is_open()) {
            if date == self.today_for {
                self.today = TodayView::from_entry(self.store.get(date));
                debug!("Refreshed today's view after editing {}", date);
            }
        }
        match result {
            Ok(outcome) => {
                self.haptics.pulse(HapticStyle::Success);
                Ok(outcome)
            }
            Err(e) => self.surface_storage(Err(e)),
        }
    }

    fn surface_storage<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(AppError::Storage(e)) = &result {
            warn!("{}", e);
            self.notices.push(Notice::SaveFailed(e.to_string()));
        }
        result
    }

    /// Statistics over the whole log, recomputed only after a change.
    pub fn stats(&mut self) -> &MoodStats {
        let store = &self.store;
        self.stats_memo
            .get_or_compute(store.revision(), || aggregate(store.entries()))
    }

    /// Month-view markings, recomputed only after a change of log or focus.
    pub fn marks(&mut self) -> &BTreeMap<DateKey, CalendarMarking> {
        let store = &self.store;
        let focused = self.focused;
        self.marks_memo
            .get_or_compute((store.revision(), focused), || {
                calendar::marks_for(store.entries(), focused)
            })
    }

    /// The log entries.
    pub fn entries(&self) -> &MoodLog {
        self.store.entries()
    }

    /// Year shown by the heatmap.
    pub fn displayed_year(&self) -> i32 {
        self.displayed_year
    }

    /// Heatmap of the displayed year.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an invalid row width.
    pub fn year_grid(&self) -> AppResult<YearGrid> {
        calendar::year_grid(
            self.store.entries(),
            self.displayed_year,
            self.today_key(),
            self.heatmap_columns,
        )
    }

    /// Shows a specific year, never one after the current year.
    pub fn show_year(&mut self, year: i32) -> i32 {
        self.displayed_year = year.min(self.today_key().date().year());
        self.displayed_year
    }

    /// Steps the heatmap back one year.
    pub fn show_previous_year(&mut self) -> i32 {
        self.displayed_year -= 1;
        self.displayed_year
    }

    /// Steps the heatmap forward one year, stopping at the current year.
    pub fn show_next_year(&mut self) -> i32 {
        if calendar::can_show_next_year(self.displayed_year, self.today_key()) {
            self.displayed_year += 1;
        }
        self.displayed_year
    }

    /// The share card for today's quick-entry state.
    pub fn share_card(&mut self) -> ShareCard {
        self.refresh_today();
        ShareCard::for_today(
            self.today.mood_id.as_deref(),
            &self.today.note,
            self.store.len(),
            card_date_label(self.clock.today()),
        )
    }

    /// Renders the share card and hands it to `exporter`.
    ///
    /// # Errors
    ///
    /// Returns the export error; a notice is queued as well.
    pub fn export_share_card(&mut self, exporter: &mut dyn ShareExporter) -> AppResult<()> {
        self.haptics.pulse(HapticStyle::Success);
        let card = self.share_card();
        let result = exporter
            .capture(&card)
            .and_then(|image| exporter.share(&image));
        match result {
            Ok(()) => {
                info!("Share card exported");
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                self.notices.push(Notice::ExportFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Asks for permission and schedules the daily reminder.
    ///
    /// A refused permission turns reminders off for the rest of the session.
    ///
    /// # Errors
    ///
    /// - `NotificationError::Disabled` after an earlier refusal
    /// - `NotificationError::PermissionDenied` when refused now
    /// - `NotificationError::SchedulingFailed` from the scheduler
    pub fn schedule_reminder(
        &mut self,
        scheduler: &mut dyn NotificationScheduler,
        hour: u32,
        minute: u32,
    ) -> AppResult<()> {
        if !self.reminders_enabled {
            self.notices.push(Notice::PermissionDenied);
            return Err(NotificationError::Disabled.into());
        }
        if scheduler.request_permission() == Permission::Denied {
            warn!("Notification permission denied, reminders disabled for this session");
            self.reminders_enabled = false;
            self.notices.push(Notice::PermissionDenied);
            return Err(NotificationError::PermissionDenied.into());
        }
        match scheduler.schedule_daily(hour, minute, REMINDER_MESSAGE) {
            Ok(()) => {
                self.haptics.pulse(HapticStyle::Success);
                self.notices.push(Notice::ReminderScheduled { hour, minute });
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                self.notices.push(Notice::ReminderFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Drains the queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
