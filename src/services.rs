//! Seams to the platform services the journal consumes.
//!
//! Reminders, share export and haptic feedback are all external to the mood
//! log. Each one is a small trait so the application state can be driven by
//! the command-line implementations here or by test doubles.

use crate::constants::{APP_DISPLAY_NAME, REMINDER_STORAGE_KEY};
use crate::errors::{ExportError, NotificationError};
use crate::share::ShareCard;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Notifications may be scheduled.
    Granted,
    /// The user refused.
    Denied,
}

/// Schedules the daily "how was your day" reminder.
pub trait NotificationScheduler {
    /// Asks for permission to notify, returning the current status.
    fn request_permission(&mut self) -> Permission;

    /// Replaces any existing reminder with one firing daily at `hour:minute`.
    fn schedule_daily(
        &mut self,
        hour: u32,
        minute: u32,
        message: &str,
    ) -> Result<(), NotificationError>;
}

/// A scheduled daily reminder as recorded by [`StoredReminderScheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
}

/// Records the reminder in a storage slot for an external runner to pick up.
///
/// Permission is always granted: writing the slot needs no user consent.
#[derive(Debug)]
pub struct StoredReminderScheduler<S> {
    backend: S,
}

impl<S: KeyValueStore> StoredReminderScheduler<S> {
    /// Wraps a storage backend.
    pub fn new(backend: S) -> Self {
        StoredReminderScheduler { backend }
    }

    /// The reminder currently recorded, if any.
    pub fn current(&self) -> Option<ReminderSchedule> {
        match self.backend.get(REMINDER_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .map_err(|e| warn!("Ignoring unreadable reminder slot: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

impl<S: KeyValueStore> NotificationScheduler for StoredReminderScheduler<S> {
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn schedule_daily(
        &mut self,
        hour: u32,
        minute: u32,
        message: &str,
    ) -> Result<(), NotificationError> {
        if hour > 23 || minute > 59 {
            return Err(NotificationError::SchedulingFailed(format!(
                "invalid time {:02}:{:02}",
                hour, minute
            )));
        }
        let schedule = ReminderSchedule {
            title: APP_DISPLAY_NAME.to_string(),
            message: message.to_string(),
            hour,
            minute,
        };
        let raw = serde_json::to_string(&schedule)
            .map_err(|e| NotificationError::SchedulingFailed(e.to_string()))?;
        self.backend
            .set(REMINDER_STORAGE_KEY, &raw)
            .map_err(|e| NotificationError::SchedulingFailed(e.to_string()))?;
        info!("Daily reminder set for {:02}:{:02}", hour, minute);
        Ok(())
    }
}

/// A rendered share card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// File extension matching `bytes`.
    pub extension: &'static str,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

/// Turns the share card into an image and hands it off.
pub trait ShareExporter {
    /// Renders the card.
    fn capture(&mut self, card: &ShareCard) -> Result<CapturedImage, ExportError>;

    /// Hands a rendered card to the share target.
    fn share(&mut self, image: &CapturedImage) -> Result<(), ExportError>;
}

/// Renders the card as SVG and writes it to a file.
#[derive(Debug, Clone)]
pub struct SvgFileExporter {
    output: PathBuf,
}

impl SvgFileExporter {
    /// Exporter writing to `output`.
    pub fn new(output: &Path) -> Self {
        SvgFileExporter {
            output: output.to_path_buf(),
        }
    }

    /// Where the card is written.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl ShareExporter for SvgFileExporter {
    fn capture(&mut self, card: &ShareCard) -> Result<CapturedImage, ExportError> {
        let svg = card.to_svg();
        if svg.is_empty() {
            return Err(ExportError::CaptureFailed("empty render".to_string()));
        }
        debug!("Rendered share card ({} bytes)", svg.len());
        Ok(CapturedImage {
            extension: "svg",
            bytes: svg.into_bytes(),
        })
    }

    fn share(&mut self, image: &CapturedImage) -> Result<(), ExportError> {
        fs::write(&self.output, &image.bytes)
            .map_err(|source| ExportError::ShareFailed { source })?;
        info!("Share card written to {:?}", self.output);
        Ok(())
    }
}

/// Strength of a haptic pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticStyle {
    /// Opening a day.
    Light,
    /// Picking a mood.
    Medium,
    /// A completed save, delete, share or reminder.
    Success,
}

/// Fire-and-forget tactile feedback.
pub trait Haptics {
    /// Emits one pulse. Failures are swallowed by the implementation.
    fn pulse(&mut self, style: HapticStyle);
}

/// Haptics for devices without a motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn pulse(&mut self, _style: HapticStyle) {}
}

/// Haptics that only leave a trace event, for the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHaptics;

impl Haptics for TracingHaptics {
    fn pulse(&mut self, style: HapticStyle) {
        trace!("haptic pulse: {:?}", style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tempfile::tempdir;

    #[test]
    fn test_stored_scheduler_records_schedule() {
        let mut scheduler = StoredReminderScheduler::new(MemoryStore::new());
        assert_eq!(scheduler.request_permission(), Permission::Granted);
        assert!(scheduler.current().is_none());

        scheduler.schedule_daily(20, 0, "hello").unwrap();

        let schedule = scheduler.current().unwrap();
        assert_eq!(schedule.hour, 20);
        assert_eq!(schedule.minute, 0);
        assert_eq!(schedule.message, "hello");
        assert_eq!(schedule.title, "MoodFlow");
    }

    #[test]
    fn test_stored_scheduler_rejects_invalid_time() {
        let mut scheduler = StoredReminderScheduler::new(MemoryStore::new());
        assert!(matches!(
            scheduler.schedule_daily(24, 0, "x"),
            Err(NotificationError::SchedulingFailed(_))
        ));
        assert!(scheduler.current().is_none());
    }

    #[test]
    fn test_stored_scheduler_write_failure() {
        let mut backend = MemoryStore::new();
        backend.fail_next_writes(1);
        let mut scheduler = StoredReminderScheduler::new(backend);

        assert!(scheduler.schedule_daily(8, 30, "x").is_err());
    }

    #[test]
    fn test_svg_exporter_writes_file() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let output = temp_dir.path().join("card.svg");
        let mut exporter = SvgFileExporter::new(&output);

        let card = ShareCard::default_card(3, "2024/6/15".to_string());
        let image = exporter.capture(&card).unwrap();
        assert_eq!(image.extension, "svg");
        exporter.share(&image).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("<svg"));
    }

    #[test]
    fn test_svg_exporter_share_failure() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let output = temp_dir.path().join("missing").join("card.svg");
        let mut exporter = SvgFileExporter::new(&output);
        let image = CapturedImage {
            extension: "svg",
            bytes: b"<svg/>".to_vec(),
        };

        assert!(matches!(
            exporter.share(&image),
            Err(ExportError::ShareFailed { .. })
        ));
    }
}
