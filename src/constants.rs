//! Constants used throughout the application.
//!
//! This module contains all constants used in the MoodFlow application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodflow";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A tiny daily mood journal";
/// Brand name printed on share cards and reminders.
pub const APP_DISPLAY_NAME: &str = "MoodFlow";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the MoodFlow data directory.
pub const ENV_VAR_MOODFLOW_DIR: &str = "MOODFLOW_DIR";
/// Environment variable for the daily reminder time (`HH:MM`).
pub const ENV_VAR_MOODFLOW_REMINDER: &str = "MOODFLOW_REMINDER";
/// Environment variable for the year heatmap row width.
pub const ENV_VAR_MOODFLOW_HEATMAP_COLUMNS: &str = "MOODFLOW_HEATMAP_COLUMNS";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the data directory within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = "Documents/moodflow";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Storage
/// Storage slot holding the serialized mood log.
pub const LOG_STORAGE_KEY: &str = "moodLogs";
/// Suffix of the slot a corrupt log is copied to before it is replaced.
pub const CORRUPT_SLOT_SUFFIX: &str = ".corrupt";
/// Storage slot holding the scheduled reminder.
pub const REMINDER_STORAGE_KEY: &str = "reminder";
/// File extension of storage slot files.
pub const STORAGE_FILE_EXTENSION: &str = "json";
/// File extension of storage lock files.
pub const STORAGE_LOCK_EXTENSION: &str = "lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Journal Entries
/// Maximum note length in characters.
pub const NOTE_MAX_CHARS: usize = 100;
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";

// Calendar
/// Default number of day cells per heatmap row.
pub const DEFAULT_HEATMAP_COLUMNS: usize = 20;
/// Largest row width that still guarantees at most one month start per row.
pub const MAX_HEATMAP_COLUMNS: usize = 28;
/// Background color of the focused day in the month view.
pub const SELECTED_COLOR: &str = "#E5E7EB";
/// Text color of the focused day in the month view.
pub const SELECTED_TEXT_COLOR: &str = "#111827";
/// Text color drawn on top of a mood-colored day.
pub const MARKED_TEXT_COLOR: &str = "#FFFFFF";
/// Fill of a heatmap day without a visible mood.
pub const EMPTY_CELL_COLOR: &str = "#F3F4F6";

// Reminders
/// Default reminder hour (24h clock).
pub const DEFAULT_REMINDER_HOUR: u32 = 20;
/// Default reminder minute.
pub const DEFAULT_REMINDER_MINUTE: u32 = 0;
/// Body of the daily reminder notification.
pub const REMINDER_MESSAGE: &str = "今天过得怎么样？花一分钟记录一下心情吧 📝";

// Share Card
/// Card text used when today has neither a note nor a known mood.
pub const DEFAULT_SHARE_TEXT: &str = "这个月，我诚实地面对了自己。";
/// Card gradient used when today has no known mood.
pub const DEFAULT_SHARE_GRADIENT: [&str; 2] = ["#6366f1", "#a855f7"];
/// Footer line printed on every share card.
pub const SHARE_FOOTER: &str = "Generated by MoodFlow App";
/// Default file name of the exported share card.
pub const DEFAULT_SHARE_FILE_NAME: &str = "moodflow-card.svg";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodflow";
