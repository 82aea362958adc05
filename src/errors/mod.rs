//! Error handling utilities for the moodflow application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! None of these errors is fatal to the process. Each one degrades a single
//! feature (saving, reminders, sharing) and leaves the mood log consistent.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

/// Represents failures of the key-value storage slot that holds the mood log.
///
/// Read-side failures (`ReadFailed`, `InvalidEncoding`, `Corrupt`) are
/// recovered locally by the log store, which falls back to an empty log. Write-side failures are
/// surfaced to the user; the in-memory log is never rolled back.
///
/// # Examples
///
/// ```
/// use moodflow::errors::StorageError;
/// use std::io::{self, ErrorKind};
///
/// let error = StorageError::WriteFailed {
///     key: "moodLogs".to_string(),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
///
/// assert!(format!("{}", error).contains("moodLogs"));
/// assert!(format!("{}", error).contains("permission denied"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot exists but could not be read.
    #[error("Failed to read storage slot '{key}': {source}")]
    ReadFailed {
        /// The storage key that was being read
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The slot could not be written.
    #[error("Failed to write storage slot '{key}': {source}. Your changes are kept in memory but were not saved.")]
    WriteFailed {
        /// The storage key that was being written
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The slot holds data that does not parse as a mood log.
    #[error("Storage slot '{key}' holds unreadable data: {source}")]
    Corrupt {
        /// The storage key holding the corrupt value
        key: String,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The slot holds bytes that are not valid UTF-8.
    #[error("Storage slot '{key}' is not valid UTF-8: {source}")]
    InvalidEncoding {
        /// The storage key holding the undecodable value
        key: String,
        /// The underlying decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The advisory lock guarding the slot could not be acquired.
    #[error("Failed to lock storage slot '{key}': {source}. Check for another running moodflow process.")]
    LockFailed {
        /// The storage key being locked
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The in-memory log could not be serialized.
    #[error("Failed to serialize the mood log: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Input rejected before anything is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A save was attempted without choosing a mood.
    #[error("Please choose a mood before saving")]
    MissingMood,

    /// A mood identifier that is not part of the catalog was supplied.
    #[error("Unknown mood '{0}'. Run `moodflow moods` to list the available moods.")]
    UnknownMood(String),
}

/// Illegal transitions of the entry edit flow.
///
/// # Examples
///
/// ```
/// use moodflow::errors::EditError;
/// use chrono::NaiveDate;
///
/// let error = EditError::FutureDate {
///     date: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
/// };
/// assert!(format!("{}", error).contains("2024-06-16"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Days after today cannot be opened.
    #[error("Cannot record a mood for {date}: the day has not happened yet")]
    FutureDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// Another day is already open for editing.
    #[error("An entry for {date} is already open. Save, delete or cancel it first.")]
    AlreadyOpen {
        /// The date currently open
        date: NaiveDate,
    },

    /// An edit action arrived while no day was open.
    #[error("No entry is open for editing")]
    NotOpen,
}

/// Failures of the daily reminder scheduler.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The user refused notification permission.
    #[error("Notification permission was not granted. Enable notifications in your system settings.")]
    PermissionDenied,

    /// Reminders were already refused earlier in this session.
    #[error("Reminders are disabled for this session")]
    Disabled,

    /// The scheduler accepted the permission but failed to schedule.
    #[error("Failed to schedule the daily reminder: {0}")]
    SchedulingFailed(String),
}

/// Failures while capturing or sharing the share card.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The card could not be rendered to an image.
    #[error("Failed to generate the share image: {0}")]
    CaptureFailed(String),

    /// The rendered image could not be handed off.
    #[error("Failed to share the image: {source}")]
    ShareFailed {
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the moodflow application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use moodflow::errors::AppError;
///
/// let error = AppError::Config("Data directory path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Data directory path is empty");
/// ```
///
/// Converting from a validation error:
/// ```
/// use moodflow::errors::{AppError, ValidationError};
///
/// let app_error: AppError = ValidationError::MissingMood.into();
/// assert!(matches!(app_error, AppError::Validation(ValidationError::MissingMood)));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed date or date-key input.
    #[error("Date error: {0}")]
    Date(String),

    /// Errors from the storage slot backing the mood log.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rejected user input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Illegal edit flow transitions.
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Reminder scheduling failures.
    #[error("Reminder error: {0}")]
    Notification(#[from] NotificationError),

    /// Share card export failures.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use moodflow::errors::{AppError, AppResult};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Date("bad date".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
