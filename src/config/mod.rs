//! Configuration management for moodflow.
//!
//! Settings are read from environment variables, with defaults that match a
//! fresh install.
//!
//! # Environment Variables
//!
//! - `MOODFLOW_DIR`: Directory holding the mood log (defaults to ~/Documents/moodflow)
//! - `MOODFLOW_REMINDER`: Daily reminder time as `HH:MM` (defaults to 20:00)
//! - `MOODFLOW_HEATMAP_COLUMNS`: Days per heatmap row, 1-28 (defaults to 20)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_HEATMAP_COLUMNS, DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE,
    ENV_VAR_HOME, ENV_VAR_MOODFLOW_DIR, ENV_VAR_MOODFLOW_HEATMAP_COLUMNS,
    ENV_VAR_MOODFLOW_REMINDER, MAX_HEATMAP_COLUMNS, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for moodflow.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodflow::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/moodflow"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use moodflow::Config;
/// use std::env;
///
/// env::set_var("MOODFLOW_DIR", "/custom/moodflow/path");
/// env::set_var("MOODFLOW_REMINDER", "21:30");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.reminder_hour, 21);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory where the mood log and reminder slots are stored.
    ///
    /// Loaded from `MOODFLOW_DIR` with a fallback to ~/Documents/moodflow.
    pub data_dir: PathBuf,

    /// Hour of the daily reminder, 0-23.
    pub reminder_hour: u32,

    /// Minute of the daily reminder, 0-59.
    pub reminder_minute: u32,

    /// Days per row of the year heatmap.
    pub heatmap_columns: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("reminder_hour", &self.reminder_hour)
            .field("reminder_minute", &self.reminder_minute)
            .field("heatmap_columns", &self.heatmap_columns)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            reminder_hour: DEFAULT_REMINDER_HOUR,
            reminder_minute: DEFAULT_REMINDER_MINUTE,
            heatmap_columns: DEFAULT_HEATMAP_COLUMNS,
        }
    }
}

impl Config {
    /// Parses a reminder time in `HH:MM` form.
    fn parse_reminder(raw: &str) -> AppResult<(u32, u32)> {
        let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
            AppError::Config(format!(
                "Invalid reminder time '{}', expected HH:MM (e.g. 20:00)",
                raw
            ))
        })?;
        Ok((time.hour(), time.minute()))
    }

    fn parse_columns(raw: &str) -> AppResult<usize> {
        raw.trim().parse::<usize>().map_err(|_| {
            AppError::Config(format!(
                "Invalid heatmap column count '{}', expected a number between 1 and {}",
                raw, MAX_HEATMAP_COLUMNS
            ))
        })
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and
    /// environment variable references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - `MOODFLOW_REMINDER` is not a valid `HH:MM` time
    /// - `MOODFLOW_HEATMAP_COLUMNS` is not a number in range
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_MOODFLOW_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let (reminder_hour, reminder_minute) = match env::var(ENV_VAR_MOODFLOW_REMINDER) {
            Ok(raw) => Config::parse_reminder(&raw)?,
            Err(_) => (DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE),
        };

        let heatmap_columns = match env::var(ENV_VAR_MOODFLOW_HEATMAP_COLUMNS) {
            Ok(raw) => Config::parse_columns(&raw)?,
            Err(_) => DEFAULT_HEATMAP_COLUMNS,
        };

        let config = Config {
            data_dir,
            reminder_hour,
            reminder_minute,
            heatmap_columns,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty"
    /// - "Data directory must be an absolute path"
    /// - "Reminder time out of range"
    /// - "Heatmap columns must be between 1 and 28"
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.reminder_hour > 23 || self.reminder_minute > 59 {
            return Err(AppError::Config(format!(
                "Reminder time out of range: {:02}:{:02}",
                self.reminder_hour, self.reminder_minute
            )));
        }

        if self.heatmap_columns == 0 || self.heatmap_columns > MAX_HEATMAP_COLUMNS {
            return Err(AppError::Config(format!(
                "Heatmap columns must be between 1 and {}, got {}",
                MAX_HEATMAP_COLUMNS, self.heatmap_columns
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    fn setup() {
        env::remove_var(ENV_VAR_MOODFLOW_DIR);
        env::remove_var(ENV_VAR_MOODFLOW_REMINDER);
        env::remove_var(ENV_VAR_MOODFLOW_HEATMAP_COLUMNS);
    }

    fn config_at(path: &str) -> Config {
        Config {
            data_dir: PathBuf::from(path),
            ..Config::default()
        }
    }

    #[test]
    fn test_debug_impl_redacts_data_dir() {
        let config = config_at("/home/username/private/moods");

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
        assert!(!debug_output.contains("/home/username/private/moods"));
        assert!(debug_output.contains("reminder_hour: 20"));
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        setup();
        let orig_home = env::var(ENV_VAR_HOME).ok();
        env::set_var(ENV_VAR_HOME, "/home/tester");

        let config = Config::load();

        if let Some(val) = orig_home {
            env::set_var(ENV_VAR_HOME, val);
        }

        let config = config.unwrap();
        assert_eq!(
            config.data_dir,
            PathBuf::from("/home/tester/Documents/moodflow")
        );
        assert_eq!((config.reminder_hour, config.reminder_minute), (20, 0));
        assert_eq!(config.heatmap_columns, 20);
    }

    #[test]
    #[serial]
    fn test_load_with_custom_values() {
        setup();
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().to_string_lossy().to_string();

        env::set_var(ENV_VAR_MOODFLOW_DIR, &dir_path);
        env::set_var(ENV_VAR_MOODFLOW_REMINDER, "07:45");
        env::set_var(ENV_VAR_MOODFLOW_HEATMAP_COLUMNS, "14");
        let config = Config::load();
        setup();

        let config = config.unwrap();
        assert_eq!(config.data_dir, PathBuf::from(dir_path));
        assert_eq!((config.reminder_hour, config.reminder_minute), (7, 45));
        assert_eq!(config.heatmap_columns, 14);
    }

    #[test]
    #[serial]
    fn test_load_rejects_bad_reminder() {
        setup();
        env::set_var(ENV_VAR_MOODFLOW_DIR, "/tmp/moodflow");
        env::set_var(ENV_VAR_MOODFLOW_REMINDER, "8pm");
        let result = Config::load();
        setup();

        match result {
            Err(AppError::Config(message)) => assert!(message.contains("HH:MM")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_load_rejects_out_of_range_columns() {
        setup();
        env::set_var(ENV_VAR_MOODFLOW_DIR, "/tmp/moodflow");
        env::set_var(ENV_VAR_MOODFLOW_HEATMAP_COLUMNS, "40");
        let result = Config::load();
        setup();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_load_rejects_relative_dir() {
        setup();
        env::set_var(ENV_VAR_MOODFLOW_DIR, "relative/moods");
        let result = Config::load();
        setup();

        match result {
            Err(AppError::Config(message)) => {
                assert!(message.contains("must be an absolute path"))
            }
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_empty_data_dir() {
        let result = config_at("").validate();
        match result {
            Err(AppError::Config(message)) => {
                assert!(message.contains("Data directory path is empty"));
            }
            _ => panic!("Expected Config error about empty data directory"),
        }
    }

    #[test]
    fn test_validate_reminder_range() {
        let config = Config {
            reminder_hour: 24,
            ..config_at("/some/path")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_reminder() {
        assert_eq!(Config::parse_reminder("20:00").unwrap(), (20, 0));
        assert_eq!(Config::parse_reminder(" 06:05 ").unwrap(), (6, 5));
        assert!(Config::parse_reminder("25:00").is_err());
        assert!(Config::parse_reminder("").is_err());
    }

    #[test]
    fn test_ensure_data_dir() {
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().join("moodflow");
        let config = Config {
            data_dir: dir_path.clone(),
            ..Config::default()
        };

        assert!(!dir_path.exists());
        storage::ensure_data_directory_exists(&config.data_dir).unwrap();
        assert!(dir_path.exists());
    }
}
