//! Canonical date keys and the clock they are derived from.
//!
//! Every place that produces or compares a day identifier goes through
//! [`DateKey`]. Keys are always computed from the **local** calendar date,
//! never from UTC, so an entry logged late in the evening stays on the day
//! the user experienced it.

use crate::constants::{DATE_FORMAT_COMPACT, DATE_FORMAT_ISO};
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

/// A calendar day rendered as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use moodflow::date_key::{date_key, DateKey};
/// use chrono::NaiveDate;
///
/// let key = date_key(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// assert_eq!(key.to_string(), "2024-03-05");
/// assert_eq!("2024-03-05".parse::<DateKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wraps a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// The calendar date this key names.
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Parses a canonical `YYYY-MM-DD` key.
    ///
    /// Non-padded forms such as `2024-3-5` are rejected so that every stored
    /// key has exactly one spelling.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Date` if the input is not a canonical key.
    pub fn parse_canonical(input: &str) -> AppResult<Self> {
        let date = NaiveDate::parse_from_str(input, DATE_FORMAT_ISO)
            .map_err(|e| AppError::Date(format!("Invalid date key '{}': {}", input, e)))?;
        let key = DateKey(date);
        if key.to_string() != input {
            return Err(AppError::Date(format!(
                "Invalid date key '{}': expected zero-padded YYYY-MM-DD",
                input
            )));
        }
        Ok(key)
    }

    /// Parses user input in `YYYY-MM-DD` or `YYYYMMDD` form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Date` if neither format matches.
    pub fn parse_user_input(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT_ISO)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT_COMPACT))
            .map(DateKey)
            .map_err(|e| {
                AppError::Date(format!(
                    "Invalid date '{}' (expected YYYY-MM-DD or YYYYMMDD): {}",
                    trimmed, e
                ))
            })
    }

    /// True when this day comes strictly after `other`.
    pub fn is_after(self, other: DateKey) -> bool {
        self.0 > other.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT_ISO))
    }
}

impl FromStr for DateKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse_canonical(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DateKeyVisitor;

        impl Visitor<'_> for DateKeyVisitor {
            type Value = DateKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a YYYY-MM-DD date key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DateKey, E> {
                DateKey::parse_canonical(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DateKeyVisitor)
    }
}

/// Source of "now" for date keys and entry timestamps.
pub trait Clock {
    /// Today's local calendar date.
    fn today(&self) -> NaiveDate;

    /// Current instant as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock pinned to a given day and instant, adjustable through `&self`.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
    now_millis: Cell<i64>,
}

impl FixedClock {
    /// Creates a clock reporting `today` and `now_millis` until changed.
    pub fn new(today: NaiveDate, now_millis: i64) -> Self {
        FixedClock {
            today: Cell::new(today),
            now_millis: Cell::new(now_millis),
        }
    }

    /// Moves the clock to another day.
    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    /// Moves the clock to another instant.
    pub fn set_now_millis(&self, now_millis: i64) {
        self.now_millis.set(now_millis);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_millis(&self) -> i64 {
        self.now_millis.get()
    }
}

/// The key for an arbitrary calendar day.
pub fn date_key(date: NaiveDate) -> DateKey {
    DateKey(date)
}

/// The key for today according to `clock`.
pub fn today_key(clock: &impl Clock) -> DateKey {
    DateKey(clock.today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_display_is_zero_padded() {
        let key = date_key(NaiveDate::from_ymd_opt(987, 1, 2).unwrap());
        assert_eq!(key.to_string(), "0987-01-02");
    }

    #[test]
    fn test_canonical_round_trip_over_a_leap_year() {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        while date <= end {
            let text = date_key(date).to_string();
            let parsed = DateKey::parse_canonical(&text).unwrap();
            assert_eq!(parsed.to_string(), text);
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_parse_canonical_rejects_unpadded() {
        assert!(DateKey::parse_canonical("2024-3-5").is_err());
        assert!(DateKey::parse_canonical("20240305").is_err());
        assert!(DateKey::parse_canonical("2023-02-29").is_err());
    }

    #[test]
    fn test_parse_user_input_accepts_compact() {
        let key = DateKey::parse_user_input("20230115").unwrap();
        assert_eq!(key.to_string(), "2023-01-15");
        let key = DateKey::parse_user_input(" 2023-01-15 ").unwrap();
        assert_eq!(key.to_string(), "2023-01-15");
    }

    #[test]
    fn test_parse_user_input_invalid() {
        match DateKey::parse_user_input("invalid-date") {
            Err(AppError::Date(msg)) => assert!(msg.contains("invalid-date")),
            other => panic!("Expected AppError::Date, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_string_form() {
        let key = date_key(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-06-15\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"2024-6-15\"").is_err());
    }

    #[test]
    fn test_today_key_uses_clock() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), 0);
        assert_eq!(today_key(&clock).to_string(), "2024-06-15");
        clock.set_today(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert_eq!(today_key(&clock).to_string(), "2024-06-16");
    }

    #[test]
    fn test_is_after() {
        let today = date_key(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        let tomorrow = date_key(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert!(tomorrow.is_after(today));
        assert!(!today.is_after(today));
        assert!(!today.is_after(tomorrow));
    }
}
