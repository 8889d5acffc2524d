//! Configuration store for the focus timer.
//!
//! The store holds the three mode durations, the long-break threshold and
//! the running count of completed focus cycles. It is the only place these
//! values are validated and written.
//!
//! Observers subscribe through a [`tokio::sync::watch`] channel. Every
//! mutating call marks subscribers changed before it returns, so a timer
//! engine sharing the store sees the new values on its very next
//! operation.
//!
//! # Example
//!
//! ```
//! use bento::config::ConfigStore;
//!
//! let store = ConfigStore::default();
//! store.set_durations(50, 10, 30).unwrap();
//! assert_eq!(store.get().focus_duration_seconds, 3000);
//!
//! assert!(store.set_durations(0, 10, 30).is_err());
//! assert_eq!(store.get().focus_duration_seconds, 3000);
//! ```

mod error;

pub use error::ConfigError;

use tokio::sync::watch;
use tracing::debug;

use crate::types::Configuration;

/// Shared, validated configuration with change notification.
#[derive(Debug)]
pub struct ConfigStore {
    tx: watch::Sender<Configuration>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(Configuration::default());
        Self { tx }
    }
}

impl ConfigStore {
    /// Creates a store holding `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if any duration is zero or the long-break threshold
    /// is zero.
    pub fn new(config: Configuration) -> Result<Self, ConfigError> {
        validate(&config)?;
        let (tx, _rx) = watch::channel(config);
        Ok(Self { tx })
    }

    /// Returns a copy of the current configuration.
    pub fn get(&self) -> Configuration {
        *self.tx.borrow()
    }

    /// Subscribes to configuration changes.
    pub fn subscribe(&self) -> watch::Receiver<Configuration> {
        self.tx.subscribe()
    }

    /// Replaces the three durations, given in minutes.
    ///
    /// The update is all-or-nothing: if any value is rejected, nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] for a zero value or one
    /// whose second count overflows.
    pub fn set_durations(
        &self,
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
    ) -> Result<(), ConfigError> {
        let focus = minutes_to_seconds("focus", focus_minutes)?;
        let short_break = minutes_to_seconds("short break", short_break_minutes)?;
        let long_break = minutes_to_seconds("long break", long_break_minutes)?;
        self.set_duration_seconds(focus, short_break, long_break)
    }

    /// Replaces the three durations, given in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] if any value is zero.
    pub fn set_duration_seconds(
        &self,
        focus: u32,
        short_break: u32,
        long_break: u32,
    ) -> Result<(), ConfigError> {
        check_positive("focus", focus)?;
        check_positive("short break", short_break)?;
        check_positive("long break", long_break)?;

        let changed = self.tx.send_if_modified(|config| {
            let before = *config;
            config.focus_duration_seconds = focus;
            config.short_break_duration_seconds = short_break;
            config.long_break_duration_seconds = long_break;
            before != *config
        });
        if changed {
            debug!(focus, short_break, long_break, "Durations updated");
        }
        Ok(())
    }

    /// Parses raw user input (minutes) and replaces the three durations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] naming the first field that
    /// is empty, non-numeric, fractional, zero or negative.
    pub fn set_durations_from_input(
        &self,
        focus: &str,
        short_break: &str,
        long_break: &str,
    ) -> Result<(), ConfigError> {
        let focus = parse_minutes("focus", focus)?;
        let short_break = parse_minutes("short break", short_break)?;
        let long_break = parse_minutes("long break", long_break)?;
        self.set_durations(focus, short_break, long_break)
    }

    /// Sets how many focus cycles come before each long break.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCycleThreshold`] if `cycles` is zero.
    pub fn set_cycles_before_long_break(&self, cycles: u32) -> Result<(), ConfigError> {
        if cycles == 0 {
            return Err(ConfigError::InvalidCycleThreshold(cycles));
        }
        self.tx.send_if_modified(|config| {
            let changed = config.cycles_before_long_break != cycles;
            config.cycles_before_long_break = cycles;
            changed
        });
        Ok(())
    }

    /// Records one more completed focus cycle and returns the new count.
    pub fn increment_cycles(&self) -> u32 {
        let mut count = 0;
        self.tx.send_modify(|config| {
            config.completed_focus_cycles = config.completed_focus_cycles.saturating_add(1);
            count = config.completed_focus_cycles;
        });
        debug!(completed_focus_cycles = count, "Focus cycle recorded");
        count
    }

    /// Resets the completed focus cycle count to zero.
    pub fn reset_cycles(&self) {
        self.tx.send_if_modified(|config| {
            let changed = config.completed_focus_cycles != 0;
            config.completed_focus_cycles = 0;
            changed
        });
    }
}

fn validate(config: &Configuration) -> Result<(), ConfigError> {
    check_positive("focus", config.focus_duration_seconds)?;
    check_positive("short break", config.short_break_duration_seconds)?;
    check_positive("long break", config.long_break_duration_seconds)?;
    if config.cycles_before_long_break == 0 {
        return Err(ConfigError::InvalidCycleThreshold(0));
    }
    Ok(())
}

fn check_positive(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::duration(field, "must be greater than zero"));
    }
    Ok(())
}

fn minutes_to_seconds(field: &'static str, minutes: u32) -> Result<u32, ConfigError> {
    check_positive(field, minutes)?;
    minutes
        .checked_mul(60)
        .ok_or_else(|| ConfigError::duration(field, format!("{} minutes is too large", minutes)))
}

/// Parses a user-entered minute count.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] unless `input` is a positive
/// whole number.
pub fn parse_minutes(field: &'static str, input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::duration(field, "is empty"));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ConfigError::duration(field, format!("'{}' is not a whole number", trimmed)))?;
    if value <= 0 {
        return Err(ConfigError::duration(field, "must be greater than zero"));
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::duration(field, format!("{} minutes is too large", value)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod store_tests {
        use super::*;

        #[test]
        fn test_default_store() {
            let store = ConfigStore::default();
            assert_eq!(store.get(), Configuration::default());
        }

        #[test]
        fn test_new_rejects_zero_duration() {
            let config = Configuration::from_seconds(0, 300, 900);
            let err = ConfigStore::new(config).unwrap_err();
            assert!(err.is_invalid_duration());
            assert_eq!(err.field(), "focus");
        }

        #[test]
        fn test_new_rejects_zero_threshold() {
            let config = Configuration::default().with_cycles_before_long_break(0);
            assert_eq!(
                ConfigStore::new(config).unwrap_err(),
                ConfigError::InvalidCycleThreshold(0)
            );
        }

        #[test]
        fn test_set_durations_converts_minutes() {
            let store = ConfigStore::default();
            store.set_durations(30, 10, 20).unwrap();

            let config = store.get();
            assert_eq!(config.focus_duration_seconds, 1800);
            assert_eq!(config.short_break_duration_seconds, 600);
            assert_eq!(config.long_break_duration_seconds, 1200);
        }

        #[test]
        fn test_set_durations_rejects_zero_and_keeps_values() {
            let store = ConfigStore::default();
            let err = store.set_durations(30, 0, 20).unwrap_err();
            assert_eq!(err.field(), "short break");
            assert_eq!(store.get(), Configuration::default());
        }

        #[test]
        fn test_set_durations_rejects_overflow() {
            let store = ConfigStore::default();
            let err = store.set_durations(u32::MAX, 5, 15).unwrap_err();
            assert!(err.to_string().contains("too large"));
            assert_eq!(store.get(), Configuration::default());
        }

        #[test]
        fn test_set_durations_from_input() {
            let store = ConfigStore::default();
            store.set_durations_from_input(" 45 ", "5", "20").unwrap();
            assert_eq!(store.get().focus_duration_seconds, 2700);
        }

        #[test]
        fn test_set_durations_from_input_rejects_bad_text() {
            let store = ConfigStore::default();
            for (f, s, l, field) in [
                ("abc", "5", "15", "focus"),
                ("25", "-5", "15", "short break"),
                ("25", "5", "1.5", "long break"),
                ("25", "", "15", "short break"),
                ("0", "5", "15", "focus"),
            ] {
                let err = store.set_durations_from_input(f, s, l).unwrap_err();
                assert!(err.is_invalid_duration());
                assert_eq!(err.field(), field, "input {:?}", (f, s, l));
            }
            assert_eq!(store.get(), Configuration::default());
        }

        #[test]
        fn test_increment_and_reset_cycles() {
            let store = ConfigStore::default();
            assert_eq!(store.increment_cycles(), 1);
            assert_eq!(store.increment_cycles(), 2);
            assert_eq!(store.get().completed_focus_cycles, 2);

            store.reset_cycles();
            assert_eq!(store.get().completed_focus_cycles, 0);
        }

        #[test]
        fn test_set_cycles_before_long_break() {
            let store = ConfigStore::default();
            store.set_cycles_before_long_break(2).unwrap();
            assert_eq!(store.get().cycles_before_long_break, 2);
            assert!(store.set_cycles_before_long_break(0).is_err());
            assert_eq!(store.get().cycles_before_long_break, 2);
        }
    }

    mod notification_tests {
        use super::*;

        #[test]
        fn test_subscriber_marked_changed_synchronously() {
            let store = ConfigStore::default();
            let mut rx = store.subscribe();
            assert!(!rx.has_changed().unwrap());

            store.set_durations(1, 1, 1).unwrap();

            assert!(rx.has_changed().unwrap());
            assert_eq!(rx.borrow_and_update().focus_duration_seconds, 60);
        }

        #[test]
        fn test_identical_write_does_not_notify() {
            let store = ConfigStore::default();
            let rx = store.subscribe();

            store.set_durations(25, 5, 15).unwrap();
            assert!(!rx.has_changed().unwrap());

            store.reset_cycles();
            assert!(!rx.has_changed().unwrap());
        }

        #[test]
        fn test_rejected_write_does_not_notify() {
            let store = ConfigStore::default();
            let rx = store.subscribe();
            let _ = store.set_durations(0, 0, 0);
            assert!(!rx.has_changed().unwrap());
        }

        #[test]
        fn test_increment_notifies() {
            let store = ConfigStore::default();
            let rx = store.subscribe();
            store.increment_cycles();
            assert!(rx.has_changed().unwrap());
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_minutes() {
            assert_eq!(parse_minutes("focus", "25").unwrap(), 25);
            assert_eq!(parse_minutes("focus", "\t7\n").unwrap(), 7);
        }

        #[test]
        fn test_parse_minutes_errors() {
            assert!(parse_minutes("focus", "")
                .unwrap_err()
                .to_string()
                .contains("is empty"));
            assert!(parse_minutes("focus", "ten")
                .unwrap_err()
                .to_string()
                .contains("not a whole number"));
            assert!(parse_minutes("focus", "-1")
                .unwrap_err()
                .to_string()
                .contains("greater than zero"));
            assert!(parse_minutes("focus", "99999999999")
                .unwrap_err()
                .to_string()
                .contains("too large"));
        }
    }
}
