//! Core data types for the bento focus timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and their display labels
//! - Timer configuration (durations and cycle tracking)
//! - Timer state owned by the engine
//! - Display snapshots handed to the UI
//!
//! It also hosts the small pure helpers shared by the engine and the
//! front end: time formatting, progress computation and the
//! target-timestamp arithmetic.

use serde::{Deserialize, Serialize};

/// Default focus duration in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
/// Default short break duration in minutes.
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
/// Default long break duration in minutes.
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
/// Default number of focus cycles between long breaks.
pub const DEFAULT_CYCLES_BEFORE_LONG_BREAK: u32 = 4;

// ============================================================================
// TimerMode
// ============================================================================

/// The countdown segment currently loaded in the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// A focus (work) segment
    #[default]
    Focus,
    /// A short break between focus segments
    ShortBreak,
    /// A long break after every N focus segments
    LongBreak,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns the title shown on the block.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Returns the subtitle shown under the block title.
    pub fn subtitle(&self) -> &'static str {
        if self.is_break() {
            "break"
        } else {
            "focusing"
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Durations and cycle bookkeeping shared by the timer.
///
/// Values are only ever written through [`crate::config::ConfigStore`],
/// which validates them; the engine treats this as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Focus duration in seconds (> 0)
    pub focus_duration_seconds: u32,
    /// Short break duration in seconds (> 0)
    pub short_break_duration_seconds: u32,
    /// Long break duration in seconds (> 0)
    pub long_break_duration_seconds: u32,
    /// Number of focus cycles between long breaks (>= 1)
    pub cycles_before_long_break: u32,
    /// Focus segments completed since launch
    pub completed_focus_cycles: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            focus_duration_seconds: DEFAULT_FOCUS_MINUTES * 60,
            short_break_duration_seconds: DEFAULT_SHORT_BREAK_MINUTES * 60,
            long_break_duration_seconds: DEFAULT_LONG_BREAK_MINUTES * 60,
            cycles_before_long_break: DEFAULT_CYCLES_BEFORE_LONG_BREAK,
            completed_focus_cycles: 0,
        }
    }
}

impl Configuration {
    /// Creates a configuration from durations given in seconds.
    pub fn from_seconds(focus: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            focus_duration_seconds: focus,
            short_break_duration_seconds: short_break,
            long_break_duration_seconds: long_break,
            ..Self::default()
        }
    }

    /// Sets the number of focus cycles between long breaks.
    pub fn with_cycles_before_long_break(mut self, cycles: u32) -> Self {
        self.cycles_before_long_break = cycles;
        self
    }

    /// Sets the completed focus cycle count.
    pub fn with_completed_focus_cycles(mut self, cycles: u32) -> Self {
        self.completed_focus_cycles = cycles;
        self
    }

    /// Returns the configured duration of `mode` in seconds.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_duration_seconds,
            TimerMode::ShortBreak => self.short_break_duration_seconds,
            TimerMode::LongBreak => self.long_break_duration_seconds,
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state exclusively owned by the timer engine.
///
/// `target_ms` is the wall-clock instant (milliseconds since the Unix
/// epoch) at which the running countdown reaches zero. The timer is
/// running exactly when a target is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    mode: TimerMode,
    remaining_seconds: u32,
    duration_seconds: u32,
    target_ms: Option<u64>,
}

impl TimerState {
    /// Creates a paused state with `mode` loaded from `config`.
    pub fn enter(mode: TimerMode, config: &Configuration) -> Self {
        let duration = config.duration_for(mode);
        Self {
            mode,
            remaining_seconds: duration,
            duration_seconds: duration,
            target_ms: None,
        }
    }

    /// Creates the initial state: focus, paused, full focus duration.
    pub fn initial(config: &Configuration) -> Self {
        Self::enter(TimerMode::Focus, config)
    }

    /// Returns the loaded mode.
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Returns the last committed remaining seconds.
    ///
    /// While running this is the value recorded at the last tick; use
    /// [`TimerState::remaining_at`] for the live value.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Returns the duration loaded when the mode was entered.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Returns the target timestamp in epoch milliseconds, if running.
    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    /// Returns true if the countdown is running.
    pub fn is_running(&self) -> bool {
        self.target_ms.is_some()
    }

    /// Returns the remaining seconds as of `now_ms`.
    pub fn remaining_at(&self, now_ms: u64) -> u32 {
        match self.target_ms {
            Some(target) => remaining_from_target(target, now_ms),
            None => self.remaining_seconds,
        }
    }

    pub(crate) fn run_until(&mut self, target_ms: u64) {
        self.target_ms = Some(target_ms);
    }

    pub(crate) fn commit(&mut self, remaining_seconds: u32) {
        self.remaining_seconds = remaining_seconds;
    }

    pub(crate) fn halt(&mut self, remaining_seconds: u32) {
        self.remaining_seconds = remaining_seconds;
        self.target_ms = None;
    }
}

// ============================================================================
// DisplaySnapshot
// ============================================================================

/// Read-only view of the timer handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Loaded mode
    pub mode: TimerMode,
    /// Remaining time as `MM:SS`
    #[serde(rename = "formattedTime")]
    pub formatted_time: String,
    /// Remaining fraction of the mode's duration, in `[0, 1]`
    #[serde(rename = "progressFraction")]
    pub progress_fraction: f64,
    /// Whether the countdown is running
    pub running: bool,
    /// Remaining whole seconds
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Focus segments completed so far
    #[serde(rename = "completedFocusCycles")]
    pub completed_focus_cycles: u32,
}

impl DisplaySnapshot {
    /// Builds a snapshot from the given values.
    pub fn new(
        mode: TimerMode,
        remaining_seconds: u32,
        duration_seconds: u32,
        running: bool,
        completed_focus_cycles: u32,
    ) -> Self {
        Self {
            mode,
            formatted_time: format_time(remaining_seconds),
            progress_fraction: progress_fraction(remaining_seconds, duration_seconds),
            running,
            remaining_seconds,
            completed_focus_cycles,
        }
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

/// Formats seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so durations of 100 minutes or more
/// render with three minute digits.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Returns `remaining / total` clamped into `[0, 1]`; zero when `total` is zero.
pub fn progress_fraction(remaining_seconds: u32, total_seconds: u32) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    (f64::from(remaining_seconds) / f64::from(total_seconds)).clamp(0.0, 1.0)
}

/// Returns `max(0, ceil((target - now) / 1000))`.
pub fn remaining_from_target(target_ms: u64, now_ms: u64) -> u32 {
    let left_ms = target_ms.saturating_sub(now_ms);
    u32::try_from(left_ms.div_ceil(1000)).unwrap_or(u32::MAX)
}

// ============================================================================
// Tests
// ============================================================================
