//! Display utilities for the bento timer CLI.
//!
//! This module formats output for:
//! - Status lines built from a [`DisplaySnapshot`]
//! - Timer events
//! - Error messages
//!
//! Formatting functions return strings so they can be tested; the `show_*`
//! functions print them.

use crate::timer::{SwitchReason, TimerEvent};
use crate::types::{format_time, DisplaySnapshot};

/// Width of the progress bar, in cells.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Display {
    json: bool,
}

impl Display {
    /// Creates a display printing plain text, or JSON when `json` is set.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints the current status.
    pub fn show_status(&self, snapshot: &DisplaySnapshot) {
        if self.json {
            match Self::status_json(snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => Self::show_error(&e.to_string()),
            }
        } else {
            println!("{}", Self::status_line(snapshot));
        }
    }

    /// Prints a line for `event`, if it warrants one.
    ///
    /// Tick events are silent; the session redraws on its own schedule.
    pub fn show_event(&self, event: &TimerEvent) {
        if self.json {
            return;
        }
        if let Some(line) = Self::event_line(event) {
            println!("{}", line);
        }
    }

    /// Returns true if a tick to `remaining_seconds` should redraw the
    /// status: every second in JSON mode, on whole minutes and during the
    /// last ten seconds otherwise.
    pub fn wants_tick(&self, remaining_seconds: u32) -> bool {
        self.json || remaining_seconds % 60 == 0 || remaining_seconds <= 10
    }

    /// Prints the interactive command summary.
    pub fn show_help(&self) {
        if self.json {
            return;
        }
        println!("Commands:");
        println!("  start | stop | toggle   start or stop the countdown (Enter toggles)");
        println!("  skip                    move to the next mode");
        println!("  set <focus> <short> <long>");
        println!("                          change durations in minutes");
        println!("  status                  show the current status");
        println!("  help                    show this help");
        println!("  quit                    leave the session");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Formats a snapshot as a single status line.
    pub fn status_line(snapshot: &DisplaySnapshot) -> String {
        let state = if snapshot.running { ">" } else { "||" };
        format!(
            "{:<2} {:<11} {:<8} {}  {}  cycles: {}",
            state,
            snapshot.mode.label(),
            snapshot.mode.subtitle(),
            snapshot.formatted_time,
            progress_bar(snapshot.progress_fraction),
            snapshot.completed_focus_cycles,
        )
    }

    /// Formats a snapshot as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn status_json(snapshot: &DisplaySnapshot) -> serde_json::Result<String> {
        serde_json::to_string(snapshot)
    }

    /// Formats a timer event, or returns `None` for tick events.
    pub fn event_line(event: &TimerEvent) -> Option<String> {
        let line = match event {
            TimerEvent::Started {
                mode,
                remaining_seconds,
            } => format!("* {} started ({} left)", mode.label(), format_time(*remaining_seconds)),
            TimerEvent::Stopped {
                mode,
                remaining_seconds,
            } => format!("|| {} stopped ({} left)", mode.label(), format_time(*remaining_seconds)),
            TimerEvent::Tick { .. } => return None,
            TimerEvent::ModeSwitched {
                from,
                to,
                reason,
                completed_focus_cycles,
            } => {
                let verb = match reason {
                    SwitchReason::Completed => "finished",
                    SwitchReason::Skipped => "skipped",
                };
                format!(
                    "-> {} {}, next: {} (cycles: {})",
                    from.label(),
                    verb,
                    to.label(),
                    completed_focus_cycles
                )
            }
            TimerEvent::Reset {
                mode,
                remaining_seconds,
            } => format!(
                "~ {} reset to {} after a duration change",
                mode.label(),
                format_time(*remaining_seconds)
            ),
        };
        Some(line)
    }
}

/// Renders `fraction` (remaining share of the mode) as a fixed-width bar.
fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

// ============================================================================
// Tests
// ============================================================================
