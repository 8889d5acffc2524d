//! Pure state transitions for the focus timer.
//!
//! [`transition`] takes the current [`TimerState`], the current
//! [`Configuration`] and the wall-clock reading, and returns the next state
//! plus what happened. It captures nothing and touches no shared state, so
//! every rule of the mode cycle can be exercised without a runtime.
//!
//! ```text
//!            start               tick or stop (remaining = 0) / skip
//! ┌────────┐ ───────▶ ┌─────────┐      ┌──────────────────────────────┐
//! │ PAUSED │          │ RUNNING │ ───▶ │ next mode, PAUSED, full time │
//! └────────┘ ◀─────── └─────────┘      └──────────────────────────────┘
//!             stop
//! ```
//!
//! Mode order: FOCUS → SHORT_BREAK (or LONG_BREAK every N-th cycle) → FOCUS.

use serde::{Deserialize, Serialize};

use crate::types::{Configuration, TimerMode, TimerState};

/// An input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin counting down from the committed remaining time.
    Start,
    /// Freeze the countdown, committing the remaining time.
    Stop,
    /// Re-evaluate the remaining time against the target.
    Tick,
    /// Abandon the current mode and move to the next one.
    Skip,
    /// React to a configuration change.
    Reconfigure,
}

/// Why the mode changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchReason {
    /// The countdown reached zero.
    Completed,
    /// The user skipped the rest of the mode.
    Skipped,
}

/// A mode change produced by completion or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitch {
    /// Mode that was left
    pub from: TimerMode,
    /// Mode that was entered
    pub to: TimerMode,
    /// Completion or skip
    pub reason: SwitchReason,
    /// True when leaving focus, i.e. one more cycle must be recorded
    pub counts_cycle: bool,
    /// Completed focus cycles after this switch
    pub completed_focus_cycles: u32,
}

/// What a command did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command was not valid in the current state; nothing changed.
    Ignored,
    /// The countdown started.
    Started {
        /// Target timestamp in epoch milliseconds
        target_ms: u64,
    },
    /// The countdown stopped.
    Stopped {
        /// Remaining seconds committed at stop
        remaining_seconds: u32,
    },
    /// The countdown is still running.
    Ticked {
        /// Freshly computed remaining seconds
        remaining_seconds: u32,
    },
    /// The mode changed.
    Switched(ModeSwitch),
    /// The current mode's duration changed and was reloaded.
    Reset {
        /// Whether a running countdown was stopped by the reset
        was_running: bool,
    },
}

/// The result of applying a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the command
    pub state: TimerState,
    /// What happened
    pub outcome: Outcome,
}

impl Transition {
    fn ignored(state: &TimerState) -> Self {
        Self {
            state: *state,
            outcome: Outcome::Ignored,
        }
    }

    /// Returns the mode switch, if this transition made one.
    pub fn mode_switch(&self) -> Option<ModeSwitch> {
        match self.outcome {
            Outcome::Switched(switch) => Some(switch),
            _ => None,
        }
    }
}

/// Returns the mode that follows `current`.
///
/// `completed_focus_cycles` is the count after the cycle that is ending has
/// been recorded. A threshold of zero is treated as one.
pub fn next_mode(
    current: TimerMode,
    completed_focus_cycles: u32,
    cycles_before_long_break: u32,
) -> TimerMode {
    match current {
        TimerMode::Focus => {
            if completed_focus_cycles % cycles_before_long_break.max(1) == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            }
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
    }
}

/// Applies `command` to `state` at wall-clock time `now_ms`.
pub fn transition(
    state: &TimerState,
    config: &Configuration,
    command: Command,
    now_ms: u64,
) -> Transition {
    match command {
        Command::Start => {
            if state.is_running() {
                return Transition::ignored(state);
            }
            let target_ms = now_ms.saturating_add(u64::from(state.remaining_seconds()) * 1000);
            let mut next = *state;
            next.run_until(target_ms);
            Transition {
                state: next,
                outcome: Outcome::Started { target_ms },
            }
        }
        Command::Stop => {
            if !state.is_running() {
                return Transition::ignored(state);
            }
            let remaining_seconds = state.remaining_at(now_ms);
            // Expiry missed by the ticker still completes the mode.
            if remaining_seconds == 0 {
                return switch_mode(state, config, SwitchReason::Completed);
            }
            let mut next = *state;
            next.halt(remaining_seconds);
            Transition {
                state: next,
                outcome: Outcome::Stopped { remaining_seconds },
            }
        }
        Command::Tick => {
            if !state.is_running() {
                return Transition::ignored(state);
            }
            let remaining_seconds = state.remaining_at(now_ms);
            if remaining_seconds == 0 {
                return switch_mode(state, config, SwitchReason::Completed);
            }
            let mut next = *state;
            next.commit(remaining_seconds);
            Transition {
                state: next,
                outcome: Outcome::Ticked { remaining_seconds },
            }
        }
        Command::Skip => switch_mode(state, config, SwitchReason::Skipped),
        Command::Reconfigure => {
            if config.duration_for(state.mode()) == state.duration_seconds() {
                return Transition::ignored(state);
            }
            Transition {
                state: TimerState::enter(state.mode(), config),
                outcome: Outcome::Reset {
                    was_running: state.is_running(),
                },
            }
        }
    }
}

/// Leaves the current mode for the next one, loading its full duration
/// paused.
///
/// Leaving focus projects one more completed cycle from `config`.
pub fn advance_mode(
    state: &TimerState,
    config: &Configuration,
    reason: SwitchReason,
) -> (TimerState, ModeSwitch) {
    let from = state.mode();
    let counts_cycle = from == TimerMode::Focus;
    let completed_focus_cycles = if counts_cycle {
        config.completed_focus_cycles.saturating_add(1)
    } else {
        config.completed_focus_cycles
    };
    let to = next_mode(from, completed_focus_cycles, config.cycles_before_long_break);

    let switch = ModeSwitch {
        from,
        to,
        reason,
        counts_cycle,
        completed_focus_cycles,
    };
    (TimerState::enter(to, config), switch)
}

fn switch_mode(state: &TimerState, config: &Configuration, reason: SwitchReason) -> Transition {
    let (state, switch) = advance_mode(state, config, reason);
    Transition {
        state,
        outcome: Outcome::Switched(switch),
    }
}

// ============================================================================
// Tests
// ============================================================================
