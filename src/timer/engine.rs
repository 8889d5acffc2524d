//! Timer engine for the focus timer block.
//!
//! This module provides the stateful wrapper around the pure transition
//! function:
//! - Start / stop / skip / tick against an injected clock
//! - Cycle bookkeeping through the shared configuration store
//! - Immediate reaction to duration changes
//! - Event firing and the completion sound
//!
//! The engine never schedules anything itself; see
//! [`crate::timer::TimerBlock`] for the periodic tick.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ConfigStore;
use crate::sound::{SoundPlayer, SoundSource};
use crate::types::{Configuration, DisplaySnapshot, TimerMode, TimerState};

use super::clock::Clock;
use super::machine::{
    advance_mode, next_mode, transition, Command, ModeSwitch, Outcome, SwitchReason, Transition,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events for the display and notification layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started
    Started {
        /// Loaded mode
        mode: TimerMode,
        /// Seconds left at start
        remaining_seconds: u32,
    },
    /// Countdown stopped
    Stopped {
        /// Loaded mode
        mode: TimerMode,
        /// Seconds left at stop
        remaining_seconds: u32,
    },
    /// The displayed second changed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A mode finished or was skipped
    ModeSwitched {
        /// Mode that was left
        from: TimerMode,
        /// Mode that was entered (paused, full duration)
        to: TimerMode,
        /// Completion or skip
        reason: SwitchReason,
        /// Completed focus cycles after the switch
        completed_focus_cycles: u32,
    },
    /// The current mode was reloaded after a duration change
    Reset {
        /// Loaded mode
        mode: TimerMode,
        /// New remaining seconds
        remaining_seconds: u32,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Owns the countdown state of one timer block.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Shared configuration
    store: Arc<ConfigStore>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Completion sound, if audio is available
    sound: Option<(Arc<dyn SoundPlayer + Send + Sync>, SoundSource)>,
}

impl TimerEngine {
    /// Creates an engine paused in focus mode with the configured focus
    /// duration loaded.
    pub fn new(
        store: Arc<ConfigStore>,
        clock: Arc<dyn Clock>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let state = TimerState::initial(&store.get());
        Self {
            state,
            store,
            clock,
            event_tx,
            sound: None,
        }
    }

    /// Plays `source` through `player` whenever a mode completes.
    #[must_use]
    pub fn with_sound(
        mut self,
        player: Arc<dyn SoundPlayer + Send + Sync>,
        source: SoundSource,
    ) -> Self {
        self.sound = Some((player, source));
        self
    }

    /// Starts the countdown.
    ///
    /// Returns false (and changes nothing) if it is already running.
    pub fn start(&mut self) -> bool {
        let t = self.apply(Command::Start);
        if t.outcome == Outcome::Ignored {
            debug!("Start ignored: timer already running");
            return false;
        }
        true
    }

    /// Stops the countdown, keeping the remaining time.
    ///
    /// If the target has already passed, the mode completes instead, exactly
    /// as the next tick would have done. Returns false (and changes nothing)
    /// if it is not running.
    pub fn stop(&mut self) -> bool {
        let t = self.apply(Command::Stop);
        match t.outcome {
            Outcome::Ignored => {
                debug!("Stop ignored: timer not running");
                false
            }
            Outcome::Switched(_) => {
                self.play_completion_sound();
                true
            }
            _ => true,
        }
    }

    /// Re-evaluates the countdown against the clock.
    ///
    /// Returns the mode switch if the countdown reached zero. Does nothing
    /// while paused.
    pub fn tick(&mut self) -> Option<ModeSwitch> {
        let switch = self.apply(Command::Tick).mode_switch()?;
        self.play_completion_sound();
        Some(switch)
    }

    /// Moves straight to the next mode, discarding the remaining time.
    pub fn skip(&mut self) -> ModeSwitch {
        self.sync_config();

        let config = self.store.get();
        let (mut state, mut switch) = advance_mode(&self.state, &config, SwitchReason::Skipped);
        self.record_cycle(&config, &mut switch, &mut state);
        self.state = state;
        self.emit_switch(&switch);
        switch
    }

    /// Applies pending configuration changes.
    ///
    /// If the current mode's duration changed, the countdown is stopped and
    /// reloaded with the new duration. Returns true if that happened.
    pub fn sync_config(&mut self) -> bool {
        let t = transition(
            &self.state,
            &self.store.get(),
            Command::Reconfigure,
            self.clock.now_ms(),
        );
        let Outcome::Reset { was_running } = t.outcome else {
            return false;
        };
        self.state = t.state;
        info!(
            mode = self.state.mode().as_str(),
            remaining_seconds = self.state.remaining_seconds(),
            was_running,
            "Duration changed, timer reset"
        );
        self.emit(TimerEvent::Reset {
            mode: self.state.mode(),
            remaining_seconds: self.state.remaining_seconds(),
        });
        true
    }

    /// Returns the state as the next operation will see it.
    ///
    /// Pending duration changes are already applied to the returned copy.
    pub fn state(&self) -> TimerState {
        transition(
            &self.state,
            &self.store.get(),
            Command::Reconfigure,
            self.clock.now_ms(),
        )
        .state
    }

    /// Returns the loaded mode.
    pub fn mode(&self) -> TimerMode {
        self.state.mode()
    }

    /// Returns true if the countdown is running.
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Returns the remaining seconds as of now.
    pub fn remaining_seconds(&self) -> u32 {
        self.state().remaining_at(self.clock.now_ms())
    }

    /// Returns the shared configuration store.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Builds the read-only view for the display layer.
    pub fn snapshot(&self) -> DisplaySnapshot {
        let state = self.state();
        DisplaySnapshot::new(
            state.mode(),
            state.remaining_at(self.clock.now_ms()),
            state.duration_seconds(),
            state.is_running(),
            self.store.get().completed_focus_cycles,
        )
    }

    fn apply(&mut self, command: Command) -> Transition {
        self.sync_config();

        let config = self.store.get();
        let previous = self.state;
        let mut t = transition(&previous, &config, command, self.clock.now_ms());

        if let Outcome::Switched(switch) = &mut t.outcome {
            self.record_cycle(&config, switch, &mut t.state);
        }

        self.state = t.state;
        self.emit_outcome(&previous, &t);
        t
    }

    /// Records the cycle `switch` completes, if any, in the store.
    fn record_cycle(&self, config: &Configuration, switch: &mut ModeSwitch, state: &mut TimerState) {
        if !switch.counts_cycle {
            return;
        }
        let recorded = self.store.increment_cycles();
        // The store may have been reset between the read and the write.
        if recorded != switch.completed_focus_cycles {
            switch.completed_focus_cycles = recorded;
            switch.to = next_mode(switch.from, recorded, config.cycles_before_long_break);
            *state = TimerState::enter(switch.to, config);
        }
    }

    fn emit_outcome(&self, previous: &TimerState, t: &Transition) {
        let mode = t.state.mode();
        match t.outcome {
            Outcome::Ignored | Outcome::Reset { .. } => {}
            Outcome::Started { target_ms } => {
                debug!(mode = mode.as_str(), target_ms, "Timer started");
                self.emit(TimerEvent::Started {
                    mode,
                    remaining_seconds: t.state.remaining_seconds(),
                });
            }
            Outcome::Stopped { remaining_seconds } => {
                debug!(mode = mode.as_str(), remaining_seconds, "Timer stopped");
                self.emit(TimerEvent::Stopped {
                    mode,
                    remaining_seconds,
                });
            }
            Outcome::Ticked { remaining_seconds } => {
                if remaining_seconds != previous.remaining_seconds() {
                    self.emit(TimerEvent::Tick { remaining_seconds });
                }
            }
            Outcome::Switched(switch) => self.emit_switch(&switch),
        }
    }

    fn emit_switch(&self, switch: &ModeSwitch) {
        info!(
            from = switch.from.as_str(),
            to = switch.to.as_str(),
            reason = ?switch.reason,
            completed_focus_cycles = switch.completed_focus_cycles,
            "Mode switched"
        );
        self.emit(TimerEvent::ModeSwitched {
            from: switch.from,
            to: switch.to,
            reason: switch.reason,
            completed_focus_cycles: switch.completed_focus_cycles,
        });
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped, event discarded");
        }
    }

    fn play_completion_sound(&self) {
        let Some((player, source)) = &self.sound else {
            return;
        };
        if let Err(e) = player.play(source) {
            warn!("Completion sound failed: {} ({})", e, e.suggestion());
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("sound", &self.sound.as_ref().map(|(_, source)| source))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
