//! Interactive timer session.
//!
//! The session owns one [`TimerBlock`] and reads one command per line from
//! its input while printing timer events as they arrive. It ends on `quit`,
//! end of input or Ctrl-C, and tears the block down on the way out.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::display::Display;
use crate::config::ConfigStore;
use crate::timer::{TimerBlock, TimerEngine, TimerEvent};

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start if paused, stop if running
    Toggle,
    /// Start the countdown
    Start,
    /// Stop the countdown
    Stop,
    /// Move to the next mode
    Skip,
    /// Replace the three durations (raw minute strings)
    Set {
        /// Focus minutes as typed
        focus: String,
        /// Short break minutes as typed
        short_break: String,
        /// Long break minutes as typed
        long_break: String,
    },
    /// Reset the completed focus cycle count
    Reset,
    /// Print the current status
    Status,
    /// Print the command summary
    Help,
    /// Leave the session
    Quit,
}

impl SessionCommand {
    /// Parses one input line. An empty line toggles.
    ///
    /// # Errors
    ///
    /// Returns a message describing the unknown or malformed command.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Toggle);
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "toggle" | "t" => Self::Toggle,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "skip" | "n" => Self::Skip,
            "reset" => Self::Reset,
            "status" | "s" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "set" => match rest.as_slice() {
                [focus, short_break, long_break] => {
                    return Ok(Self::Set {
                        focus: (*focus).to_string(),
                        short_break: (*short_break).to_string(),
                        long_break: (*long_break).to_string(),
                    })
                }
                _ => return Err("usage: set <focus> <short break> <long break>".to_string()),
            },
            other => return Err(format!("unknown command '{}' (type 'help')", other)),
        };
        if !rest.is_empty() {
            return Err(format!("'{}' takes no arguments", verb));
        }
        Ok(command)
    }
}

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// End the session
    Quit,
}

// ============================================================================
// Session
// ============================================================================

/// One interactive timer session.
pub struct Session {
    block: TimerBlock,
    store: Arc<ConfigStore>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    display: Display,
}

impl Session {
    /// Wraps `engine` in a timer block. `events` must be the receiving end
    /// of the engine's event channel.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(
        engine: TimerEngine,
        events: mpsc::UnboundedReceiver<TimerEvent>,
        display: Display,
    ) -> Self {
        let store = engine.store().clone();
        Self {
            block: TimerBlock::new(engine),
            store,
            events,
            display,
        }
    }

    /// Runs the session until `quit`, end of input or Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input fails.
    pub async fn run<R>(mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        self.display.show_help();
        self.display.show_status(&self.block.snapshot().await);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        debug!("Input closed");
                        break;
                    };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                Some(event) = self.events.recv() => {
                    self.on_event(&event).await;
                }
                _ = &mut shutdown => {
                    debug!("Interrupted");
                    break;
                }
            }
        }

        self.close();
        Ok(())
    }

    /// Applies one input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match SessionCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                Display::show_error(&message);
                return Flow::Continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            SessionCommand::Toggle => {
                self.block.toggle().await;
            }
            SessionCommand::Start => {
                if !self.block.start().await {
                    Display::show_error("the timer is already running");
                }
            }
            SessionCommand::Stop => {
                if !self.block.stop().await {
                    Display::show_error("the timer is not running");
                }
            }
            SessionCommand::Skip => {
                self.block.skip().await;
            }
            SessionCommand::Set {
                focus,
                short_break,
                long_break,
            } => {
                if let Err(e) = self
                    .store
                    .set_durations_from_input(&focus, &short_break, &long_break)
                {
                    Display::show_error(&format!("{} ({})", e, e.suggestion()));
                }
            }
            SessionCommand::Reset => self.store.reset_cycles(),
            SessionCommand::Status => {
                self.display.show_status(&self.block.snapshot().await);
            }
            SessionCommand::Help => self.display.show_help(),
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn on_event(&self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick { remaining_seconds } => {
                if self.display.wants_tick(*remaining_seconds) {
                    self.display.show_status(&self.block.snapshot().await);
                }
            }
            TimerEvent::ModeSwitched { .. } | TimerEvent::Reset { .. } => {
                self.display.show_event(event);
                self.display.show_status(&self.block.snapshot().await);
            }
            _ => self.display.show_event(event),
        }
    }

    /// Returns the current display snapshot.
    pub async fn snapshot(&self) -> crate::types::DisplaySnapshot {
        self.block.snapshot().await
    }

    /// Tears the session down, cancelling the block's background tasks.
    pub fn close(self) {
        self.block.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
