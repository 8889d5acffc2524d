//! Command definitions for the bento timer CLI.
//!
//! Uses clap derive macro for argument parsing. Duration flags are parsed
//! by the configuration store's own parser, so the command line rejects
//! exactly what the store rejects.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{parse_minutes, ConfigError, ConfigStore};
use crate::sound::{SoundError, SoundSource};
use crate::types::{
    DEFAULT_CYCLES_BEFORE_LONG_BREAK, DEFAULT_FOCUS_MINUTES, DEFAULT_LONG_BREAK_MINUTES,
    DEFAULT_SHORT_BREAK_MINUTES,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Bento - a focus timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "bento",
    version,
    about = "Focus timer with short and long breaks",
    long_about = "A focus timer block for the terminal.\n\
                  Counts down focus, short break and long break segments, \
                  taking a long break after every few focus cycles.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Focus duration in minutes
    #[arg(short, long, default_value_t = DEFAULT_FOCUS_MINUTES, value_parser = focus_minutes)]
    pub focus: u32,

    /// Short break duration in minutes
    #[arg(short, long, default_value_t = DEFAULT_SHORT_BREAK_MINUTES, value_parser = short_break_minutes)]
    pub short_break: u32,

    /// Long break duration in minutes
    #[arg(short, long, default_value_t = DEFAULT_LONG_BREAK_MINUTES, value_parser = long_break_minutes)]
    pub long_break: u32,

    /// Focus cycles before each long break
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CYCLES_BEFORE_LONG_BREAK,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cycles: u32,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Sound file to play on completion instead of the built-in chime
    #[arg(long, value_name = "FILE", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,

    /// Print status lines as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS_MINUTES,
            short_break: DEFAULT_SHORT_BREAK_MINUTES,
            long_break: DEFAULT_LONG_BREAK_MINUTES,
            cycles: DEFAULT_CYCLES_BEFORE_LONG_BREAK,
            no_sound: false,
            sound: None,
            json: false,
        }
    }
}

impl RunArgs {
    /// Builds the configuration store these arguments describe.
    ///
    /// # Errors
    ///
    /// Returns an error if any duration or the cycle threshold is rejected.
    pub fn config_store(&self) -> Result<ConfigStore, ConfigError> {
        let store = ConfigStore::default();
        store.set_durations(self.focus, self.short_break, self.long_break)?;
        store.set_cycles_before_long_break(self.cycles)?;
        Ok(store)
    }

    /// Returns the completion sound, or `None` when sound is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SoundError::LoadFailure`] if `--sound` names a missing file.
    pub fn sound_source(&self) -> Result<Option<SoundSource>, SoundError> {
        if self.no_sound {
            return Ok(None);
        }
        match &self.sound {
            Some(path) => SoundSource::file_validated(path).map(Some),
            None => Ok(Some(SoundSource::chime())),
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

fn focus_minutes(s: &str) -> Result<u32, ConfigError> {
    parse_minutes("focus", s)
}

fn short_break_minutes(s: &str) -> Result<u32, ConfigError> {
    parse_minutes("short break", s)
}

fn long_break_minutes(s: &str) -> Result<u32, ConfigError> {
    parse_minutes("long break", s)
}

// ============================================================================
// Tests
// ============================================================================
