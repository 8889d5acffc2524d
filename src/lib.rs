//! Bento Focus Timer Library
//!
//! This library provides the core functionality for the bento focus timer.
//! It includes:
//! - Timer engine: a drift-free countdown over focus, short break and
//!   long break modes
//! - Configuration store shared by timer blocks, with change notification
//! - Completion sound playback
//! - CLI command parsing, interactive session and display utilities
//! - Type definitions for configuration, state and display snapshots

pub mod cli;
pub mod config;
pub mod sound;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Configuration, DisplaySnapshot, TimerMode, TimerState};

pub use config::{ConfigError, ConfigStore};

pub use timer::{
    Clock, ManualClock, ModeSwitch, SwitchReason, SystemClock, TimerBlock, TimerEngine,
    TimerEvent,
};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
