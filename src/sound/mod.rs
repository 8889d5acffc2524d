//! Completion sound for the focus timer.
//!
//! This module provides the audio collaborator the timer engine signals
//! when a mode completes:
//!
//! - A synthesized chime, or any sound file rodio can decode
//! - Non-blocking playback on a dedicated audio thread
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   play()   ┌──────────────────┐
//! │   TimerEngine    │ ─────────▶ │   SoundPlayer    │
//! └──────────────────┘            └────────┬─────────┘
//!                                          │ channel
//!                                          ▼
//!                                 ┌──────────────────┐
//!                                 │   audio thread   │
//!                                 │ (rodio stream)   │
//!                                 └──────────────────┘
//! ```
//!
//! Sound failures never reach the timer: the engine logs them and moves
//! on.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bento::sound::{RodioSoundPlayer, SoundSource};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! player.play(&SoundSource::chime()).expect("playback failed");
//! ```

mod error;
mod player;
mod source;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::SoundSource;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    plays: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns how many sounds were played successfully.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, _source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackFailure("Mock failure".to_string()));
        }
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
