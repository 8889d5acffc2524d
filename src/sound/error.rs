//! Sound system error types.
//!
//! Every sound error is non-fatal: the timer logs it and carries on.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The sound could not be loaded (missing file, unreadable or
    /// undecodable data).
    #[error("failed to load sound: {0}")]
    LoadFailure(String),

    /// The sound was loaded but could not be played.
    #[error("failed to play sound: {0}")]
    PlaybackFailure(String),
}

impl SoundError {
    /// Returns true if this error is related to the sound data.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::LoadFailure(_))
    }

    /// Returns true if playing the built-in chime instead may succeed.
    #[must_use]
    pub fn should_fallback_to_chime(&self) -> bool {
        self.is_load_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device or run with --no-sound",
            Self::LoadFailure(_) => "check the sound file path and format",
            Self::PlaybackFailure(_) => "check the system audio settings",
        }
    }
}
