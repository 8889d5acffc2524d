//! Sound sources for the completion signal.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// What to play when a mode completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SoundSource {
    /// A short two-tone chime synthesized at playback time.
    #[default]
    Chime,
    /// An audio file on disk (any format rodio can decode).
    File {
        /// Path to the sound file.
        path: PathBuf,
    },
}

impl SoundSource {
    /// Creates the built-in chime source.
    #[must_use]
    pub fn chime() -> Self {
        Self::Chime
    }

    /// Creates a file source without checking the path.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a file source, checking that the path is a regular file.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::LoadFailure` if the path does not name an
    /// existing file.
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        check_file(&path)?;
        Ok(Self::File { path })
    }

    /// Returns a short display name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Chime => "chime".to_string(),
            Self::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Chime => None,
        }
    }
}

pub(crate) fn check_file(path: &Path) -> Result<(), SoundError> {
    if !path.is_file() {
        return Err(SoundError::LoadFailure(format!(
            "{}: no such file",
            path.display()
        )));
    }
    Ok(())
}
