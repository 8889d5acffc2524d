//! Sound player implementation using rodio.
//!
//! rodio's output stream must stay on the thread that opened it, so the
//! player owns a dedicated audio thread and hands it play requests over a
//! channel. The player itself is `Send + Sync` and can be shared with the
//! timer engine through an `Arc`.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{check_file, SoundSource};

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioSoundPlayer {
    /// Play requests for the audio thread.
    requests: Sender<SoundSource>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player and its audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (requests, inbox) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name("bento-audio".to_string())
            .spawn(move || audio_thread(&inbox, &ready_tx))
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| SoundError::DeviceNotAvailable("audio thread exited".to_string()))??;

        debug!("Audio output stream initialized");

        Ok(Self { requests })
    }

    /// Queues `source` for playback.
    ///
    /// A missing file is reported here; decode failures happen on the audio
    /// thread and are logged there.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::LoadFailure` for a missing file and
    /// `SoundError::PlaybackFailure` if the audio thread has stopped.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if let Some(path) = source.path() {
            check_file(path)?;
        }

        self.requests
            .send(source.clone())
            .map_err(|_| SoundError::PlaybackFailure("audio thread stopped".to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Runs until every `RodioSoundPlayer` sender is dropped.
fn audio_thread(inbox: &Receiver<SoundSource>, ready: &Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    for source in inbox.iter() {
        let result = match play_source(&handle, &source) {
            Err(e) if e.should_fallback_to_chime() => {
                warn!(
                    "Failed to load '{}': {}, falling back to chime",
                    source.name(),
                    e
                );
                play_source(&handle, &SoundSource::Chime)
            }
            other => other,
        };
        if let Err(e) = result {
            warn!("Sound playback failed: {}", e);
        }
    }
    debug!("Audio thread finished");
}

fn play_source(handle: &OutputStreamHandle, source: &SoundSource) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::PlaybackFailure(e.to_string()))?;

    match source {
        SoundSource::Chime => {
            sink.append(
                SineWave::new(880.0)
                    .take_duration(Duration::from_millis(180))
                    .amplify(0.20),
            );
            sink.append(
                SineWave::new(1318.5)
                    .take_duration(Duration::from_millis(420))
                    .amplify(0.15),
            );
        }
        SoundSource::File { path } => {
            let file = File::open(path)
                .map_err(|e| SoundError::LoadFailure(format!("{}: {}", path.display(), e)))?;
            let decoder = Decoder::new(BufReader::new(file))
                .map_err(|e| SoundError::LoadFailure(format!("{}: {}", path.display(), e)))?;
            sink.append(decoder);
        }
    }

    // Non-blocking: the sound keeps playing after the sink handle is gone.
    sink.detach();
    debug!("Playing {}", source.name());
    Ok(())
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
