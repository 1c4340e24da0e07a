//! Fire-and-forget audio notifications.

use maze_sprint_core::AudioCue;

/// Receives audio cues derived from session events.
pub(crate) trait AudioSink {
    /// Plays the sound associated with `cue`.
    fn play(&mut self, cue: AudioCue);
}

/// Sink that reports cues through the log facade.
#[derive(Debug, Default)]
pub(crate) struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::RoundStarted => log::debug!("audio: start round music"),
            AudioCue::RoundEnded => log::debug!("audio: stop music, play round-end jingle"),
        }
    }
}
