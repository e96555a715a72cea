//! Ambience playback seam.
//!
//! The session orchestrator is the only owner of the player. Playback
//! failures are reported to the orchestrator, which carries on silently.

use crate::error::PlaybackError;
use crate::session::config::AmbienceTrack;

pub trait AmbiencePlayer {
    /// Start looping `track` at `volume` percent.
    fn play(&mut self, track: &AmbienceTrack, volume: u8) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn resume(&mut self) -> Result<(), PlaybackError>;

    /// Stop and release the track.
    fn stop(&mut self);
}

/// Player for environments without audio output. Tracks what it was asked to
/// do so front ends can still show the ambience state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SilentPlayer {
    track: Option<String>,
    playing: bool,
}

impl SilentPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AmbiencePlayer for SilentPlayer {
    fn play(&mut self, track: &AmbienceTrack, volume: u8) -> Result<(), PlaybackError> {
        tracing::debug!(track = %track.id, url = %track.audio_url, volume, "ambience started (silent)");
        self.track = Some(track.id.clone());
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.track.is_none() {
            return Err(PlaybackError::Unavailable("no track loaded".into()));
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.track = None;
        self.playing = false;
    }
}
