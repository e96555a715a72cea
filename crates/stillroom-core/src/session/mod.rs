mod audio;
mod config;
mod orchestrator;
mod record;
mod runner;

pub use audio::{AmbiencePlayer, SilentPlayer};
pub use config::{custom_duration, parse_duration, AmbienceTrack, SessionConfig, PRESET_MINUTES};
pub use orchestrator::{MeditationSession, SessionSnapshot, SessionState};
pub use record::{format_clock, format_duration, CompletedSession, Mood, SessionSummary};
pub use runner::{SessionCommand, SessionOutcome, SessionRunner};
