//! Session configuration: duration, ambience track and prompt set.
//!
//! A [`SessionConfig`] is validated when built and immutable once a session
//! starts.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::default_prompts;

/// Preset session lengths offered on the start screen, in minutes.
pub const PRESET_MINUTES: [u64; 5] = [3, 5, 10, 15, 20];

/// A themed audio loop played during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbienceTrack {
    pub id: String,
    pub name: String,
    pub audio_url: String,
}

impl AmbienceTrack {
    pub fn new(id: impl Into<String>, name: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            audio_url: audio_url.into(),
        }
    }

    /// Built-in ambience tracks.
    pub fn catalog() -> Vec<AmbienceTrack> {
        [
            ("rain", "Rain"),
            ("ocean", "Ocean"),
            ("winter", "Winter"),
            ("summer", "Summer"),
            ("air", "Air"),
            ("campfire", "Campfire"),
        ]
        .into_iter()
        .map(|(id, name)| AmbienceTrack::new(id, name, format!("/assets/audios/{id}.mp3")))
        .collect()
    }

    /// Look up a catalog track by id (case-insensitive).
    pub fn find(id: &str) -> Result<AmbienceTrack, ValidationError> {
        Self::catalog()
            .into_iter()
            .find(|t| t.id.eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| ValidationError::UnknownAmbience(id.to_string()))
    }
}

/// Combine a custom `minutes:seconds` entry into seconds.
///
/// Either part may be omitted; a total of zero is rejected.
pub fn custom_duration(minutes: Option<u64>, seconds: Option<u64>) -> Result<u64, ValidationError> {
    let total = minutes
        .unwrap_or(0)
        .saturating_mul(60)
        .saturating_add(seconds.unwrap_or(0));
    if total == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    Ok(total)
}

/// Parse a duration entered by the user.
///
/// Accepted forms: `"5"` (minutes), `"5m"`, `"90s"`, `"1:30"` (m:ss).
pub fn parse_duration(input: &str) -> Result<u64, ValidationError> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidValue {
        field: "duration".into(),
        message: format!("cannot parse '{input}' (use 5, 5m, 90s or 1:30)"),
    };
    let number = |s: &str| -> Result<u64, ValidationError> {
        if s.is_empty() {
            return Ok(0);
        }
        s.parse::<u64>().map_err(|_| invalid())
    };

    if let Some((min, sec)) = input.split_once(':') {
        return custom_duration(Some(number(min)?), Some(number(sec)?));
    }
    if let Some(sec) = input.strip_suffix('s') {
        return custom_duration(None, Some(number(sec)?));
    }
    let min = input.strip_suffix('m').unwrap_or(input);
    if min.is_empty() {
        return Err(invalid());
    }
    custom_duration(Some(number(min)?), None)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    duration_secs: u64,
    ambience: AmbienceTrack,
    prompts: Vec<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    start_muted: bool,
    #[serde(default = "default_volume")]
    volume: u8,
}

fn default_volume() -> u8 {
    50
}

impl SessionConfig {
    /// Build a configuration with the default prompt set.
    pub fn new(duration_secs: u64, ambience: AmbienceTrack) -> Result<Self, ValidationError> {
        if duration_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Self {
            duration_secs,
            ambience,
            prompts: default_prompts(),
            seed: None,
            start_muted: false,
            volume: default_volume(),
        })
    }

    pub fn with_prompts(mut self, prompts: Vec<String>) -> Result<Self, ValidationError> {
        let prompts: Vec<String> = prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if prompts.is_empty() {
            return Err(ValidationError::EmptyCollection("prompts".into()));
        }
        self.prompts = prompts;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.start_muted = muted;
        self
    }

    /// Volume in percent, clamped to 0..=100.
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(100);
        self
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn ambience(&self) -> &AmbienceTrack {
        &self.ambience
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn start_muted(&self) -> bool {
        self.start_muted
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_is_case_insensitive() {
        let track = AmbienceTrack::find("Ocean").unwrap();
        assert_eq!(track.id, "ocean");
        assert_eq!(track.audio_url, "/assets/audios/ocean.mp3");
        assert_eq!(
            AmbienceTrack::find("thunder").unwrap_err(),
            ValidationError::UnknownAmbience("thunder".into())
        );
        assert_eq!(AmbienceTrack::catalog().len(), 6);
    }

    #[test]
    fn custom_duration_rejects_zero() {
        assert_eq!(custom_duration(Some(1), Some(30)), Ok(90));
        assert_eq!(custom_duration(None, Some(45)), Ok(45));
        assert_eq!(custom_duration(Some(0), Some(0)), Err(ValidationError::ZeroDuration));
        assert_eq!(custom_duration(None, None), Err(ValidationError::ZeroDuration));
    }

    #[test]
    fn parse_duration_forms() {
        assert_eq!(parse_duration("5"), Ok(300));
        assert_eq!(parse_duration("10m"), Ok(600));
        assert_eq!(parse_duration("90s"), Ok(90));
        assert_eq!(parse_duration("1:30"), Ok(90));
        assert_eq!(parse_duration(":45"), Ok(45));
        assert_eq!(parse_duration("0:00"), Err(ValidationError::ZeroDuration));
        assert!(matches!(
            parse_duration("soon"),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(parse_duration("m").is_err());
    }

    #[test]
    fn config_validation() {
        let ocean = AmbienceTrack::find("ocean").unwrap();
        assert_eq!(
            SessionConfig::new(0, ocean.clone()).unwrap_err(),
            ValidationError::ZeroDuration
        );

        let cfg = SessionConfig::new(60, ocean).unwrap();
        assert_eq!(cfg.prompts().len(), 8);
        assert_eq!(cfg.volume(), 50);
        assert!(cfg
            .clone()
            .with_prompts(vec!["  ".into()])
            .is_err());
        let cfg = cfg.with_prompts(vec![" Breathe ".into()]).unwrap().with_volume(250);
        assert_eq!(cfg.prompts(), ["Breathe".to_string()]);
        assert_eq!(cfg.volume(), 100);
    }
}
