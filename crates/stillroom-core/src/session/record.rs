use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Post-session mood choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Calm,
    Focused,
    Relaxed,
    Energized,
    Balanced,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Calm,
        Mood::Focused,
        Mood::Relaxed,
        Mood::Energized,
        Mood::Balanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "Calm",
            Mood::Focused => "Focused",
            Mood::Relaxed => "Relaxed",
            Mood::Energized => "Energized",
            Mood::Balanced => "Balanced",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownMood(s.to_string()))
    }
}

/// Record of a finished session, created once when the countdown hits zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub session_id: Uuid,
    pub duration_secs: u64,
    pub ambience_id: String,
    pub ambience_name: String,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub mood_after: Option<Mood>,
}

/// Payload handed to the caller once the mood has been captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub duration_secs: u64,
    pub ambience_name: String,
    pub mood: Mood,
}

impl SessionSummary {
    /// "5 minutes", "30 seconds", "1 minute 30 seconds".
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_secs)
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You've completed {} of serenity with {}. You're feeling: {}",
            self.duration_label(),
            self.ambience_name,
            self.mood
        )
    }
}

pub fn format_duration(secs: u64) -> String {
    fn unit(n: u64, name: &str) -> String {
        if n == 1 {
            format!("1 {name}")
        } else {
            format!("{n} {name}s")
        }
    }
    let (min, sec) = (secs / 60, secs % 60);
    match (min, sec) {
        (0, s) => unit(s, "second"),
        (m, 0) => unit(m, "minute"),
        (m, s) => format!("{} {}", unit(m, "minute"), unit(s, "second")),
    }
}

/// `m:ss` clock face for the remaining time.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
