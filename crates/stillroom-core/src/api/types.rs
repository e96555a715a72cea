//! Wire types of the meditation backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{CompletedSession, Mood};

/// Unit used for the `duration` field on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    /// Fractional minutes, as the legacy backend stores them.
    Minutes,
}

impl DurationUnit {
    pub fn encode(self, secs: u64) -> f64 {
        match self {
            DurationUnit::Seconds => secs as f64,
            DurationUnit::Minutes => secs as f64 / 60.0,
        }
    }

    pub fn decode(self, value: f64) -> u64 {
        let secs = match self {
            DurationUnit::Seconds => value,
            DurationUnit::Minutes => value * 60.0,
        };
        secs.max(0.0).round() as u64
    }
}

/// Body of `POST /meditation/log`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub user_id: String,
    pub duration: f64,
    /// Ambience id.
    pub theme: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRequest {
    pub fn from_record(user_id: &str, record: &CompletedSession, unit: DurationUnit) -> Self {
        Self {
            user_id: user_id.to_string(),
            duration: unit.encode(record.duration_secs),
            theme: record.ambience_id.clone(),
            timestamp: record.completed_at,
        }
    }
}

/// Body of `POST /meditation/log/mood`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    pub log_id: String,
    pub mood: Mood,
}

/// A stored meditation log as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub theme: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form on the server side; compared case-insensitively.
    #[serde(default)]
    pub mood: Option<String>,
}

/// Response of `GET /meditation/streak/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStreak {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub last_date: Option<DateTime<Utc>>,
}
