//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Backend location and the user id sessions are logged under
//! - Session defaults (length, ambience, volume)
//! - The mindfulness prompt pool
//!
//! Configuration is stored at `~/.config/stillroom/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::api::DurationUnit;
use crate::error::{ConfigError, ValidationError};
use crate::session::{AmbienceTrack, SessionConfig};
use crate::timer::default_prompts;

/// Meditation backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sessions are only logged when this is set.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Unit of the `duration` field on the wire.
    #[serde(default)]
    pub duration_unit: DurationUnit,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Defaults applied when a session is started without explicit options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
    #[serde(default = "default_ambience")]
    pub default_ambience: String,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub start_muted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptsConfig {
    #[serde(default = "default_prompts")]
    pub messages: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/stillroom/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub prompts: PromptsConfig,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_duration_secs() -> u64 {
    300
}
fn default_ambience() -> String {
    "ocean".into()
}
fn default_volume() -> u8 {
    50
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
            duration_unit: DurationUnit::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            default_ambience: default_ambience(),
            volume: default_volume(),
            start_muted: false,
        }
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            messages: default_prompts(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionDefaults::default(),
            prompts: PromptsConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                Value::Bool(_) => Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                Value::Object(_) | Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // Optional string fields are cleared with an empty value.
                Value::Null | Value::String(_) if value.is_empty() => Value::Null,
                _ => Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
        }
        Ok(())
    }

    /// Location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`. A missing file is created with defaults; a file
    /// that exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, keeping the existing type.
    ///
    /// Only updates the in-memory value; call [`Config::save`] to persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// All leaf keys with their current values, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
            match value {
                Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Session configuration from the stored defaults, with optional
    /// overrides for length and ambience.
    pub fn session_config(
        &self,
        duration_secs: Option<u64>,
        ambience: Option<&str>,
    ) -> Result<SessionConfig, ValidationError> {
        let track = AmbienceTrack::find(ambience.unwrap_or(&self.session.default_ambience))?;
        let duration = duration_secs.unwrap_or(self.session.default_duration_secs);
        Ok(SessionConfig::new(duration, track)?
            .with_prompts(self.prompts.messages.clone())?
            .with_volume(self.session.volume)
            .muted(self.session.start_muted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.api.base_url, "http://localhost:5000/api");
        assert_eq!(cfg.api.user_id, None);
        assert_eq!(cfg.api.duration_unit, DurationUnit::Seconds);
        assert_eq!(cfg.session.default_duration_secs, 300);
        assert_eq!(cfg.session.default_ambience, "ocean");
        assert_eq!(cfg.session.volume, 50);
        assert!(!cfg.session.start_muted);
        assert_eq!(cfg.prompts.messages.len(), 8);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("[api]\nuser_id = \"u1\"\n").unwrap();
        assert_eq!(cfg.api.user_id.as_deref(), Some("u1"));
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.session, SessionDefaults::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.volume").as_deref(), Some("50"));
        assert_eq!(cfg.get("api.duration_unit").as_deref(), Some("seconds"));
        assert_eq!(cfg.get("session.start_muted").as_deref(), Some("false"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values_by_type() {
        let mut cfg = Config::default();
        cfg.set("session.start_muted", "true").unwrap();
        cfg.set("session.volume", "75").unwrap();
        cfg.set("api.base_url", "https://example.test/api").unwrap();
        cfg.set("api.duration_unit", "minutes").unwrap();
        assert!(cfg.session.start_muted);
        assert_eq!(cfg.session.volume, 75);
        assert_eq!(cfg.api.base_url, "https://example.test/api");
        assert_eq!(cfg.api.duration_unit, DurationUnit::Minutes);
    }

    #[test]
    fn set_fills_and_clears_optional_user() {
        let mut cfg = Config::default();
        cfg.set("api.user_id", "u1").unwrap();
        assert_eq!(cfg.api.user_id.as_deref(), Some("u1"));
        cfg.set("api.user_id", "").unwrap();
        assert_eq!(cfg.api.user_id, None);
    }

    #[test]
    fn set_accepts_json_for_lists() {
        let mut cfg = Config::default();
        cfg.set("prompts.messages", r#"["Breathe.","Rest."]"#).unwrap();
        assert_eq!(cfg.prompts.messages, vec!["Breathe.", "Rest."]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_without_mutating() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.start_muted", "loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("session.volume", "300").is_err());
        assert!(cfg.set("api.duration_unit", "hours").is_err());
        assert!(cfg.set("api.base_url", "").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn entries_lists_every_leaf() {
        let entries = Config::default().entries();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"api.base_url"));
        assert!(keys.contains(&"session.default_ambience"));
        assert!(keys.contains(&"prompts.messages"));
        assert!(keys.contains(&"log_level"));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("api.user_id", "u42").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().api.user_id.as_deref(), Some("u42"));
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api = [not toml").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn session_config_uses_defaults_and_overrides() {
        let cfg = Config::default();
        let session = cfg.session_config(None, None).unwrap();
        assert_eq!(session.duration_secs(), 300);
        assert_eq!(session.ambience().id, "ocean");
        assert_eq!(session.volume(), 50);

        let session = cfg.session_config(Some(90), Some("Rain")).unwrap();
        assert_eq!(session.duration_secs(), 90);
        assert_eq!(session.ambience().id, "rain");
    }

    #[test]
    fn session_config_rejects_bad_input() {
        let cfg = Config::default();
        assert_eq!(
            cfg.session_config(Some(0), None).unwrap_err(),
            ValidationError::ZeroDuration
        );
        assert!(matches!(
            cfg.session_config(None, Some("thunder")),
            Err(ValidationError::UnknownAmbience(_))
        ));
    }
}
