//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Audio/speech feedback toggles and locale
//! - Session defaults (rest duration and the entry-form clamp bounds)
//!
//! Configuration is stored at `~/.config/repflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};

/// Feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    /// Spoken encouragements are off by default.
    #[serde(default)]
    pub voice_enabled: bool,
    #[serde(default = "default_locale")]
    pub speech_locale: String,
}

/// Session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_rest_secs")]
    pub default_rest_secs: u32,
    /// Entry-form clamp bounds for per-exercise rest. The state machine
    /// itself accepts any positive value.
    #[serde(default = "default_min_rest")]
    pub min_rest_secs: u32,
    #[serde(default = "default_max_rest")]
    pub max_rest_secs: u32,
}

impl SessionConfig {
    pub fn clamp_rest(&self, secs: u32) -> u32 {
        secs.clamp(self.min_rest_secs, self.max_rest_secs)
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/repflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_true() -> bool {
    true
}
fn default_locale() -> String {
    "en-US".into()
}
fn default_rest_secs() -> u32 {
    60
}
fn default_min_rest() -> u32 {
    30
}
fn default_max_rest() -> u32 {
    300
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            voice_enabled: false,
            speech_locale: default_locale(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_rest_secs: default_rest_secs(),
            min_rest_secs: default_min_rest(),
            max_rest_secs: default_max_rest(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feedback: FeedbackConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return (and persist) the default.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Read a value by dotted key, e.g. `feedback.audio_enabled`.
    pub fn get(&self, key: &str) -> Option<String> {
        let root = serde_json::to_value(self).ok()?;
        let mut current = &root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(match current {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a value by dotted key, parsing the string against the existing
    /// value's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut root = serde_json::to_value(&*self)?;
        let mut current = &mut root;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(|| unknown_key(key))?;
                let existing = obj.get(part).ok_or_else(|| unknown_key(key))?;
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|_| bad_value(key, value))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value.parse::<u64>().map_err(|_| bad_value(key, value))?.into(),
                    ),
                    _ => serde_json::Value::String(value.into()),
                };
                obj.insert(part.to_string(), new_value);
                *self = serde_json::from_value(root)?;
                return Ok(());
            }
            current = current.get_mut(part).ok_or_else(|| unknown_key(key))?;
        }
        Err(unknown_key(key))
    }
}

fn unknown_key(key: &str) -> CoreError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: "unknown configuration key".into(),
    }
    .into()
}

fn bad_value(key: &str, value: &str) -> CoreError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("cannot parse '{value}'"),
    }
    .into()
}
