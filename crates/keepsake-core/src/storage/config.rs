//! TOML-based application configuration.
//!
//! Stores:
//! - Who the gift is for and when the story started
//! - Where the card and secret catalogs come from
//! - Reveal policy and milestone thresholds
//!
//! Configuration is stored at `~/.config/keepsake/config.toml`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::progress::{default_start_date, DEFAULT_NAME, TOTAL_CARDS, TOTAL_SECRETS};
use crate::error::ConfigError;
use crate::reveal::ExhaustionPolicy;

/// Identity written into a fresh progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

/// Catalog locations. Relative paths resolve against the data directory;
/// `http://` and `https://` values are fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_cards_source")]
    pub cards: String,
    #[serde(default = "default_secrets_source")]
    pub secrets: String,
}

/// Reveal gating knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// What "show next" does once every card has been seen.
    #[serde(default)]
    pub exhaustion: ExhaustionPolicy,
    #[serde(default = "default_milestone_cards")]
    pub milestone_cards: u32,
    #[serde(default = "default_milestone_secret")]
    pub milestone_secret: String,
    #[serde(default = "default_special_card")]
    pub special_card: u32,
    #[serde(default = "default_special_card_secret")]
    pub special_card_secret: String,
    #[serde(default = "default_anniversary_secret")]
    pub anniversary_secret: String,
    /// Fixed RNG seed. Leave unset for real randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Upper bounds enforced by the progress store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsConfig {
    #[serde(default = "default_total_cards")]
    pub cards: u32,
    #[serde(default = "default_total_secrets")]
    pub secrets: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/keepsake/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub totals: TotalsConfig,
}

fn default_name() -> String {
    DEFAULT_NAME.into()
}
fn default_cards_source() -> String {
    "reasons.json".into()
}
fn default_secrets_source() -> String {
    "secrets.json".into()
}
fn default_milestone_cards() -> u32 {
    50
}
fn default_milestone_secret() -> String {
    "secret9".into()
}
fn default_special_card() -> u32 {
    143
}
fn default_special_card_secret() -> String {
    "secret7".into()
}
fn default_anniversary_secret() -> String {
    "secret15".into()
}
fn default_total_cards() -> u32 {
    TOTAL_CARDS
}
fn default_total_secrets() -> u32 {
    TOTAL_SECRETS
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            start_date: default_start_date(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            cards: default_cards_source(),
            secrets: default_secrets_source(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            exhaustion: ExhaustionPolicy::default(),
            milestone_cards: default_milestone_cards(),
            milestone_secret: default_milestone_secret(),
            special_card: default_special_card(),
            special_card_secret: default_special_card_secret(),
            anniversary_secret: default_anniversary_secret(),
            seed: None,
        }
    }
}

impl Default for TotalsConfig {
    fn default() -> Self {
        Self {
            cards: TOTAL_CARDS,
            secrets: TOTAL_SECRETS,
        }
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    fn assign(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = &mut *root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                serde_json::Value::Bool(value.parse::<bool>().map_err(|e| invalid(e.to_string()))?)
            }
            serde_json::Value::Number(_) => {
                let n = value.parse::<u64>().map_err(|e| invalid(e.to_string()))?;
                serde_json::Value::Number(n.into())
            }
            // Optional numbers (the RNG seed) serialize as null.
            serde_json::Value::Null => match value {
                "" | "none" | "null" => serde_json::Value::Null,
                other => serde_json::Value::Number(
                    other.parse::<u64>().map_err(|e| invalid(e.to_string()))?.into(),
                ),
            },
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::assign(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default configuration: {e}");
            Self::default()
        })
    }
}
