//! Application configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the platform data
//! directory. Every section is optional; a missing file or section means the
//! defaults apply.

use super::data_storage::DataStorage;
use crate::libs::auth::{LOCKOUT_MINUTES, MAX_LOGIN_ATTEMPTS};
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Lockout tuning.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthConfig {
    /// Consecutive failed logins that lock an account. An account is locked
    /// exactly when its failure count has reached this value; 0 is read as 1.
    pub max_attempts: u32,
    /// Length of the recorded lock, in minutes. Unsigned, so a lock can never
    /// be recorded as already expired.
    pub lockout_minutes: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            max_attempts: MAX_LOGIN_ATTEMPTS,
            lockout_minutes: LOCKOUT_MINUTES,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Directory holding the CSV collections. Defaults to the platform data
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Data directory in effect: the configured one or the platform default.
    pub fn data_storage(&self) -> DataStorage {
        match &self.data_dir {
            Some(dir) => DataStorage::with_base(dir),
            None => DataStorage::new(),
        }
    }

    pub fn auth_or_default(&self) -> AuthConfig {
        self.auth.clone().unwrap_or_default()
    }

    /// Interactive setup, starting from the saved values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        msg_print!(Message::ConfigModuleStorage);
        let default_dir = config.data_storage().base_path().display().to_string();
        let data_dir: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDataDir.to_string())
            .default(default_dir)
            .interact_text()?;
        config.data_dir = Some(PathBuf::from(data_dir));

        msg_print!(Message::ConfigModuleAuth);
        let default = config.auth_or_default();
        config.auth = Some(AuthConfig {
            max_attempts: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptMaxAttempts.to_string())
                .default(default.max_attempts)
                .interact_text()?,
            lockout_minutes: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptLockoutMinutes.to_string())
                .default(default.lockout_minutes)
                .interact_text()?,
        });

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_are_not_written() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let config: Config = serde_json::from_str(r#"{"data_dir":"/tmp/store"}"#).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/store")));
        assert_eq!(config.auth_or_default(), AuthConfig::default());
    }

    #[test]
    fn negative_lockout_is_rejected() {
        let json = r#"{"auth":{"max_attempts":3,"lockout_minutes":-5}}"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }
}
