//! Configuration types for the homework bot

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pause between two polling cycles
    #[serde(default = "default_retry_period", with = "humantime_serde")]
    pub retry_period: Duration,
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_period: default_retry_period(),
            practicum: PracticumConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

/// Homework status API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_practicum_endpoint")]
    pub endpoint: String,
    /// `from_date` sent on the very first cycle (unix seconds)
    #[serde(default)]
    pub initial_from_date: i64,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_practicum_endpoint(),
            initial_from_date: 0,
            request_timeout: default_request_timeout(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
        }
    }
}

/// Tokens and the recipient chat, read from the environment only
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish_non_exhaustive()
    }
}

impl Secrets {
    /// Resolve every secret through `lookup`, reporting all missing names at once.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let practicum_token = fetch(PRACTICUM_TOKEN_VAR);
        let telegram_token = fetch(TELEGRAM_TOKEN_VAR);
        let telegram_chat_id = fetch(TELEGRAM_CHAT_ID_VAR);

        if !missing.is_empty() {
            return Err(crate::BotError::MissingSecrets(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }

    /// Resolve secrets from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

fn default_retry_period() -> Duration {
    Duration::from_secs(600)
}

fn default_practicum_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
