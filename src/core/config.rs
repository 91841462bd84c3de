//! Process configuration loaded from the environment
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Add adapter/store timeouts and image backend selection
//! - 1.1.0: Channel names configurable instead of hard-coded
//! - 1.0.0: Initial release with Discord token and OpenAI settings

use anyhow::{anyhow, bail, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CHAT_CHANNEL: &str = "chat-with-christian-bot";
pub const DEFAULT_IMAGE_CHANNEL: &str = "christian-ai-image-generation🎨";
pub const DEFAULT_SCRIPTURE_API_URL: &str = "https://bible-api.com/?random=verse";

/// Which strategy backs the image-generation channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBackend {
    /// Hand Discord a Pollinations URL and let it render the preview
    Pollinations,
    /// Generate with DALL-E and upload the bytes as an attachment
    OpenAi,
}

impl FromStr for ImageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pollinations" => Ok(ImageBackend::Pollinations),
            "openai" | "dalle" => Ok(ImageBackend::OpenAi),
            other => Err(anyhow!(
                "unknown image backend '{other}' (expected 'pollinations' or 'openai')"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub database_path: String,
    pub log_level: String,
    pub chat_channel_name: String,
    pub image_channel_name: String,
    pub image_backend: ImageBackend,
    pub scripture_api_url: String,
    pub adapter_timeout: Duration,
    pub store_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment
    ///
    /// A missing `DISCORD_TOKEN` is the only fatal condition; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = match get("DISCORD_TOKEN") {
            Some(token) => token.trim().to_string(),
            None => bail!("DISCORD_TOKEN is not set. Add it to the environment or a .env file."),
        };

        let image_backend = match get("IMAGE_BACKEND") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("IMAGE_BACKEND is invalid: {e}"))?,
            None => ImageBackend::Pollinations,
        };

        Ok(Config {
            discord_token,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "shepherd.db".to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            chat_channel_name: get("CHAT_CHANNEL_NAME")
                .unwrap_or_else(|| DEFAULT_CHAT_CHANNEL.to_string()),
            image_channel_name: get("IMAGE_CHANNEL_NAME")
                .unwrap_or_else(|| DEFAULT_IMAGE_CHANNEL.to_string()),
            image_backend,
            scripture_api_url: get("SCRIPTURE_API_URL")
                .unwrap_or_else(|| DEFAULT_SCRIPTURE_API_URL.to_string()),
            adapter_timeout: parse_secs(get("ADAPTER_TIMEOUT_SECS"), "ADAPTER_TIMEOUT_SECS", 45)?,
            store_timeout: parse_secs(get("STORE_TIMEOUT_SECS"), "STORE_TIMEOUT_SECS", 5)?,
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<Duration> {
    let secs = match raw {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("{key} must be a whole number of seconds, got '{value}'"))?,
        None => default,
    };
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}
