//! # Feature: Scripture
//!
//! Random verse lookup for `!dailyverse`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const VERSE_APOLOGY: &str = "Sorry, I couldn't fetch a verse right now. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verse {
    pub reference: String,
    pub text: String,
}

#[async_trait]
pub trait ScriptureSource: Send + Sync {
    async fn random_verse(&self) -> Result<Verse>;
}

/// bible-api.com (or anything answering with `{reference, text}` JSON)
#[derive(Debug, Clone)]
pub struct BibleApiClient {
    client: reqwest::Client,
    url: String,
}

impl BibleApiClient {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client for scripture lookup")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ScriptureSource for BibleApiClient {
    async fn random_verse(&self) -> Result<Verse> {
        let verse: Verse = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Scripture API request failed")?
            .error_for_status()
            .context("Scripture API returned an error status")?
            .json()
            .await
            .context("Scripture API returned an unexpected body")?;

        if verse.reference.trim().is_empty() || verse.text.trim().is_empty() {
            return Err(anyhow!("Scripture API returned an empty verse"));
        }
        Ok(verse)
    }
}

/// Bold reference on the first line, the verse block-quoted on one line below it
pub fn format_verse(verse: &Verse) -> String {
    let text = verse
        .text
        .replace("\r\n", " ")
        .replace('\n', " ")
        .trim()
        .to_string();
    format!("**{}**\n> {}", verse.reference.trim(), text)
}
