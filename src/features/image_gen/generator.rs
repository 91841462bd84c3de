//! Image generation backends
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Pollinations URL strategy alongside DALL-E; both behind `ImageGenerator`
//! - 1.0.0: DALL-E 3 generation and download

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const POLLINATIONS_BASE: &str = "https://image.pollinations.ai/prompt/";
const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Where a generated image can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Discord renders the preview from the link
    Url(String),
    /// Raw image uploaded as an attachment
    Bytes { filename: String, data: Vec<u8> },
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ImageReference>;
}

/// Builds a Pollinations link; the image is rendered when Discord fetches the preview
#[derive(Debug, Clone)]
pub struct PollinationsGenerator {
    base: Url,
}

impl PollinationsGenerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: Url::parse(POLLINATIONS_BASE)?,
        })
    }

    /// Prompt becomes a single percent-encoded path segment
    pub fn prompt_url(&self, prompt: &str) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("image base URL cannot take path segments"))?
            .pop_if_empty()
            .push(prompt);
        Ok(url.to_string())
    }
}

#[async_trait]
impl ImageGenerator for PollinationsGenerator {
    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        Ok(ImageReference::Url(self.prompt_url(prompt)?))
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// DALL-E 3, downloaded and relayed as bytes
#[derive(Debug, Clone)]
pub struct OpenAiImageGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiImageGenerator {
    pub fn new(api_key: Option<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client for image generation")?;
        Ok(Self { client, api_key })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not configured"))?;

        let request = ImageRequest {
            model: "dall-e-3",
            prompt,
            n: 1,
            size: "1024x1024",
        };

        let response: ImageResponse = self
            .client
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Image generation request failed")?
            .error_for_status()
            .context("Image generation was rejected")?
            .json()
            .await
            .context("Image generation returned an unexpected body")?;

        let url = response
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| anyhow!("Image generation returned no image"))?;

        let data = self.download(&url).await.context("Failed to download generated image")?;
        debug!("Downloaded generated image ({} bytes)", data.len());

        Ok(ImageReference::Bytes {
            filename: "generated_image.png".to_string(),
            data,
        })
    }
}
