//! # Image Generation Feature
//!
//! Prompt-to-image relay for the designated image channel. The deployment picks the
//! backend: a Pollinations link, or DALL-E bytes uploaded as an attachment.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true

pub mod generator;

pub use generator::{ImageGenerator, ImageReference, OpenAiImageGenerator, PollinationsGenerator};

/// Prepended to every prompt before it reaches the backend
pub const PROMPT_PREAMBLE: &str = "A high-quality, inspiring, respectful, cinematic image of: ";

pub const IMAGE_APOLOGY: &str =
    "Sorry, I was unable to generate an image for that prompt. Please try a different one.";

pub fn styled_prompt(prompt: &str) -> String {
    format!("{PROMPT_PREAMBLE}{prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_prompt() {
        assert_eq!(
            styled_prompt("Noah's ark"),
            "A high-quality, inspiring, respectful, cinematic image of: Noah's ark"
        );
    }
}
