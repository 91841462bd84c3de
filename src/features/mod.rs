//! # Features
//!
//! Each feature owns its domain types and backend adapters. Handlers in `commands` wire
//! them to platform events.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0

pub mod chat;
pub mod image_gen;
pub mod prayer;
pub mod scripture;

pub use chat::{ConversationalAdapter, OpenAiChat};
pub use image_gen::{ImageGenerator, ImageReference, OpenAiImageGenerator, PollinationsGenerator};
pub use prayer::{GuildConfigStore, GuildPrayerConfig, MemoryConfigStore};
pub use scripture::{BibleApiClient, ScriptureSource, Verse};
