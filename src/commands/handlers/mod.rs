//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Message handlers for chat, image and scripture channels; prayer button and modal
//! - 2.0.0: Remove AiChatHandler (hey, explain, simple, steps, recipe) - consolidated into /ask
//! - 1.1.0: Add ImagineHandler
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod admin;
pub mod ai_chat;
pub mod imagine;
pub mod prayer;
pub mod utility;

pub use admin::PrayerSetupHandler;
pub use ai_chat::AiChatHandler;
pub use imagine::ImagineHandler;
pub use prayer::{PrayerButtonHandler, PrayerModalHandler};
pub use utility::{DailyVerseHandler, PingHandler};
