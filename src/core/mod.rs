//! # Core Module
//!
//! Configuration, the platform event model, and shared utilities.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Add platform event model and bounded waits
//! - 1.1.0: Add response module with Discord message splitting
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod deadline;
pub mod platform;
pub mod response;

// Re-export commonly used items
pub use config::{
    Config, ImageBackend, DEFAULT_CHAT_CHANNEL, DEFAULT_IMAGE_CHANNEL, DEFAULT_SCRIPTURE_API_URL,
};
pub use deadline::bounded;
pub use platform::{
    Attachment, ButtonInteractionEvent, ButtonStyle, ChannelInfo, ChannelKind, Connection,
    EmbedSpec, InboundEvent, InteractionResponder, InteractionUser, MessageEvent, ModalForm,
    ModalSubmitEvent, OutboundMessage, PersistentButton,
};
pub use response::{split_message, truncate, EMBED_LIMIT, MESSAGE_LIMIT};
