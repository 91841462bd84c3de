// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Infrastructure
pub mod database;
pub mod gateway;

// UI components
pub mod message_components;

// Application layer
pub mod commands;

#[cfg(test)]
mod testing;

// Re-export core config for backwards compatibility
pub use core::Config;

pub use commands::{BotContext, Router};
pub use gateway::{Gateway, GatewayHandle, SerenityConnection};
