//! # Command System
//!
//! Message routing and per-command handlers.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Ordered route table over platform-neutral events replaces slash registration
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 2.0.0: Remove bang commands, slash-only command system
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod router;
pub mod routes;

pub use context::BotContext;
pub use handler::MessageHandler;
pub use router::Router;
pub use routes::{Matcher, Route, RouteAction, RouteTable};
