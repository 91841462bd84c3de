//! Message handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Handlers take platform-neutral message events
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::context::BotContext;
use crate::core::MessageEvent;

/// One route's worth of behaviour
///
/// Handlers are failure boundaries: adapter and store errors are answered inside the
/// handler. An `Err` returned from here means the bot could not even talk back (a failed
/// send), and the router only logs it.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl MessageHandler for PingHandler {
///     fn name(&self) -> &'static str {
///         "ping"
///     }
///
///     async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, _request_id: Uuid) -> Result<()> {
///         ctx.connection.send_message(event.channel_id, OutboundMessage::text("Pong!")).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, request_id: Uuid) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Route tables hold handlers as trait objects
    fn _assert_object_safe(_: &dyn MessageHandler) {}
}
