//! Utility command handlers
//!
//! Handles: !ping, !dailyverse
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Text-prefix commands on platform-neutral events; add daily verse
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::BotContext;
use crate::commands::handler::MessageHandler;
use crate::core::{bounded, MessageEvent, OutboundMessage};
use crate::features::scripture::{format_verse, VERSE_APOLOGY};

/// `!ping` → `Pong!`
pub struct PingHandler;

#[async_trait]
impl MessageHandler for PingHandler {
    fn name(&self) -> &'static str {
        "ping"
    }

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, _request_id: Uuid) -> Result<()> {
        ctx.connection
            .send_message(event.channel_id, OutboundMessage::text("Pong!"))
            .await?;
        Ok(())
    }
}

/// `!dailyverse` → one random verse, or an apology
pub struct DailyVerseHandler;

#[async_trait]
impl MessageHandler for DailyVerseHandler {
    fn name(&self) -> &'static str {
        "dailyverse"
    }

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, request_id: Uuid) -> Result<()> {
        let text = match bounded(
            ctx.adapter_timeout,
            "Scripture lookup",
            ctx.scripture.random_verse(),
        )
        .await
        {
            Ok(verse) => {
                info!("[{request_id}] 📖 Fetched {}", verse.reference);
                format_verse(&verse)
            }
            Err(e) => {
                error!("[{request_id}] Scripture API error: {e:#}");
                VERSE_APOLOGY.to_string()
            }
        };

        ctx.connection
            .send_message(event.channel_id, OutboundMessage::text(text))
            .await?;
        Ok(())
    }
}
