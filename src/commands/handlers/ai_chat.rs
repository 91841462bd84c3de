//! AI chat handler
//!
//! Handles: free text in the chat channel and in direct messages
//!
//! - **Version**: 2.0.1
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.1: A blank backend reply gets the apology instead of an empty send
//! - 2.0.0: Single-turn replies with a fixed persona; no stored history
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::BotContext;
use crate::commands::handler::MessageHandler;
use crate::core::{bounded, split_message, MessageEvent, OutboundMessage};
use crate::features::chat::{CHAT_APOLOGY, PERSONA};

pub struct AiChatHandler;

#[async_trait]
impl MessageHandler for AiChatHandler {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, request_id: Uuid) -> Result<()> {
        let content = event.content.trim();
        if content.is_empty() {
            debug!("[{request_id}] Empty chat message (attachment only?), skipping");
            return Ok(());
        }

        if let Err(e) = ctx.connection.broadcast_typing(event.channel_id).await {
            warn!("[{request_id}] Failed to start typing indicator: {e}");
        }

        info!("[{request_id}] 🚀 Calling chat backend ({} chars)", content.len());
        let reply = bounded(ctx.adapter_timeout, "Chat request", ctx.chat.reply(content, PERSONA))
            .await
            .and_then(|reply| {
                if reply.trim().is_empty() {
                    Err(anyhow!("Chat backend returned an empty reply"))
                } else {
                    Ok(reply)
                }
            });
        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                error!("[{request_id}] Chat API error: {e:#}");
                ctx.connection
                    .send_message(event.channel_id, OutboundMessage::text(CHAT_APOLOGY))
                    .await?;
                return Ok(());
            }
        };

        let parts = split_message(&reply);
        debug!("[{request_id}] Sending reply in {} part(s)", parts.len());
        for part in parts {
            ctx.connection
                .send_message(event.channel_id, OutboundMessage::text(part))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChannelKind;
    use crate::features::image_gen::ImageReference;
    use crate::features::scripture::Verse;
    use crate::testing::{message_event, Harness, Script};
    use std::sync::atomic::Ordering;

    fn failing(script: Script<String>) -> Harness {
        Harness::with_scripts(
            script,
            Script::Succeed(ImageReference::Url(String::new())),
            Script::Succeed(Verse {
                reference: String::new(),
                text: String::new(),
            }),
        )
    }

    #[tokio::test]
    async fn test_reply_is_relayed_with_persona() {
        let harness = Harness::new();
        let event = message_event(ChannelKind::Direct, None, "What is grace?");

        AiChatHandler
            .handle(harness.context(), &event, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(harness.connection.sent_texts(), vec!["Peace be with you."]);
        assert_eq!(harness.chat.calls(), 1);
        assert_eq!(harness.chat.last_persona.lock().unwrap().as_deref(), Some(PERSONA));
        assert_eq!(harness.connection.typing.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_long_reply_is_split() {
        let harness = failing(Script::Succeed("amen ".repeat(1000)));
        let event = message_event(ChannelKind::Direct, None, "Pray with me");

        AiChatHandler
            .handle(harness.context(), &event, Uuid::new_v4())
            .await
            .unwrap();

        let sent = harness.connection.sent_texts();
        assert!(sent.len() >= 3);
        assert!(sent.iter().all(|m| m.len() <= 2000));
    }

    #[tokio::test]
    async fn test_backend_error_sends_one_apology() {
        let harness = failing(Script::Fail("429 rate limited: sk-secret"));
        let event = message_event(ChannelKind::GuildText, Some("chat-with-christian-bot"), "hello");

        AiChatHandler
            .handle(harness.context(), &event, Uuid::new_v4())
            .await
            .unwrap();

        let sent = harness.connection.sent_texts();
        assert_eq!(sent, vec![CHAT_APOLOGY]);
        assert!(!sent[0].contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_backend_timeout_sends_one_apology() {
        let harness = failing(Script::Hang);
        let event = message_event(ChannelKind::Direct, None, "hello");

        AiChatHandler
            .handle(harness.context(), &event, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(harness.connection.sent_texts(), vec![CHAT_APOLOGY]);
    }

    #[tokio::test]
    async fn test_blank_backend_reply_sends_one_apology() {
        for blank in [String::new(), " \n\t ".to_string()] {
            let harness = failing(Script::Succeed(blank));
            let event = message_event(ChannelKind::Direct, None, "hello");

            AiChatHandler
                .handle(harness.context(), &event, Uuid::new_v4())
                .await
                .unwrap();

            assert_eq!(harness.chat.calls(), 1);
            assert_eq!(harness.connection.sent_texts(), vec![CHAT_APOLOGY]);
        }
    }

    #[tokio::test]
    async fn test_blank_message_is_skipped() {
        let harness = Harness::new();
        let event = message_event(ChannelKind::Direct, None, "   ");

        AiChatHandler
            .handle(harness.context(), &event, Uuid::new_v4())
            .await
            .unwrap();

        assert!(harness.connection.sent().is_empty());
        assert_eq!(harness.chat.calls(), 0);
    }
}
