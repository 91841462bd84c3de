//! Image generation handler
//!
//! Handles: free text in the image channel
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Channel-driven prompts; URL or attachment relay depending on backend
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::commands::context::BotContext;
use crate::commands::handler::MessageHandler;
use crate::core::{bounded, Attachment, MessageEvent, OutboundMessage};
use crate::features::image_gen::{styled_prompt, ImageReference, IMAGE_APOLOGY};

pub struct ImagineHandler;

impl ImagineHandler {
    fn relay(reference: ImageReference) -> OutboundMessage {
        match reference {
            ImageReference::Url(url) => OutboundMessage::text(url),
            ImageReference::Bytes { filename, data } => {
                OutboundMessage::default().with_attachment(Attachment { filename, data })
            }
        }
    }
}

#[async_trait]
impl MessageHandler for ImagineHandler {
    fn name(&self) -> &'static str {
        "imagine"
    }

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, request_id: Uuid) -> Result<()> {
        let prompt = event.content.trim();
        if prompt.is_empty() {
            debug!("[{request_id}] Empty prompt in image channel, skipping");
            return Ok(());
        }

        let start_time = Instant::now();
        info!(
            "[{request_id}] 🎨 Generating image | Prompt: '{}'",
            prompt.chars().take(100).collect::<String>()
        );

        ctx.connection
            .send_message(
                event.channel_id,
                OutboundMessage::text(format!("Generating an image for: \"{prompt}\"...")),
            )
            .await?;

        if let Err(e) = ctx.connection.broadcast_typing(event.channel_id).await {
            warn!("[{request_id}] Failed to start typing indicator: {e}");
        }

        let generated = bounded(
            ctx.adapter_timeout,
            "Image generation",
            ctx.images.generate(&styled_prompt(prompt)),
        )
        .await;

        let outcome = match generated {
            Ok(reference) => {
                ctx.connection
                    .send_message(event.channel_id, Self::relay(reference))
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(_) => info!("[{request_id}] ✅ Image relayed | Time: {:?}", start_time.elapsed()),
            Err(e) => {
                error!("[{request_id}] Image generation error: {e:#}");
                ctx.connection
                    .send_message(event.channel_id, OutboundMessage::text(IMAGE_APOLOGY))
                    .await?;
            }
        }
        Ok(())
    }
}
