//! Admin command handlers
//!
//! Handles: !setup_prayer
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Prayer workflow setup with per-guild log channel
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::BotContext;
use crate::commands::handler::MessageHandler;
use crate::core::{bounded, ChannelInfo, MessageEvent, OutboundMessage};
use crate::features::prayer::{call_to_action, parse_setup_args, GuildPrayerConfig, SETUP_USAGE};

pub const PERMISSION_DENIED: &str = "⛔ You need the Administrator permission to set up prayer requests.";
pub const GUILD_ONLY: &str = "This command can only be used inside a server.";
pub const LOOKUP_FAILED: &str = "I couldn't look up those channels right now. Please try again in a moment.";
pub const SAVE_FAILED: &str = "I couldn't save the prayer request settings. Please try again in a moment.";

pub struct PrayerSetupHandler;

enum ChannelCheck {
    Usable,
    Unusable,
}

impl PrayerSetupHandler {
    async fn check_channel(
        ctx: &BotContext,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<ChannelCheck> {
        let resolved: Option<ChannelInfo> = bounded(
            ctx.adapter_timeout,
            "Channel lookup",
            ctx.connection.resolve_channel(channel_id),
        )
        .await?;

        Ok(match resolved {
            Some(info) if info.text_capable && info.guild_id == Some(guild_id) => ChannelCheck::Usable,
            _ => ChannelCheck::Unusable,
        })
    }

    async fn say(ctx: &BotContext, channel_id: ChannelId, text: impl Into<String>) -> Result<()> {
        ctx.connection
            .send_message(channel_id, OutboundMessage::text(text))
            .await?;
        Ok(())
    }

    /// Post a confirmation that removes itself after `confirmation_ttl`
    async fn confirm(ctx: &BotContext, channel_id: ChannelId, text: String) -> Result<()> {
        let message_id = ctx
            .connection
            .send_message(channel_id, OutboundMessage::text(text))
            .await?;

        let connection = Arc::clone(&ctx.connection);
        let ttl = ctx.confirmation_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = connection.delete_message(channel_id, message_id).await {
                warn!("Failed to delete setup confirmation {message_id}: {e}");
            }
        });
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for PrayerSetupHandler {
    fn name(&self) -> &'static str {
        "setup_prayer"
    }

    async fn handle(&self, ctx: Arc<BotContext>, event: &MessageEvent, request_id: Uuid) -> Result<()> {
        if !event.author_is_admin {
            warn!("[{request_id}] Non-admin {} tried !setup_prayer", event.author_id);
            return Self::say(&ctx, event.channel_id, PERMISSION_DENIED).await;
        }

        let Some(guild_id) = event.guild_id else {
            return Self::say(&ctx, event.channel_id, GUILD_ONLY).await;
        };

        let Some(args) = parse_setup_args(&event.content) else {
            return Self::say(&ctx, event.channel_id, SETUP_USAGE).await;
        };

        for channel_id in [args.public_channel, args.log_channel] {
            match Self::check_channel(&ctx, guild_id, channel_id).await {
                Ok(ChannelCheck::Usable) => {}
                Ok(ChannelCheck::Unusable) => {
                    let notice = format!(
                        "<#{}> isn't a text channel I can use in this server.\n{SETUP_USAGE}",
                        channel_id.0
                    );
                    return Self::say(&ctx, event.channel_id, notice).await;
                }
                Err(e) => {
                    error!("[{request_id}] Channel lookup failed for {channel_id}: {e:#}");
                    return Self::say(&ctx, event.channel_id, LOOKUP_FAILED).await;
                }
            }
        }

        let config = GuildPrayerConfig {
            guild_id,
            log_channel_id: args.log_channel,
        };
        if let Err(e) = bounded(
            ctx.store_timeout,
            "Prayer config save",
            ctx.store.save_prayer_config(config),
        )
        .await
        {
            error!("[{request_id}] Failed to store prayer config for guild {guild_id}: {e:#}");
            return Self::say(&ctx, event.channel_id, SAVE_FAILED).await;
        }
        info!(
            "[{request_id}] 🙏 Prayer requests for guild {guild_id} now log to {}",
            args.log_channel
        );

        if let Err(e) = ctx
            .connection
            .send_message(args.public_channel, call_to_action())
            .await
        {
            error!("[{request_id}] Failed to post prayer button in {}: {e:#}", args.public_channel);
            let notice = format!(
                "Settings saved, but I couldn't post the prayer request button in <#{}>. Please check my permissions there and run the command again.",
                args.public_channel.0
            );
            return Self::say(&ctx, event.channel_id, notice).await;
        }

        let confirmation = format!(
            "✅ Prayer requests are set up. The button is in <#{}> and requests will be sent to <#{}>.",
            args.public_channel.0, args.log_channel.0
        );
        Self::confirm(&ctx, event.channel_id, confirmation).await
    }
}
