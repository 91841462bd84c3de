//! Prayer request interaction handlers
//!
//! Handles: the persistent prayer button and the prayer request modal
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Modal submissions are deferred before any lookup and answered by edit
//! - 1.0.0: Button opens the form; form relays to the log channel

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::core::{bounded, ButtonInteractionEvent, ModalSubmitEvent};
use crate::features::prayer::submission::{
    CONFIGURATION_ERROR, EMPTY_REQUEST, NOT_CONFIGURED, RELAY_FAILED, SUBMITTED,
};
use crate::features::prayer::{components::PRAYER_TEXT_FIELD, PrayerSubmission, PRAYER_MODAL};
use crate::message_components::{ButtonHandler, ModalHandler};

/// Opens the request form; nothing else
pub struct PrayerButtonHandler;

#[async_trait]
impl ButtonHandler for PrayerButtonHandler {
    async fn on_click(&self, _ctx: Arc<BotContext>, event: &ButtonInteractionEvent) -> Result<()> {
        event.responder.open_modal(&PRAYER_MODAL).await
    }
}

/// Relays a submitted request to the guild's log channel
pub struct PrayerModalHandler;

impl PrayerModalHandler {
    /// Returns the single acknowledgment for the submitter
    async fn relay(ctx: &BotContext, event: &ModalSubmitEvent) -> &'static str {
        let Some(guild_id) = event.guild_id else {
            return NOT_CONFIGURED;
        };

        let config = match bounded(
            ctx.store_timeout,
            "Prayer config lookup",
            ctx.store.prayer_config(guild_id),
        )
        .await
        {
            Ok(Some(config)) => config,
            Ok(None) => return NOT_CONFIGURED,
            Err(e) => {
                error!("Prayer config lookup failed for guild {guild_id}: {e:#}");
                return RELAY_FAILED;
            }
        };

        let text = event
            .field_values
            .get(PRAYER_TEXT_FIELD)
            .map(|v| v.trim())
            .unwrap_or_default();
        if text.is_empty() {
            return EMPTY_REQUEST;
        }
        let submission = PrayerSubmission::new(&event.user, text);

        match bounded(
            ctx.adapter_timeout,
            "Channel lookup",
            ctx.connection.resolve_channel(config.log_channel_id),
        )
        .await
        {
            Ok(Some(channel)) if channel.text_capable => {}
            Ok(_) => {
                warn!(
                    "Prayer log channel {} for guild {guild_id} is gone or not a text channel",
                    config.log_channel_id
                );
                return CONFIGURATION_ERROR;
            }
            Err(e) => {
                error!("Failed to resolve prayer log channel {}: {e:#}", config.log_channel_id);
                return RELAY_FAILED;
            }
        }

        let record = submission.to_log_record(chrono::Utc::now().timestamp());
        match ctx.connection.send_message(config.log_channel_id, record).await {
            Ok(_) => {
                info!(
                    "🙏 Relayed prayer request from {} to {} (guild {guild_id})",
                    submission.submitter_id, config.log_channel_id
                );
                SUBMITTED
            }
            Err(e) => {
                error!("Failed to relay prayer request to {}: {e:#}", config.log_channel_id);
                RELAY_FAILED
            }
        }
    }
}

#[async_trait]
impl ModalHandler for PrayerModalHandler {
    async fn on_submit(&self, ctx: Arc<BotContext>, event: &ModalSubmitEvent) -> Result<()> {
        // Store and channel lookups together can outlast the 3 second interaction window
        event.responder.defer(true).await?;
        let acknowledgment = Self::relay(&ctx, event).await;
        event.responder.edit(acknowledgment).await
    }
}
