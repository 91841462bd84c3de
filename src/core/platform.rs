//! Platform-neutral event model and the outbound connection seam
//!
//! The gateway layer turns serenity callbacks into [`InboundEvent`]s and hands them to the
//! router. Handlers talk back through a [`Connection`] injected at construction, or through
//! the [`InteractionResponder`] that travels with an interaction event.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What kind of conversation a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// A text or announcement channel inside a guild
    GuildText,
    /// A one-to-one direct message
    Direct,
    /// Threads, voice text, announcement channels and anything else
    Other,
}

#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub author_id: UserId,
    pub author_is_bot: bool,
    pub author_is_self: bool,
    /// Only computed for commands that need it; `false` outside guilds
    pub author_is_admin: bool,
    pub channel_id: ChannelId,
    pub channel_kind: ChannelKind,
    pub channel_name: Option<String>,
    pub guild_id: Option<GuildId>,
    pub content: String,
}

/// The person on the other end of a button click or modal submission
#[derive(Debug, Clone)]
pub struct InteractionUser {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

#[derive(Clone)]
pub struct ButtonInteractionEvent {
    pub custom_id: String,
    pub guild_id: Option<GuildId>,
    pub user: InteractionUser,
    pub responder: Arc<dyn InteractionResponder>,
}

#[derive(Clone)]
pub struct ModalSubmitEvent {
    pub custom_id: String,
    pub guild_id: Option<GuildId>,
    pub user: InteractionUser,
    pub field_values: HashMap<String, String>,
    pub responder: Arc<dyn InteractionResponder>,
}

impl fmt::Debug for ButtonInteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonInteractionEvent")
            .field("custom_id", &self.custom_id)
            .field("guild_id", &self.guild_id)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ModalSubmitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalSubmitEvent")
            .field("custom_id", &self.custom_id)
            .field("guild_id", &self.guild_id)
            .field("user", &self.user)
            .field("fields", &self.field_values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// One platform callback, consumed by the router and then dropped
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(MessageEvent),
    Button(ButtonInteractionEvent),
    ModalSubmit(ModalSubmitEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A button whose custom id stays the same across every process lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentButton {
    pub custom_id: &'static str,
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// A single-field paragraph form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub custom_id: &'static str,
    pub title: &'static str,
    pub field_id: &'static str,
    pub field_label: &'static str,
    pub placeholder: &'static str,
    pub max_length: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSpec {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
    pub author_icon_url: Option<String>,
    pub footer: Option<String>,
    /// Unix seconds
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Everything a handler can put into a channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: Option<String>,
    pub embed: Option<EmbedSpec>,
    pub buttons: Vec<PersistentButton>,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_embed(mut self, embed: EmbedSpec) -> Self {
        self.embed = Some(embed);
        self
    }

    pub fn with_button(mut self, button: PersistentButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// What a channel id resolved to at lookup time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub name: String,
    pub text_capable: bool,
}

/// Process-wide handle to the chat platform
#[async_trait]
pub trait Connection: Send + Sync {
    async fn send_message(&self, channel_id: ChannelId, message: OutboundMessage) -> Result<MessageId>;

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()>;

    /// `Ok(None)` when the channel no longer exists or is not visible to the bot
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<ChannelInfo>>;

    async fn broadcast_typing(&self, channel_id: ChannelId) -> Result<()>;
}

/// Reply handle for the interaction an event came from
///
/// Discord accepts exactly one initial response per interaction, within 3 seconds. A
/// handler either answers at once with `reply`/`open_modal`, or calls `defer` first and
/// later fills the deferred response in with a single `edit`.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()>;

    async fn open_modal(&self, modal: &ModalForm) -> Result<()>;

    /// Acknowledge now, answer later through [`InteractionResponder::edit`]
    async fn defer(&self, ephemeral: bool) -> Result<()>;

    /// Replace the deferred "thinking" response with `content`
    async fn edit(&self, content: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn Connection, _: &dyn InteractionResponder) {}

    #[test]
    fn test_outbound_builder() {
        let button = PersistentButton {
            custom_id: "b",
            label: "Press",
            style: ButtonStyle::Primary,
        };
        let message = OutboundMessage::text("hello").with_button(button.clone());
        assert_eq!(message.content.as_deref(), Some("hello"));
        assert_eq!(message.buttons, vec![button]);
        assert!(message.embed.is_none());
        assert!(message.attachment.is_none());
    }
}
