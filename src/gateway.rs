//! Discord gateway adapter
//!
//! Converts serenity callbacks into [`InboundEvent`]s for the router, and implements the
//! outbound [`Connection`] and [`InteractionResponder`] seams over serenity's HTTP client.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Deferred interaction responses; one HTTP client shared by gateway and handlers;
//!   announcement channels count as text
//! - 1.0.0: Initial serenity adapter

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serenity::client::bridge::gateway::ShardManager;
use serenity::http::error::Error as HttpError;
use serenity::http::Http;
use serenity::model::application::component::{
    ActionRowComponent, ButtonStyle as DiscordButtonStyle, InputTextStyle,
};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::{AttachmentType, Channel, ChannelType, Message};
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::user::User;
use serenity::model::Timestamp;
use serenity::prelude::*;
use std::borrow::Cow;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

use crate::commands::Router;
use crate::core::{
    ButtonInteractionEvent, ButtonStyle, ChannelInfo, ChannelKind, Connection, InboundEvent,
    InteractionResponder, InteractionUser, MessageEvent, ModalForm, ModalSubmitEvent,
    OutboundMessage,
};
use crate::features::prayer::SETUP_COMMAND;

/// [`Connection`] backed by serenity's REST client
#[derive(Clone)]
pub struct SerenityConnection {
    http: Arc<Http>,
}

impl SerenityConnection {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn button_style(style: ButtonStyle) -> DiscordButtonStyle {
    match style {
        ButtonStyle::Primary => DiscordButtonStyle::Primary,
        ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
        ButtonStyle::Success => DiscordButtonStyle::Success,
        ButtonStyle::Danger => DiscordButtonStyle::Danger,
    }
}

/// Announcement channels take messages and relays like plain text channels
fn is_text_channel(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::Text | ChannelType::News)
}

fn channel_kind(kind: ChannelType) -> ChannelKind {
    if is_text_channel(kind) {
        ChannelKind::GuildText
    } else {
        ChannelKind::Other
    }
}

/// 403 and 404 from Discord mean the channel is gone or hidden from us
fn is_missing_channel(err: &SerenityError) -> bool {
    match err {
        SerenityError::Http(http) => match http.as_ref() {
            HttpError::UnsuccessfulRequest(response) => {
                matches!(response.status_code.as_u16(), 403 | 404)
            }
            _ => false,
        },
        _ => false,
    }
}

#[async_trait]
impl Connection for SerenityConnection {
    async fn send_message(&self, channel_id: ChannelId, message: OutboundMessage) -> Result<MessageId> {
        let OutboundMessage {
            content,
            embed,
            buttons,
            attachment,
        } = message;

        let timestamp = match embed.as_ref().and_then(|e| e.timestamp) {
            Some(secs) => Some(
                Timestamp::from_unix_timestamp(secs)
                    .map_err(|e| anyhow!("Bad embed timestamp {secs}: {e:?}"))?,
            ),
            None => None,
        };

        let sent = channel_id
            .send_message(&self.http, |m| {
                if let Some(content) = &content {
                    m.content(content);
                }
                if let Some(spec) = &embed {
                    m.embed(|e| {
                        if let Some(title) = &spec.title {
                            e.title(title);
                        }
                        if let Some(description) = &spec.description {
                            e.description(description);
                        }
                        if let Some(name) = &spec.author_name {
                            e.author(|a| {
                                a.name(name);
                                if let Some(icon) = &spec.author_icon_url {
                                    a.icon_url(icon);
                                }
                                a
                            });
                        }
                        if let Some(footer) = &spec.footer {
                            e.footer(|f| f.text(footer));
                        }
                        if let Some(ts) = timestamp {
                            e.timestamp(ts);
                        }
                        e
                    });
                }
                if !buttons.is_empty() {
                    m.components(|c| {
                        c.create_action_row(|row| {
                            for button in &buttons {
                                row.create_button(|b| {
                                    b.custom_id(button.custom_id)
                                        .label(button.label)
                                        .style(button_style(button.style))
                                });
                            }
                            row
                        })
                    });
                }
                if let Some(file) = attachment {
                    m.add_file(AttachmentType::Bytes {
                        data: Cow::Owned(file.data),
                        filename: file.filename,
                    });
                }
                m
            })
            .await?;

        Ok(sent.id)
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        channel_id.delete_message(&self.http, message_id).await?;
        Ok(())
    }

    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<ChannelInfo>> {
        let channel = match self.http.get_channel(channel_id.0).await {
            Ok(channel) => channel,
            Err(e) if is_missing_channel(&e) => {
                debug!("Channel {channel_id} not visible: {e}");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(match channel {
            Channel::Guild(gc) => ChannelInfo {
                id: gc.id,
                guild_id: Some(gc.guild_id),
                text_capable: is_text_channel(gc.kind),
                name: gc.name,
            },
            Channel::Private(pc) => ChannelInfo {
                id: pc.id,
                guild_id: None,
                name: pc.name(),
                text_capable: true,
            },
            other => ChannelInfo {
                id: other.id(),
                guild_id: None,
                name: String::new(),
                text_capable: false,
            },
        }))
    }

    async fn broadcast_typing(&self, channel_id: ChannelId) -> Result<()> {
        channel_id.broadcast_typing(&self.http).await?;
        Ok(())
    }
}

enum InteractionSource {
    Component(MessageComponentInteraction),
    Modal(ModalSubmitInteraction),
}

/// Answers the interaction it was built from
pub struct SerenityResponder {
    http: Arc<Http>,
    source: InteractionSource,
}

#[async_trait]
impl InteractionResponder for SerenityResponder {
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()> {
        match &self.source {
            InteractionSource::Component(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| message.content(content).ephemeral(ephemeral))
                    })
                    .await?
            }
            InteractionSource::Modal(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| message.content(content).ephemeral(ephemeral))
                    })
                    .await?
            }
        }
        Ok(())
    }

    async fn open_modal(&self, form: &ModalForm) -> Result<()> {
        let InteractionSource::Component(interaction) = &self.source else {
            return Err(anyhow!("A modal can't be opened in response to another modal"));
        };

        interaction
            .create_interaction_response(&self.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(form.custom_id)
                            .title(form.title)
                            .components(|components| {
                                components.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id(form.field_id)
                                            .label(form.field_label)
                                            .style(InputTextStyle::Paragraph)
                                            .placeholder(form.placeholder)
                                            .required(true)
                                            .max_length(form.max_length)
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        match &self.source {
            InteractionSource::Component(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                            .interaction_response_data(|message| message.ephemeral(ephemeral))
                    })
                    .await?
            }
            InteractionSource::Modal(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                            .interaction_response_data(|message| message.ephemeral(ephemeral))
                    })
                    .await?
            }
        }
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<()> {
        match &self.source {
            InteractionSource::Component(interaction) => {
                interaction
                    .edit_original_interaction_response(&self.http, |response| response.content(content))
                    .await?;
            }
            InteractionSource::Modal(interaction) => {
                interaction
                    .edit_original_interaction_response(&self.http, |response| response.content(content))
                    .await?;
            }
        }
        Ok(())
    }
}

fn interaction_user(user: &User, member: Option<&Member>) -> InteractionUser {
    InteractionUser {
        id: user.id,
        display_name: member
            .map(|m| m.display_name().to_string())
            .unwrap_or_else(|| user.name.clone()),
        avatar_url: user.face(),
    }
}

/// Build the platform-neutral view of a message
///
/// Administrator status costs a member lookup, so it is only computed for the setup
/// command.
async fn message_event(ctx: &Context, msg: &Message) -> MessageEvent {
    let (channel_kind, channel_name) = match msg.channel(ctx).await {
        Ok(Channel::Guild(gc)) => (channel_kind(gc.kind), Some(gc.name)),
        Ok(Channel::Private(_)) => (ChannelKind::Direct, None),
        Ok(_) => (ChannelKind::Other, None),
        Err(e) => {
            warn!("Could not resolve channel {}: {e}", msg.channel_id);
            let kind = if msg.guild_id.is_none() {
                ChannelKind::Direct
            } else {
                ChannelKind::Other
            };
            (kind, None)
        }
    };

    let wants_admin = msg.guild_id.is_some() && msg.content.trim_start().starts_with(SETUP_COMMAND);
    let author_is_admin = if wants_admin {
        match msg.member(ctx).await {
            Ok(member) => member
                .permissions(&ctx.cache)
                .map(|p| p.administrator())
                .unwrap_or(false),
            Err(e) => {
                warn!("Could not load member {} for permission check: {e}", msg.author.id);
                false
            }
        }
    } else {
        false
    };

    MessageEvent {
        author_id: msg.author.id,
        author_is_bot: msg.author.bot,
        author_is_self: msg.author.id == ctx.cache.current_user_id(),
        author_is_admin,
        channel_id: msg.channel_id,
        channel_kind,
        channel_name,
        guild_id: msg.guild_id,
        content: msg.content.clone(),
    }
}

fn button_event(ctx: &Context, interaction: MessageComponentInteraction) -> ButtonInteractionEvent {
    ButtonInteractionEvent {
        custom_id: interaction.data.custom_id.clone(),
        guild_id: interaction.guild_id,
        user: interaction_user(&interaction.user, interaction.member.as_ref()),
        responder: Arc::new(SerenityResponder {
            http: Arc::clone(&ctx.http),
            source: InteractionSource::Component(interaction),
        }),
    }
}

fn modal_event(ctx: &Context, interaction: ModalSubmitInteraction) -> ModalSubmitEvent {
    let field_values = interaction
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => Some((input.custom_id.clone(), input.value.clone())),
            _ => None,
        })
        .collect();

    ModalSubmitEvent {
        custom_id: interaction.data.custom_id.clone(),
        guild_id: interaction.guild_id,
        user: interaction_user(&interaction.user, interaction.member.as_ref()),
        field_values,
        responder: Arc::new(SerenityResponder {
            http: Arc::clone(&ctx.http),
            source: InteractionSource::Modal(interaction),
        }),
    }
}

/// Holds the router once it exists
///
/// The router's context needs the client's HTTP handle, and the client needs its event
/// handler up front, so the handler starts empty and the router is installed before the
/// first shard connects.
#[derive(Default)]
struct RouterSlot(OnceLock<Arc<Router>>);

impl RouterSlot {
    /// Returns `false` and keeps the first router if one is already installed
    fn install(&self, router: Arc<Router>) -> bool {
        self.0.set(router).is_ok()
    }

    fn get(&self) -> Option<&Arc<Router>> {
        let router = self.0.get();
        if router.is_none() {
            warn!("Gateway event arrived before the router was installed; dropping it");
        }
        router
    }
}

struct Handler {
    router: Arc<RouterSlot>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let Some(router) = self.router.get() else {
            return;
        };
        let event = message_event(&ctx, &msg).await;
        router.handle(InboundEvent::Message(event)).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);
        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        // Ready fires again after every reconnect
        if let Some(router) = self.router.get() {
            let added = router.register_persistent_components();
            debug!("Persistent components registered this ready: {added}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(router) = self.router.get() else {
            return;
        };
        let event = match interaction {
            Interaction::MessageComponent(component) => InboundEvent::Button(button_event(&ctx, component)),
            Interaction::ModalSubmit(modal) => InboundEvent::ModalSubmit(modal_event(&ctx, modal)),
            _ => return,
        };
        router.handle(event).await;
    }
}

/// Gateway connection waiting to be started
pub struct Gateway {
    token: String,
}

impl Gateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Build the client, hand its HTTP client to `build_router`, and connect in the background
    ///
    /// Handlers and the gateway share that one HTTP client, so they share its rate limiter.
    pub async fn start<F>(self, build_router: F) -> Result<GatewayHandle>
    where
        F: FnOnce(Arc<Http>) -> Arc<Router>,
    {
        let intents = Self::intents();
        let slot = Arc::new(RouterSlot::default());
        let mut client = Client::builder(&self.token, intents)
            .event_handler(Handler {
                router: Arc::clone(&slot),
            })
            .await
            .map_err(|e| {
                error!("Failed to create Discord client: {e}");
                error!("This could indicate:");
                error!("  - Invalid bot token format");
                error!("  - Network issues reaching Discord API");
                anyhow!("Client creation failed: {e}")
            })?;

        slot.install(build_router(Arc::clone(&client.cache_and_http.http)));

        info!("Establishing WebSocket connection to Discord gateway...");
        info!("Gateway intents: {intents:?}");

        let shard_manager = Arc::clone(&client.shard_manager);
        let task = tokio::spawn(async move { client.start().await });
        Ok(GatewayHandle { shard_manager, task })
    }
}

/// A running gateway connection
pub struct GatewayHandle {
    shard_manager: Arc<Mutex<ShardManager>>,
    task: JoinHandle<Result<(), SerenityError>>,
}

impl GatewayHandle {
    /// Run until the connection ends on its own or `shutdown` resolves, then stop
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let finished = tokio::select! {
            finished = &mut self.task => Some(finished),
            _ = shutdown => None,
        };
        match finished {
            Some(joined) => Self::outcome(joined),
            None => self.stop().await,
        }
    }

    /// Close every shard and wait for the client task to finish
    pub async fn stop(self) -> Result<()> {
        info!("Shutting down gateway connection...");
        self.shard_manager.lock().await.shutdown_all().await;
        Self::outcome(self.task.await)
    }

    fn outcome(joined: Result<Result<(), SerenityError>, tokio::task::JoinError>) -> Result<()> {
        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(why)) => {
                error!("Gateway connection failed: {why:?}");
                error!("This could be due to:");
                error!("  - Invalid bot token");
                error!("  - Network connectivity issues");
                error!("  - Discord API outage");
                Err(anyhow!("Failed to establish gateway connection: {why}"))
            }
            Err(e) => Err(anyhow!("Gateway task ended unexpectedly: {e}")),
        }
    }
}
