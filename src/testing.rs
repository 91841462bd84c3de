//! In-memory fakes for exercising handlers without Discord or any AI service

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::commands::context::BotContext;
use crate::core::{
    ButtonInteractionEvent, ChannelInfo, ChannelKind, Connection, InteractionResponder,
    InteractionUser, MessageEvent, ModalForm, ModalSubmitEvent, OutboundMessage,
};
use crate::features::chat::ConversationalAdapter;
use crate::features::image_gen::{ImageGenerator, ImageReference};
use crate::features::prayer::{GuildConfigStore, GuildPrayerConfig, MemoryConfigStore};
use crate::features::scripture::{ScriptureSource, Verse};

pub const TEST_GUILD: GuildId = GuildId(1000);
pub const TEST_CHANNEL: ChannelId = ChannelId(2000);
pub const TEST_USER: UserId = UserId(3000);

pub fn message_event(kind: ChannelKind, channel_name: Option<&str>, content: &str) -> MessageEvent {
    MessageEvent {
        author_id: TEST_USER,
        author_is_bot: false,
        author_is_self: false,
        author_is_admin: false,
        channel_id: TEST_CHANNEL,
        channel_kind: kind,
        channel_name: channel_name.map(str::to_string),
        guild_id: (kind != ChannelKind::Direct).then_some(TEST_GUILD),
        content: content.to_string(),
    }
}

pub fn interaction_user() -> InteractionUser {
    InteractionUser {
        id: TEST_USER,
        display_name: "Hannah".to_string(),
        avatar_url: "https://cdn.example/hannah.png".to_string(),
    }
}

pub fn button_event(custom_id: &str, responder: Arc<RecordingResponder>) -> ButtonInteractionEvent {
    ButtonInteractionEvent {
        custom_id: custom_id.to_string(),
        guild_id: Some(TEST_GUILD),
        user: interaction_user(),
        responder,
    }
}

pub fn modal_event(
    custom_id: &str,
    guild_id: Option<GuildId>,
    fields: &[(&str, &str)],
    responder: Arc<RecordingResponder>,
) -> ModalSubmitEvent {
    ModalSubmitEvent {
        custom_id: custom_id.to_string(),
        guild_id,
        user: interaction_user(),
        field_values: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        responder,
    }
}

pub fn text_channel(id: u64, guild: GuildId, name: &str) -> ChannelInfo {
    ChannelInfo {
        id: ChannelId(id),
        guild_id: Some(guild),
        name: name.to_string(),
        text_capable: true,
    }
}

/// Records every outbound call; channels must be added before they resolve
#[derive(Default)]
pub struct RecordingConnection {
    pub sent: Mutex<Vec<(ChannelId, OutboundMessage)>>,
    pub deleted: Mutex<Vec<(ChannelId, MessageId)>>,
    pub channels: Mutex<HashMap<ChannelId, ChannelInfo>>,
    pub typing: AtomicUsize,
    pub fail_sends_to: Mutex<Option<ChannelId>>,
    pub fail_lookups: AtomicBool,
    next_id: AtomicU64,
}

impl RecordingConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_channel(&self, info: ChannelInfo) {
        self.channels.lock().unwrap().insert(info.id, info);
    }

    pub fn fail_sends_to(&self, channel: ChannelId) {
        *self.fail_sends_to.lock().unwrap() = Some(channel);
    }

    /// Every `resolve_channel` call errors as a Discord outage would
    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(ChannelId, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|(_, m)| m.content)
            .collect()
    }

    pub fn sent_to(&self, channel: ChannelId) -> Vec<OutboundMessage> {
        self.sent()
            .into_iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn send_message(&self, channel_id: ChannelId, message: OutboundMessage) -> Result<MessageId> {
        if *self.fail_sends_to.lock().unwrap() == Some(channel_id) {
            return Err(anyhow!("Missing Access"));
        }
        self.sent.lock().unwrap().push((channel_id, message));
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        self.deleted.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }

    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<ChannelInfo>> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(anyhow!("503 Service Unavailable"));
        }
        Ok(self.channels.lock().unwrap().get(&channel_id).cloned())
    }

    async fn broadcast_typing(&self, _channel_id: ChannelId) -> Result<()> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingResponder {
    pub replies: Mutex<Vec<(String, bool)>>,
    pub modals: Mutex<Vec<ModalForm>>,
    pub deferrals: Mutex<Vec<bool>>,
    pub edits: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replies(&self) -> Vec<(String, bool)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn modals(&self) -> Vec<ModalForm> {
        self.modals.lock().unwrap().clone()
    }

    pub fn deferrals(&self) -> Vec<bool> {
        self.deferrals.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<String> {
        self.edits.lock().unwrap().clone()
    }

    /// What the user ends up seeing: direct replies, then deferred responses as edited
    pub fn answers(&self) -> Vec<(String, bool)> {
        let ephemeral = self.deferrals().first().copied().unwrap_or(false);
        let mut answers = self.replies();
        answers.extend(self.edits().into_iter().map(|content| (content, ephemeral)));
        answers
    }

    /// Initial responses (replies, modals and deferrals); every interaction gets exactly one
    pub fn acknowledgements(&self) -> usize {
        self.replies().len() + self.modals().len() + self.deferrals().len()
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()> {
        self.replies.lock().unwrap().push((content.to_string(), ephemeral));
        Ok(())
    }

    async fn open_modal(&self, modal: &ModalForm) -> Result<()> {
        self.modals.lock().unwrap().push(modal.clone());
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        self.deferrals.lock().unwrap().push(ephemeral);
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<()> {
        if self.deferrals.lock().unwrap().is_empty() {
            return Err(anyhow!("Unknown interaction: edit before any response"));
        }
        self.edits.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

/// How a scripted adapter answers
#[derive(Debug, Clone)]
pub enum Script<T> {
    Succeed(T),
    Fail(&'static str),
    Hang,
}

impl<T: Clone> Script<T> {
    async fn play(&self) -> Result<T> {
        match self {
            Script::Succeed(value) => Ok(value.clone()),
            Script::Fail(reason) => Err(anyhow!("{reason}")),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow!("unreachable"))
            }
        }
    }
}

pub struct ScriptedChat {
    script: Script<String>,
    pub calls: AtomicUsize,
    pub last_persona: Mutex<Option<String>>,
}

impl ScriptedChat {
    pub fn new(script: Script<String>) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_persona: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationalAdapter for ScriptedChat {
    async fn reply(&self, _user_text: &str, persona: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_persona.lock().unwrap() = Some(persona.to_string());
        self.script.play().await
    }
}

pub struct ScriptedImages {
    script: Script<ImageReference>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedImages {
    pub fn new(script: Script<ImageReference>) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImages {
    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script.play().await
    }
}

pub struct ScriptedScripture {
    script: Script<Verse>,
    pub called: AtomicBool,
}

impl ScriptedScripture {
    pub fn new(script: Script<Verse>) -> Arc<Self> {
        Arc::new(Self {
            script,
            called: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl ScriptureSource for ScriptedScripture {
    async fn random_verse(&self) -> Result<Verse> {
        self.called.store(true, Ordering::SeqCst);
        self.script.play().await
    }
}

/// Config store whose reads and writes follow a script
pub struct ScriptedStore {
    save: Script<()>,
    lookup: Script<Option<GuildPrayerConfig>>,
    pub saved: Mutex<Vec<GuildPrayerConfig>>,
    pub lookups: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(save: Script<()>, lookup: Script<Option<GuildPrayerConfig>>) -> Arc<Self> {
        Arc::new(Self {
            save,
            lookup,
            saved: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn saved(&self) -> Vec<GuildPrayerConfig> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl GuildConfigStore for ScriptedStore {
    async fn save_prayer_config(&self, config: GuildPrayerConfig) -> Result<()> {
        self.save.play().await?;
        self.saved.lock().unwrap().push(config);
        Ok(())
    }

    async fn prayer_config(&self, _guild_id: GuildId) -> Result<Option<GuildPrayerConfig>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.lookup.play().await
    }
}

/// Everything a handler test needs, with handles kept for assertions
pub struct Harness {
    pub connection: Arc<RecordingConnection>,
    pub store: Arc<MemoryConfigStore>,
    pub chat: Arc<ScriptedChat>,
    pub images: Arc<ScriptedImages>,
    pub scripture: Arc<ScriptedScripture>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_scripts(
            Script::Succeed("Peace be with you.".to_string()),
            Script::Succeed(ImageReference::Url("https://img.example/1".to_string())),
            Script::Succeed(Verse {
                reference: "John 3:16".to_string(),
                text: "For God so loved...\nthe world...".to_string(),
            }),
        )
    }

    pub fn with_scripts(
        chat: Script<String>,
        images: Script<ImageReference>,
        scripture: Script<Verse>,
    ) -> Self {
        Self {
            connection: RecordingConnection::new(),
            store: Arc::new(MemoryConfigStore::new()),
            chat: ScriptedChat::new(chat),
            images: ScriptedImages::new(images),
            scripture: ScriptedScripture::new(scripture),
        }
    }

    pub fn context(&self) -> Arc<BotContext> {
        self.context_with_store(self.store.clone())
    }

    /// Same fakes, but config reads and writes go to `store`
    pub fn context_with_store(&self, store: Arc<dyn GuildConfigStore>) -> Arc<BotContext> {
        Arc::new(
            BotContext::new(
                self.connection.clone(),
                store,
                self.chat.clone(),
                self.images.clone(),
                self.scripture.clone(),
            )
            .with_timeouts(Duration::from_millis(50), Duration::from_millis(50))
            .with_confirmation_ttl(Duration::ZERO),
        )
    }
}
