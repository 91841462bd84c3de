//! Event router
//!
//! Every inbound event passes through [`Router::handle`] exactly once. Message events are
//! classified against the route table; button and modal events are looked up by custom id.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::context::BotContext;
use super::handlers::{
    AiChatHandler, DailyVerseHandler, ImagineHandler, PingHandler, PrayerSetupHandler,
};
use super::routes::{Matcher, Route, RouteAction, RouteTable};
use crate::core::{ButtonInteractionEvent, InboundEvent, MessageEvent, ModalSubmitEvent};
use crate::features::prayer::SETUP_COMMAND;
use crate::message_components::{ComponentRegistry, STALE_COMPONENT};

pub struct Router {
    ctx: Arc<BotContext>,
    routes: RouteTable,
    components: ComponentRegistry,
}

impl Router {
    /// Standard route table for the given chat and image channel names
    pub fn new(ctx: Arc<BotContext>, chat_channel: &str, image_channel: &str) -> Self {
        Self::with_routes(ctx, standard_routes(chat_channel, image_channel))
    }

    pub fn with_routes(ctx: Arc<BotContext>, routes: RouteTable) -> Self {
        Self {
            ctx,
            routes,
            components: ComponentRegistry::new(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn classify(&self, event: &MessageEvent) -> Option<&Route> {
        self.routes.classify(event)
    }

    /// Called on every ready event; repeat calls add nothing
    pub fn register_persistent_components(&self) -> usize {
        self.components.register_persistent_components()
    }

    pub async fn handle(&self, event: InboundEvent) {
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();

        match event {
            InboundEvent::Message(message) => self.handle_message(&message, request_id).await,
            InboundEvent::Button(button) => self.handle_button(&button, request_id).await,
            InboundEvent::ModalSubmit(modal) => self.handle_modal(&modal, request_id).await,
        }

        debug!("[{request_id}] ✅ Event processed in {:?}", start_time.elapsed());
    }

    async fn handle_message(&self, event: &MessageEvent, request_id: Uuid) {
        let Some(route) = self.routes.classify(event) else {
            return;
        };

        let handler = match &route.action {
            RouteAction::Ignore => {
                debug!("[{request_id}] Message in {} ignored by route '{}'", event.channel_id, route.name);
                return;
            }
            RouteAction::Dispatch(handler) => Arc::clone(handler),
        };

        info!(
            "[{request_id}] 📥 Route '{}' | User: {} | Channel: {}",
            route.name, event.author_id, event.channel_id
        );
        if let Err(e) = handler.handle(Arc::clone(&self.ctx), event, request_id).await {
            error!("[{request_id}] Handler '{}' failed: {e:#}", handler.name());
        }
    }

    async fn handle_button(&self, event: &ButtonInteractionEvent, request_id: Uuid) {
        info!("[{request_id}] 🔘 Button '{}' from {}", event.custom_id, event.user.id);
        let result = match self.components.button(&event.custom_id) {
            Some(handler) => handler.on_click(Arc::clone(&self.ctx), event).await,
            None => {
                debug!("[{request_id}] No handler for button '{}'", event.custom_id);
                event.responder.reply(STALE_COMPONENT, true).await
            }
        };
        if let Err(e) = result {
            error!("[{request_id}] Button '{}' failed: {e:#}", event.custom_id);
        }
    }

    async fn handle_modal(&self, event: &ModalSubmitEvent, request_id: Uuid) {
        info!("[{request_id}] 📝 Modal '{}' from {}", event.custom_id, event.user.id);
        let result = match self.components.modal(&event.custom_id) {
            Some(handler) => handler.on_submit(Arc::clone(&self.ctx), event).await,
            None => {
                debug!("[{request_id}] No handler for modal '{}'", event.custom_id);
                event.responder.reply(STALE_COMPONENT, true).await
            }
        };
        if let Err(e) = result {
            error!("[{request_id}] Modal '{}' failed: {e:#}", event.custom_id);
        }
    }
}

fn standard_routes(chat_channel: &str, image_channel: &str) -> RouteTable {
    let chat_context = || {
        Matcher::AnyOf(vec![
            Matcher::ChannelNamed(chat_channel.to_string()),
            Matcher::DirectMessage,
        ])
    };

    RouteTable::new()
        .route("self", Matcher::SelfAuthored, RouteAction::Ignore)
        .route(
            "setup_prayer",
            Matcher::Prefix(SETUP_COMMAND),
            RouteAction::Dispatch(Arc::new(PrayerSetupHandler)),
        )
        .route(
            "imagine",
            Matcher::ChannelNamed(image_channel.to_string()),
            RouteAction::Dispatch(Arc::new(ImagineHandler)),
        )
        .route(
            "chat_command",
            Matcher::AllOf(vec![chat_context(), Matcher::Prefix("!")]),
            RouteAction::Ignore,
        )
        .route("chat", chat_context(), RouteAction::Dispatch(Arc::new(AiChatHandler)))
        .route("ping", Matcher::Prefix("!ping"), RouteAction::Dispatch(Arc::new(PingHandler)))
        .route(
            "dailyverse",
            Matcher::Prefix("!dailyverse"),
            RouteAction::Dispatch(Arc::new(DailyVerseHandler)),
        )
}
