//! Shared context for command and component handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Injected platform connection and adapter traits; no global client access
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;
use std::time::Duration;

use crate::core::Connection;
use crate::features::chat::ConversationalAdapter;
use crate::features::image_gen::ImageGenerator;
use crate::features::prayer::GuildConfigStore;
use crate::features::scripture::ScriptureSource;

pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(45);
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONFIRMATION_TTL: Duration = Duration::from_secs(10);

/// Services every handler may need
///
/// Built once at startup and shared behind an `Arc`; nothing in here is mutated after
/// construction. The store does its own synchronisation.
#[derive(Clone)]
pub struct BotContext {
    pub connection: Arc<dyn Connection>,
    pub store: Arc<dyn GuildConfigStore>,
    pub chat: Arc<dyn ConversationalAdapter>,
    pub images: Arc<dyn ImageGenerator>,
    pub scripture: Arc<dyn ScriptureSource>,
    /// Bound on AI, image and scripture calls and on channel lookups
    pub adapter_timeout: Duration,
    /// Bound on configuration store reads and writes
    pub store_timeout: Duration,
    /// How long the setup confirmation stays visible before it is deleted
    pub confirmation_ttl: Duration,
}

impl BotContext {
    pub fn new(
        connection: Arc<dyn Connection>,
        store: Arc<dyn GuildConfigStore>,
        chat: Arc<dyn ConversationalAdapter>,
        images: Arc<dyn ImageGenerator>,
        scripture: Arc<dyn ScriptureSource>,
    ) -> Self {
        Self {
            connection,
            store,
            chat,
            images,
            scripture,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            confirmation_ttl: DEFAULT_CONFIRMATION_TTL,
        }
    }

    pub fn with_timeouts(mut self, adapter_timeout: Duration, store_timeout: Duration) -> Self {
        self.adapter_timeout = adapter_timeout;
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_confirmation_ttl(mut self, ttl: Duration) -> Self {
        self.confirmation_ttl = ttl;
        self
    }
}
