//! Button and modal dispatch by custom id
//!
//! Components posted by the bot outlive the process that posted them. The registry binds
//! each stable custom id to exactly one handler so a click after a restart still lands.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 2.0.0: Id-keyed registry replaces the hard-coded match; persistent prayer components
//! - 1.0.0: Persona buttons, confirmations and help modal

use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handlers::{PrayerButtonHandler, PrayerModalHandler};
use crate::core::{ButtonInteractionEvent, ModalSubmitEvent};
use crate::features::prayer::{PRAYER_BUTTON_ID, PRAYER_MODAL_ID};

/// Reply for a click on a component nobody handles any more
pub const STALE_COMPONENT: &str = "This button is no longer available.";

#[async_trait]
pub trait ButtonHandler: Send + Sync {
    async fn on_click(&self, ctx: Arc<BotContext>, event: &ButtonInteractionEvent) -> Result<()>;
}

#[async_trait]
pub trait ModalHandler: Send + Sync {
    async fn on_submit(&self, ctx: Arc<BotContext>, event: &ModalSubmitEvent) -> Result<()>;
}

#[derive(Default)]
pub struct ComponentRegistry {
    buttons: DashMap<String, Arc<dyn ButtonHandler>>,
    modals: DashMap<String, Arc<dyn ModalHandler>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and keeps the existing binding if `custom_id` is taken
    pub fn register_button(&self, custom_id: &str, handler: Arc<dyn ButtonHandler>) -> bool {
        match self.buttons.entry(custom_id.to_string()) {
            Entry::Occupied(_) => {
                debug!("Button '{custom_id}' already registered");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(handler);
                true
            }
        }
    }

    /// Returns `false` and keeps the existing binding if `custom_id` is taken
    pub fn register_modal(&self, custom_id: &str, handler: Arc<dyn ModalHandler>) -> bool {
        match self.modals.entry(custom_id.to_string()) {
            Entry::Occupied(_) => {
                debug!("Modal '{custom_id}' already registered");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(handler);
                true
            }
        }
    }

    pub fn button(&self, custom_id: &str) -> Option<Arc<dyn ButtonHandler>> {
        self.buttons.get(custom_id).map(|h| Arc::clone(h.value()))
    }

    pub fn modal(&self, custom_id: &str) -> Option<Arc<dyn ModalHandler>> {
        self.modals.get(custom_id).map(|h| Arc::clone(h.value()))
    }

    /// Total bindings across buttons and modals
    pub fn len(&self) -> usize {
        self.buttons.len() + self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind the prayer button and modal. Safe to call on every (re)connect.
    ///
    /// Returns how many new bindings were made.
    pub fn register_persistent_components(&self) -> usize {
        let mut added = 0;
        if self.register_button(PRAYER_BUTTON_ID, Arc::new(PrayerButtonHandler)) {
            added += 1;
        }
        if self.register_modal(PRAYER_MODAL_ID, Arc::new(PrayerModalHandler)) {
            added += 1;
        }
        if added > 0 {
            info!("🧩 Registered {added} persistent component handler(s)");
        }
        added
    }
}
