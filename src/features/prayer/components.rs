//! Persistent UI for the prayer request workflow
//!
//! These ids are baked into messages already posted in guilds. Changing them orphans
//! every call-to-action button posted before the change.

use crate::core::{ButtonStyle, EmbedSpec, ModalForm, OutboundMessage, PersistentButton};

pub const PRAYER_BUTTON_ID: &str = "prayer_request_button_persistent";
pub const PRAYER_MODAL_ID: &str = "prayer_request_modal";
pub const PRAYER_TEXT_FIELD: &str = "prayer_request_text";

pub const PRAYER_BUTTON: PersistentButton = PersistentButton {
    custom_id: PRAYER_BUTTON_ID,
    label: "🙏 Submit a Prayer Request",
    style: ButtonStyle::Primary,
};

pub const PRAYER_MODAL: ModalForm = ModalForm {
    custom_id: PRAYER_MODAL_ID,
    title: "Prayer Request",
    field_id: PRAYER_TEXT_FIELD,
    field_label: "How can we pray for you?",
    placeholder: "Share as much or as little as you like. Only the prayer team will see this.",
    max_length: 1000,
};

/// The message posted in the public channel by `!setup_prayer`
pub fn call_to_action() -> OutboundMessage {
    OutboundMessage::default()
        .with_embed(EmbedSpec {
            title: Some("🙏 Prayer Requests".to_string()),
            description: Some(
                "Need prayer? Press the button below to send a private request to our prayer team. \
                 Your request will not be posted in this channel."
                    .to_string(),
            ),
            ..Default::default()
        })
        .with_button(PRAYER_BUTTON)
}
