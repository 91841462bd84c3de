//! Prayer request relay record

use crate::core::{truncate, EmbedSpec, InteractionUser, OutboundMessage, EMBED_LIMIT};
use serenity::model::id::UserId;

pub const NOT_CONFIGURED: &str =
    "Prayer requests haven't been set up on this server yet. Please ask an administrator to run `!setup_prayer`.";
pub const CONFIGURATION_ERROR: &str =
    "There's a problem with this server's prayer request setup (the prayer log channel is missing). Please let an administrator know.";
pub const RELAY_FAILED: &str =
    "Sorry, I couldn't deliver your prayer request right now. Please try again in a moment.";
pub const EMPTY_REQUEST: &str = "Your prayer request was empty. Please write a few words and try again.";
pub const SUBMITTED: &str =
    "🙏 Thank you. Your prayer request has been shared privately with the prayer team.";

/// One request on its way to the log channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerSubmission {
    pub submitter_id: UserId,
    pub submitter_display_name: String,
    pub submitter_avatar_url: String,
    pub text: String,
}

impl PrayerSubmission {
    pub fn new(user: &InteractionUser, text: &str) -> Self {
        Self {
            submitter_id: user.id,
            submitter_display_name: user.display_name.clone(),
            submitter_avatar_url: user.avatar_url.clone(),
            text: text.trim().to_string(),
        }
    }

    /// Embed posted in the private log channel
    pub fn to_log_record(&self, submitted_at: i64) -> OutboundMessage {
        OutboundMessage::default().with_embed(EmbedSpec {
            title: Some("New Prayer Request".to_string()),
            description: Some(truncate(&self.text, EMBED_LIMIT)),
            author_name: Some(self.submitter_display_name.clone()),
            author_icon_url: Some(self.submitter_avatar_url.clone()),
            footer: Some(format!("User ID: {}", self.submitter_id.0)),
            timestamp: Some(submitted_at),
        })
    }
}
