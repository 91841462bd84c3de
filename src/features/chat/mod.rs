//! # Feature: AI Chat
//!
//! Single-turn conversation with a fixed Christian-assistant persona. Used in the
//! designated chat channel and in direct messages.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Adapter trait so the handler can run against any backend
//! - 1.0.0: OpenAI chat completions

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};

/// System instruction sent with every chat request
pub const PERSONA: &str = "You are a kind, knowledgeable, and compassionate Christian AI assistant. \
Your purpose is to help users by answering questions about the Bible, Christian faith, and theology. \
Provide encouragement and support grounded in Christian principles. \
When citing scripture, please provide the reference (e.g., John 3:16). \
Always maintain a respectful and loving tone. \
You are a helpful guide, not a replacement for a pastor or personal study.";

pub const CHAT_APOLOGY: &str = "I'm sorry, I'm having a little trouble connecting to my thoughts right now. Please try again in a moment.";

/// Text-in, text-out conversational backend
#[async_trait]
pub trait ConversationalAdapter: Send + Sync {
    async fn reply(&self, user_text: &str, persona: &str) -> Result<String>;
}

/// OpenAI chat completions
///
/// The `openai` crate reads its key from `OPENAI_KEY`; the binary copies `OPENAI_API_KEY`
/// into it at startup.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    model: String,
    has_credentials: bool,
}

impl OpenAiChat {
    pub fn new(model: impl Into<String>, has_credentials: bool) -> Self {
        Self {
            model: model.into(),
            has_credentials,
        }
    }

    fn message(role: ChatCompletionMessageRole, content: &str) -> ChatCompletionMessage {
        ChatCompletionMessage {
            role,
            content: Some(content.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

#[async_trait]
impl ConversationalAdapter for OpenAiChat {
    async fn reply(&self, user_text: &str, persona: &str) -> Result<String> {
        if !self.has_credentials {
            return Err(anyhow!("OPENAI_API_KEY is not configured"));
        }

        let messages = vec![
            Self::message(ChatCompletionMessageRole::System, persona),
            Self::message(ChatCompletionMessageRole::User, user_text),
        ];

        debug!("Sending chat request to {} ({} chars)", self.model, user_text.len());
        let completion = ChatCompletion::builder(&self.model, messages)
            .create()
            .await
            .map_err(|e| anyhow!("OpenAI API error: {}", e))?;

        let reply = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(anyhow!("OpenAI returned an empty reply"));
        }
        Ok(reply)
    }
}
