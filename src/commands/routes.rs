//! Ordered route table for message events
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Replaces name-keyed command lookup with first-match routing on channel and prefix

use std::fmt;
use std::sync::Arc;

use super::handler::MessageHandler;
use crate::core::{ChannelKind, MessageEvent};

/// A predicate over a message event, kept as data so the table can be inspected and tested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Authored by this bot, or by any bot account
    SelfAuthored,
    /// Trimmed content starts with the given text
    Prefix(&'static str),
    /// A guild text or announcement channel with exactly this name
    ChannelNamed(String),
    DirectMessage,
    AnyOf(Vec<Matcher>),
    AllOf(Vec<Matcher>),
}

impl Matcher {
    pub fn matches(&self, event: &MessageEvent) -> bool {
        match self {
            Matcher::SelfAuthored => event.author_is_self || event.author_is_bot,
            Matcher::Prefix(prefix) => event.content.trim_start().starts_with(prefix),
            Matcher::ChannelNamed(name) => {
                event.channel_kind == ChannelKind::GuildText
                    && event.channel_name.as_deref() == Some(name.as_str())
            }
            Matcher::DirectMessage => event.channel_kind == ChannelKind::Direct,
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(event)),
            Matcher::AllOf(matchers) => matchers.iter().all(|m| m.matches(event)),
        }
    }
}

#[derive(Clone)]
pub enum RouteAction {
    /// Matched on purpose, nothing to do
    Ignore,
    Dispatch(Arc<dyn MessageHandler>),
}

impl fmt::Debug for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAction::Ignore => write!(f, "Ignore"),
            RouteAction::Dispatch(handler) => write!(f, "Dispatch({})", handler.name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub name: &'static str,
    pub matcher: Matcher,
    pub action: RouteAction,
}

/// First matching route wins; later routes are never consulted
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, name: &'static str, matcher: Matcher, action: RouteAction) -> Self {
        self.routes.push(Route {
            name,
            matcher,
            action,
        });
        self
    }

    /// The route that owns this event, or `None` when nothing matches
    pub fn classify(&self, event: &MessageEvent) -> Option<&Route> {
        self.routes.iter().find(|route| route.matcher.matches(event))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|r| r.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::message_event;

    #[test]
    fn test_prefix_ignores_leading_whitespace() {
        let event = message_event(ChannelKind::GuildText, Some("general"), "  !ping");
        assert!(Matcher::Prefix("!ping").matches(&event));
        assert!(!Matcher::Prefix("!dailyverse").matches(&event));
    }

    #[test]
    fn test_channel_named_requires_guild_text() {
        let matcher = Matcher::ChannelNamed("chat".to_string());
        assert!(matcher.matches(&message_event(ChannelKind::GuildText, Some("chat"), "hi")));
        assert!(!matcher.matches(&message_event(ChannelKind::GuildText, Some("chat-2"), "hi")));
        assert!(!matcher.matches(&message_event(ChannelKind::Other, Some("chat"), "hi")));
    }

    #[test]
    fn test_self_authored() {
        let mut event = message_event(ChannelKind::GuildText, Some("general"), "hi");
        assert!(!Matcher::SelfAuthored.matches(&event));
        event.author_is_bot = true;
        assert!(Matcher::SelfAuthored.matches(&event));
        event.author_is_bot = false;
        event.author_is_self = true;
        assert!(Matcher::SelfAuthored.matches(&event));
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new()
            .route("quiet", Matcher::Prefix("!"), RouteAction::Ignore)
            .route("ping", Matcher::Prefix("!ping"), RouteAction::Ignore);

        let event = message_event(ChannelKind::Direct, None, "!ping");
        assert_eq!(table.classify(&event).map(|r| r.name), Some("quiet"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["quiet", "ping"]);
    }

    #[test]
    fn test_no_match() {
        let table = RouteTable::new().route("ping", Matcher::Prefix("!ping"), RouteAction::Ignore);
        let event = message_event(ChannelKind::GuildText, Some("general"), "hello");
        assert!(table.classify(&event).is_none());
    }
}
