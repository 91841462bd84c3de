//! `!setup_prayer` argument parsing

use regex::Regex;
use serenity::model::id::ChannelId;
use std::sync::OnceLock;

pub const SETUP_COMMAND: &str = "!setup_prayer";
pub const SETUP_USAGE: &str =
    "Usage: `!setup_prayer #public-channel #log-channel` (mention two text channels).";

fn mention_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^<#(\d{1,20})>$").ok())
        .as_ref()
}

/// Parse a `<#123>` channel mention
pub fn parse_channel_mention(token: &str) -> Option<ChannelId> {
    let captures = mention_pattern()?.captures(token)?;
    captures[1].parse::<u64>().ok().map(ChannelId)
}

/// The two channels named by a setup command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupArgs {
    pub public_channel: ChannelId,
    pub log_channel: ChannelId,
}

/// Exactly two mention tokens after the command, nothing else
pub fn parse_setup_args(content: &str) -> Option<SetupArgs> {
    let mut tokens = content.split_whitespace();
    if tokens.next()? != SETUP_COMMAND {
        return None;
    }
    let args: Vec<&str> = tokens.collect();
    let [public, log] = args.as_slice() else {
        return None;
    };
    Some(SetupArgs {
        public_channel: parse_channel_mention(public)?,
        log_channel: parse_channel_mention(log)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mention() {
        assert_eq!(parse_channel_mention("<#123>"), Some(ChannelId(123)));
        assert_eq!(parse_channel_mention("<@123>"), None);
        assert_eq!(parse_channel_mention("#general"), None);
        assert_eq!(parse_channel_mention("<#abc>"), None);
        assert_eq!(parse_channel_mention("<#99999999999999999999>"), None);
    }

    #[test]
    fn test_parse_setup_args() {
        let args = parse_setup_args("!setup_prayer <#1> <#2>").unwrap();
        assert_eq!(args.public_channel, ChannelId(1));
        assert_eq!(args.log_channel, ChannelId(2));

        let spaced = parse_setup_args("  !setup_prayer   <#1>\n<#2> ").unwrap();
        assert_eq!(spaced, args);
    }

    #[test]
    fn test_parse_setup_args_rejects_wrong_arity() {
        assert!(parse_setup_args("!setup_prayer").is_none());
        assert!(parse_setup_args("!setup_prayer <#1>").is_none());
        assert!(parse_setup_args("!setup_prayer <#1> <#2> <#3>").is_none());
        assert!(parse_setup_args("!setup_prayer <#1> log").is_none());
        assert!(parse_setup_args("!setup_prayers <#1> <#2>").is_none());
    }
}
