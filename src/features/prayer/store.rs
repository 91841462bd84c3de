//! Per-guild prayer workflow configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};

/// Which channel receives a guild's private prayer requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildPrayerConfig {
    pub guild_id: GuildId,
    pub log_channel_id: ChannelId,
}

/// Keyed lookup of prayer configuration
///
/// Writes overwrite; there is no delete. Last writer wins for concurrent writes to the
/// same guild.
#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    async fn save_prayer_config(&self, config: GuildPrayerConfig) -> Result<()>;

    async fn prayer_config(&self, guild_id: GuildId) -> Result<Option<GuildPrayerConfig>>;
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    configs: DashMap<GuildId, ChannelId>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[async_trait]
impl GuildConfigStore for MemoryConfigStore {
    async fn save_prayer_config(&self, config: GuildPrayerConfig) -> Result<()> {
        self.configs.insert(config.guild_id, config.log_channel_id);
        Ok(())
    }

    async fn prayer_config(&self, guild_id: GuildId) -> Result<Option<GuildPrayerConfig>> {
        Ok(self.configs.get(&guild_id).map(|entry| GuildPrayerConfig {
            guild_id,
            log_channel_id: *entry.value(),
        }))
    }
}
