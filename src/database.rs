//! SQLite persistence
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::id::{ChannelId, GuildId};
use sqlite::{ConnectionThreadSafe, State};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::prayer::store::{GuildConfigStore, GuildPrayerConfig};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS guild_prayer_config (
        guild_id TEXT PRIMARY KEY,
        log_channel_id TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<ConnectionThreadSafe>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema
    ///
    /// `:memory:` gives a private in-memory database.
    pub async fn new(path: &str) -> Result<Self> {
        let connection = sqlite::Connection::open_thread_safe(path)
            .with_context(|| format!("Failed to open database at {path}"))?;
        connection
            .execute(SCHEMA)
            .context("Failed to apply database schema")?;

        info!("Database ready at {path}");
        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    pub async fn set_prayer_log_channel(&self, guild_id: &str, channel_id: &str) -> Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT INTO guild_prayer_config (guild_id, log_channel_id, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(guild_id) DO UPDATE SET
                log_channel_id = excluded.log_channel_id,
                updated_at = excluded.updated_at",
        )?;
        statement.bind((1, guild_id))?;
        statement.bind((2, channel_id))?;
        statement.bind((3, updated_at.as_str()))?;
        statement.next()?;

        debug!("Stored prayer log channel {channel_id} for guild {guild_id}");
        Ok(())
    }

    pub async fn get_prayer_log_channel(&self, guild_id: &str) -> Result<Option<String>> {
        let conn = self.connection.lock().await;
        let mut statement =
            conn.prepare("SELECT log_channel_id FROM guild_prayer_config WHERE guild_id = ?")?;
        statement.bind((1, guild_id))?;

        if let State::Row = statement.next()? {
            Ok(Some(statement.read::<String, _>("log_channel_id")?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl GuildConfigStore for Database {
    async fn save_prayer_config(&self, config: GuildPrayerConfig) -> Result<()> {
        self.set_prayer_log_channel(
            &config.guild_id.0.to_string(),
            &config.log_channel_id.0.to_string(),
        )
        .await
    }

    async fn prayer_config(&self, guild_id: GuildId) -> Result<Option<GuildPrayerConfig>> {
        let Some(raw) = self.get_prayer_log_channel(&guild_id.0.to_string()).await? else {
            return Ok(None);
        };
        let channel = raw
            .parse::<u64>()
            .with_context(|| format!("Stored log channel '{raw}' for guild {guild_id} is not an id"))?;

        Ok(Some(GuildPrayerConfig {
            guild_id,
            log_channel_id: ChannelId(channel),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_guild_is_none() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.get_prayer_log_channel("1").await.unwrap().is_none());
        assert!(db.prayer_config(GuildId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_lookup() {
        let db = Database::new(":memory:").await.unwrap();
        db.save_prayer_config(GuildPrayerConfig {
            guild_id: GuildId(42),
            log_channel_id: ChannelId(900),
        })
        .await
        .unwrap();

        let config = db.prayer_config(GuildId(42)).await.unwrap().unwrap();
        assert_eq!(config.guild_id, GuildId(42));
        assert_eq!(config.log_channel_id, ChannelId(900));
    }

    #[tokio::test]
    async fn test_setup_again_overwrites() {
        let db = Database::new(":memory:").await.unwrap();
        db.set_prayer_log_channel("42", "900").await.unwrap();
        db.set_prayer_log_channel("42", "901").await.unwrap();
        db.set_prayer_log_channel("43", "700").await.unwrap();

        assert_eq!(db.get_prayer_log_channel("42").await.unwrap().as_deref(), Some("901"));
        assert_eq!(db.get_prayer_log_channel("43").await.unwrap().as_deref(), Some("700"));
    }

    #[tokio::test]
    async fn test_corrupt_channel_id_is_an_error() {
        let db = Database::new(":memory:").await.unwrap();
        db.set_prayer_log_channel("42", "not-a-number").await.unwrap();
        assert!(db.prayer_config(GuildId(42)).await.is_err());
    }
}
