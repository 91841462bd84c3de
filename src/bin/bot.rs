use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use shepherd::commands::{BotContext, Router};
use shepherd::core::{Config, ImageBackend};
use shepherd::database::Database;
use shepherd::features::{
    BibleApiClient, GuildConfigStore, ImageGenerator, MemoryConfigStore, OpenAiChat,
    OpenAiImageGenerator, PollinationsGenerator,
};
use shepherd::gateway::{Gateway, SerenityConnection};

async fn open_store(path: &str) -> Result<Arc<dyn GuildConfigStore>> {
    if path == ":memory:" {
        info!("💾 Using in-memory prayer configuration (lost on restart)");
        return Ok(Arc::new(MemoryConfigStore::new()));
    }
    Ok(Arc::new(Database::new(path).await?))
}

fn image_generator(config: &Config) -> Result<Arc<dyn ImageGenerator>> {
    Ok(match config.image_backend {
        ImageBackend::Pollinations => Arc::new(PollinationsGenerator::new()?),
        ImageBackend::OpenAi => Arc::new(OpenAiImageGenerator::new(
            config.openai_api_key.clone(),
            config.adapter_timeout,
        )?),
    })
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Ctrl-C received"),
        Err(e) => {
            error!("Unable to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("============================================================");
            eprintln!(" Shepherd cannot start: {e}");
            eprintln!("============================================================");
            std::process::exit(1);
        }
    };

    // The openai crate reads its key from the environment, not from our config
    if let Some(key) = &config.openai_api_key {
        std::env::set_var("OPENAI_API_KEY", key);
        std::env::set_var("OPENAI_KEY", key);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Shepherd Discord Bot...");
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set - chat replies will fall back to an apology");
    }

    let store = open_store(&config.database_path).await?;
    let chat = Arc::new(OpenAiChat::new(
        config.openai_model.clone(),
        config.openai_api_key.is_some(),
    ));
    let images = image_generator(&config)?;
    let scripture = Arc::new(BibleApiClient::new(
        config.scripture_api_url.clone(),
        config.adapter_timeout,
    )?);
    let chat_channel = config.chat_channel_name.clone();
    let image_channel = config.image_channel_name.clone();
    let (adapter_timeout, store_timeout) = (config.adapter_timeout, config.store_timeout);
    info!(
        "💬 Chat channel: #{} | 🎨 Image channel: #{} ({:?})",
        config.chat_channel_name, config.image_channel_name, config.image_backend
    );

    let handle = Gateway::new(config.discord_token.clone())
        .start(move |http| {
            let connection = Arc::new(SerenityConnection::new(http));
            let ctx = Arc::new(
                BotContext::new(connection, store, chat, images, scripture)
                    .with_timeouts(adapter_timeout, store_timeout),
            );
            let router = Arc::new(Router::new(ctx, &chat_channel, &image_channel));
            info!(
                "Routes: {}",
                router.routes().names().collect::<Vec<_>>().join(", ")
            );
            router
        })
        .await?;
    handle.run_until(wait_for_ctrl_c()).await?;

    info!("Shepherd stopped");
    Ok(())
}
