use anyhow::{Context as _, Result};
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Discord bot for permission-gated channel and message cleanup
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON config holding `permissions` and `raidMessage`
    #[arg(long, short = 'c', env = "BOT_CONFIG", default_value = "info.json")]
    config: String,

    /// Log at DEBUG instead of INFO
    #[arg(long, short = 'v')]
    verbose: bool,
}

mod commands;
mod config;
mod error;
mod events;
mod managers;
mod messages;
mod models;
mod permissions;
mod transport;

use commands::Dispatcher;
use config::{bot_id_from_token, discord_token, BotConfig};
use events::handle_message;
use transport::SerenityTransport;

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
pub struct Data {
    pub dispatcher: Dispatcher,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if let Err(e) = handle_message(ctx, new_message, data).await {
            error!("Failed to handle message: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = if args.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(level)
        .init();

    // Both of these are fatal: the bot must not connect without them
    let bot_config = BotConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load permissions from {}", args.config))?;
    let token = discord_token().context("Cannot start without a bot token")?;

    if let Some(bot_id) = bot_id_from_token(&token) {
        info!(
            "Bot ID: {} (configure intents at https://discord.com/developers/applications/{}/bot)",
            bot_id, bot_id
        );
    }

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    error!("Framework error: {}", error);
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            let bot_config = bot_config.clone();
            Box::pin(async move {
                info!("Bot logged in as: {} ({})", ready.user.name, ready.user.id);
                if ready.guilds.is_empty() {
                    warn!("Bot is not in any guilds yet");
                }

                let transport = Arc::new(SerenityTransport::new(ctx.http.clone()));
                let dispatcher = Dispatcher::new(ready.user.id.to_string(), &bot_config, transport);

                Ok(Data { dispatcher })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Requesting privileged intents: [\"MESSAGE_CONTENT\"]");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down...");
            shard_manager.shutdown_all().await;
        }
    });

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("Enable the MESSAGE_CONTENT privileged intent in the Discord Developer Portal:");
            error!("Go to https://discord.com/developers/applications -> Your App -> Bot -> Privileged Gateway Intents");
            return Err(anyhow::anyhow!(
                "Disallowed gateway intents. Enable MESSAGE_CONTENT in Discord Developer Portal"
            ));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
