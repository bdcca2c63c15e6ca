//! Telegram Agent
//!
//! Agent struct and startup logic.

use super::handler::handle_message;
use crate::channels::{Command, RelayService};
use crate::config::SecretString;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Telegram bot that relays text messages to the TTS endpoint
pub struct TelegramAgent {
    relay: Arc<RelayService>,
}

impl TelegramAgent {
    pub fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }

    /// Start the bot as a background task. Returns a JoinHandle that
    /// completes when the dispatcher stops (Ctrl-C).
    pub fn start(self, token: SecretString) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Starting Telegram bot");

            let bot = Bot::new(token.expose_secret());

            // Cached @username so "/help@this_bot" is recognised in groups
            let bot_username = match bot.get_me().await {
                Ok(me) => {
                    let username = me.username.clone().unwrap_or_default();
                    tracing::info!("Telegram: bot username is @{}", username);
                    username
                }
                Err(e) => {
                    tracing::warn!("Telegram: failed to get bot info (get_me): {}", e);
                    String::new()
                }
            };

            if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
                tracing::warn!("Telegram: failed to register command menu: {}", e);
            }

            let relay = self.relay.clone();
            let bot_username = Arc::new(bot_username);

            let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let relay = relay.clone();
                let bot_username = bot_username.clone();
                async move { handle_message(bot, msg, relay, bot_username).await }
            });

            Dispatcher::builder(bot, handler)
                .error_handler(LoggingErrorHandler::with_custom_text(
                    "Telegram: unhandled error in update handler",
                ))
                .enable_ctrlc_handler()
                .build()
                .dispatch()
                .await;

            tracing::info!("Telegram: dispatcher stopped");
        })
    }
}
