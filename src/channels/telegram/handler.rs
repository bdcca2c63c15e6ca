//! Telegram Message Handler
//!
//! Turns a Telegram `Message` into an [`IncomingMessage`] and runs it
//! through the relay.

use super::TelegramChat;
use crate::channels::{IncomingMessage, RelayService};
use crate::error::RelayError;
use crate::utils::preview;
use std::sync::Arc;
use teloxide::prelude::*;

/// Handle one update. The relay answers its own failures; only a platform
/// error it could not report to the user reaches the dispatcher's error
/// handler.
pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    relay: Arc<RelayService>,
    bot_username: Arc<String>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        tracing::debug!("Telegram: ignoring non-text message in chat {}", msg.chat.id.0);
        return Ok(());
    };

    let incoming = IncomingMessage::new(
        sender_id(&msg),
        msg.chat.id.0,
        msg.id.0,
        text,
        &bot_username,
    );

    tracing::info!(
        "Telegram: text from user {} in chat {}: {}",
        incoming.sender_id,
        incoming.chat_id,
        preview(&incoming.text, 50)
    );

    let chat = TelegramChat::new(bot, msg.chat.id);
    match relay.respond(&incoming, &chat).await {
        Ok(outcome) => {
            tracing::debug!("Telegram: message {} handled: {:?}", incoming.message_id, outcome);
        }
        Err(RelayError::Platform(e)) => return Err(e),
        Err(e) => {
            tracing::error!(
                "Telegram: message {} from user {} dropped [{}]: {}",
                incoming.message_id,
                incoming.sender_id,
                e.code(),
                e
            );
        }
    }

    Ok(())
}

/// Channel posts have no sender; fall back to the chat id.
fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .map(|u| u.id.0 as i64)
        .unwrap_or(msg.chat.id.0)
}
