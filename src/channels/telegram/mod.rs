//! Telegram Bot Integration
//!
//! Runs the teloxide dispatcher and adapts Telegram messages and replies to
//! the relay service.

mod agent;
pub(crate) mod handler;

pub use agent::TelegramAgent;

use super::relay::{ChatReplier, NoticeId};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};

/// Replies into one Telegram chat.
#[derive(Clone)]
pub struct TelegramChat {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramChat {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ChatReplier for TelegramChat {
    async fn send_text(&self, text: &str) -> Result<NoticeId> {
        let sent = self.bot.send_message(self.chat_id, text).await?;
        Ok(NoticeId(sent.id.0))
    }

    async fn send_html(&self, html: &str) -> Result<NoticeId> {
        let sent = self
            .bot
            .send_message(self.chat_id, html)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(NoticeId(sent.id.0))
    }

    async fn send_voice(&self, audio: &Path) -> Result<()> {
        self.bot
            .send_voice(self.chat_id, InputFile::file(audio))
            .await?;
        Ok(())
    }

    async fn delete_notice(&self, notice: NoticeId) -> Result<()> {
        self.bot
            .delete_message(self.chat_id, MessageId(notice.0))
            .await?;
        Ok(())
    }
}
