//! Relay Service
//!
//! Decides what to do with each incoming message, runs the conversion for
//! speech messages and delivers the result through a [`ChatReplier`].

use super::message::{
    COMMENT_ACK, Command, FAILURE_NOTICE, HELP_TEXT, IncomingMessage, MessageKind,
    PROCESSING_NOTICE, WELCOME_TEXT,
};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::tts::{AUDIO_FORMAT, ConversionJob, ScratchDir, SpeechSynthesizer, TtsClient};
use crate::utils::preview;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Platform message id of a reply the bot sent (used to delete notices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeId(pub i32);

/// Reply surface for one chat.
#[async_trait]
pub trait ChatReplier: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<NoticeId>;

    /// Send HTML-formatted text.
    async fn send_html(&self, html: &str) -> Result<NoticeId>;

    /// Upload an audio file as a voice message.
    async fn send_voice(&self, audio: &Path) -> Result<()>;

    async fn delete_notice(&self, notice: NoticeId) -> Result<()>;
}

/// How a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Welcomed,
    HelpShown,
    CommentIgnored,
    VoiceSent,
    ConversionFailed,
    /// A platform call failed part way; the error was logged.
    Aborted,
}

pub struct RelayService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    scratch: ScratchDir,
}

impl std::fmt::Debug for RelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayService")
            .field("scratch", &self.scratch)
            .finish_non_exhaustive()
    }
}

impl RelayService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, scratch: ScratchDir) -> Self {
        Self {
            synthesizer,
            scratch,
        }
    }

    /// Build the service from configuration: HTTP client for the TTS
    /// endpoint and the scratch directory (created if absent).
    pub async fn start(config: &Config) -> Result<Self> {
        let api_url = config.tts_api_url()?;
        let client = TtsClient::new(api_url, config.request_timeout())?;
        let scratch = ScratchDir::open(config.tts.temp_dir())
            .await
            .map_err(RelayError::Scratch)?;

        tracing::info!(
            "Relay started: TTS endpoint {}, scratch dir {}",
            api_url,
            scratch.root().display()
        );
        Ok(Self::new(Arc::new(client), scratch))
    }

    pub async fn shutdown(&self) {
        self.scratch.close().await;
        tracing::info!("Relay stopped");
    }

    /// Handle a message and absorb its errors. A speech message that failed
    /// before the user heard anything gets the failure notice; commands and
    /// comments only log. The returned error is the platform failure of that
    /// last notice, if any.
    pub async fn respond(&self, msg: &IncomingMessage, chat: &dyn ChatReplier) -> Result<Outcome> {
        match self.handle(msg, chat).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!(
                    "Failed to handle message {} from user {} [{}]: {}",
                    msg.message_id,
                    msg.sender_id,
                    e.code(),
                    e
                );
                if matches!(msg.kind(), MessageKind::Speech(_)) {
                    chat.send_text(FAILURE_NOTICE).await?;
                }
                Ok(Outcome::Aborted)
            }
        }
    }

    pub async fn handle(&self, msg: &IncomingMessage, chat: &dyn ChatReplier) -> Result<Outcome> {
        match msg.kind() {
            MessageKind::Command(Command::Start) => {
                chat.send_text(WELCOME_TEXT).await?;
                Ok(Outcome::Welcomed)
            }
            MessageKind::Command(Command::Help) => {
                chat.send_html(HELP_TEXT).await?;
                Ok(Outcome::HelpShown)
            }
            MessageKind::Comment => {
                tracing::debug!("Skipping comment from sender {}", msg.sender_id);
                chat.send_text(COMMENT_ACK).await?;
                Ok(Outcome::CommentIgnored)
            }
            MessageKind::Speech(text) => self.speak(msg, text, chat).await,
        }
    }

    async fn speak(
        &self,
        msg: &IncomingMessage,
        text: &str,
        chat: &dyn ChatReplier,
    ) -> Result<Outcome> {
        let notice = chat.send_text(PROCESSING_NOTICE).await?;

        let scratch = self.scratch.allocate(msg.sender_id, AUDIO_FORMAT);
        let mut job = ConversionJob::new(text, scratch.path());

        match self.synthesizer.convert(&mut job).await {
            Ok(audio) => {
                let delivered = Self::deliver(chat, &audio, notice).await;
                scratch.remove().await;
                delivered?;
                tracing::info!(
                    "Sent voice message to chat {} for \"{}\"",
                    msg.chat_id,
                    preview(text, 40)
                );
                Ok(Outcome::VoiceSent)
            }
            Err(e) => {
                tracing::error!(
                    "TTS conversion failed for sender {} [{}]: {}",
                    msg.sender_id,
                    e.code(),
                    e
                );
                scratch.remove().await;
                if let Err(e) = chat.send_text(FAILURE_NOTICE).await {
                    tracing::error!(
                        "Failed to send failure notice to chat {}: {}",
                        msg.chat_id,
                        e
                    );
                }
                Ok(Outcome::ConversionFailed)
            }
        }
    }

    /// Upload the voice message, then drop the processing notice. Once the
    /// upload went through the message counts as delivered; a notice that
    /// cannot be deleted is only logged.
    async fn deliver(chat: &dyn ChatReplier, audio: &Path, notice: NoticeId) -> Result<()> {
        chat.send_voice(audio).await?;
        if let Err(e) = chat.delete_notice(notice).await {
            tracing::warn!("Failed to delete processing notice {:?}: {}", notice, e);
        }
        Ok(())
    }
}
