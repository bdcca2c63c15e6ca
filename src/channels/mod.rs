//! Channel Integrations
//!
//! Inbound side of the relay: the platform-neutral message model and relay
//! service, and the Telegram adapter that feeds them.

mod message;
mod relay;
pub mod telegram;

pub use message::{
    Command, IncomingMessage, MessageKind, is_comment, COMMENT_ACK, FAILURE_NOTICE, HELP_TEXT,
    PROCESSING_NOTICE, WELCOME_TEXT,
};
pub use relay::{ChatReplier, NoticeId, Outcome, RelayService};
