//! Incoming message model and the fixed texts the bot replies with.

use teloxide::utils::command::BotCommands;

pub const WELCOME_TEXT: &str = "Welcome! Send me any text and I will read it back to you as a voice message.\n\nMessages starting with # or // are treated as comments and skipped. Send /help for details.";

pub const HELP_TEXT: &str = "<b>Text-to-Speech Bot</b>\n\n\
Send a plain text message and you get a <i>voice message</i> back.\n\n\
<b>Commands</b>\n\
/start - welcome message\n\
/help - this help\n\n\
<b>Comments</b>\n\
Messages starting with <code>#</code> or <code>//</code> are not converted.";

pub const COMMENT_ACK: &str = "Ignoring comment message.";

pub const PROCESSING_NOTICE: &str = "Converting your text to speech...";

pub const FAILURE_NOTICE: &str =
    "Sorry, there was an error processing your message. Please try again later.";

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "explain how to use the bot")]
    Help,
}

/// Text starting with `#` or `//` is a comment and is never converted.
pub fn is_comment(text: &str) -> bool {
    text.starts_with('#') || text.starts_with("//")
}

/// What the relay should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind<'a> {
    Command(Command),
    Comment,
    Speech(&'a str),
}

/// A text message as received from the platform. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub sender_id: i64,
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
    pub command: Option<Command>,
}

impl IncomingMessage {
    /// Build a message, recognising `/start` and `/help`. Commands addressed
    /// to a different bot (`/help@other_bot`) are left as plain text.
    pub fn new(
        sender_id: i64,
        chat_id: i64,
        message_id: i32,
        text: impl Into<String>,
        bot_username: &str,
    ) -> Self {
        let text = text.into();
        let command = if is_comment(&text) {
            None
        } else {
            text.split_whitespace()
                .next()
                .and_then(|head| Command::parse(head, bot_username).ok())
        };

        Self {
            sender_id,
            chat_id,
            message_id,
            text,
            command,
        }
    }

    pub fn kind(&self) -> MessageKind<'_> {
        match self.command {
            Some(cmd) => MessageKind::Command(cmd),
            None if is_comment(&self.text) => MessageKind::Comment,
            None => MessageKind::Speech(&self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOT: &str = "relay_bot";

    #[rstest]
    #[case("# ignore me", true)]
    #[case("#", true)]
    #[case("// todo", true)]
    #[case("//", true)]
    #[case("/ slash", false)]
    #[case(" # leading space", false)]
    #[case("Hello world", false)]
    #[case("C# is a language", false)]
    #[case("", false)]
    fn test_is_comment(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_comment(text), expected);
    }

    #[rstest]
    #[case("/start", Command::Start)]
    #[case("/help", Command::Help)]
    #[case("/start@relay_bot", Command::Start)]
    #[case("/start deep-link-payload", Command::Start)]
    fn test_commands(#[case] text: &str, #[case] expected: Command) {
        let msg = IncomingMessage::new(1, 1, 1, text, BOT);
        assert_eq!(msg.command, Some(expected));
        assert_eq!(msg.kind(), MessageKind::Command(expected));
    }

    #[test]
    fn test_command_for_other_bot_is_speech() {
        let msg = IncomingMessage::new(1, 1, 1, "/help@someone_else_bot", BOT);
        assert_eq!(msg.command, None);
        assert_eq!(msg.kind(), MessageKind::Speech("/help@someone_else_bot"));
    }

    #[test]
    fn test_unknown_command_is_speech() {
        let msg = IncomingMessage::new(1, 1, 1, "/weather", BOT);
        assert_eq!(msg.kind(), MessageKind::Speech("/weather"));
    }

    #[test]
    fn test_double_slash_command_is_comment() {
        let msg = IncomingMessage::new(1, 1, 1, "//start", BOT);
        assert_eq!(msg.command, None);
        assert_eq!(msg.kind(), MessageKind::Comment);
    }

    #[test]
    fn test_plain_text_is_speech() {
        let msg = IncomingMessage::new(10, 20, 30, "Hello world", BOT);
        assert_eq!(msg.sender_id, 10);
        assert_eq!(msg.chat_id, 20);
        assert_eq!(msg.message_id, 30);
        assert_eq!(msg.kind(), MessageKind::Speech("Hello world"));
    }

    #[test]
    fn test_help_text_lists_commands() {
        assert!(HELP_TEXT.contains("/start"));
        assert!(HELP_TEXT.contains("/help"));
        let descriptions = Command::descriptions().to_string();
        assert!(descriptions.contains("help"));
    }
}
