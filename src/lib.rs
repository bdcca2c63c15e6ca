//! tts-relay - Telegram Text-to-Speech Relay
//!
//! Receives text messages from Telegram, sends the text to an HTTP
//! text-to-speech endpoint and replies with the audio as a voice message.
//!
//! ## Quick Start
//!
//! ```bash
//! export TELEGRAM_BOT_TOKEN=123456:ABC...
//! export TTS_API_URL=http://localhost:5002/api/tts
//!
//! # Run the bot
//! tts-relay
//!
//! # Check the TTS endpoint without Telegram
//! tts-relay speak "Hello world"
//! ```

pub mod channels;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tts;
pub mod utils;

// Re-export commonly used types
pub use error::{ErrorCode, RelayError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
