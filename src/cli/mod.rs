//! CLI Module
//!
//! Command-line interface for tts-relay using Clap v4.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_config, cmd_serve, cmd_speak, load_config};

/// Default text for the smoke test
pub const DEFAULT_SPEAK_TEXT: &str = "This is a test of the text-to-speech API.";

/// tts-relay - Telegram text-to-speech relay bot
#[derive(Parser, Debug)]
#[command(name = "tts-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (writes JSON log files to .tts-relay/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TTS_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (default)
    Serve,

    /// Convert one text against the TTS endpoint and save the audio (smoke test)
    Speak {
        /// Text to convert
        text: Option<String>,

        /// Where to write the audio
        #[arg(short, long, default_value = "test-output.wav")]
        output: PathBuf,
    },

    /// Show the effective configuration (secrets redacted)
    Config,
}

/// Main CLI entry point
pub async fn run(cli: Cli) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None | Some(Commands::Serve) => cmd_serve(&config).await,
        Some(Commands::Speak { text, output }) => {
            let text = text.unwrap_or_else(|| DEFAULT_SPEAK_TEXT.to_string());
            cmd_speak(&config, &text, &output).await
        }
        Some(Commands::Config) => cmd_config(&config),
    }
}
